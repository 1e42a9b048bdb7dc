//! `router bgp`: process settings and the peer family.
//!
//! Every neighbor, peer-group and template statement runs against the
//! active [`PeerScope`]. Flat `neighbor X ...` lines push a scope for the
//! one line; block forms push it for the whole block. Statements typed
//! directly under `router bgp` run against the process master scope.

use std::net::{IpAddr, Ipv4Addr};

use ipnetwork::IpNetwork;
use smol_str::SmolStr;

use crate::base::parse_asn;
use crate::diagnostics::codes;
use crate::error::{LowerError, Result};
use crate::model::{
    BgpAggregate, BgpNetwork, BgpPeerGroup, BgpProcess, PeerKey, SendCommunity,
    parse_ipv4_network,
};
use crate::parser::Stanza;
use crate::symbols::{StructureType, StructureUsage};

use super::helpers::{Cmd, classful_network, inbound, policy_name};
use super::{Lowerer, PeerScope};

/// Address families that are walked but not modeled.
const UNSUPPORTED_FAMILIES: &[&str] = &[
    "vpnv4",
    "vpnv6",
    "mdt",
    "multicast",
    "l2vpn",
    "evpn",
    "rtfilter",
    "link-state",
    "flowspec",
    "mvpn",
];

impl Lowerer<'_> {
    pub(super) fn lower_router_bgp(&mut self, stanza: &Stanza, cmd: &Cmd, asn: &str) -> Result<()> {
        let Some(asn) = parse_asn(asn) else {
            self.invalid(cmd, "AS number");
            return Ok(());
        };
        let vrf = self.ctx.current_vrf();
        self.ensure_bgp_process(cmd, &vrf, asn);
        self.ctx.peers.push(PeerScope::Peer {
            vrf,
            key: PeerKey::Master,
        });
        self.walk_block(stanza, |this, child| this.lower_bgp_line(child))?;
        self.ctx.peers.pop(cmd.line, "router bgp")?;
        Ok(())
    }

    fn ensure_bgp_process(&mut self, cmd: &Cmd, vrf: &str, asn: u32) {
        let existing = self.config.vrf_mut(vrf).bgp.as_ref().map(|p| p.as_number);
        match existing {
            None => self.config.vrf_mut(vrf).bgp = Some(BgpProcess::new(asn)),
            Some(current) if current != asn => self.red_flag(
                cmd,
                codes::DUPLICATE_DEFINITION,
                format!("BGP process {asn} ignored: VRF {vrf} already runs process {current}"),
            ),
            Some(_) => {}
        }
    }

    /// VRF of the active peer scope, or of the innermost VRF block.
    fn scope_vrf(&self) -> SmolStr {
        match self.ctx.peers.active() {
            Some(PeerScope::Peer { vrf, .. }) => vrf.clone(),
            _ => self.ctx.current_vrf(),
        }
    }

    /// The process the active scope belongs to. `None` under the
    /// unsupported sentinel.
    fn bgp_process_mut(&mut self) -> Option<&mut BgpProcess> {
        let vrf = match self.ctx.peers.active() {
            Some(PeerScope::Peer { vrf, .. }) => vrf.clone(),
            _ => return None,
        };
        self.config.vrfs.get_mut(&vrf)?.bgp.as_mut()
    }

    /// Apply `update` to the active peer-family member.
    fn with_peer(&mut self, cmd: &Cmd, update: impl FnOnce(&mut BgpPeerGroup)) -> Result<()> {
        let (vrf, key) = match self.ctx.peers.active() {
            Some(PeerScope::Peer { vrf, key }) => (vrf.clone(), key.clone()),
            Some(PeerScope::Unsupported) => return Ok(()),
            None => {
                return Err(LowerError::missing_scope(
                    cmd.line,
                    "bgp neighbor setting",
                    "peer",
                ));
            }
        };
        let peer = self
            .config
            .vrfs
            .get_mut(&vrf)
            .and_then(|v| v.bgp.as_mut())
            .and_then(|p| p.peer_mut(&key));
        if let Some(peer) = peer {
            update(peer);
        }
        Ok(())
    }

    /// Create `key` in the active process and return the scope to push
    /// for it.
    fn enter_peer(&mut self, key: PeerKey) -> PeerScope {
        if self.ctx.in_unsupported_scope() {
            return PeerScope::Unsupported;
        }
        let vrf = self.scope_vrf();
        match self.bgp_process_mut() {
            Some(process) => {
                process.ensure_peer(&key);
                PeerScope::Peer { vrf, key }
            }
            None => PeerScope::Unsupported,
        }
    }

    // ========================================================================
    // Process block
    // ========================================================================

    fn lower_bgp_line(&mut self, stanza: &Stanza) -> Result<()> {
        let cmd = self.cmd(stanza);
        let words = cmd.words();
        match words.as_slice() {
            ["neighbor", id, rest @ ..] if stanza.has_children() => {
                self.lower_neighbor_block(stanza, &cmd, id, rest)?
            }
            ["neighbor", id, rest @ ..] => self.lower_flat_neighbor(&cmd, id, rest)?,

            // Templates and XR groups
            ["template", "peer-session", name] => self.lower_peer_template(
                stanza,
                &cmd,
                PeerKey::Session(SmolStr::new(*name)),
                StructureType::BgpPeerSession,
            )?,
            ["template", "peer-policy", name] => self.lower_peer_template(
                stanza,
                &cmd,
                PeerKey::Policy(SmolStr::new(*name)),
                StructureType::BgpPeerPolicy,
            )?,
            ["template", "peer", name] => self.lower_peer_template(
                stanza,
                &cmd,
                PeerKey::Group(SmolStr::new(*name)),
                StructureType::BgpTemplatePeer,
            )?,
            ["neighbor-group", name] => self.lower_peer_template(
                stanza,
                &cmd,
                PeerKey::Group(SmolStr::new(*name)),
                StructureType::BgpNeighborGroup,
            )?,
            ["session-group", name] => self.lower_peer_template(
                stanza,
                &cmd,
                PeerKey::Session(SmolStr::new(*name)),
                StructureType::BgpPeerSession,
            )?,
            ["af-group", name, ..] => self.lower_peer_template(
                stanza,
                &cmd,
                PeerKey::Policy(SmolStr::new(*name)),
                StructureType::BgpAfGroup,
            )?,

            ["address-family", family @ ..] => {
                self.lower_bgp_address_family(stanza, &cmd, family)?
            }
            ["vrf", name] => self.lower_bgp_vrf(stanza, &cmd, name)?,

            // Process settings
            ["bgp", "router-id", id] | ["router-id", id] => {
                if let Some(id) = self.num::<Ipv4Addr>(&cmd, id) {
                    if let Some(process) = self.bgp_process_mut() {
                        process.router_id = Some(id);
                    }
                }
            }
            ["bgp", "cluster-id", id] => {
                let id = id
                    .parse::<Ipv4Addr>()
                    .ok()
                    .or_else(|| id.parse::<u32>().ok().map(Ipv4Addr::from));
                match id {
                    Some(id) => {
                        if let Some(process) = self.bgp_process_mut() {
                            process.cluster_id = Some(id);
                        }
                    }
                    None => self.invalid(&cmd, "cluster id"),
                }
            }
            ["bgp", "always-compare-med"] => {
                if let Some(process) = self.bgp_process_mut() {
                    process.always_compare_med = true;
                }
            }
            ["bgp", "listen", "range", range, "peer-group", group] => {
                let Ok(range) = range.parse::<IpNetwork>() else {
                    self.invalid(&cmd, "listen range");
                    return Ok(());
                };
                self.reference(
                    StructureType::BgpPeerGroup,
                    group,
                    StructureUsage::BgpListenRangePeerGroup,
                    cmd.line,
                );
                if let Some(process) = self.bgp_process_mut() {
                    let key = PeerKey::Dynamic(range);
                    process.ensure_peer(&key);
                    if let Some(peer) = process.peer_mut(&key) {
                        peer.group = Some(SmolStr::new(*group));
                    }
                }
            }
            ["maximum-paths", rest @ ..] => {
                let (kind, count) = match rest {
                    [kind @ ("ebgp" | "ibgp"), count, ..] => (Some(*kind), *count),
                    [count, ..] => (None, *count),
                    [] => {
                        self.invalid(&cmd, "path count");
                        return Ok(());
                    }
                };
                if let Some(count) = self.num::<u32>(&cmd, count) {
                    if let Some(process) = self.bgp_process_mut() {
                        match kind {
                            Some("ebgp") => process.maximum_paths_ebgp = Some(count),
                            Some(_) => process.maximum_paths_ibgp = Some(count),
                            None => process.maximum_paths = Some(count),
                        }
                    }
                }
            }
            ["default-metric", metric] => {
                if let Some(metric) = self.num::<u32>(&cmd, metric) {
                    if let Some(process) = self.bgp_process_mut() {
                        process.default_metric = Some(metric);
                    }
                }
            }
            ["network", rest @ ..] => self.lower_bgp_network(&cmd, rest),
            ["aggregate-address", rest @ ..] => self.lower_bgp_aggregate(&cmd, rest),
            ["redistribute", args @ ..] => {
                let Some(redist) = self.redistribution(&cmd, args) else {
                    return Ok(());
                };
                self.reference_redistribution(
                    &cmd,
                    &redist,
                    StructureUsage::BgpRedistributeRouteMap,
                );
                if let Some(process) = self.bgp_process_mut() {
                    process.redistribution.insert(redist.protocol, redist);
                }
            }
            ["auto-summary"] => self.todo(&cmd, "bgp auto-summary"),
            ["no", "auto-summary"] => {}
            ["exit-address-family" | "exit-peer-session" | "exit-peer-policy" | "exit"] => {}
            _ => self.unhandled(&cmd),
        }
        Ok(())
    }

    fn lower_bgp_network(&mut self, cmd: &Cmd, words: &[&str]) {
        let Some((prefix, rest)) = parse_bgp_prefix(words) else {
            self.invalid(cmd, "network");
            return;
        };
        let route_map = match rest {
            ["route-map" | "route-policy", map, ..] => {
                let ty = if rest[0] == "route-map" {
                    StructureType::RouteMap
                } else {
                    StructureType::RoutePolicy
                };
                let map = policy_name(map);
                self.reference(ty, map, StructureUsage::BgpNetworkRouteMap, cmd.line);
                Some(SmolStr::new(map))
            }
            _ => None,
        };
        if let Some(process) = self.bgp_process_mut() {
            let network = BgpNetwork { prefix, route_map };
            match process.networks.iter_mut().find(|n| n.prefix == prefix) {
                Some(existing) => *existing = network,
                None => process.networks.push(network),
            }
        }
    }

    fn lower_bgp_aggregate(&mut self, cmd: &Cmd, words: &[&str]) {
        let Some((prefix, rest)) = parse_bgp_prefix(words) else {
            self.invalid(cmd, "aggregate prefix");
            return;
        };
        let mut aggregate = BgpAggregate {
            prefix,
            summary_only: false,
            as_set: false,
            attribute_map: None,
        };
        let mut iter = rest.iter();
        while let Some(word) = iter.next() {
            match *word {
                "summary-only" => aggregate.summary_only = true,
                "as-set" => aggregate.as_set = true,
                "attribute-map" | "route-policy" => {
                    if let Some(map) = iter.next() {
                        let ty = if *word == "attribute-map" {
                            StructureType::RouteMap
                        } else {
                            StructureType::RoutePolicy
                        };
                        let map = policy_name(map);
                        self.reference(ty, map, StructureUsage::BgpAggregateAttributeMap, cmd.line);
                        aggregate.attribute_map = Some(SmolStr::new(map));
                    }
                }
                _ => {}
            }
        }
        if let Some(process) = self.bgp_process_mut() {
            process.aggregates.retain(|a| a.prefix != prefix);
            process.aggregates.push(aggregate);
        }
    }

    fn lower_bgp_address_family(
        &mut self,
        stanza: &Stanza,
        cmd: &Cmd,
        words: &[&str],
    ) -> Result<()> {
        let Some(family) = address_family_name(words) else {
            self.ctx.peers.push(PeerScope::Unsupported);
            self.walk_block(stanza, |this, child| this.lower_bgp_line(child))?;
            self.ctx.peers.pop(cmd.line, "address-family")?;
            return Ok(());
        };
        let vrf = words
            .iter()
            .position(|w| *w == "vrf")
            .and_then(|i| words.get(i + 1));
        let saved = self.ctx.address_family.replace(family);
        match vrf {
            Some(vrf) => self.lower_bgp_vrf(stanza, cmd, vrf)?,
            None => self.walk_block(stanza, |this, child| this.lower_bgp_line(child))?,
        }
        self.ctx.address_family = saved;
        Ok(())
    }

    /// A per-VRF process: XR `vrf NAME` or IOS `address-family ... vrf NAME`.
    fn lower_bgp_vrf(&mut self, stanza: &Stanza, cmd: &Cmd, name: &str) -> Result<()> {
        let asn = self.bgp_process_mut().map(|p| p.as_number);
        self.ctx.vrfs.push(SmolStr::new(name));
        let scope = match asn {
            Some(asn) => {
                self.ensure_bgp_process(cmd, name, asn);
                PeerScope::Peer {
                    vrf: SmolStr::new(name),
                    key: PeerKey::Master,
                }
            }
            None => PeerScope::Unsupported,
        };
        self.ctx.peers.push(scope);
        self.walk_block(stanza, |this, child| this.lower_bgp_line(child))?;
        self.ctx.peers.pop(cmd.line, "bgp vrf")?;
        self.ctx.vrfs.pop(cmd.line, "bgp vrf")?;
        Ok(())
    }

    // ========================================================================
    // Neighbors and templates
    // ========================================================================

    fn lower_flat_neighbor(&mut self, cmd: &Cmd, id: &str, attr: &[&str]) -> Result<()> {
        if self.ctx.in_unsupported_scope() {
            return self.lower_peer_attr(cmd, attr);
        }
        let key = peer_key(id);
        if let PeerKey::Group(name) = &key {
            if matches!(attr, ["peer-group"]) {
                self.define(StructureType::BgpPeerGroup, name, cmd.line);
                if let Some(process) = self.bgp_process_mut() {
                    process.ensure_peer(&key);
                }
                return Ok(());
            }
            self.reference(
                StructureType::BgpPeerGroup,
                name,
                StructureUsage::BgpNeighborStatement,
                cmd.line,
            );
        }

        let exists = self
            .bgp_process_mut()
            .is_some_and(|p| p.peer(&key).is_some());
        let declares = !matches!(key, PeerKey::Group(_))
            && matches!(attr, ["remote-as", ..] | ["peer-group", _]);
        if !exists && !declares {
            self.red_flag(
                cmd,
                codes::UNDECLARED_PEER,
                format!(
                    "Ignoring statement for undeclared neighbor {id}: \
                     no remote-as or peer-group"
                ),
            );
            self.ctx.peers.push(PeerScope::Unsupported);
            self.lower_peer_attr(cmd, attr)?;
            self.ctx.peers.pop(cmd.line, "neighbor")?;
            return Ok(());
        }

        let scope = self.enter_peer(key);
        self.ctx.peers.push(scope);
        self.lower_peer_attr(cmd, attr)?;
        self.ctx.peers.pop(cmd.line, "neighbor")?;
        Ok(())
    }

    fn lower_neighbor_block(
        &mut self,
        stanza: &Stanza,
        cmd: &Cmd,
        id: &str,
        header: &[&str],
    ) -> Result<()> {
        let key = peer_key(id);
        if let PeerKey::Group(name) = &key {
            self.reference(
                StructureType::BgpPeerGroup,
                name,
                StructureUsage::BgpNeighborStatement,
                cmd.line,
            );
        }
        let scope = self.enter_peer(key);
        self.ctx.peers.push(scope);
        if !header.is_empty() {
            self.lower_peer_attr(cmd, header)?;
        }
        self.walk_block(stanza, |this, child| this.lower_peer_line(child))?;
        self.ctx.peers.pop(cmd.line, "neighbor")?;
        Ok(())
    }

    fn lower_peer_template(
        &mut self,
        stanza: &Stanza,
        cmd: &Cmd,
        key: PeerKey,
        ty: StructureType,
    ) -> Result<()> {
        self.define_block(ty, &key.to_string(), stanza);
        let scope = self.enter_peer(key);
        self.ctx.peers.push(scope);
        self.walk_block(stanza, |this, child| this.lower_peer_line(child))?;
        self.ctx.peers.pop(cmd.line, "peer template")?;
        Ok(())
    }

    /// A line inside a neighbor, template or group block.
    fn lower_peer_line(&mut self, stanza: &Stanza) -> Result<()> {
        let cmd = self.cmd(stanza);
        let words = cmd.words();
        match words.as_slice() {
            ["address-family", family @ ..] => {
                self.lower_peer_address_family(stanza, &cmd, family)
            }
            ["exit-peer-session" | "exit-peer-policy" | "exit-address-family" | "exit"] => Ok(()),
            attr => self.lower_peer_attr(&cmd, attr),
        }
    }

    fn lower_peer_address_family(
        &mut self,
        stanza: &Stanza,
        cmd: &Cmd,
        words: &[&str],
    ) -> Result<()> {
        let Some(family) = address_family_name(words) else {
            self.ctx.peers.push(PeerScope::Unsupported);
            self.walk_block(stanza, |this, child| this.lower_peer_line(child))?;
            self.ctx.peers.pop(cmd.line, "address-family")?;
            return Ok(());
        };
        let activated = family.clone();
        self.with_peer(cmd, |p| {
            p.address_families.insert(activated);
        })?;
        let saved = self.ctx.address_family.replace(family);
        self.walk_block(stanza, |this, child| this.lower_peer_line(child))?;
        self.ctx.address_family = saved;
        Ok(())
    }

    /// One peer attribute, `attr` being the words after the neighbor id.
    fn lower_peer_attr(&mut self, cmd: &Cmd, attr: &[&str]) -> Result<()> {
        let line = cmd.line;
        match attr {
            ["remote-as", asn, ..] => match parse_asn(asn) {
                Some(asn) => self.with_peer(cmd, |p| p.remote_as = Some(asn))?,
                None => self.invalid(cmd, "remote AS"),
            },
            ["local-as", asn, ..] => match parse_asn(asn) {
                Some(asn) => self.with_peer(cmd, |p| p.local_as = Some(asn))?,
                None => self.invalid(cmd, "local AS"),
            },
            ["description", text @ ..] => {
                let text = text.join(" ");
                self.with_peer(cmd, |p| p.description = Some(text))?
            }
            ["update-source", iface] => {
                let iface = self.reference_interface(iface, StructureUsage::BgpUpdateSource, line);
                self.with_peer(cmd, |p| p.update_source = Some(iface))?
            }
            ["ebgp-multihop"] => self.with_peer(cmd, |p| p.ebgp_multihop = Some(255))?,
            ["ebgp-multihop", hops] => {
                if let Some(hops) = self.num::<u32>(cmd, hops) {
                    self.with_peer(cmd, |p| p.ebgp_multihop = Some(hops))?
                }
            }
            ["next-hop-self", ..] => self.with_peer(cmd, |p| p.next_hop_self = Some(true))?,
            ["route-reflector-client"] => {
                self.with_peer(cmd, |p| p.route_reflector_client = Some(true))?
            }
            ["send-community" | "send-community-ebgp", rest @ ..] => {
                let kind = match rest {
                    [] | ["standard"] => SendCommunity::Standard,
                    ["extended"] => SendCommunity::Extended,
                    ["both"] => SendCommunity::Both,
                    _ => {
                        self.invalid(cmd, "send-community kind");
                        return Ok(());
                    }
                };
                self.with_peer(cmd, |p| p.send_community = Some(kind))?
            }
            ["route-map", map, direction] => {
                let Some(incoming) = inbound(direction) else {
                    self.invalid(cmd, "route-map direction");
                    return Ok(());
                };
                let usage = if incoming {
                    StructureUsage::BgpNeighborRouteMapIn
                } else {
                    StructureUsage::BgpNeighborRouteMapOut
                };
                self.reference(StructureType::RouteMap, map, usage, line);
                let map = SmolStr::new(*map);
                self.with_peer(cmd, |p| {
                    if incoming {
                        p.inbound_route_map = Some(map);
                    } else {
                        p.outbound_route_map = Some(map);
                    }
                })?
            }
            ["route-policy", policy, direction] => {
                let Some(incoming) = inbound(direction) else {
                    self.invalid(cmd, "route-policy direction");
                    return Ok(());
                };
                let usage = if incoming {
                    StructureUsage::BgpNeighborRoutePolicyIn
                } else {
                    StructureUsage::BgpNeighborRoutePolicyOut
                };
                let policy = policy_name(policy);
                self.reference(StructureType::RoutePolicy, policy, usage, line);
                let policy = SmolStr::new(policy);
                self.with_peer(cmd, |p| {
                    if incoming {
                        p.inbound_route_policy = Some(policy);
                    } else {
                        p.outbound_route_policy = Some(policy);
                    }
                })?
            }
            ["prefix-list", list, direction] => {
                let Some(incoming) = inbound(direction) else {
                    self.invalid(cmd, "prefix-list direction");
                    return Ok(());
                };
                let usage = if incoming {
                    StructureUsage::BgpNeighborPrefixListIn
                } else {
                    StructureUsage::BgpNeighborPrefixListOut
                };
                let ipv6 = self.ctx.in_ipv6_family();
                let ty = if ipv6 {
                    StructureType::Prefix6List
                } else {
                    StructureType::PrefixList
                };
                self.reference(ty, list, usage, line);
                let list = SmolStr::new(*list);
                self.with_peer(cmd, |p| match (ipv6, incoming) {
                    (false, true) => p.inbound_prefix_list = Some(list),
                    (false, false) => p.outbound_prefix_list = Some(list),
                    (true, true) => p.inbound_ipv6_prefix_list = Some(list),
                    (true, false) => p.outbound_ipv6_prefix_list = Some(list),
                })?
            }
            ["filter-list", list, direction] => {
                let Some(incoming) = inbound(direction) else {
                    self.invalid(cmd, "filter-list direction");
                    return Ok(());
                };
                let usage = if incoming {
                    StructureUsage::BgpNeighborFilterListIn
                } else {
                    StructureUsage::BgpNeighborFilterListOut
                };
                self.reference(StructureType::AsPathAccessList, list, usage, line);
                let list = SmolStr::new(*list);
                self.with_peer(cmd, |p| {
                    if incoming {
                        p.inbound_filter_list = Some(list);
                    } else {
                        p.outbound_filter_list = Some(list);
                    }
                })?
            }
            ["activate"] => {
                let family = self.ctx.address_family.clone();
                self.with_peer(cmd, |p| {
                    p.active = Some(true);
                    if let Some(family) = family {
                        p.address_families.insert(family);
                    }
                })?
            }
            ["shutdown", ..] => self.with_peer(cmd, |p| p.shutdown = Some(true))?,
            ["remove-private-as", ..] => {
                self.with_peer(cmd, |p| p.remove_private_as = Some(true))?
            }
            ["allowas-in"] => self.with_peer(cmd, |p| p.allowas_in = Some(3))?,
            ["allowas-in", count] => {
                if let Some(count) = self.num::<u32>(cmd, count) {
                    self.with_peer(cmd, |p| p.allowas_in = Some(count))?
                }
            }
            ["default-originate"] => self.with_peer(cmd, |p| p.default_originate = Some(true))?,
            ["default-originate", "route-map" | "route-policy", map] => {
                let ty = if attr[1] == "route-map" {
                    StructureType::RouteMap
                } else {
                    StructureType::RoutePolicy
                };
                let map = policy_name(map);
                self.reference(ty, map, StructureUsage::BgpDefaultOriginateRouteMap, line);
                let map = SmolStr::new(map);
                self.with_peer(cmd, |p| {
                    p.default_originate = Some(true);
                    p.default_originate_route_map = Some(map);
                })?
            }
            ["weight", weight] => {
                if let Some(weight) = self.num::<u32>(cmd, weight) {
                    self.with_peer(cmd, |p| p.weight = Some(weight))?
                }
            }

            // Links
            ["peer-group", group] => {
                self.reference(
                    StructureType::BgpPeerGroup,
                    group,
                    StructureUsage::BgpPeerGroupAssignment,
                    line,
                );
                let group = SmolStr::new(*group);
                self.with_peer(cmd, |p| p.group = Some(group))?
            }
            ["inherit", "peer-session", name] => {
                self.reference(
                    StructureType::BgpPeerSession,
                    name,
                    StructureUsage::BgpInheritPeerSession,
                    line,
                );
                let name = SmolStr::new(*name);
                self.with_peer(cmd, |p| p.session = Some(name))?
            }
            ["inherit", "peer-policy", name, ..] => {
                self.reference(
                    StructureType::BgpPeerPolicy,
                    name,
                    StructureUsage::BgpInheritPeerPolicy,
                    line,
                );
                let name = SmolStr::new(*name);
                self.with_peer(cmd, |p| add_policy(p, name))?
            }
            ["inherit", "peer", name] => {
                self.reference(
                    StructureType::BgpTemplatePeer,
                    name,
                    StructureUsage::BgpInheritPeer,
                    line,
                );
                let name = SmolStr::new(*name);
                self.with_peer(cmd, |p| p.group = Some(name))?
            }
            ["use", "neighbor-group", name] => {
                self.reference(
                    StructureType::BgpNeighborGroup,
                    name,
                    StructureUsage::BgpUseNeighborGroup,
                    line,
                );
                let name = SmolStr::new(*name);
                self.with_peer(cmd, |p| p.group = Some(name))?
            }
            ["use", "session-group", name] => {
                self.reference(
                    StructureType::BgpPeerSession,
                    name,
                    StructureUsage::BgpUseSessionGroup,
                    line,
                );
                let name = SmolStr::new(*name);
                self.with_peer(cmd, |p| p.session = Some(name))?
            }
            ["use", "af-group", name] => {
                self.reference(
                    StructureType::BgpAfGroup,
                    name,
                    StructureUsage::BgpUseAfGroup,
                    line,
                );
                let name = SmolStr::new(*name);
                self.with_peer(cmd, |p| add_policy(p, name))?
            }
            ["distribute-list", ..] => self.todo(cmd, "bgp neighbor distribute-list"),
            _ => self.unhandled(cmd),
        }
        Ok(())
    }
}

fn add_policy(peer: &mut BgpPeerGroup, name: SmolStr) {
    if !peer.policies.contains(&name) {
        peer.policies.push(name);
    }
}

/// Neighbor id to peer key: an address, a `bgp listen`-style prefix, or a
/// group name.
fn peer_key(id: &str) -> PeerKey {
    if let Ok(ip) = id.parse::<IpAddr>() {
        return PeerKey::from_ip(ip);
    }
    if id.contains('/') {
        if let Ok(range) = id.parse::<IpNetwork>() {
            return PeerKey::Dynamic(range);
        }
    }
    PeerKey::Group(SmolStr::new(id))
}

/// `ipv4 [unicast]` and friends as `"<afi> <safi>"`. `None` for families
/// that are walked but not modeled.
fn address_family_name(words: &[&str]) -> Option<SmolStr> {
    let words: Vec<&str> = words
        .iter()
        .copied()
        .take_while(|w| *w != "vrf")
        .collect();
    if words.iter().any(|w| UNSUPPORTED_FAMILIES.contains(w)) {
        return None;
    }
    match words.as_slice() {
        [afi] | [afi, "unicast"] => Some(SmolStr::new(format!("{afi} unicast"))),
        _ => Some(SmolStr::new(words.join(" "))),
    }
}

/// A network prefix as `A.B.C.D/len`, `A.B.C.D mask M`, `A.B.C.D M`, an
/// IPv6 prefix, or a bare classful address. Returns the remaining words.
fn parse_bgp_prefix<'a>(words: &'a [&'a str]) -> Option<(IpNetwork, &'a [&'a str])> {
    match words {
        [prefix, rest @ ..] if prefix.contains('/') => Some((prefix.parse().ok()?, rest)),
        [address, "mask", mask, rest @ ..] => Some((
            IpNetwork::V4(parse_ipv4_network(address, Some(*mask))?),
            rest,
        )),
        [address, mask, rest @ ..] if mask.parse::<Ipv4Addr>().is_ok() => Some((
            IpNetwork::V4(parse_ipv4_network(address, Some(*mask))?),
            rest,
        )),
        [address, rest @ ..] => {
            let ip: Ipv4Addr = address.parse().ok()?;
            Some((IpNetwork::V4(classful_network(ip)?), rest))
        }
        [] => None,
    }
}
