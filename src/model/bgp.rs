//! BGP processes and the peer-group family.
//!
//! Concrete neighbors, dynamic ranges, peer-groups, session templates,
//! policy templates and XR groups all share one attribute set,
//! [`BgpPeerGroup`]. They differ only in where they live in
//! [`BgpProcess`] and in the name links they carry. Links are plain names
//! resolved on demand by [`BgpProcess::effective_peer`].

use std::collections::BTreeSet;
use std::net::{IpAddr, Ipv4Addr};

use indexmap::IndexMap;
use ipnetwork::{IpNetwork, Ipv4Network};
use serde::Serialize;
use smol_str::SmolStr;

use super::igp::RedistributionMap;

/// Which member of the peer family a [`BgpPeerGroup`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PeerKind {
    /// Process-wide defaults typed directly under `router bgp`.
    Master,
    Ipv4,
    Ipv6,
    Dynamic,
    /// `neighbor NAME peer-group`, XR `neighbor-group`, `template peer`.
    Group,
    /// `template peer-session`, XR `session-group`.
    Session,
    /// `template peer-policy`, XR `af-group`.
    Policy,
}

/// Address of a peer-family member inside its process.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PeerKey {
    Master,
    Ipv4(Ipv4Addr),
    Ipv6(std::net::Ipv6Addr),
    Dynamic(IpNetwork),
    Group(SmolStr),
    Session(SmolStr),
    Policy(SmolStr),
}

impl PeerKey {
    pub fn kind(&self) -> PeerKind {
        match self {
            PeerKey::Master => PeerKind::Master,
            PeerKey::Ipv4(_) => PeerKind::Ipv4,
            PeerKey::Ipv6(_) => PeerKind::Ipv6,
            PeerKey::Dynamic(_) => PeerKind::Dynamic,
            PeerKey::Group(_) => PeerKind::Group,
            PeerKey::Session(_) => PeerKind::Session,
            PeerKey::Policy(_) => PeerKind::Policy,
        }
    }

    pub fn from_ip(ip: IpAddr) -> Self {
        match ip {
            IpAddr::V4(v4) => PeerKey::Ipv4(v4),
            IpAddr::V6(v6) => PeerKey::Ipv6(v6),
        }
    }
}

impl std::fmt::Display for PeerKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PeerKey::Master => f.write_str("<process>"),
            PeerKey::Ipv4(ip) => write!(f, "{ip}"),
            PeerKey::Ipv6(ip) => write!(f, "{ip}"),
            PeerKey::Dynamic(range) => write!(f, "{range}"),
            PeerKey::Group(name) | PeerKey::Session(name) | PeerKey::Policy(name) => {
                f.write_str(name)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SendCommunity {
    Standard,
    Extended,
    Both,
}

/// Settings shared by every member of the peer family.
///
/// Every field is optional so that inheritance can tell "unset" from
/// "set to the default".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BgpPeerGroup {
    pub kind: PeerKind,
    pub name: SmolStr,
    pub remote_as: Option<u32>,
    pub local_as: Option<u32>,
    pub description: Option<String>,
    pub update_source: Option<SmolStr>,
    pub ebgp_multihop: Option<u32>,
    pub next_hop_self: Option<bool>,
    pub route_reflector_client: Option<bool>,
    pub send_community: Option<SendCommunity>,
    pub inbound_route_map: Option<SmolStr>,
    pub outbound_route_map: Option<SmolStr>,
    pub inbound_route_policy: Option<SmolStr>,
    pub outbound_route_policy: Option<SmolStr>,
    pub inbound_prefix_list: Option<SmolStr>,
    pub outbound_prefix_list: Option<SmolStr>,
    pub inbound_ipv6_prefix_list: Option<SmolStr>,
    pub outbound_ipv6_prefix_list: Option<SmolStr>,
    pub inbound_filter_list: Option<SmolStr>,
    pub outbound_filter_list: Option<SmolStr>,
    pub active: Option<bool>,
    pub shutdown: Option<bool>,
    pub remove_private_as: Option<bool>,
    pub allowas_in: Option<u32>,
    pub default_originate: Option<bool>,
    pub default_originate_route_map: Option<SmolStr>,
    pub weight: Option<u32>,
    /// `neighbor X peer-group G`, XR `use neighbor-group`, `inherit peer`.
    pub group: Option<SmolStr>,
    /// `inherit peer-session`, XR `use session-group`.
    pub session: Option<SmolStr>,
    /// `inherit peer-policy`, XR `use af-group`. Several may apply.
    pub policies: Vec<SmolStr>,
    /// Address families this member was activated in or configured under.
    pub address_families: BTreeSet<SmolStr>,
}

/// Copy every unset field of `$dst` from `$src`.
macro_rules! fill_from {
    ($dst:ident, $src:ident; $($field:ident),* $(,)?) => {
        $(
            if $dst.$field.is_none() {
                $dst.$field = $src.$field.clone();
            }
        )*
    };
}

impl BgpPeerGroup {
    pub fn new(kind: PeerKind, name: impl Into<SmolStr>) -> Self {
        Self {
            kind,
            name: name.into(),
            remote_as: None,
            local_as: None,
            description: None,
            update_source: None,
            ebgp_multihop: None,
            next_hop_self: None,
            route_reflector_client: None,
            send_community: None,
            inbound_route_map: None,
            outbound_route_map: None,
            inbound_route_policy: None,
            outbound_route_policy: None,
            inbound_prefix_list: None,
            outbound_prefix_list: None,
            inbound_ipv6_prefix_list: None,
            outbound_ipv6_prefix_list: None,
            inbound_filter_list: None,
            outbound_filter_list: None,
            active: None,
            shutdown: None,
            remove_private_as: None,
            allowas_in: None,
            default_originate: None,
            default_originate_route_map: None,
            weight: None,
            group: None,
            session: None,
            policies: Vec::new(),
            address_families: BTreeSet::new(),
        }
    }

    /// Take every field this member leaves unset from `parent`.
    pub fn inherit_from(&mut self, parent: &BgpPeerGroup) {
        fill_from!(self, parent;
            remote_as, local_as, description, update_source, ebgp_multihop,
            next_hop_self, route_reflector_client, send_community,
            inbound_route_map, outbound_route_map,
            inbound_route_policy, outbound_route_policy,
            inbound_prefix_list, outbound_prefix_list,
            inbound_ipv6_prefix_list, outbound_ipv6_prefix_list,
            inbound_filter_list, outbound_filter_list,
            active, shutdown, remove_private_as, allowas_in,
            default_originate, default_originate_route_map, weight,
        );
        self.address_families
            .extend(parent.address_families.iter().cloned());
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BgpNetwork {
    pub prefix: IpNetwork,
    pub route_map: Option<SmolStr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BgpAggregate {
    pub prefix: IpNetwork,
    pub summary_only: bool,
    pub as_set: bool,
    pub attribute_map: Option<SmolStr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BgpProcess {
    pub as_number: u32,
    pub router_id: Option<Ipv4Addr>,
    pub cluster_id: Option<Ipv4Addr>,
    pub always_compare_med: bool,
    pub maximum_paths: Option<u32>,
    pub maximum_paths_ebgp: Option<u32>,
    pub maximum_paths_ibgp: Option<u32>,
    pub default_metric: Option<u32>,
    pub master: BgpPeerGroup,
    pub ipv4_peers: IndexMap<Ipv4Addr, BgpPeerGroup>,
    pub ipv6_peers: IndexMap<std::net::Ipv6Addr, BgpPeerGroup>,
    pub dynamic_peers: IndexMap<IpNetwork, BgpPeerGroup>,
    pub peer_groups: IndexMap<SmolStr, BgpPeerGroup>,
    pub peer_sessions: IndexMap<SmolStr, BgpPeerGroup>,
    pub peer_policies: IndexMap<SmolStr, BgpPeerGroup>,
    pub networks: Vec<BgpNetwork>,
    pub aggregates: Vec<BgpAggregate>,
    pub redistribution: RedistributionMap,
}

/// Why inheritance resolution stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InheritanceIssue {
    /// A link names a group or template that does not exist.
    Missing { from: SmolStr, to: SmolStr },
    /// Following links came back to a member already visited.
    Cycle { at: SmolStr },
}

impl BgpProcess {
    pub fn new(as_number: u32) -> Self {
        Self {
            as_number,
            router_id: None,
            cluster_id: None,
            always_compare_med: false,
            maximum_paths: None,
            maximum_paths_ebgp: None,
            maximum_paths_ibgp: None,
            default_metric: None,
            master: BgpPeerGroup::new(PeerKind::Master, ""),
            ipv4_peers: IndexMap::new(),
            ipv6_peers: IndexMap::new(),
            dynamic_peers: IndexMap::new(),
            peer_groups: IndexMap::new(),
            peer_sessions: IndexMap::new(),
            peer_policies: IndexMap::new(),
            networks: Vec::new(),
            aggregates: Vec::new(),
            redistribution: RedistributionMap::new(),
        }
    }

    pub fn peer(&self, key: &PeerKey) -> Option<&BgpPeerGroup> {
        match key {
            PeerKey::Master => Some(&self.master),
            PeerKey::Ipv4(ip) => self.ipv4_peers.get(ip),
            PeerKey::Ipv6(ip) => self.ipv6_peers.get(ip),
            PeerKey::Dynamic(range) => self.dynamic_peers.get(range),
            PeerKey::Group(name) => self.peer_groups.get(name),
            PeerKey::Session(name) => self.peer_sessions.get(name),
            PeerKey::Policy(name) => self.peer_policies.get(name),
        }
    }

    pub fn peer_mut(&mut self, key: &PeerKey) -> Option<&mut BgpPeerGroup> {
        match key {
            PeerKey::Master => Some(&mut self.master),
            PeerKey::Ipv4(ip) => self.ipv4_peers.get_mut(ip),
            PeerKey::Ipv6(ip) => self.ipv6_peers.get_mut(ip),
            PeerKey::Dynamic(range) => self.dynamic_peers.get_mut(range),
            PeerKey::Group(name) => self.peer_groups.get_mut(name),
            PeerKey::Session(name) => self.peer_sessions.get_mut(name),
            PeerKey::Policy(name) => self.peer_policies.get_mut(name),
        }
    }

    /// Look up a member, creating it if absent. Returns whether it was
    /// created.
    pub fn ensure_peer(&mut self, key: &PeerKey) -> bool {
        if self.peer(key).is_some() {
            return false;
        }
        let peer = BgpPeerGroup::new(key.kind(), key.to_string());
        match key {
            PeerKey::Master => return false,
            PeerKey::Ipv4(ip) => {
                self.ipv4_peers.insert(*ip, peer);
            }
            PeerKey::Ipv6(ip) => {
                self.ipv6_peers.insert(*ip, peer);
            }
            PeerKey::Dynamic(range) => {
                self.dynamic_peers.insert(*range, peer);
            }
            PeerKey::Group(name) => {
                self.peer_groups.insert(name.clone(), peer);
            }
            PeerKey::Session(name) => {
                self.peer_sessions.insert(name.clone(), peer);
            }
            PeerKey::Policy(name) => {
                self.peer_policies.insert(name.clone(), peer);
            }
        }
        true
    }

    /// Whether an IPv4 neighbor address falls in a `bgp listen range`.
    pub fn dynamic_range_for(&self, ip: IpAddr) -> Option<&IpNetwork> {
        self.dynamic_peers.keys().find(|range| range.contains(ip))
    }

    /// Resolve `key` into a flat attribute set.
    ///
    /// Precedence, highest first: the member's own settings, its policy
    /// templates, its session template (and that template's own session
    /// chain), its group (and that group's chain), then the process-wide
    /// master settings. Missing links and cycles stop resolution along
    /// that chain and are reported alongside the partial result.
    pub fn effective_peer(&self, key: &PeerKey) -> Option<(BgpPeerGroup, Vec<InheritanceIssue>)> {
        let own = self.peer(key)?;
        let mut result = own.clone();
        let mut issues = Vec::new();
        let start = || BTreeSet::from([(own.kind as u8, own.name.clone())]);

        for policy in &own.policies {
            self.inherit_chain(&mut result, policy, PeerKind::Policy, &mut start(), &mut issues);
        }
        if let Some(session) = &own.session {
            self.inherit_chain(&mut result, session, PeerKind::Session, &mut start(), &mut issues);
        }
        if let Some(group) = &own.group {
            self.inherit_chain(&mut result, group, PeerKind::Group, &mut start(), &mut issues);
        }
        if *key != PeerKey::Master {
            result.inherit_from(&self.master);
        }
        Some((result, issues))
    }

    /// Inherit from `name` and its ancestors. `path` holds the templates
    /// between the resolved peer and `name`; a template shared by two
    /// siblings is not a cycle.
    fn inherit_chain(
        &self,
        target: &mut BgpPeerGroup,
        name: &SmolStr,
        kind: PeerKind,
        path: &mut BTreeSet<(u8, SmolStr)>,
        issues: &mut Vec<InheritanceIssue>,
    ) {
        let link = (kind as u8, name.clone());
        if path.contains(&link) {
            issues.push(InheritanceIssue::Cycle { at: name.clone() });
            return;
        }
        let parent = match kind {
            PeerKind::Policy => self.peer_policies.get(name),
            PeerKind::Session => self.peer_sessions.get(name),
            _ => self.peer_groups.get(name),
        };
        let Some(parent) = parent else {
            issues.push(InheritanceIssue::Missing {
                from: target.name.clone(),
                to: name.clone(),
            });
            return;
        };
        target.inherit_from(parent);
        path.insert(link.clone());
        for policy in &parent.policies {
            self.inherit_chain(target, policy, PeerKind::Policy, path, issues);
        }
        if let Some(session) = &parent.session {
            self.inherit_chain(target, session, PeerKind::Session, path, issues);
        }
        if let Some(group) = &parent.group {
            self.inherit_chain(target, group, PeerKind::Group, path, issues);
        }
        path.remove(&link);
    }

    /// Every IPv4 neighbor's effective settings, in definition order.
    pub fn effective_ipv4_peers(&self) -> Vec<(Ipv4Addr, BgpPeerGroup)> {
        self.ipv4_peers
            .keys()
            .filter_map(|ip| {
                self.effective_peer(&PeerKey::Ipv4(*ip))
                    .map(|(peer, _)| (*ip, peer))
            })
            .collect()
    }

    /// The network statement for `prefix`, if any.
    pub fn network(&self, prefix: Ipv4Network) -> Option<&BgpNetwork> {
        self.networks
            .iter()
            .find(|n| n.prefix == IpNetwork::V4(prefix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn process() -> BgpProcess {
        let mut bgp = BgpProcess::new(65000);
        let group = PeerKey::Group("PG".into());
        bgp.ensure_peer(&group);
        let pg = bgp.peer_mut(&group).unwrap();
        pg.remote_as = Some(65001);
        pg.description = Some("from group".into());
        pg.send_community = Some(SendCommunity::Both);

        let session = PeerKey::Session("SESS".into());
        bgp.ensure_peer(&session);
        let s = bgp.peer_mut(&session).unwrap();
        s.description = Some("from session".into());
        s.update_source = Some("Loopback0".into());
        bgp
    }

    #[test]
    fn test_own_settings_win() {
        let mut bgp = process();
        let key = PeerKey::Ipv4("192.0.2.1".parse().unwrap());
        assert!(bgp.ensure_peer(&key));
        assert!(!bgp.ensure_peer(&key));
        let peer = bgp.peer_mut(&key).unwrap();
        peer.group = Some("PG".into());
        peer.session = Some("SESS".into());
        peer.remote_as = Some(65099);

        let (effective, issues) = bgp.effective_peer(&key).unwrap();
        assert!(issues.is_empty());
        assert_eq!(effective.remote_as, Some(65099));
        assert_eq!(effective.description.as_deref(), Some("from session"));
        assert_eq!(effective.update_source.as_deref(), Some("Loopback0"));
        assert_eq!(effective.send_community, Some(SendCommunity::Both));
    }

    #[test]
    fn test_cycle_is_reported() {
        let mut bgp = BgpProcess::new(1);
        for (name, parent) in [("A", "B"), ("B", "A")] {
            let key = PeerKey::Session(name.into());
            bgp.ensure_peer(&key);
            bgp.peer_mut(&key).unwrap().session = Some(parent.into());
        }
        let (_, issues) = bgp.effective_peer(&PeerKey::Session("A".into())).unwrap();
        assert_eq!(issues, vec![InheritanceIssue::Cycle { at: "A".into() }]);
    }

    #[test]
    fn test_shared_ancestor_is_not_a_cycle() {
        let mut bgp = BgpProcess::new(1);
        for (name, parent) in [("P1", Some("P3")), ("P2", Some("P3")), ("P3", None)] {
            let key = PeerKey::Policy(name.into());
            bgp.ensure_peer(&key);
            let policy = bgp.peer_mut(&key).unwrap();
            policy.policies = parent.into_iter().map(SmolStr::new).collect();
        }
        bgp.peer_mut(&PeerKey::Policy("P3".into())).unwrap().send_community =
            Some(SendCommunity::Extended);

        let key = PeerKey::Ipv4("192.0.2.1".parse().unwrap());
        bgp.ensure_peer(&key);
        bgp.peer_mut(&key).unwrap().policies = vec!["P1".into(), "P2".into()];

        let (effective, issues) = bgp.effective_peer(&key).unwrap();
        assert!(issues.is_empty(), "{issues:?}");
        assert_eq!(effective.send_community, Some(SendCommunity::Extended));
    }

    #[test]
    fn test_missing_group_is_reported() {
        let mut bgp = BgpProcess::new(1);
        let key = PeerKey::Ipv4("192.0.2.1".parse().unwrap());
        bgp.ensure_peer(&key);
        bgp.peer_mut(&key).unwrap().group = Some("NOPE".into());
        let (_, issues) = bgp.effective_peer(&key).unwrap();
        assert!(matches!(issues[0], InheritanceIssue::Missing { .. }));
    }

    #[test]
    fn test_master_settings_apply_last() {
        let mut bgp = BgpProcess::new(1);
        bgp.master.send_community = Some(SendCommunity::Standard);
        let key = PeerKey::Ipv4("192.0.2.1".parse().unwrap());
        bgp.ensure_peer(&key);
        let (effective, _) = bgp.effective_peer(&key).unwrap();
        assert_eq!(effective.send_community, Some(SendCommunity::Standard));
    }
}
