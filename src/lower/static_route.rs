//! Static routes and VRF definition blocks.

use std::net::{IpAddr, Ipv4Addr};

use ipnetwork::IpNetwork;
use smol_str::SmolStr;

use crate::error::Result;
use crate::model::{StaticRoute, canonicalize_interface_name, parse_ipv4_network};
use crate::parser::Stanza;
use crate::symbols::{StructureType, StructureUsage};

use super::Lowerer;
use super::helpers::Cmd;

impl Lowerer<'_> {
    /// `[ip|ipv6 route] [vrf V] PREFIX [MASK] {NEXT-HOP|INTERFACE}... [options]`.
    /// `start` is the index of the first word after the command keywords.
    pub(super) fn lower_static_route(&mut self, cmd: &Cmd, start: usize) -> Result<()> {
        let words = cmd.words();
        let args = words.get(start..).unwrap_or_default();
        let (vrf, args) = match args {
            ["vrf", vrf, rest @ ..] => (SmolStr::new(*vrf), rest),
            _ => (self.ctx.current_vrf(), args),
        };
        let Some((prefix, options)) = parse_route_prefix(args) else {
            self.invalid(cmd, "static route prefix");
            return Ok(());
        };

        let mut route = StaticRoute::new(prefix, self.dialect().default_static_route_distance());
        let mut iter = options.iter();
        while let Some(word) = iter.next() {
            match *word {
                "tag" => route.tag = iter.next().and_then(|t| t.parse().ok()),
                "name" | "description" => route.name = iter.next().map(|n| n.to_string()),
                "permanent" => route.permanent = true,
                "track" | "bfd" => {
                    iter.next();
                }
                "global" | "multicast" | "unicast" => {}
                word => {
                    if let Ok(ip) = word.parse::<IpAddr>() {
                        if route.next_hop_ip.is_none() {
                            route.next_hop_ip = Some(ip);
                        }
                    } else if let Ok(distance) = word.parse::<u8>() {
                        route.distance = distance;
                    } else if word.starts_with(|c: char| c.is_ascii_alphabetic()) {
                        route.next_hop_interface = Some(self.route_interface(cmd, word));
                    } else {
                        self.invalid(cmd, &format!("static route option '{word}'"));
                        return Ok(());
                    }
                }
            }
        }
        self.config.vrf_mut(&vrf).add_static_route(route);
        Ok(())
    }

    /// Canonical next-hop interface. Discard interfaces are never defined,
    /// so they are not recorded as references.
    fn route_interface(&mut self, cmd: &Cmd, name: &str) -> SmolStr {
        if name.to_ascii_lowercase().starts_with("null") {
            return SmolStr::new(canonicalize_interface_name(name));
        }
        self.reference_interface(name, StructureUsage::StaticRouteInterface, cmd.line)
    }

    /// XR `router static` with optional `vrf` and `address-family` blocks.
    pub(super) fn lower_router_static(&mut self, stanza: &Stanza) -> Result<()> {
        self.walk_block(stanza, |this, child| this.lower_router_static_line(child))
    }

    fn lower_router_static_line(&mut self, stanza: &Stanza) -> Result<()> {
        let cmd = self.cmd(stanza);
        let words = cmd.words();
        match words.as_slice() {
            ["vrf", name] => {
                self.ctx.vrfs.push(SmolStr::new(*name));
                self.walk_block(stanza, |this, child| this.lower_router_static_line(child))?;
                self.ctx.vrfs.pop(cmd.line, "router static vrf")?;
            }
            ["address-family", ..] => {
                self.walk_block(stanza, |this, child| this.lower_router_static_line(child))?
            }
            _ => self.lower_static_route(&cmd, 0)?,
        }
        Ok(())
    }

    // ========================================================================
    // VRF blocks
    // ========================================================================

    pub(super) fn lower_vrf(&mut self, stanza: &Stanza, name: &str) -> Result<()> {
        self.define_block(StructureType::Vrf, name, stanza);
        self.config.vrf_mut(name);
        self.ctx.vrfs.push(SmolStr::new(name));
        self.walk_block(stanza, |this, child| this.lower_vrf_line(child))?;
        let line = self.line_of(stanza);
        self.ctx.vrfs.pop(line, "vrf")?;
        Ok(())
    }

    fn lower_vrf_line(&mut self, stanza: &Stanza) -> Result<()> {
        let cmd = self.cmd(stanza);
        let words = cmd.words();
        let vrf = self.ctx.current_vrf();
        match words.as_slice() {
            ["description", ..] => self.config.vrf_mut(&vrf).description = Some(cmd.rest(1)),
            ["rd", rd] => self.config.vrf_mut(&vrf).route_distinguisher = Some(rd.to_string()),
            ["route-target", direction, target, ..] => {
                let target = target.to_string();
                let entry = self.config.vrf_mut(&vrf);
                match *direction {
                    "import" => {
                        entry.route_targets_import.insert(target);
                    }
                    "export" => {
                        entry.route_targets_export.insert(target);
                    }
                    "both" => {
                        entry.route_targets_import.insert(target.clone());
                        entry.route_targets_export.insert(target);
                    }
                    _ => self.invalid(&cmd, "route-target direction"),
                }
            }
            // XR: `import route-target` / `export route-target` blocks list
            // one target per line.
            ["import" | "export", "route-target"] => {
                let import = words[0] == "import";
                let targets: Vec<String> = stanza
                    .children()
                    .iter()
                    .filter_map(|child| child.words().first().map(|w| w.value().to_string()))
                    .collect();
                let entry = self.config.vrf_mut(&vrf);
                if import {
                    entry.route_targets_import.extend(targets);
                } else {
                    entry.route_targets_export.extend(targets);
                }
            }
            ["address-family", ..] => {
                self.walk_block(stanza, |this, child| this.lower_vrf_line(child))?
            }
            ["ip" | "ipv6", "route", ..] => self.lower_static_route(&cmd, 2)?,
            ["exit-address-family"] => {}
            _ => self.unhandled(&cmd),
        }
        Ok(())
    }
}

/// The destination prefix of a static route and the words after it.
fn parse_route_prefix<'a>(words: &'a [&'a str]) -> Option<(IpNetwork, &'a [&'a str])> {
    match words {
        [prefix, rest @ ..] if prefix.contains('/') => {
            let prefix: IpNetwork = prefix.parse().ok()?;
            let prefix = IpNetwork::new(prefix.network(), prefix.prefix()).ok()?;
            Some((prefix, rest))
        }
        [address, mask, rest @ ..] if mask.parse::<Ipv4Addr>().is_ok() => Some((
            IpNetwork::V4(parse_ipv4_network(address, Some(*mask))?),
            rest,
        )),
        _ => None,
    }
}
