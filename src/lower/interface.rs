//! `interface` blocks.

use std::net::Ipv4Addr;

use ipnetwork::Ipv6Network;
use smol_str::SmolStr;

use crate::base::{SubRange, parse_area_id};
use crate::error::Result;
use crate::model::{
    Interface, SwitchportMode, TrunkEncapsulation, canonicalize_interface_name,
    expand_interface_range, parse_ipv4_network,
};
use crate::parser::Stanza;
use crate::symbols::{StructureType, StructureUsage};

use super::Lowerer;
use super::helpers::{Cmd, inbound};

impl Lowerer<'_> {
    pub(super) fn lower_interface(&mut self, stanza: &Stanza, cmd: &Cmd) -> Result<()> {
        let names = interface_names(&cmd.words()[1..]);
        if names.is_empty() {
            self.invalid(cmd, "interface name");
            return Ok(());
        }
        for name in &names {
            self.define_block(StructureType::Interface, name, stanza);
            let (_, created) = self.config.interface_mut(name);
            if !created {
                self.pedantic(cmd.line, format!("Interface {name} altered more than once"));
            }
        }
        self.ctx.interfaces = names.into_iter().map(SmolStr::from).collect();
        let result = self.walk_block(stanza, |this, child| {
            let cmd = this.cmd(child);
            this.lower_interface_line(&cmd);
            Ok(())
        });
        self.ctx.interfaces.clear();
        result
    }

    /// Apply `f` to every interface of the current block.
    fn each_interface(&mut self, mut f: impl FnMut(&mut Interface)) {
        let names = self.ctx.interfaces.clone();
        for name in &names {
            let (iface, _) = self.config.interface_mut(name);
            f(iface);
        }
    }

    fn lower_interface_line(&mut self, cmd: &Cmd) {
        let words = cmd.words();
        match words.as_slice() {
            ["description", ..] => {
                let text = cmd.rest(1);
                self.each_interface(|i| i.description = Some(text.clone()));
            }

            // Addressing
            ["ip" | "ipv4", "address", first, rest @ ..] => {
                let (second, secondary) = match rest {
                    ["secondary", ..] => (None, true),
                    [mask, "secondary", ..] => (Some(*mask), true),
                    [mask, ..] if !first.contains('/') => (Some(*mask), false),
                    _ => (None, false),
                };
                let Some(network) = parse_ipv4_network(first, second) else {
                    self.invalid(cmd, "interface address");
                    return;
                };
                self.each_interface(|i| {
                    if secondary {
                        if !i.secondary_addresses.contains(&network) {
                            i.secondary_addresses.push(network);
                        }
                    } else {
                        i.address = Some(network);
                    }
                });
            }
            ["no", "ip" | "ipv4", "address", ..] => self.each_interface(|i| {
                i.address = None;
                i.secondary_addresses.clear();
            }),
            ["ipv6", "address", prefix, ..] => match prefix.parse::<Ipv6Network>() {
                Ok(network) => self.each_interface(|i| {
                    if !i.ipv6_addresses.contains(&network) {
                        i.ipv6_addresses.push(network);
                    }
                }),
                Err(_) if matches!(*prefix, "autoconfig" | "dhcp") => self.unhandled(cmd),
                Err(_) => self.invalid(cmd, "IPv6 address"),
            },

            // State and sizing
            ["shutdown"] => self.each_interface(|i| i.active = false),
            ["no", "shutdown"] => self.each_interface(|i| i.active = true),
            ["mtu", value] => {
                if let Some(mtu) = self.num::<u32>(cmd, value) {
                    self.each_interface(|i| i.mtu = mtu);
                }
            }
            ["bandwidth", value, ..] => {
                if let Some(kbps) = self.num::<f64>(cmd, value) {
                    let bandwidth = kbps * self.dialect().bandwidth_multiplier();
                    self.each_interface(|i| i.bandwidth = Some(bandwidth));
                }
            }
            ["speed", "auto", ..] | ["speed", "nonegotiate"] => {}
            ["speed", value, ..] => {
                if let Some(mbps) = self.num::<f64>(cmd, value) {
                    let speed = mbps * self.dialect().speed_multiplier();
                    self.each_interface(|i| i.speed = Some(speed));
                }
            }

            // VRF membership
            ["vrf", "forwarding", vrf]
            | ["ip", "vrf", "forwarding", vrf]
            | ["vrf", "member", vrf]
            | ["vrf", vrf] => {
                self.reference(StructureType::Vrf, vrf, StructureUsage::InterfaceVrf, cmd.line);
                self.config.vrf_mut(vrf);
                let vrf = SmolStr::new(*vrf);
                self.each_interface(|i| i.vrf = vrf.clone());
            }

            // Filters
            ["ip" | "ipv4", "access-group", acl, direction, ..] => {
                let Some(incoming) = inbound(direction) else {
                    self.invalid(cmd, "filter direction");
                    return;
                };
                let usage = if incoming {
                    StructureUsage::InterfaceIncomingFilter
                } else {
                    StructureUsage::InterfaceOutgoingFilter
                };
                self.reference(StructureType::Ipv4AccessList, acl, usage, cmd.line);
                let acl = SmolStr::new(*acl);
                self.each_interface(|i| {
                    if incoming {
                        i.incoming_filter = Some(acl.clone());
                    } else {
                        i.outgoing_filter = Some(acl.clone());
                    }
                });
            }
            ["ipv6", "traffic-filter" | "access-group", acl, direction] => {
                let Some(incoming) = inbound(direction) else {
                    self.invalid(cmd, "filter direction");
                    return;
                };
                let usage = if incoming {
                    StructureUsage::InterfaceIpv6IncomingFilter
                } else {
                    StructureUsage::InterfaceIpv6OutgoingFilter
                };
                self.reference(StructureType::Ipv6AccessList, acl, usage, cmd.line);
                let acl = SmolStr::new(*acl);
                self.each_interface(|i| {
                    if incoming {
                        i.ipv6_incoming_filter = Some(acl.clone());
                    } else {
                        i.ipv6_outgoing_filter = Some(acl.clone());
                    }
                });
            }
            ["ip", "policy", "route-map", map] => {
                self.reference(
                    StructureType::RouteMap,
                    map,
                    StructureUsage::InterfacePolicyRouteMap,
                    cmd.line,
                );
                let map = SmolStr::new(*map);
                self.each_interface(|i| i.routing_policy = Some(map.clone()));
            }

            // OSPF
            ["ip", "ospf", "cost", value] => {
                if let Some(cost) = self.num::<u32>(cmd, value) {
                    self.each_interface(|i| i.ospf.cost = Some(cost));
                }
            }
            ["ip", "ospf", "dead-interval", value] => {
                if let Some(secs) = self.num::<u32>(cmd, value) {
                    self.each_interface(|i| i.ospf.dead_interval = Some(secs));
                }
            }
            ["ip", "ospf", "hello-interval", value] => {
                if let Some(secs) = self.num::<u32>(cmd, value) {
                    self.each_interface(|i| i.ospf.hello_interval = Some(secs));
                }
            }
            ["ip", "ospf", "passive-interface"] => {
                self.each_interface(|i| i.ospf.passive = Some(true))
            }
            ["no", "ip", "ospf", "passive-interface"] => {
                self.each_interface(|i| i.ospf.passive = Some(false))
            }
            ["ip", "ospf", process, "area", area]
            | ["ip", "router", "ospf", process, "area", area] => {
                let Some(area) = parse_area_id(area) else {
                    self.invalid(cmd, "OSPF area");
                    return;
                };
                let process = SmolStr::new(*process);
                self.each_interface(|i| {
                    i.ospf.process = Some(process.clone());
                    i.ospf.area = Some(area);
                });
            }

            // IS-IS
            ["ip" | "ipv6", "router", "isis", tag @ ..] => {
                let tag = SmolStr::new(tag.first().copied().unwrap_or(""));
                self.each_interface(|i| i.isis.process = Some(tag.clone()));
            }
            ["isis", "metric", value, ..] => {
                if let Some(metric) = self.num::<u32>(cmd, value) {
                    self.each_interface(|i| i.isis.metric = Some(metric));
                }
            }
            ["isis", "passive"] | ["isis", "passive-interface"] => {
                self.each_interface(|i| i.isis.passive = true)
            }

            // Switching
            ["switchport"] => self.each_interface(|i| i.switchport_mut().enabled = true),
            ["no", "switchport"] => self.each_interface(|i| i.switchport_mut().enabled = false),
            ["switchport", "mode", "dynamic", kind] => {
                let mode = match *kind {
                    "auto" => SwitchportMode::DynamicAuto,
                    "desirable" => SwitchportMode::DynamicDesirable,
                    _ => {
                        self.invalid(cmd, "switchport mode");
                        return;
                    }
                };
                self.each_interface(|i| {
                    let sw = i.switchport_mut();
                    sw.enabled = true;
                    sw.mode = Some(mode);
                });
            }
            ["switchport", "mode", mode] => {
                let Some(mode) = SwitchportMode::parse(mode) else {
                    self.invalid(cmd, "switchport mode");
                    return;
                };
                self.each_interface(|i| {
                    let sw = i.switchport_mut();
                    sw.enabled = true;
                    sw.mode = Some(mode);
                });
            }
            ["switchport", "access", "vlan", vlan] => {
                if let Some(vlan) = self.num::<u32>(cmd, vlan) {
                    self.each_interface(|i| i.switchport_mut().access_vlan = Some(vlan));
                }
            }
            ["switchport", "trunk", "native", "vlan", vlan] => {
                if let Some(vlan) = self.num::<u32>(cmd, vlan) {
                    self.each_interface(|i| i.switchport_mut().native_vlan = Some(vlan));
                }
            }
            ["switchport", "trunk", "allowed", "vlan", rest @ ..] => {
                let (add, list) = match rest {
                    ["add", list] => (true, *list),
                    ["none"] => (false, ""),
                    ["all"] => (false, "1-4094"),
                    [list] => (false, *list),
                    _ => {
                        self.invalid(cmd, "VLAN list");
                        return;
                    }
                };
                let Some(ranges) = vlan_ranges(list) else {
                    self.invalid(cmd, "VLAN list");
                    return;
                };
                self.each_interface(|i| {
                    let sw = i.switchport_mut();
                    if !add {
                        sw.allowed_vlans.clear();
                    }
                    sw.allowed_vlans.extend(ranges.iter().copied());
                });
            }
            ["switchport", "trunk", "encapsulation", encap] => {
                let encap = match *encap {
                    "dot1q" => TrunkEncapsulation::Dot1q,
                    "isl" => TrunkEncapsulation::Isl,
                    "negotiate" => TrunkEncapsulation::Negotiate,
                    _ => {
                        self.invalid(cmd, "trunk encapsulation");
                        return;
                    }
                };
                self.each_interface(|i| i.switchport_mut().encapsulation = Some(encap));
            }
            ["channel-group", number, ..] => {
                let bundle = format!("Port-Channel{number}");
                let usage = StructureUsage::InterfaceChannelGroup;
                let bundle = self.reference_interface(&bundle, usage, cmd.line);
                self.each_interface(|i| i.channel_group = Some(bundle.clone()));
            }
            ["spanning-tree", "portfast", ..] => {
                self.each_interface(|i| i.spanning_tree_portfast = true)
            }

            // Other
            ["ip", "helper-address", address] => match address.parse::<Ipv4Addr>() {
                Ok(address) => self.each_interface(|i| {
                    if !i.helper_addresses.contains(&address) {
                        i.helper_addresses.push(address);
                    }
                }),
                Err(_) => self.invalid(cmd, "helper address"),
            },
            ["ip", "proxy-arp"] => self.each_interface(|i| i.proxy_arp = Some(true)),
            ["no", "ip", "proxy-arp"] => self.each_interface(|i| i.proxy_arp = Some(false)),
            ["crypto", "map", map] => {
                self.reference(
                    StructureType::CryptoMap,
                    map,
                    StructureUsage::InterfaceCryptoMap,
                    cmd.line,
                );
                let map = SmolStr::new(*map);
                self.each_interface(|i| i.crypto_map = Some(map.clone()));
            }
            ["encapsulation", encap, vlan, ..] if encap.eq_ignore_ascii_case("dot1q") => {
                if let Some(vlan) = self.num::<u32>(cmd, vlan) {
                    self.each_interface(|i| i.encapsulation_vlan = Some(vlan));
                }
            }
            ["ip", "nat", ..] => self.todo(cmd, "ip nat"),
            ["ip", "verify", ..] => self.todo(cmd, "ip verify"),
            _ => self.unhandled(cmd),
        }
    }
}

/// Canonical names named by the words after `interface`.
fn interface_names(words: &[&str]) -> Vec<String> {
    match words {
        ["range", rest @ ..] => expand_interface_range(&rest.join(" ")),
        [prefix, number, ..] if number.starts_with(|c: char| c.is_ascii_digit()) => {
            vec![canonicalize_interface_name(&format!("{prefix}{number}"))]
        }
        [name, ..] => expand_interface_range(name),
        [] => Vec::new(),
    }
}

/// `1,3-5,10` into ranges.
fn vlan_ranges(list: &str) -> Option<Vec<SubRange>> {
    list.split(',')
        .filter(|item| !item.is_empty())
        .map(SubRange::parse)
        .collect()
}
