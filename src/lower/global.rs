//! Top-level dispatch.

use crate::error::Result;
use crate::parser::Stanza;
use crate::symbols::StructureType;

use super::Lowerer;

impl Lowerer<'_> {
    /// Lower one top-level stanza and everything nested under it.
    pub(super) fn lower_global(&mut self, stanza: &Stanza) -> Result<()> {
        let cmd = self.cmd(stanza);
        let words = cmd.words();
        match words.as_slice() {
            ["hostname", name] | ["switchname", name] => {
                self.config.hostname = Some(name.to_string());
            }
            ["interface", ..] => self.lower_interface(stanza, &cmd)?,

            // Routing processes
            ["router", "bgp", asn, ..] => self.lower_router_bgp(stanza, &cmd, asn)?,
            ["router", "ospf" | "ospfv3", id, rest @ ..] => {
                self.lower_router_ospf(stanza, &cmd, id, rest)?
            }
            ["router", "isis", rest @ ..] => self.lower_router_isis(stanza, rest.first().copied())?,
            ["router", "rip"] => self.lower_router_rip(stanza)?,
            ["router", "eigrp", id] => self.lower_router_eigrp(stanza, &cmd, id)?,
            ["router", "static"] => self.lower_router_static(stanza)?,
            ["ip" | "ipv6", "route", ..] => self.lower_static_route(&cmd, 2)?,

            // VRFs
            ["vrf", "definition", name]
            | ["ip", "vrf", name]
            | ["vrf", "context", name]
            | ["vrf", name] => self.lower_vrf(stanza, name)?,

            // Filters
            ["access-list", ..] => self.lower_numbered_access_list(&cmd),
            ["no", "access-list", name] => self.remove_numbered_access_list(name),
            ["ip" | "ipv4" | "ipv6", "access-list", ..] => {
                self.lower_named_access_list(stanza, &cmd)?
            }
            ["ip" | "ipv6", "prefix-list", ..] => self.lower_prefix_list(&cmd),
            ["no", "ip" | "ipv6", "prefix-list", name, ..] => {
                let ipv6 = words[1] == "ipv6";
                self.remove_prefix_list(name, ipv6);
            }
            ["ip", "community-list", ..] => self.lower_community_list(&cmd),
            ["ip", "as-path", "access-list", ..] => self.lower_as_path_access_list(&cmd),

            // Policies
            ["route-map", name, rest @ ..] => self.lower_route_map(stanza, &cmd, name, rest)?,
            ["no", "route-map", name, ..] => {
                self.config.route_maps.shift_remove(*name);
                self.undefine(StructureType::RouteMap, name);
            }
            ["route-policy", name, ..] => self.lower_route_policy(stanza, &cmd, name),
            ["prefix-set", name] => self.lower_prefix_set(stanza, &cmd, name),
            ["community-set", name] => self.lower_community_set(stanza, &cmd, name),
            ["as-path-set", name] => self.lower_as_path_set(stanza, &cmd, name),
            ["end-policy" | "end-set"] => {}

            // Object groups and crypto
            ["object-group", "network", name] | ["object-group", "ip", "address", name] => {
                self.lower_network_object_group(stanza, &cmd, name)?
            }
            ["object-group", "service", name, ..] => {
                self.lower_service_object_group(stanza, &cmd, name)?
            }
            ["crypto", "map", name, seq, ..] if seq.parse::<u32>().is_ok() => {
                self.lower_crypto_map(stanza, &cmd, name, seq)?
            }

            // Management plane
            ["line", ..] => self.lower_line(stanza, &cmd)?,
            ["banner", kind, ..] => self.lower_banner(stanza, &cmd, kind),
            ["ip", "default-gateway", ..] => self.todo(&cmd, "ip default-gateway"),
            _ => {
                if !self.lower_management(stanza, &cmd)? {
                    self.unhandled(&cmd);
                }
            }
        }
        Ok(())
    }
}
