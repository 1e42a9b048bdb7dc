//! `router isis`, `router rip` and `router eigrp`.

use std::net::Ipv4Addr;

use smol_str::SmolStr;

use crate::error::Result;
use crate::model::{EigrpProcess, IpWildcard, IsisProcess, RipProcess, parse_ipv4_network};
use crate::parser::Stanza;
use crate::policy::IsisLevel;
use crate::symbols::StructureUsage;

use super::Lowerer;
use super::helpers::{Cmd, classful_network};

impl Lowerer<'_> {
    // ========================================================================
    // IS-IS
    // ========================================================================

    pub(super) fn lower_router_isis(&mut self, stanza: &Stanza, tag: Option<&str>) -> Result<()> {
        let vrf = self.ctx.current_vrf();
        let tag = SmolStr::new(tag.unwrap_or_default());
        self.isis_mut(&vrf, &tag);
        self.walk_block(stanza, |this, child| this.lower_isis_line(child, &vrf, &tag))
    }

    fn isis_mut(&mut self, vrf: &str, tag: &SmolStr) -> &mut IsisProcess {
        self.config
            .vrf_mut(vrf)
            .isis
            .entry(tag.clone())
            .or_insert_with(|| IsisProcess::new(tag))
    }

    fn lower_isis_line(&mut self, stanza: &Stanza, vrf: &str, tag: &SmolStr) -> Result<()> {
        let cmd = self.cmd(stanza);
        let words = cmd.words();
        match words.as_slice() {
            ["net", net] => self.isis_mut(vrf, tag).net = Some(net.to_string()),
            ["is-type", level] => match IsisLevel::parse(level) {
                Some(level) => self.isis_mut(vrf, tag).is_type = Some(level),
                None => self.invalid(&cmd, "is-type"),
            },
            ["metric-style", style @ ..] if !style.is_empty() => {
                self.isis_mut(vrf, tag).metric_style = Some(style.join(" "))
            }
            ["passive-interface", name @ ..] if !name.is_empty() => {
                let name = self.reference_interface(
                    &name.concat(),
                    StructureUsage::IsisPassiveInterface,
                    cmd.line,
                );
                if let Some(iface) = self.config.interfaces.get_mut(&name) {
                    iface.isis.passive = true;
                }
                self.isis_mut(vrf, tag).passive_interfaces.insert(name);
            }
            ["redistribute", args @ ..] => {
                if let Some(redist) = self.redistribution(&cmd, args) {
                    self.reference_redistribution(
                        &cmd,
                        &redist,
                        StructureUsage::IsisRedistributeRouteMap,
                    );
                    self.isis_mut(vrf, tag)
                        .redistribution
                        .insert(redist.protocol, redist);
                }
            }
            ["summary-address", prefix, rest @ ..] => {
                let mask = rest.first().copied().filter(|m| m.contains('.'));
                match parse_ipv4_network(prefix, mask) {
                    Some(summary) => {
                        let process = self.isis_mut(vrf, tag);
                        if !process.summary_addresses.contains(&summary) {
                            process.summary_addresses.push(summary);
                        }
                    }
                    None => self.invalid(&cmd, "summary address"),
                }
            }
            ["address-family", family @ ..] if !family.is_empty() => {
                let family = SmolStr::new(family.join(" "));
                self.isis_mut(vrf, tag).address_families.insert(family);
                self.walk_block(stanza, |this, child| this.lower_isis_line(child, vrf, tag))?;
            }
            ["interface", name @ ..] if !name.is_empty() => {
                let usage = StructureUsage::IsisInterface;
                let name = self.reference_interface(&name.concat(), usage, cmd.line);
                self.isis_mut(vrf, tag).interfaces.insert(name.clone());
                if let Some(iface) = self.config.interfaces.get_mut(&name) {
                    iface.isis.process = Some(tag.clone());
                }
                self.walk_block(stanza, |this, child| {
                    this.lower_isis_interface_line(child, vrf, tag, &name)
                })?;
            }
            _ => self.unhandled(&cmd),
        }
        Ok(())
    }

    /// Settings under an XR `router isis` / `interface X` block.
    fn lower_isis_interface_line(
        &mut self,
        stanza: &Stanza,
        vrf: &str,
        tag: &SmolStr,
        name: &SmolStr,
    ) -> Result<()> {
        let cmd = self.cmd(stanza);
        let words = cmd.words();
        match words.as_slice() {
            ["passive"] => {
                self.isis_mut(vrf, tag).passive_interfaces.insert(name.clone());
                if let Some(iface) = self.config.interfaces.get_mut(name) {
                    iface.isis.passive = true;
                }
            }
            ["metric", metric, ..] => {
                if let Some(metric) = self.num::<u32>(&cmd, metric) {
                    if let Some(iface) = self.config.interfaces.get_mut(name) {
                        iface.isis.metric = Some(metric);
                    }
                }
            }
            ["address-family", ..] => self.walk_block(stanza, |this, child| {
                this.lower_isis_interface_line(child, vrf, tag, name)
            })?,
            _ => self.unhandled(&cmd),
        }
        Ok(())
    }

    // ========================================================================
    // RIP
    // ========================================================================

    pub(super) fn lower_router_rip(&mut self, stanza: &Stanza) -> Result<()> {
        let vrf = self.ctx.current_vrf();
        self.rip_mut(&vrf);
        self.walk_block(stanza, |this, child| this.lower_rip_line(child, &vrf))
    }

    fn rip_mut(&mut self, vrf: &str) -> &mut RipProcess {
        self.config
            .vrf_mut(vrf)
            .rip
            .get_or_insert_with(RipProcess::default)
    }

    fn lower_rip_line(&mut self, stanza: &Stanza, vrf: &str) -> Result<()> {
        let cmd = self.cmd(stanza);
        let words = cmd.words();
        match words.as_slice() {
            ["version", version] => {
                if let Some(version) = self.num::<u8>(&cmd, version) {
                    self.rip_mut(vrf).version = Some(version);
                }
            }
            ["network", address] => {
                match address.parse::<Ipv4Addr>().ok().and_then(classful_network) {
                    Some(network) => {
                        self.rip_mut(vrf).networks.insert(network);
                    }
                    None => self.invalid(&cmd, "network"),
                }
            }
            ["passive-interface", "default"] => self.rip_mut(vrf).passive_interface_default = true,
            ["no", "passive-interface", "default"] => {
                self.rip_mut(vrf).passive_interface_default = false
            }
            ["passive-interface", name @ ..] if !name.is_empty() => {
                let name = self.reference_interface(
                    &name.concat(),
                    StructureUsage::RipPassiveInterface,
                    cmd.line,
                );
                let process = self.rip_mut(vrf);
                process.active_interfaces.remove(&name);
                process.passive_interfaces.insert(name);
            }
            ["no", "passive-interface", name @ ..] if !name.is_empty() => {
                let name = self.reference_interface(
                    &name.concat(),
                    StructureUsage::RipPassiveInterface,
                    cmd.line,
                );
                let process = self.rip_mut(vrf);
                process.passive_interfaces.remove(&name);
                process.active_interfaces.insert(name);
            }
            ["redistribute", args @ ..] => {
                if let Some(redist) = self.redistribution(&cmd, args) {
                    self.reference_redistribution(
                        &cmd,
                        &redist,
                        StructureUsage::RipRedistributeRouteMap,
                    );
                    self.rip_mut(vrf)
                        .redistribution
                        .insert(redist.protocol, redist);
                }
            }
            ["default-information", "originate", ..] => {
                self.rip_mut(vrf).default_information_originate = true
            }
            ["address-family", "ipv4", "vrf", name, ..] => {
                let name = SmolStr::new(*name);
                self.ctx.vrfs.push(name.clone());
                self.rip_mut(&name);
                self.walk_block(stanza, |this, child| this.lower_rip_line(child, &name))?;
                self.ctx.vrfs.pop(cmd.line, "rip address-family")?;
            }
            ["exit-address-family"] => {}
            _ => self.unhandled(&cmd),
        }
        Ok(())
    }

    // ========================================================================
    // EIGRP
    // ========================================================================

    pub(super) fn lower_router_eigrp(
        &mut self,
        stanza: &Stanza,
        cmd: &Cmd,
        id: &str,
    ) -> Result<()> {
        let Ok(asn) = id.parse::<u32>() else {
            self.todo(cmd, "eigrp named mode");
            return Ok(());
        };
        let vrf = self.ctx.current_vrf();
        self.eigrp_mut(&vrf, asn);
        self.walk_block(stanza, |this, child| this.lower_eigrp_line(child, &vrf, asn))
    }

    fn eigrp_mut(&mut self, vrf: &str, asn: u32) -> &mut EigrpProcess {
        self.config
            .vrf_mut(vrf)
            .eigrp
            .entry(asn)
            .or_insert_with(|| EigrpProcess::new(asn))
    }

    fn lower_eigrp_line(&mut self, stanza: &Stanza, vrf: &str, asn: u32) -> Result<()> {
        let cmd = self.cmd(stanza);
        let words = cmd.words();
        match words.as_slice() {
            ["network", address, rest @ ..] => {
                let Ok(ip) = address.parse::<Ipv4Addr>() else {
                    self.invalid(&cmd, "network");
                    return Ok(());
                };
                let wildcard = match rest {
                    [wildcard, ..] => wildcard
                        .parse::<Ipv4Addr>()
                        .ok()
                        .map(|w| IpWildcard::new(ip, w)),
                    [] => classful_network(ip).map(IpWildcard::from_network),
                };
                match wildcard {
                    Some(wildcard) => {
                        let process = self.eigrp_mut(vrf, asn);
                        if !process.networks.contains(&wildcard) {
                            process.networks.push(wildcard);
                        }
                    }
                    None => self.invalid(&cmd, "network wildcard"),
                }
            }
            ["eigrp", "router-id", id] => {
                if let Some(id) = self.num::<Ipv4Addr>(&cmd, id) {
                    self.eigrp_mut(vrf, asn).router_id = Some(id);
                }
            }
            ["passive-interface", "default"] => {
                self.eigrp_mut(vrf, asn).passive_interface_default = true
            }
            ["no", "passive-interface", "default"] => {
                self.eigrp_mut(vrf, asn).passive_interface_default = false
            }
            ["passive-interface", name @ ..] if !name.is_empty() => {
                let name = self.reference_interface(
                    &name.concat(),
                    StructureUsage::EigrpPassiveInterface,
                    cmd.line,
                );
                let process = self.eigrp_mut(vrf, asn);
                process.active_interfaces.remove(&name);
                process.passive_interfaces.insert(name);
            }
            ["no", "passive-interface", name @ ..] if !name.is_empty() => {
                let name = self.reference_interface(
                    &name.concat(),
                    StructureUsage::EigrpPassiveInterface,
                    cmd.line,
                );
                let process = self.eigrp_mut(vrf, asn);
                process.passive_interfaces.remove(&name);
                process.active_interfaces.insert(name);
            }
            ["redistribute", args @ ..] => {
                if let Some(redist) = self.redistribution(&cmd, args) {
                    self.reference_redistribution(
                        &cmd,
                        &redist,
                        StructureUsage::EigrpRedistributeRouteMap,
                    );
                    self.eigrp_mut(vrf, asn)
                        .redistribution
                        .insert(redist.protocol, redist);
                }
            }
            ["address-family", ..] => self.todo(&cmd, "eigrp address-family"),
            _ => self.unhandled(&cmd),
        }
        Ok(())
    }
}
