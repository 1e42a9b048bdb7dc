//! `router ospf` blocks.

use std::net::Ipv4Addr;

use smol_str::SmolStr;

use crate::base::parse_area_id;
use crate::error::{LowerError, Result};
use crate::model::{
    AreaType, Configuration, IpWildcard, OspfNetworkStatement, OspfProcess, parse_ipv4_network,
};
use crate::parser::Stanza;
use crate::symbols::{StructureType, StructureUsage};

use super::Lowerer;
use super::helpers::Cmd;

impl Lowerer<'_> {
    pub(super) fn lower_router_ospf(
        &mut self,
        stanza: &Stanza,
        cmd: &Cmd,
        id: &str,
        rest: &[&str],
    ) -> Result<()> {
        let vrf = match rest {
            ["vrf", vrf, ..] => SmolStr::new(*vrf),
            _ => self.ctx.current_vrf(),
        };
        let reference_bandwidth = self.dialect().default_reference_bandwidth();
        self.config
            .vrf_mut(&vrf)
            .ospf
            .entry(SmolStr::new(id))
            .or_insert_with(|| OspfProcess::new(id, reference_bandwidth));

        let saved = self
            .ctx
            .ospf_process
            .replace((vrf.clone(), SmolStr::new(id)));
        self.walk_block(stanza, |this, child| this.lower_ospf_line(child))?;
        self.ctx.ospf_process = saved;

        let Configuration {
            vrfs, interfaces, ..
        } = &mut self.config;
        if let Some(process) = vrfs.get_mut(&vrf).and_then(|v| v.ospf.get_mut(id)) {
            let count = process.compute_networks(&vrf, interfaces).len();
            tracing::debug!(
                line = cmd.line,
                process = id,
                networks = count,
                "computed ospf networks"
            );
        }
        Ok(())
    }

    /// The process of the enclosing `router ospf` block.
    fn ospf_mut(&mut self, cmd: &Cmd) -> Result<&mut OspfProcess> {
        let missing = || LowerError::missing_scope(cmd.line, "ospf setting", "ospf process");
        let (vrf, id) = self.ctx.ospf_process.clone().ok_or_else(missing)?;
        self.config
            .vrfs
            .get_mut(&vrf)
            .and_then(|v| v.ospf.get_mut(&id))
            .ok_or_else(missing)
    }

    fn lower_ospf_line(&mut self, stanza: &Stanza) -> Result<()> {
        let cmd = self.cmd(stanza);
        let words = cmd.words();
        match words.as_slice() {
            ["router-id", id] => {
                if let Some(id) = self.num::<Ipv4Addr>(&cmd, id) {
                    self.ospf_mut(&cmd)?.router_id = Some(id);
                }
            }
            ["network", prefix, "area", area] => {
                let (Some(network), Some(area)) =
                    (parse_ipv4_network(prefix, None), parse_area_id(area))
                else {
                    self.invalid(&cmd, "network statement");
                    return Ok(());
                };
                self.ospf_mut(&cmd)?
                    .network_statements
                    .push(OspfNetworkStatement {
                        wildcard: IpWildcard::from_network(network),
                        area,
                    });
            }
            ["network", ip, wildcard, "area", area] => {
                let parsed = (
                    ip.parse::<Ipv4Addr>(),
                    wildcard.parse::<Ipv4Addr>(),
                    parse_area_id(area),
                );
                let (Ok(ip), Ok(wildcard), Some(area)) = parsed else {
                    self.invalid(&cmd, "network statement");
                    return Ok(());
                };
                self.ospf_mut(&cmd)?
                    .network_statements
                    .push(OspfNetworkStatement {
                        wildcard: IpWildcard::new(ip, wildcard),
                        area,
                    });
            }
            ["area", area] if stanza.has_children() => {
                let Some(area) = parse_area_id(area) else {
                    self.invalid(&cmd, "area id");
                    return Ok(());
                };
                self.ospf_mut(&cmd)?.area_mut(area);
                self.walk_block(stanza, |this, child| this.lower_ospf_area_line(child, area))?;
            }
            ["area", area, setting @ ..] => {
                let Some(area) = parse_area_id(area) else {
                    self.invalid(&cmd, "area id");
                    return Ok(());
                };
                self.lower_area_setting(&cmd, area, setting)?;
            }

            // Passive interfaces
            ["passive-interface", "default"] => {
                self.ospf_mut(&cmd)?.passive_interface_default = true
            }
            ["no", "passive-interface", "default"] => {
                self.ospf_mut(&cmd)?.passive_interface_default = false
            }
            ["passive-interface", name @ ..] if !name.is_empty() => {
                let name = self.reference_interface(
                    &name.concat(),
                    StructureUsage::OspfPassiveInterface,
                    cmd.line,
                );
                let process = self.ospf_mut(&cmd)?;
                process.active_interfaces.remove(&name);
                process.passive_interfaces.insert(name);
            }
            ["no", "passive-interface", name @ ..] if !name.is_empty() => {
                let name = self.reference_interface(
                    &name.concat(),
                    StructureUsage::OspfPassiveInterface,
                    cmd.line,
                );
                let process = self.ospf_mut(&cmd)?;
                process.passive_interfaces.remove(&name);
                process.active_interfaces.insert(name);
            }

            ["redistribute", args @ ..] => {
                let Some(redist) = self.redistribution(&cmd, args) else {
                    return Ok(());
                };
                self.reference_redistribution(
                    &cmd,
                    &redist,
                    StructureUsage::OspfRedistributeRouteMap,
                );
                self.ospf_mut(&cmd)?
                    .redistribution
                    .insert(redist.protocol, redist);
            }
            ["default-information", "originate", options @ ..] => {
                let mut always = false;
                let mut metric = None;
                let mut route_map = None;
                let mut iter = options.iter();
                while let Some(word) = iter.next() {
                    match *word {
                        "always" => always = true,
                        "metric" => metric = iter.next().and_then(|m| m.parse().ok()),
                        "route-map" => route_map = iter.next().map(|m| SmolStr::new(*m)),
                        _ => {}
                    }
                }
                if let Some(map) = &route_map {
                    self.reference(
                        StructureType::RouteMap,
                        map,
                        StructureUsage::OspfDefaultOriginateRouteMap,
                        cmd.line,
                    );
                }
                let process = self.ospf_mut(&cmd)?;
                process.default_information_originate = true;
                process.default_information_always = always;
                process.default_information_metric = metric;
                process.default_information_route_map = route_map;
            }
            ["auto-cost", "reference-bandwidth", value, unit @ ..] => {
                if let Some(value) = self.num::<f64>(&cmd, value) {
                    let multiplier = self
                        .dialect()
                        .reference_bandwidth_multiplier(unit.first().copied());
                    self.ospf_mut(&cmd)?.reference_bandwidth = value * multiplier;
                }
            }
            ["maximum-paths", count] => {
                if let Some(count) = self.num::<u32>(&cmd, count) {
                    self.ospf_mut(&cmd)?.maximum_paths = Some(count);
                }
            }
            _ => self.unhandled(&cmd),
        }
        Ok(())
    }

    /// `area N stub|nssa|range ...`, typed flat or inside an XR area block.
    fn lower_area_setting(&mut self, cmd: &Cmd, area: u32, setting: &[&str]) -> Result<()> {
        match setting {
            ["stub", options @ ..] => {
                let no_summary = options.contains(&"no-summary");
                self.ospf_mut(cmd)?.area_mut(area).area_type = AreaType::Stub { no_summary };
            }
            ["nssa", options @ ..] => {
                let no_summary = options.contains(&"no-summary");
                self.ospf_mut(cmd)?.area_mut(area).area_type = AreaType::Nssa { no_summary };
                self.todo(cmd, "ospf nssa");
            }
            ["range", prefix, rest @ ..] => {
                let mask = rest.first().copied().filter(|m| m.contains('.'));
                let Some(range) = parse_ipv4_network(prefix, mask) else {
                    self.invalid(cmd, "area range");
                    return Ok(());
                };
                let advertise = !rest.contains(&"not-advertise");
                self.ospf_mut(cmd)?
                    .area_mut(area)
                    .ranges
                    .insert(range, advertise);
            }
            _ => self.unhandled(cmd),
        }
        Ok(())
    }

    fn lower_ospf_area_line(&mut self, stanza: &Stanza, area: u32) -> Result<()> {
        let cmd = self.cmd(stanza);
        let words = cmd.words();
        match words.as_slice() {
            ["interface", name @ ..] if !name.is_empty() => {
                let name = self.reference_interface(
                    &name.concat(),
                    StructureUsage::OspfAreaInterface,
                    cmd.line,
                );
                self.ospf_mut(&cmd)?
                    .area_mut(area)
                    .interfaces
                    .insert(name.clone());
                self.walk_block(stanza, |this, child| {
                    this.lower_ospf_area_interface_line(child, &name)
                })?;
            }
            setting => self.lower_area_setting(&cmd, area, setting)?,
        }
        Ok(())
    }

    /// Settings under an XR `area N` / `interface X` block.
    fn lower_ospf_area_interface_line(&mut self, stanza: &Stanza, name: &SmolStr) -> Result<()> {
        let cmd = self.cmd(stanza);
        let words = cmd.words();
        match words.as_slice() {
            ["cost", cost] => {
                if let Some(cost) = self.num::<u32>(&cmd, cost) {
                    if let Some(iface) = self.config.interfaces.get_mut(name) {
                        iface.ospf.cost = Some(cost);
                    }
                }
            }
            ["passive"] | ["passive", "enable"] | ["passive", "disable"] => {
                let passive = words.get(1) != Some(&"disable");
                let process = self.ospf_mut(&cmd)?;
                if passive {
                    process.active_interfaces.remove(name);
                    process.passive_interfaces.insert(name.clone());
                } else {
                    process.passive_interfaces.remove(name);
                    process.active_interfaces.insert(name.clone());
                }
                if let Some(iface) = self.config.interfaces.get_mut(name) {
                    iface.ospf.passive = Some(passive);
                }
            }
            _ => self.unhandled(&cmd),
        }
        Ok(())
    }
}
