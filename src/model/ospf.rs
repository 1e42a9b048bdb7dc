//! OSPF processes.

use std::collections::{BTreeMap, BTreeSet};
use std::net::Ipv4Addr;

use indexmap::IndexMap;
use ipnetwork::Ipv4Network;
use serde::Serialize;
use smol_str::SmolStr;

use super::igp::RedistributionMap;
use super::interface::Interface;
use super::types::IpWildcard;

/// `network ADDR WILDCARD area ID`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OspfNetworkStatement {
    pub wildcard: IpWildcard,
    pub area: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AreaType {
    Normal,
    Stub { no_summary: bool },
    Nssa { no_summary: bool },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OspfArea {
    pub id: u32,
    pub area_type: AreaType,
    /// `area ID range PREFIX [not-advertise]`, value is `advertise`.
    pub ranges: BTreeMap<Ipv4Network, bool>,
    /// Interfaces listed under an XR `area` block.
    pub interfaces: BTreeSet<SmolStr>,
}

impl OspfArea {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            area_type: AreaType::Normal,
            ranges: BTreeMap::new(),
            interfaces: BTreeSet::new(),
        }
    }
}

/// An interface that ended up in the process through a network statement
/// or an explicit area binding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OspfNetwork {
    pub prefix: Ipv4Network,
    pub area: u32,
    pub interface: SmolStr,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OspfProcess {
    pub id: SmolStr,
    pub router_id: Option<Ipv4Addr>,
    pub network_statements: Vec<OspfNetworkStatement>,
    pub areas: BTreeMap<u32, OspfArea>,
    pub passive_interface_default: bool,
    pub passive_interfaces: BTreeSet<SmolStr>,
    pub active_interfaces: BTreeSet<SmolStr>,
    pub redistribution: RedistributionMap,
    pub default_information_originate: bool,
    pub default_information_always: bool,
    pub default_information_route_map: Option<SmolStr>,
    pub default_information_metric: Option<u32>,
    /// Bits per second.
    pub reference_bandwidth: f64,
    pub maximum_paths: Option<u32>,
    /// Filled when the `router ospf` block closes.
    pub networks: Vec<OspfNetwork>,
}

impl OspfProcess {
    pub fn new(id: &str, reference_bandwidth: f64) -> Self {
        Self {
            id: SmolStr::new(id),
            router_id: None,
            network_statements: Vec::new(),
            areas: BTreeMap::new(),
            passive_interface_default: false,
            passive_interfaces: BTreeSet::new(),
            active_interfaces: BTreeSet::new(),
            redistribution: RedistributionMap::new(),
            default_information_originate: false,
            default_information_always: false,
            default_information_route_map: None,
            default_information_metric: None,
            reference_bandwidth,
            maximum_paths: None,
            networks: Vec::new(),
        }
    }

    pub fn area_mut(&mut self, id: u32) -> &mut OspfArea {
        self.areas.entry(id).or_insert_with(|| OspfArea::new(id))
    }

    /// Whether `interface` is passive under this process.
    pub fn is_passive(&self, interface: &str) -> bool {
        if self.passive_interface_default {
            !self.active_interfaces.contains(interface)
        } else {
            self.passive_interfaces.contains(interface)
        }
    }

    /// Match interfaces in `vrf` against the network statements.
    ///
    /// For every interface with a primary address, the first network
    /// statement covering that address places the interface in its area,
    /// unless the interface already names an area itself. Interfaces bound
    /// to an area explicitly (interface command or XR area block) are
    /// included too. Returns the computed network list, which is also
    /// stored on the process.
    pub fn compute_networks(
        &mut self,
        vrf: &str,
        interfaces: &mut IndexMap<SmolStr, Interface>,
    ) -> &[OspfNetwork] {
        let mut networks = Vec::new();
        let explicit: BTreeMap<SmolStr, u32> = self
            .areas
            .values()
            .flat_map(|a| a.interfaces.iter().map(move |i| (i.clone(), a.id)))
            .collect();
        for iface in interfaces.values_mut() {
            if iface.vrf != vrf {
                continue;
            }
            let Some(address) = iface.address else {
                continue;
            };
            if let Some(process) = &iface.ospf.process {
                if *process != self.id {
                    continue;
                }
            }
            let area = explicit.get(&iface.name).copied().or(iface.ospf.area).or_else(|| {
                self.network_statements
                    .iter()
                    .find(|s| s.wildcard.contains(address.ip()))
                    .map(|s| s.area)
            });
            let Some(area) = area else {
                continue;
            };
            if iface.ospf.area.is_none() {
                iface.ospf.area = Some(area);
            }
            if iface.ospf.process.is_none() {
                iface.ospf.process = Some(self.id.clone());
            }
            if iface.ospf.passive.is_none() && self.is_passive(&iface.name) {
                iface.ospf.passive = Some(true);
            }
            networks.push(OspfNetwork {
                prefix: super::types::canonical_network(address),
                area,
                interface: iface.name.clone(),
            });
        }
        self.networks = networks;
        &self.networks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::Dialect;

    fn iface(name: &str, addr: &str) -> Interface {
        let mut i = Interface::new(name, Dialect::Ios);
        i.address = Some(addr.parse().unwrap());
        i
    }

    fn statement(ip: &str, wildcard: &str, area: u32) -> OspfNetworkStatement {
        OspfNetworkStatement {
            wildcard: IpWildcard::new(ip.parse().unwrap(), wildcard.parse().unwrap()),
            area,
        }
    }

    #[test]
    fn test_first_matching_statement_wins() {
        let mut interfaces = IndexMap::new();
        interfaces.insert(SmolStr::new("Ethernet0/1"), iface("Ethernet0/1", "10.0.1.1/24"));
        let mut process = OspfProcess::new("1", 100e6);
        process.network_statements.push(statement("10.0.1.0", "0.0.0.255", 1));
        process.network_statements.push(statement("10.0.0.0", "0.255.255.255", 0));
        let networks = process.compute_networks("default", &mut interfaces).to_vec();
        assert_eq!(networks.len(), 1);
        assert_eq!(networks[0].area, 1);
        assert_eq!(networks[0].prefix.to_string(), "10.0.1.0/24");
        assert_eq!(interfaces["Ethernet0/1"].ospf.area, Some(1));
    }

    #[test]
    fn test_interface_area_is_kept() {
        let mut interfaces = IndexMap::new();
        let mut i = iface("Ethernet0/1", "10.0.1.1/24");
        i.ospf.area = Some(5);
        interfaces.insert(i.name.clone(), i);
        let mut process = OspfProcess::new("1", 100e6);
        process.network_statements.push(statement("0.0.0.0", "255.255.255.255", 0));
        process.compute_networks("default", &mut interfaces);
        assert_eq!(interfaces["Ethernet0/1"].ospf.area, Some(5));
        assert_eq!(process.networks[0].area, 5);
    }

    #[test]
    fn test_passive_default_inverts() {
        let mut process = OspfProcess::new("1", 100e6);
        process.passive_interface_default = true;
        process.active_interfaces.insert("Ethernet0/1".into());
        assert!(!process.is_passive("Ethernet0/1"));
        assert!(process.is_passive("Ethernet0/2"));
    }
}
