//! Interfaces.

use std::net::Ipv4Addr;

use ipnetwork::{Ipv4Network, Ipv6Network};
use serde::Serialize;
use smol_str::SmolStr;

use crate::base::{Dialect, SubRange};

use super::DEFAULT_VRF;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SwitchportMode {
    Access,
    Trunk,
    DynamicAuto,
    DynamicDesirable,
    Monitor,
}

impl SwitchportMode {
    pub fn parse(text: &str) -> Option<Self> {
        Some(match text {
            "access" => SwitchportMode::Access,
            "trunk" => SwitchportMode::Trunk,
            "monitor" => SwitchportMode::Monitor,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrunkEncapsulation {
    Dot1q,
    Isl,
    Negotiate,
}

/// Layer-2 settings. Present once any `switchport` line is seen.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Switchport {
    pub enabled: bool,
    pub mode: Option<SwitchportMode>,
    pub access_vlan: Option<u32>,
    pub native_vlan: Option<u32>,
    pub allowed_vlans: Vec<SubRange>,
    pub encapsulation: Option<TrunkEncapsulation>,
}

/// Per-interface OSPF settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InterfaceOspf {
    pub process: Option<SmolStr>,
    pub area: Option<u32>,
    pub cost: Option<u32>,
    pub dead_interval: Option<u32>,
    pub hello_interval: Option<u32>,
    pub passive: Option<bool>,
}

/// Per-interface IS-IS settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InterfaceIsis {
    pub process: Option<SmolStr>,
    pub metric: Option<u32>,
    pub passive: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Interface {
    pub name: SmolStr,
    pub description: Option<String>,
    pub active: bool,
    pub address: Option<Ipv4Network>,
    pub secondary_addresses: Vec<Ipv4Network>,
    pub ipv6_addresses: Vec<Ipv6Network>,
    pub mtu: u32,
    /// Bits per second.
    pub bandwidth: Option<f64>,
    /// Bits per second.
    pub speed: Option<f64>,
    pub vrf: SmolStr,
    pub incoming_filter: Option<SmolStr>,
    pub outgoing_filter: Option<SmolStr>,
    pub ipv6_incoming_filter: Option<SmolStr>,
    pub ipv6_outgoing_filter: Option<SmolStr>,
    pub routing_policy: Option<SmolStr>,
    pub ospf: InterfaceOspf,
    pub isis: InterfaceIsis,
    pub switchport: Option<Switchport>,
    pub channel_group: Option<SmolStr>,
    pub spanning_tree_portfast: bool,
    pub helper_addresses: Vec<Ipv4Addr>,
    pub proxy_arp: Option<bool>,
    pub crypto_map: Option<SmolStr>,
    pub encapsulation_vlan: Option<u32>,
}

impl Interface {
    /// A fresh interface with dialect defaults. `name` must be canonical.
    pub fn new(name: &str, dialect: Dialect) -> Self {
        let vrf = match dialect.management_vrf() {
            Some(mgmt) if name.to_ascii_lowercase().starts_with("mgmt") => mgmt,
            _ => DEFAULT_VRF,
        };
        Self {
            name: SmolStr::new(name),
            description: None,
            active: true,
            address: None,
            secondary_addresses: Vec::new(),
            ipv6_addresses: Vec::new(),
            mtu: dialect.default_mtu(),
            bandwidth: dialect.default_bandwidth(name),
            speed: dialect.default_speed(name),
            vrf: SmolStr::new(vrf),
            incoming_filter: None,
            outgoing_filter: None,
            ipv6_incoming_filter: None,
            ipv6_outgoing_filter: None,
            routing_policy: None,
            ospf: InterfaceOspf::default(),
            isis: InterfaceIsis::default(),
            switchport: None,
            channel_group: None,
            spanning_tree_portfast: false,
            helper_addresses: Vec::new(),
            proxy_arp: None,
            crypto_map: None,
            encapsulation_vlan: None,
        }
    }

    pub fn switchport_mut(&mut self) -> &mut Switchport {
        self.switchport.get_or_insert_with(Switchport::default)
    }

    /// Primary and secondary IPv4 networks.
    pub fn all_addresses(&self) -> impl Iterator<Item = &Ipv4Network> {
        self.address.iter().chain(self.secondary_addresses.iter())
    }

    pub fn is_loopback(&self) -> bool {
        self.name.starts_with("Loopback")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("GigabitEthernet0/1", Dialect::Ios, Some(1e9))]
    #[case("Ethernet1/1", Dialect::Ios, Some(1e7))]
    #[case("Ethernet1/1", Dialect::Nxos, Some(1e9))]
    #[case("Port-Channel1", Dialect::Ios, None)]
    #[case("Loopback0", Dialect::Ios, Some(8e9))]
    fn test_default_bandwidth(
        #[case] name: &str,
        #[case] dialect: Dialect,
        #[case] expected: Option<f64>,
    ) {
        assert_eq!(Interface::new(name, dialect).bandwidth, expected);
    }

    #[test]
    fn test_management_vrf_default() {
        assert_eq!(Interface::new("mgmt0", Dialect::Nxos).vrf, "management");
        assert_eq!(Interface::new("mgmt0", Dialect::Ios).vrf, DEFAULT_VRF);
        assert_eq!(Interface::new("Ethernet1/1", Dialect::Nxos).vrf, DEFAULT_VRF);
    }
}
