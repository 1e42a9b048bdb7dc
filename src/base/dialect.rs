//! Dialect policy: unit scaling and default values.
//!
//! Every numeric conversion the driver applies is a fixed multiplier chosen
//! here by the dialect tag. Nothing in the lowering code infers units from
//! surrounding context.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// The vendor OS whose configuration language is being lowered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Dialect {
    #[default]
    Ios,
    IosXr,
    Nxos,
    Eos,
    Asa,
}

/// Returned when a dialect name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown configuration dialect '{0}'")]
pub struct UnknownDialect(pub String);

const DEFAULT_INTERFACE_BANDWIDTH: f64 = 1e12;
const DEFAULT_MTU: u32 = 1500;
const IOS_ETHERNET_SPEED: f64 = 1e7;
const NXOS_ETHERNET_SPEED: f64 = 1e9;
const EOS_ETHERNET_SPEED: f64 = 1e9;
const FAST_ETHERNET_SPEED: f64 = 1e8;
const GIGABIT_ETHERNET_SPEED: f64 = 1e9;
const TEN_GIGABIT_ETHERNET_SPEED: f64 = 1e10;
const LONG_REACH_ETHERNET_SPEED: f64 = 1e7;
const LOOPBACK_BANDWIDTH: f64 = 8e9;
const IOS_TUNNEL_BANDWIDTH: f64 = 1e5;

impl Dialect {
    pub const ALL: [Dialect; 5] = [
        Dialect::Ios,
        Dialect::IosXr,
        Dialect::Nxos,
        Dialect::Eos,
        Dialect::Asa,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::Ios => "ios",
            Dialect::IosXr => "ios-xr",
            Dialect::Nxos => "nx-os",
            Dialect::Eos => "eos",
            Dialect::Asa => "asa",
        }
    }

    /// Multiplier applied to the interface `bandwidth` command (kbps).
    pub fn bandwidth_multiplier(&self) -> f64 {
        1e3
    }

    /// Multiplier applied to the interface `speed` command (Mbps).
    pub fn speed_multiplier(&self) -> f64 {
        1e6
    }

    /// Multiplier for `auto-cost reference-bandwidth`.
    ///
    /// `unit` is the optional trailing keyword. Only NX-OS and EOS accept
    /// one; elsewhere the value is always Mbps.
    pub fn reference_bandwidth_multiplier(&self, unit: Option<&str>) -> f64 {
        match (self, unit.map(str::to_ascii_lowercase).as_deref()) {
            (Dialect::Nxos | Dialect::Eos, Some("gbps")) => 1e9,
            _ => 1e6,
        }
    }

    /// OSPF reference bandwidth in bits/sec when none is configured.
    pub fn default_reference_bandwidth(&self) -> f64 {
        match self {
            Dialect::Nxos => 40e9,
            _ => 100e6,
        }
    }

    /// Default speed for an interface, keyed by canonical name prefix.
    pub fn default_speed(&self, canonical_name: &str) -> Option<f64> {
        if canonical_name.starts_with("Ethernet") {
            Some(match self {
                Dialect::Nxos => NXOS_ETHERNET_SPEED,
                Dialect::Eos => EOS_ETHERNET_SPEED,
                Dialect::Ios | Dialect::IosXr | Dialect::Asa => IOS_ETHERNET_SPEED,
            })
        } else if canonical_name.starts_with("FastEthernet") {
            Some(FAST_ETHERNET_SPEED)
        } else if canonical_name.starts_with("GigabitEthernet") {
            Some(GIGABIT_ETHERNET_SPEED)
        } else if canonical_name.starts_with("LongReachEthernet") {
            Some(LONG_REACH_ETHERNET_SPEED)
        } else if canonical_name.starts_with("TenGigabitEthernet") {
            Some(TEN_GIGABIT_ETHERNET_SPEED)
        } else {
            None
        }
    }

    /// Default bandwidth for an interface in bits/sec.
    ///
    /// Aggregates (`Port-Channel`, `Bundle-Ethernet`) derive theirs from
    /// member links and get `None`.
    pub fn default_bandwidth(&self, canonical_name: &str) -> Option<f64> {
        if let Some(speed) = self.default_speed(canonical_name) {
            return Some(speed);
        }
        if canonical_name.starts_with("Bundle-Ethernet")
            || canonical_name.starts_with("Port-Channel")
        {
            None
        } else if canonical_name.starts_with("Loopback") {
            Some(LOOPBACK_BANDWIDTH)
        } else if *self == Dialect::Ios && canonical_name.starts_with("Tunnel") {
            Some(IOS_TUNNEL_BANDWIDTH)
        } else {
            Some(DEFAULT_INTERFACE_BANDWIDTH)
        }
    }

    pub fn default_mtu(&self) -> u32 {
        DEFAULT_MTU
    }

    pub fn default_static_route_distance(&self) -> u8 {
        1
    }

    /// Sequence number given to `route-map NAME permit` without one.
    pub fn default_route_map_sequence(&self) -> u32 {
        10
    }

    /// VRF that `mgmt` interfaces belong to unless configured otherwise.
    pub fn management_vrf(&self) -> Option<&'static str> {
        match self {
            Dialect::Nxos => Some("management"),
            _ => None,
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = UnknownDialect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "ios" | "cisco-ios" => Ok(Dialect::Ios),
            "ios-xr" | "iosxr" | "xr" | "cisco-ios-xr" => Ok(Dialect::IosXr),
            "nx-os" | "nxos" | "cisco-nx" => Ok(Dialect::Nxos),
            "eos" | "arista" => Ok(Dialect::Eos),
            "asa" | "cisco-asa" => Ok(Dialect::Asa),
            _ => Err(UnknownDialect(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("ios", Dialect::Ios)]
    #[case("IOS-XR", Dialect::IosXr)]
    #[case("nx_os", Dialect::Nxos)]
    #[case("arista", Dialect::Eos)]
    #[case("asa", Dialect::Asa)]
    fn test_parse_dialect(#[case] input: &str, #[case] expected: Dialect) {
        assert_eq!(input.parse::<Dialect>(), Ok(expected));
    }

    #[test]
    fn test_parse_unknown_dialect() {
        assert!("junos".parse::<Dialect>().is_err());
    }

    #[rstest]
    #[case(Dialect::Ios, "Ethernet0/1", Some(1e7))]
    #[case(Dialect::Nxos, "Ethernet1/1", Some(1e9))]
    #[case(Dialect::Ios, "GigabitEthernet0/0", Some(1e9))]
    #[case(Dialect::Ios, "Loopback0", Some(8e9))]
    #[case(Dialect::Ios, "Tunnel1", Some(1e5))]
    #[case(Dialect::IosXr, "Tunnel1", Some(1e12))]
    #[case(Dialect::Ios, "Port-Channel1", None)]
    #[case(Dialect::Ios, "Vlan10", Some(1e12))]
    fn test_default_bandwidth(
        #[case] dialect: Dialect,
        #[case] name: &str,
        #[case] expected: Option<f64>,
    ) {
        assert_eq!(dialect.default_bandwidth(name), expected);
    }

    #[test]
    fn test_reference_bandwidth_unit_only_where_accepted() {
        assert_eq!(Dialect::Nxos.reference_bandwidth_multiplier(Some("Gbps")), 1e9);
        assert_eq!(Dialect::Ios.reference_bandwidth_multiplier(Some("Gbps")), 1e6);
        assert_eq!(Dialect::Nxos.reference_bandwidth_multiplier(None), 1e6);
    }
}
