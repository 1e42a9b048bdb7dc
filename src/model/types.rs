//! Small value types shared across the model.

use std::net::Ipv4Addr;

use ipnetwork::{Ipv4Network, ipv4_mask_to_prefix};
use serde::Serialize;

// ============================================================================
// LINE ACTIONS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LineAction {
    Permit,
    Deny,
}

impl LineAction {
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "permit" => Some(LineAction::Permit),
            "deny" => Some(LineAction::Deny),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LineAction::Permit => "permit",
            LineAction::Deny => "deny",
        }
    }
}

// ============================================================================
// WILDCARDS
// ============================================================================

/// Address plus inverse mask, as written in ACLs and OSPF `network`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct IpWildcard {
    pub ip: Ipv4Addr,
    pub wildcard: Ipv4Addr,
}

impl IpWildcard {
    pub fn new(ip: Ipv4Addr, wildcard: Ipv4Addr) -> Self {
        Self { ip, wildcard }
    }

    pub fn any() -> Self {
        Self::new(Ipv4Addr::UNSPECIFIED, Ipv4Addr::BROADCAST)
    }

    pub fn host(ip: Ipv4Addr) -> Self {
        Self::new(ip, Ipv4Addr::UNSPECIFIED)
    }

    pub fn from_network(network: Ipv4Network) -> Self {
        Self::new(network.network(), !network.mask())
    }

    /// Whether `addr` matches on every bit the wildcard does not ignore.
    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        let care = !u32::from(self.wildcard);
        u32::from(addr) & care == u32::from(self.ip) & care
    }

    /// The equivalent network, when the wildcard is contiguous.
    pub fn to_network(&self) -> Option<Ipv4Network> {
        let len = ipv4_mask_to_prefix(!self.wildcard).ok()?;
        Ipv4Network::new(self.ip, len).ok()
    }
}

/// Build a network from `ADDR MASK`.
pub fn network_from_mask(ip: Ipv4Addr, mask: Ipv4Addr) -> Option<Ipv4Network> {
    let len = ipv4_mask_to_prefix(mask).ok()?;
    Ipv4Network::new(ip, len).ok()
}

/// Parse `ADDR/LEN` or `ADDR MASK` from one or two words.
pub fn parse_ipv4_network(first: &str, second: Option<&str>) -> Option<Ipv4Network> {
    if first.contains('/') {
        return first.parse().ok();
    }
    let ip: Ipv4Addr = first.parse().ok()?;
    let mask: Ipv4Addr = second?.parse().ok()?;
    network_from_mask(ip, mask)
}

/// The network containing `network`, with host bits cleared.
pub fn canonical_network(network: Ipv4Network) -> Ipv4Network {
    Ipv4Network::new(network.network(), network.prefix()).unwrap_or(network)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("10.0.0.0", "0.0.0.255", "10.0.0.77", true)]
    #[case("10.0.0.0", "0.0.0.255", "10.0.1.1", false)]
    #[case("0.0.0.0", "255.255.255.255", "192.0.2.1", true)]
    #[case("10.0.0.1", "0.0.0.0", "10.0.0.1", true)]
    fn test_wildcard_contains(
        #[case] ip: &str,
        #[case] wildcard: &str,
        #[case] addr: &str,
        #[case] expected: bool,
    ) {
        let w = IpWildcard::new(ip.parse().unwrap(), wildcard.parse().unwrap());
        assert_eq!(w.contains(addr.parse().unwrap()), expected);
    }

    #[test]
    fn test_parse_ipv4_network() {
        let a = parse_ipv4_network("10.1.1.1", Some("255.255.255.0")).unwrap();
        let b = parse_ipv4_network("10.1.1.1/24", None).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.ip(), "10.1.1.1".parse::<Ipv4Addr>().unwrap());
        assert!(parse_ipv4_network("10.1.1.1", Some("255.0.255.0")).is_none());
    }

    #[test]
    fn test_wildcard_to_network() {
        let w = IpWildcard::new("10.0.0.0".parse().unwrap(), "0.0.255.255".parse().unwrap());
        assert_eq!(w.to_network().unwrap().prefix(), 16);
    }
}
