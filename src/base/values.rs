//! Scalar values shared by the model and the policy language.
//!
//! Communities, AS numbers, OSPF area ids and numeric sub-ranges appear in
//! route-maps, route-policies and list definitions alike.

use std::fmt;
use std::net::Ipv4Addr;

use serde::Serialize;

// ============================================================================
// SUB-RANGES
// ============================================================================

/// An inclusive integer range, e.g. a prefix length window or a port range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SubRange {
    pub start: u32,
    pub end: u32,
}

impl SubRange {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn single(value: u32) -> Self {
        Self::new(value, value)
    }

    pub fn contains(&self, value: u32) -> bool {
        self.start <= value && value <= self.end
    }

    pub fn is_single(&self) -> bool {
        self.start == self.end
    }

    /// Parse `N` or `A-B`.
    pub fn parse(text: &str) -> Option<Self> {
        match text.split_once('-') {
            Some((a, b)) => {
                let start = a.trim().parse().ok()?;
                let end = b.trim().parse().ok()?;
                (start <= end).then_some(Self::new(start, end))
            }
            None => text.trim().parse().ok().map(Self::single),
        }
    }
}

impl fmt::Display for SubRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_single() {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

// ============================================================================
// COMMUNITIES
// ============================================================================

pub const COMMUNITY_INTERNET: u32 = 0;
pub const COMMUNITY_NO_EXPORT: u32 = 0xFFFF_FF01;
pub const COMMUNITY_NO_ADVERTISE: u32 = 0xFFFF_FF02;
pub const COMMUNITY_LOCAL_AS: u32 = 0xFFFF_FF03;
pub const COMMUNITY_GSHUT: u32 = 0xFFFF_FF04;

/// Parse a standard community: `AA:NN`, a 32-bit literal or a well-known
/// name.
pub fn parse_community(text: &str) -> Option<u32> {
    match text.to_ascii_lowercase().as_str() {
        "internet" => return Some(COMMUNITY_INTERNET),
        "no-export" => return Some(COMMUNITY_NO_EXPORT),
        "no-advertise" => return Some(COMMUNITY_NO_ADVERTISE),
        "local-as" => return Some(COMMUNITY_LOCAL_AS),
        "gshut" | "graceful-shutdown" => return Some(COMMUNITY_GSHUT),
        _ => {}
    }
    match text.split_once(':') {
        Some((high, low)) => {
            let high: u16 = high.parse().ok()?;
            let low: u16 = low.parse().ok()?;
            Some((u32::from(high) << 16) | u32::from(low))
        }
        None => text.parse().ok(),
    }
}

/// Render a community in `AA:NN` form.
pub fn community_to_string(community: u32) -> String {
    format!("{}:{}", community >> 16, community & 0xFFFF)
}

// ============================================================================
// AS NUMBERS
// ============================================================================

/// Parse an AS number in asplain (`65546`) or asdot (`1.10`) notation.
///
/// Asdot is the two 16-bit halves of the 4-byte wire value, so `high.low`
/// is `(high << 16) | low`.
pub fn parse_asn(text: &str) -> Option<u32> {
    match text.split_once('.') {
        Some((high, low)) => {
            let high: u16 = high.parse().ok()?;
            let low: u16 = low.parse().ok()?;
            Some((u32::from(high) << 16) | u32::from(low))
        }
        None => text.parse().ok(),
    }
}

// ============================================================================
// ROUTING PROTOCOLS
// ============================================================================

/// Route sources named by `redistribute`, `match source-protocol` and
/// `protocol is`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoutingProtocol {
    Bgp,
    Connected,
    Eigrp,
    Isis,
    Ospf,
    Rip,
    Static,
}

impl RoutingProtocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoutingProtocol::Bgp => "bgp",
            RoutingProtocol::Connected => "connected",
            RoutingProtocol::Eigrp => "eigrp",
            RoutingProtocol::Isis => "isis",
            RoutingProtocol::Ospf => "ospf",
            RoutingProtocol::Rip => "rip",
            RoutingProtocol::Static => "static",
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        Some(match text.to_ascii_lowercase().as_str() {
            "bgp" => RoutingProtocol::Bgp,
            "connected" | "direct" => RoutingProtocol::Connected,
            "eigrp" => RoutingProtocol::Eigrp,
            "isis" => RoutingProtocol::Isis,
            "ospf" | "ospfv3" => RoutingProtocol::Ospf,
            "rip" => RoutingProtocol::Rip,
            "static" => RoutingProtocol::Static,
            _ => return None,
        })
    }
}

impl fmt::Display for RoutingProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// OSPF AREA IDS
// ============================================================================

/// Parse an OSPF area id written as a decimal or a dotted quad.
pub fn parse_area_id(text: &str) -> Option<u32> {
    if text.contains('.') {
        text.parse::<Ipv4Addr>().ok().map(u32::from)
    } else {
        text.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("65000:100", Some((65000 << 16) | 100))]
    #[case("no-export", Some(COMMUNITY_NO_EXPORT))]
    #[case("NO-ADVERTISE", Some(COMMUNITY_NO_ADVERTISE))]
    #[case("local-AS", Some(COMMUNITY_LOCAL_AS))]
    #[case("internet", Some(0))]
    #[case("4259905636", Some(4_259_905_636))]
    #[case("70000:1", None)]
    #[case("abc", None)]
    fn test_parse_community(#[case] input: &str, #[case] expected: Option<u32>) {
        assert_eq!(parse_community(input), expected);
    }

    #[rstest]
    #[case("65000", Some(65000))]
    #[case("1.10", Some(65546))]
    #[case("0.1", Some(1))]
    #[case("4294967295", Some(u32::MAX))]
    #[case("1.70000", None)]
    fn test_parse_asn(#[case] input: &str, #[case] expected: Option<u32>) {
        assert_eq!(parse_asn(input), expected);
    }

    #[rstest]
    #[case("0", Some(0))]
    #[case("0.0.0.1", Some(1))]
    #[case("10", Some(10))]
    #[case("x", None)]
    fn test_parse_area_id(#[case] input: &str, #[case] expected: Option<u32>) {
        assert_eq!(parse_area_id(input), expected);
    }

    #[test]
    fn test_sub_range() {
        assert_eq!(SubRange::parse("5-10"), Some(SubRange::new(5, 10)));
        assert_eq!(SubRange::parse("7"), Some(SubRange::single(7)));
        assert_eq!(SubRange::parse("10-5"), None);
        assert!(SubRange::new(5, 10).contains(10));
        assert_eq!(SubRange::new(1, 4).to_string(), "1-4");
    }

    #[test]
    fn test_community_to_string() {
        assert_eq!(community_to_string((65000 << 16) | 100), "65000:100");
    }
}
