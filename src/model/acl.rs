//! IPv4 and IPv6 access lists.

use std::net::Ipv6Addr;

use ipnetwork::Ipv6Network;
use serde::Serialize;
use smol_str::SmolStr;

use crate::base::SubRange;

use super::types::{IpWildcard, LineAction};

// ============================================================================
// ADDRESS AND PORT MATCHING
// ============================================================================

/// One side of an ACL line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AddressSpec {
    Any,
    Wildcard(IpWildcard),
    Ipv6(Ipv6Network),
    Ipv6Host(Ipv6Addr),
    /// `object-group NAME`, `addrgroup NAME`.
    ObjectGroup(SmolStr),
}

/// Numbers for the IP protocol names ACLs accept.
pub fn protocol_number(name: &str) -> Option<u8> {
    Some(match name {
        "icmp" => 1,
        "igmp" => 2,
        "ipinip" => 4,
        "tcp" => 6,
        "udp" => 17,
        "gre" => 47,
        "esp" => 50,
        "ahp" | "ah" => 51,
        "icmpv6" => 58,
        "eigrp" => 88,
        "ospf" => 89,
        "pim" => 103,
        "vrrp" => 112,
        "sctp" => 132,
        _ => return name.parse().ok(),
    })
}

/// Well-known port names.
pub fn named_port(name: &str) -> Option<u16> {
    Some(match name {
        "bgp" => 179,
        "bootpc" => 68,
        "bootps" => 67,
        "domain" => 53,
        "echo" => 7,
        "ftp" => 21,
        "ftp-data" => 20,
        "http" | "www" => 80,
        "https" => 443,
        "isakmp" => 500,
        "ldp" => 646,
        "ntp" => 123,
        "pop3" => 110,
        "smtp" => 25,
        "snmp" => 161,
        "snmptrap" => 162,
        "ssh" => 22,
        "syslog" => 514,
        "tacacs" => 49,
        "telnet" => 23,
        "tftp" => 69,
        "non500-isakmp" => 4500,
        _ => return name.parse().ok(),
    })
}

/// Named ICMP message types.
pub fn icmp_type(name: &str) -> Option<(u8, Option<u8>)> {
    Some(match name {
        "echo-reply" => (0, None),
        "unreachable" => (3, None),
        "port-unreachable" => (3, Some(3)),
        "redirect" => (5, None),
        "echo" => (8, None),
        "time-exceeded" | "ttl-exceeded" => (11, None),
        "packet-too-big" => (3, Some(4)),
        "parameter-problem" => (12, None),
        "traceroute" => (30, None),
        _ => return name.parse().ok().map(|t| (t, None)),
    })
}

/// Named DSCP values.
pub fn dscp_value(name: &str) -> Option<u8> {
    let value = match name {
        "default" => 0,
        "ef" => 46,
        "af11" => 10,
        "af12" => 12,
        "af13" => 14,
        "af21" => 18,
        "af22" => 20,
        "af23" => 22,
        "af31" => 26,
        "af32" => 28,
        "af33" => 30,
        "af41" => 34,
        "af42" => 36,
        "af43" => 38,
        _ => match name.strip_prefix("cs").and_then(|n| n.parse::<u8>().ok()) {
            Some(n) if n <= 7 => n * 8,
            _ => name.parse().ok().filter(|v| *v < 64)?,
        },
    };
    Some(value)
}

// ============================================================================
// STANDARD
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandardAccessListLine {
    pub sequence: Option<u32>,
    pub action: LineAction,
    pub source: IpWildcard,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandardAccessList {
    pub name: SmolStr,
    pub lines: Vec<StandardAccessListLine>,
    pub remarks: Vec<String>,
}

impl StandardAccessList {
    pub fn new(name: &str) -> Self {
        Self {
            name: SmolStr::new(name),
            lines: Vec::new(),
            remarks: Vec::new(),
        }
    }
}

// ============================================================================
// EXTENDED
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtendedAccessListLine {
    pub sequence: Option<u32>,
    pub action: LineAction,
    /// `None` for `ip`/`ipv6` (any protocol).
    pub protocol: Option<u8>,
    /// `object-group SERVICE` in place of a protocol.
    pub service_object_group: Option<SmolStr>,
    pub source: AddressSpec,
    pub source_ports: Vec<SubRange>,
    pub destination: AddressSpec,
    pub destination_ports: Vec<SubRange>,
    pub established: bool,
    pub icmp_type: Option<u8>,
    pub icmp_code: Option<u8>,
    pub dscp: Option<u8>,
    pub text: String,
}

impl ExtendedAccessListLine {
    pub fn new(action: LineAction, text: &str) -> Self {
        Self {
            sequence: None,
            action,
            protocol: None,
            service_object_group: None,
            source: AddressSpec::Any,
            source_ports: Vec::new(),
            destination: AddressSpec::Any,
            destination_ports: Vec::new(),
            established: false,
            icmp_type: None,
            icmp_code: None,
            dscp: None,
            text: text.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtendedAccessList {
    pub name: SmolStr,
    pub ipv6: bool,
    pub lines: Vec<ExtendedAccessListLine>,
    pub remarks: Vec<String>,
}

impl ExtendedAccessList {
    pub fn new(name: &str, ipv6: bool) -> Self {
        Self {
            name: SmolStr::new(name),
            ipv6,
            lines: Vec::new(),
            remarks: Vec::new(),
        }
    }
}

/// Port ranges for `eq|neq|lt|gt|range` operators.
///
/// `eq` may list several ports. `neq` yields the two ranges either side.
pub fn port_ranges(op: &str, ports: &[u16]) -> Option<Vec<SubRange>> {
    let first = u32::from(*ports.first()?);
    Some(match op {
        "eq" => ports.iter().map(|p| SubRange::single(u32::from(*p))).collect(),
        "neq" => {
            let mut ranges = Vec::new();
            if first > 0 {
                ranges.push(SubRange::new(0, first - 1));
            }
            if first < 65535 {
                ranges.push(SubRange::new(first + 1, 65535));
            }
            ranges
        }
        "lt" => vec![SubRange::new(0, first.checked_sub(1)?)],
        "gt" => vec![SubRange::new(first + 1, 65535)],
        "range" => {
            let last = u32::from(*ports.get(1)?);
            (first <= last).then(|| vec![SubRange::new(first, last)])?
        }
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("eq", &[22], vec![SubRange::single(22)])]
    #[case("eq", &[80, 443], vec![SubRange::single(80), SubRange::single(443)])]
    #[case("neq", &[22], vec![SubRange::new(0, 21), SubRange::new(23, 65535)])]
    #[case("lt", &[1024], vec![SubRange::new(0, 1023)])]
    #[case("gt", &[1023], vec![SubRange::new(1024, 65535)])]
    #[case("range", &[1000, 2000], vec![SubRange::new(1000, 2000)])]
    fn test_port_ranges(#[case] op: &str, #[case] ports: &[u16], #[case] expected: Vec<SubRange>) {
        assert_eq!(port_ranges(op, ports), Some(expected));
    }

    #[rstest]
    #[case("tcp", Some(6))]
    #[case("udp", Some(17))]
    #[case("112", Some(112))]
    #[case("bogus", None)]
    fn test_protocol_number(#[case] name: &str, #[case] expected: Option<u8>) {
        assert_eq!(protocol_number(name), expected);
    }

    #[rstest]
    #[case("ef", Some(46))]
    #[case("cs3", Some(24))]
    #[case("af41", Some(34))]
    #[case("63", Some(63))]
    #[case("64", None)]
    fn test_dscp(#[case] name: &str, #[case] expected: Option<u8>) {
        assert_eq!(dscp_value(name), expected);
    }
}
