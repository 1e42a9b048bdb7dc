//! Interface name canonicalization.
//!
//! Every interface name entering the model, at definition or reference,
//! goes through [`canonicalize_interface_name`] so that `Eth0/1`,
//! `ethernet0/1` and `Ethernet0/1` name one object.

/// `(alias, canonical prefix)` in match order.
const INTERFACE_PREFIXES: &[(&str, &str)] = &[
    ("ap", "ap"),
    ("Async", "Async"),
    ("ATM", "ATM"),
    ("BDI", "BDI"),
    ("BRI", "BRI"),
    ("Bundle-Ether", "Bundle-Ethernet"),
    ("BVI", "BVI"),
    ("Cable", "Cable"),
    ("cable-downstream", "cable-downstream"),
    ("cable-mac", "cable-mac"),
    ("cable-upstream", "cable-upstream"),
    ("Crypto-Engine", "Crypto-Engine"),
    ("cmp-mgmt", "cmp-mgmt"),
    ("Dialer", "Dialer"),
    ("Dot11Radio", "Dot11Radio"),
    ("Ethernet", "Ethernet"),
    ("Embedded-Service-Engine", "Embedded-Service-Engine"),
    ("FastEthernet", "FastEthernet"),
    ("fc", "fc"),
    ("fe", "FastEthernet"),
    ("fortyGigE", "FortyGigabitEthernet"),
    ("FortyGigabitEthernet", "FortyGigabitEthernet"),
    ("GigabitEthernet", "GigabitEthernet"),
    ("ge", "GigabitEthernet"),
    ("GMPLS", "GMPLS"),
    ("HundredGigE", "HundredGigabitEthernet"),
    ("ip", "ip"),
    ("Group-Async", "Group-Async"),
    ("Loopback", "Loopback"),
    ("LongReachEthernet", "LongReachEthernet"),
    ("ma", "Management"),
    ("Management", "Management"),
    ("ManagementEthernet", "ManagementEthernet"),
    ("mgmt", "mgmt"),
    ("MgmtEth", "ManagementEthernet"),
    ("Modular-Cable", "Modular-Cable"),
    ("Null", "Null"),
    ("Port-channel", "Port-Channel"),
    ("POS", "POS"),
    ("PTP", "PTP"),
    ("Serial", "Serial"),
    ("Service-Engine", "Service-Engine"),
    ("TenGigabitEthernet", "TenGigabitEthernet"),
    ("TenGigE", "TenGigabitEthernet"),
    ("te", "TenGigabitEthernet"),
    ("trunk", "trunk"),
    ("Tunnel", "Tunnel"),
    ("tunnel-ip", "tunnel-ip"),
    ("tunnel-te", "tunnel-te"),
    ("ve", "VirtualEthernet"),
    ("Virtual-Template", "Virtual-Template"),
    ("Vlan", "Vlan"),
    ("Vxlan", "Vxlan"),
    ("Wideband-Cable", "Wideband-Cable"),
];

/// Split `GigabitEthernet0/1.100` into `("GigabitEthernet", "0/1.100")`.
///
/// The prefix starts with a letter, may contain letters, digits and `-`,
/// and ends with the last letter before the numeric suffix. A suffix that
/// does not start with a digit (`ge-0/0/1`) is not an interface number.
fn split_prefix(name: &str) -> Option<(&str, &str)> {
    if !name.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return None;
    }
    let run = name
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-'))
        .unwrap_or(name.len());
    let end = name[..run].rfind(|c: char| c.is_ascii_alphabetic())? + 1;
    let (prefix, suffix) = name.split_at(end);
    if !(suffix.is_empty() || suffix.starts_with(|c: char| c.is_ascii_digit())) {
        return None;
    }
    Some((prefix, suffix))
}

/// Canonical spelling of an interface name prefix.
///
/// An exact match (case-insensitive) against an alias or canonical name
/// wins; otherwise the first table entry the prefix abbreviates is used,
/// so entries sharing a leading abbreviation (`Lo`, `Po`, `Se`) list the
/// common interface first.
pub fn canonical_prefix(prefix: &str) -> Option<&'static str> {
    let exact = INTERFACE_PREFIXES.iter().find(|(alias, canonical)| {
        alias.eq_ignore_ascii_case(prefix) || canonical.eq_ignore_ascii_case(prefix)
    });
    if let Some((_, canonical)) = exact {
        return Some(canonical);
    }
    let lower = prefix.to_ascii_lowercase();
    INTERFACE_PREFIXES
        .iter()
        .find(|(alias, _)| alias.to_ascii_lowercase().starts_with(&lower))
        .map(|(_, canonical)| *canonical)
}

/// Canonicalize an interface name. Unknown prefixes are left unchanged.
pub fn canonicalize_interface_name(name: &str) -> String {
    let name = name.trim();
    match split_prefix(name) {
        Some((prefix, suffix)) => match canonical_prefix(prefix) {
            Some(canonical) => format!("{canonical}{suffix}"),
            None => name.to_string(),
        },
        None => name.to_string(),
    }
}

/// Expand `interface range`-style text into canonical names.
///
/// Accepts comma-separated items, each either a single name or a range on
/// the last number component: `Gi0/1 - 4`, `Ethernet1/1-3`.
pub fn expand_interface_range(text: &str) -> Vec<String> {
    let mut names = Vec::new();
    for item in text.split(',') {
        let item: String = item.split_whitespace().collect();
        if item.is_empty() {
            continue;
        }
        match expand_one(&item) {
            Some(expanded) => names.extend(expanded),
            None => names.push(canonicalize_interface_name(&item)),
        }
    }
    names
}

fn expand_one(item: &str) -> Option<Vec<String>> {
    let (prefix, suffix) = split_prefix(item)?;
    let (head, last) = suffix.rsplit_once('-')?;
    let split_at = head
        .rfind(|c: char| !c.is_ascii_digit())
        .map(|i| i + 1)
        .unwrap_or(0);
    let (stem, first) = head.split_at(split_at);
    let first: u32 = first.parse().ok()?;
    let last: u32 = last.parse().ok()?;
    if first > last {
        return None;
    }
    let canonical = canonical_prefix(prefix).unwrap_or(prefix);
    Some(
        (first..=last)
            .map(|n| format!("{canonical}{stem}{n}"))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Eth0/1", "Ethernet0/1")]
    #[case("Ethernet0/1", "Ethernet0/1")]
    #[case("ethernet0/1", "Ethernet0/1")]
    #[case("Gi0/0/1", "GigabitEthernet0/0/1")]
    #[case("ge-0", "ge-0")]
    #[case("ge-0/0/1", "ge-0/0/1")]
    #[case("Loopback0", "Loopback0")]
    #[case("Lo", "Loopback")]
    #[case("Te1/1", "TenGigabitEthernet1/1")]
    #[case("Lo0", "Loopback0")]
    #[case("Po10", "Port-Channel10")]
    #[case("Port-channel10", "Port-Channel10")]
    #[case("BE1", "BE1")]
    #[case("Bundle-Ether1", "Bundle-Ethernet1")]
    #[case("mgmt0", "mgmt0")]
    #[case("Vlan100", "Vlan100")]
    #[case("Fa0/1.100", "FastEthernet0/1.100")]
    #[case("Widget0", "Widget0")]
    #[case("Dot11Radio0", "Dot11Radio0")]
    fn test_canonicalize(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(canonicalize_interface_name(input), expected);
    }

    #[rstest]
    #[case("Eth0/1")]
    #[case("Gi0/0/1")]
    #[case("Po10")]
    #[case("ma1")]
    #[case("MgmtEth0/RSP0/CPU0/0")]
    #[case("TenGigE0/0/0/1")]
    fn test_canonicalize_idempotent(#[case] input: &str) {
        let once = canonicalize_interface_name(input);
        assert_eq!(canonicalize_interface_name(&once), once);
    }

    #[test]
    fn test_expand_range() {
        assert_eq!(
            expand_interface_range("Gi0/1 - 3, Lo0"),
            vec![
                "GigabitEthernet0/1",
                "GigabitEthernet0/2",
                "GigabitEthernet0/3",
                "Loopback0",
            ]
        );
        assert_eq!(expand_interface_range("Ethernet1/10-11").len(), 2);
    }
}
