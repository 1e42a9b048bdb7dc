//! Interface lowering tests.

use rstest::rstest;
use routecfg::Dialect;

use crate::helpers::config_fixtures::{INTERFACE_ALIASES, INTERFACE_REOPENED, LOOPBACK_ALIASES};
use crate::helpers::lower_helpers::{lower, lower_as};

// ============================================================================
// Name canonicalization
// ============================================================================

#[test]
fn test_aliases_merge_into_one_interface() {
    let output = lower(INTERFACE_ALIASES);
    let interfaces = &output.configuration.interfaces;
    assert_eq!(interfaces.len(), 1);

    let iface = output.configuration.interface("Ethernet0/1").unwrap();
    assert_eq!(iface.description.as_deref(), Some("uplink"));
    assert_eq!(iface.bandwidth, Some(1e9));
}

#[test]
fn test_lookup_by_alias() {
    let output = lower(INTERFACE_ALIASES);
    assert!(output.configuration.interface("Eth0/1").is_some());
}

#[test]
fn test_loopback_abbreviation_merges() {
    let output = lower(LOOPBACK_ALIASES);
    let names: Vec<&str> = output.configuration.interfaces.keys().map(|k| k.as_str()).collect();
    assert_eq!(names, vec!["Loopback0"]);

    let iface = output.configuration.interface("Lo0").unwrap();
    assert!(iface.is_loopback());
    assert_eq!(iface.description.as_deref(), Some("router-id"));
    assert_eq!(iface.address.map(|a| a.to_string()).as_deref(), Some("192.0.2.1/32"));
    assert_eq!(iface.bandwidth, Some(8e9));
}

#[test]
fn test_reopened_interface_keeps_last_value() {
    let output = lower(INTERFACE_REOPENED);
    assert_eq!(output.configuration.interfaces.len(), 1);

    let iface = output.configuration.interface("GigabitEthernet0/0").unwrap();
    assert_eq!(iface.description.as_deref(), Some("second"));
    assert_eq!(iface.mtu, 9000);
}

// ============================================================================
// Units
// ============================================================================

#[rstest]
#[case("bandwidth 1000000", Some(1e9))]
#[case("bandwidth 100", Some(1e5))]
fn test_bandwidth_is_kilobits(#[case] line: &str, #[case] expected: Option<f64>) {
    let text = format!("interface GigabitEthernet0/0\n {line}\n");
    let output = lower(&text);
    let iface = output.configuration.interface("GigabitEthernet0/0").unwrap();
    assert_eq!(iface.bandwidth, expected);
}

#[test]
fn test_speed_is_megabits() {
    let output = lower("interface GigabitEthernet0/0\n speed 100\n");
    let iface = output.configuration.interface("GigabitEthernet0/0").unwrap();
    assert_eq!(iface.speed, Some(1e8));
}

// ============================================================================
// Addresses and state
// ============================================================================

#[test]
fn test_address_and_shutdown() {
    let text = "interface Gi0/0\n ip address 10.0.0.1 255.255.255.0\n shutdown\n";
    let output = lower(text);
    let iface = output.configuration.interface("GigabitEthernet0/0").unwrap();
    assert_eq!(iface.address.map(|a| a.to_string()).as_deref(), Some("10.0.0.1/24"));
    assert!(!iface.active);
}

#[test]
fn test_vrf_membership() {
    let text = "vrf definition CUST\n!\ninterface Gi0/0\n vrf forwarding CUST\n";
    let output = lower(text);
    let iface = output.configuration.interface("GigabitEthernet0/0").unwrap();
    assert_eq!(iface.vrf, "CUST");
    assert!(output.configuration.vrfs.contains_key("CUST"));
}

#[test]
fn test_nxos_interface_lowering() {
    let output = lower_as("interface Ethernet1/1\n description core\n", Dialect::Nxos);
    let iface = output.configuration.interface("Ethernet1/1").unwrap();
    assert_eq!(iface.description.as_deref(), Some("core"));
}
