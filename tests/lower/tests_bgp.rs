//! BGP lowering tests.

use std::net::Ipv4Addr;

use routecfg::diagnostics::codes;
use routecfg::model::BgpProcess;
use routecfg::LowerOutput;

use crate::helpers::config_fixtures::{
    BGP_ADDRESS_FAMILY_POLICY, BGP_UNDECLARED_NEIGHBOR, BGP_UNSUPPORTED_FAMILY,
};
use crate::helpers::lower_helpers::{lower, red_flags_with_code};

fn bgp(output: &LowerOutput) -> &BgpProcess {
    output
        .configuration
        .default_vrf()
        .and_then(|vrf| vrf.bgp.as_ref())
        .expect("default VRF has a BGP process")
}

fn ip(text: &str) -> Ipv4Addr {
    text.parse().unwrap()
}

// ============================================================================
// Peer declaration
// ============================================================================

#[test]
fn test_remote_as_declares_peer() {
    let output = lower(BGP_UNDECLARED_NEIGHBOR);
    let process = bgp(&output);
    assert_eq!(process.as_number, 65000);
    let peer = &process.ipv4_peers[&ip("10.0.0.2")];
    assert_eq!(peer.remote_as, Some(65001));
}

#[test]
fn test_undeclared_neighbor_is_flagged_and_ignored() {
    let output = lower(BGP_UNDECLARED_NEIGHBOR);
    let flags = red_flags_with_code(&output, codes::UNDECLARED_PEER);
    assert_eq!(flags.len(), 1);
    assert_eq!(flags[0].line, Some(4));

    let process = bgp(&output);
    assert_eq!(process.ipv4_peers.len(), 1);
    assert!(!process.ipv4_peers.contains_key(&ip("10.0.0.3")));
}

#[test]
fn test_asdot_process_number() {
    let output = lower("router bgp 1.10\n neighbor 10.0.0.2 remote-as 1.11\n");
    let process = bgp(&output);
    assert_eq!(process.as_number, 65546);
    assert_eq!(process.ipv4_peers[&ip("10.0.0.2")].remote_as, Some(65547));
}

// ============================================================================
// Address families
// ============================================================================

#[test]
fn test_unicast_family_sets_peer_policy() {
    let output = lower(BGP_ADDRESS_FAMILY_POLICY);
    let peer = &bgp(&output).ipv4_peers[&ip("10.0.0.2")];
    assert_eq!(peer.inbound_route_map.as_deref(), Some("IN"));
    assert!(output.snapshot().undefined_references.is_empty());
}

#[test]
fn test_unsupported_family_leaves_peer_untouched() {
    let output = lower(BGP_UNSUPPORTED_FAMILY);
    let peer = &bgp(&output).ipv4_peers[&ip("10.0.0.2")];
    assert_eq!(peer.inbound_route_map, None);
    assert!(output.scope_stats.is_balanced());
}

#[test]
fn test_unsupported_family_still_records_references() {
    let output = lower(BGP_UNSUPPORTED_FAMILY);
    let undefined = output.snapshot().undefined_references;
    assert_eq!(undefined.len(), 1);
    assert_eq!(undefined[0].name, "VPN-IN");
}

// ============================================================================
// Peer groups
// ============================================================================

#[test]
fn test_peer_group_membership() {
    let text = "\
router bgp 65000
 neighbor CORE peer-group
 neighbor CORE remote-as 65000
 neighbor 10.0.0.9 peer-group CORE
";
    let output = lower(text);
    let process = bgp(&output);
    assert!(process.peer_groups.contains_key("CORE"));
    let peer = &process.ipv4_peers[&ip("10.0.0.9")];
    assert_eq!(peer.group.as_deref(), Some("CORE"));
    assert!(red_flags_with_code(&output, codes::UNDECLARED_PEER).is_empty());
}
