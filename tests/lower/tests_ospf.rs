//! OSPF lowering tests.

use routecfg::model::OspfProcess;
use routecfg::{Dialect, LowerOutput};

use crate::helpers::config_fixtures::OSPF_AREA_ASSIGNMENT;
use crate::helpers::lower_helpers::{lower, lower_as};

fn ospf<'a>(output: &'a LowerOutput, id: &str) -> &'a OspfProcess {
    output
        .configuration
        .default_vrf()
        .and_then(|vrf| vrf.ospf.get(id))
        .expect("ospf process exists")
}

#[test]
fn test_first_matching_network_assigns_area() {
    let output = lower(OSPF_AREA_ASSIGNMENT);
    let config = &output.configuration;
    assert_eq!(config.interface("GigabitEthernet0/0").unwrap().ospf.area, Some(0));
    assert_eq!(config.interface("GigabitEthernet0/1").unwrap().ospf.area, Some(5));
    assert_eq!(config.interface("GigabitEthernet0/2").unwrap().ospf.area, None);
}

#[test]
fn test_computed_networks() {
    let output = lower(OSPF_AREA_ASSIGNMENT);
    let process = ospf(&output, "1");
    let networks: Vec<(String, u32)> = process
        .networks
        .iter()
        .map(|n| (n.interface.to_string(), n.area))
        .collect();
    assert_eq!(
        networks,
        vec![
            ("GigabitEthernet0/0".to_string(), 0),
            ("GigabitEthernet0/1".to_string(), 5),
        ]
    );
}

#[test]
fn test_interface_area_overrides_network_statement() {
    let text = "\
interface GigabitEthernet0/0
 ip address 10.1.1.1 255.255.255.0
 ip ospf 1 area 7
!
router ospf 1
 network 10.0.0.0 0.255.255.255 area 0
";
    let output = lower(text);
    let iface = output.configuration.interface("GigabitEthernet0/0").unwrap();
    assert_eq!(iface.ospf.area, Some(7));
}

#[test]
fn test_reference_bandwidth_default_per_dialect() {
    let ios = lower("router ospf 1\n");
    assert_eq!(ospf(&ios, "1").reference_bandwidth, 100e6);

    let nxos = lower_as("router ospf 1\n", Dialect::Nxos);
    assert_eq!(ospf(&nxos, "1").reference_bandwidth, 40e9);
}

#[test]
fn test_passive_interface_default() {
    let text = "\
interface GigabitEthernet0/0
 ip address 10.1.1.1 255.255.255.0
!
router ospf 1
 passive-interface default
 network 10.1.1.0 0.0.0.255 area 0
";
    let output = lower(text);
    let iface = output.configuration.interface("GigabitEthernet0/0").unwrap();
    assert_eq!(iface.ospf.passive, Some(true));
}
