//! Access-list and object-group lowering tests.

use routecfg::base::SubRange;
use routecfg::diagnostics::codes;
use routecfg::model::{AddressSpec, LineAction};
use routecfg::symbols::StructureType;

use crate::helpers::config_fixtures::FORWARD_REFERENCE;
use crate::helpers::lower_helpers::{assert_no_red_flags, lower, red_flags_with_code};

#[test]
fn test_forward_reference_resolves() {
    let output = lower(FORWARD_REFERENCE);
    let snapshot = output.snapshot();
    assert!(snapshot.undefined_references.is_empty());
    assert!(
        output
            .registry
            .is_defined(StructureType::Ipv4AccessList, "AL1")
    );
    let iface = output.configuration.interface("GigabitEthernet0/0").unwrap();
    assert_eq!(iface.incoming_filter.as_deref(), Some("AL1"));
    assert_no_red_flags(&output);
}

#[test]
fn test_extended_entry_fields() {
    let output = lower(FORWARD_REFERENCE);
    let acl = &output.configuration.extended_access_lists["AL1"];
    assert_eq!(acl.lines.len(), 1);
    let line = &acl.lines[0];
    assert_eq!(line.action, LineAction::Permit);
    assert_eq!(line.protocol, Some(6));
    assert_eq!(line.destination_ports, vec![SubRange::single(22)]);
}

#[test]
fn test_numbered_standard_list() {
    let text = "access-list 10 permit 192.0.2.0 0.0.0.255\naccess-list 10 deny any\n";
    let output = lower(text);
    let acl = &output.configuration.standard_access_lists["10"];
    assert_eq!(acl.lines.len(), 2);
    assert_eq!(acl.lines[1].action, LineAction::Deny);
}

#[test]
fn test_sequenced_entries_stay_ordered() {
    let text = "\
ip access-list extended AL2
 20 deny ip any any
 10 permit icmp any any
";
    let output = lower(text);
    let sequences: Vec<Option<u32>> = output.configuration.extended_access_lists["AL2"]
        .lines
        .iter()
        .map(|l| l.sequence)
        .collect();
    assert_eq!(sequences, vec![Some(10), Some(20)]);
}

#[test]
fn test_object_group_address_is_referenced() {
    let text = "\
object-group network SERVERS
 host 192.0.2.10
!
ip access-list extended AL3
 permit tcp any object-group SERVERS eq 443
";
    let output = lower(text);
    assert!(output.snapshot().undefined_references.is_empty());
    let line = &output.configuration.extended_access_lists["AL3"].lines[0];
    assert!(matches!(&line.destination, AddressSpec::ObjectGroup(name) if name == "SERVERS"));
}

#[test]
fn test_duplicate_object_group_is_shadowed() {
    let text = "\
object-group network SERVERS
 host 192.0.2.10
!
object-group network SERVERS
 host 192.0.2.99
";
    let output = lower(text);
    let group = &output.configuration.network_object_groups["SERVERS"];
    assert_eq!(group.objects.len(), 1);
    let flags = red_flags_with_code(&output, codes::DUPLICATE_DEFINITION);
    assert_eq!(flags.len(), 1);
    assert!(flags[0].message.contains("The later block is ignored."));
}
