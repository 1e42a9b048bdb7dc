//! Reference resolution tests.

use rstest::rstest;
use routecfg::diagnostics::codes;
use routecfg::symbols::{StructureRegistry, StructureType, StructureUsage};
use routecfg::{LowerOptions, WarningKind};

use crate::helpers::lower_helpers::{lower, lower_with};

// ============================================================================
// Registry directly
// ============================================================================

#[test]
fn test_reference_before_definition_is_satisfied() {
    let mut registry = StructureRegistry::new();
    registry.reference(
        StructureType::Ipv4AccessList,
        "AL1",
        StructureUsage::InterfaceIncomingFilter,
        3,
    );
    registry.define(StructureType::Ipv4AccessListExtended, "AL1", 7);
    assert!(registry.undefined_references().is_empty());
    assert!(registry.unused_structures().is_empty());
}

#[rstest]
#[case(StructureType::Ipv4AccessListStandard, true)]
#[case(StructureType::Ipv4AccessListExtended, true)]
#[case(StructureType::Ipv6AccessList, false)]
fn test_abstract_reference_types(#[case] defined_as: StructureType, #[case] satisfied: bool) {
    let mut registry = StructureRegistry::new();
    registry.define(defined_as, "10", 1);
    assert_eq!(registry.is_defined(StructureType::Ipv4AccessList, "10"), satisfied);
}

#[test]
fn test_definition_lines_accumulate() {
    let mut registry = StructureRegistry::new();
    registry.define(StructureType::RouteMap, "RM", 1);
    registry.define(StructureType::RouteMap, "RM", 9);
    let lines: Vec<u32> = registry
        .definition_lines(StructureType::RouteMap, "RM")
        .unwrap()
        .iter()
        .copied()
        .collect();
    assert_eq!(lines, vec![1, 9]);
    assert_eq!(registry.definition_count(), 1);
}

// ============================================================================
// Through lowering
// ============================================================================

#[test]
fn test_unused_structures() {
    let text = "\
ip prefix-list USED seq 5 permit 10.0.0.0/8
ip prefix-list SPARE seq 5 permit 172.16.0.0/12
route-map RM permit 10
 match ip address prefix-list USED
";
    let output = lower(text);
    let unused: Vec<String> = output
        .snapshot()
        .unused_structures
        .iter()
        .filter(|u| u.structure_type == StructureType::PrefixList)
        .map(|u| u.name.to_string())
        .collect();
    assert_eq!(unused, vec!["SPARE".to_string()]);
}

#[test]
fn test_snapshot_diagnostics_are_coded() {
    let output = lower("interface Gi0/0\n ip access-group MISSING in\n");
    let snapshot = output.snapshot();
    assert!(!snapshot.is_clean());
    let diagnostics = snapshot.diagnostics();
    let undefined: Vec<_> = diagnostics
        .iter()
        .filter(|w| w.code == Some(codes::UNDEFINED_REFERENCE))
        .collect();
    assert_eq!(undefined.len(), 1);
    assert_eq!(undefined[0].kind, WarningKind::RedFlag);
    assert_eq!(undefined[0].line, Some(2));
}

#[test]
fn test_pedantic_warnings_only_when_asked() {
    let text = "interface Gi0/0\n!\ninterface GigabitEthernet0/0\n";
    let quiet = lower(text);
    assert!(quiet.warnings.of_kind(WarningKind::Pedantic).next().is_none());

    let loud = lower_with(text, &LowerOptions::default().with_pedantic(true));
    assert_eq!(loud.warnings.of_kind(WarningKind::Pedantic).count(), 1);
}
