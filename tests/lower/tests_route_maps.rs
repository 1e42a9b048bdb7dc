//! Route-map and list lowering tests.

use rstest::rstest;
use routecfg::diagnostics::codes;
use routecfg::model::{LineAction, MatchLine, SetLine};
use routecfg::{Dialect, LowerOptions};

use crate::helpers::config_fixtures::DUPLICATE_ROUTE_MAP_CLAUSE;
use crate::helpers::lower_helpers::{lower, lower_with, red_flags_with_code};

// ============================================================================
// Clauses
// ============================================================================

#[test]
fn test_duplicate_clause_merges_with_one_warning() {
    let output = lower(DUPLICATE_ROUTE_MAP_CLAUSE);
    let map = &output.configuration.route_maps["RM1"];
    assert_eq!(map.clauses.len(), 1);

    let clause = &map.clauses[&10];
    assert!(clause.set_lines.contains(&SetLine::LocalPreference(200)));
    assert_eq!(clause.set_lines.len(), 2);

    let flags = red_flags_with_code(&output, codes::DUPLICATE_DEFINITION);
    assert_eq!(flags.len(), 1);
    assert!(flags[0].message.contains("already contains clause numbered '10'"));
}

#[test]
fn test_reopened_clause_keeps_last_value() {
    let text = "\
route-map RM permit 10
 set local-preference 200
 description first
!
route-map RM deny 10
 set local-preference 300
 description second
";
    let output = lower(text);
    let clause = &output.configuration.route_maps["RM"].clauses[&10];
    assert_eq!(clause.set_lines, vec![SetLine::LocalPreference(300)]);
    assert_eq!(clause.description.as_deref(), Some("second"));
    assert_eq!(clause.action, LineAction::Deny);
}

#[rstest]
#[case(Dialect::Ios, 10)]
#[case(Dialect::Nxos, 10)]
fn test_default_sequence(#[case] dialect: Dialect, #[case] expected: u32) {
    let output = lower_with("route-map RM deny\n", &LowerOptions::new(dialect));
    let map = &output.configuration.route_maps["RM"];
    let clause = map.clauses.values().next().unwrap();
    assert_eq!(clause.sequence, expected);
    assert_eq!(clause.action, LineAction::Deny);
}

#[test]
fn test_clauses_are_ordered_by_sequence() {
    let text = "route-map RM permit 30\n!\nroute-map RM permit 10\n!\nroute-map RM deny 20\n";
    let output = lower(text);
    let sequences: Vec<u32> = output.configuration.route_maps["RM"]
        .clauses
        .keys()
        .copied()
        .collect();
    assert_eq!(sequences, vec![10, 20, 30]);
}

// ============================================================================
// Match and set
// ============================================================================

#[test]
fn test_match_and_set_lines() {
    let text = "\
ip prefix-list PL seq 5 permit 10.0.0.0/8 le 24
!
route-map RM permit 10
 match ip address prefix-list PL
 set community 65000:100 additive
 set as-path prepend 65000 65000
 continue 20
";
    let output = lower(text);
    let clause = &output.configuration.route_maps["RM"].clauses[&10];
    assert_eq!(clause.match_lines, vec![MatchLine::IpPrefixList(vec!["PL".into()])]);
    assert!(clause.set_lines.contains(&SetLine::Community {
        communities: vec![(65000 << 16) | 100],
        additive: true,
    }));
    assert!(clause.set_lines.contains(&SetLine::AsPathPrepend(vec![65000, 65000])));
    assert_eq!(clause.continue_to, Some(Some(20)));
    assert!(output.snapshot().undefined_references.is_empty());
}

#[test]
fn test_undefined_match_target_is_reported() {
    let output = lower("route-map RM permit 10\n match as-path 7\n");
    let undefined = output.snapshot().undefined_references;
    assert_eq!(undefined.len(), 1);
    assert_eq!(undefined[0].name, "7");
    assert_eq!(undefined[0].line, 2);
}

#[test]
fn test_removed_route_map() {
    let output = lower("route-map RM permit 10\n!\nno route-map RM\n");
    assert!(output.configuration.route_maps.is_empty());
    assert!(output.snapshot().unused_structures.is_empty());
}

#[test]
fn test_reference_to_removed_structures_is_undefined() {
    let text = "\
route-map RM permit 10
!
ip prefix-list PL seq 5 permit 10.0.0.0/8
access-list 10 permit any
no route-map RM
no ip prefix-list PL
no access-list 10
router bgp 65000
 neighbor 10.0.0.2 remote-as 65001
 neighbor 10.0.0.2 route-map RM in
 neighbor 10.0.0.2 prefix-list PL out
!
interface Gi0/0
 ip access-group 10 in
";
    let output = lower(text);
    let mut undefined: Vec<String> = output
        .snapshot()
        .undefined_references
        .iter()
        .map(|r| r.name.to_string())
        .collect();
    undefined.sort();
    assert_eq!(undefined, vec!["10", "PL", "RM"]);
}

// ============================================================================
// Prefix and community lists
// ============================================================================

#[test]
fn test_prefix_list_entries() {
    let text = "\
ip prefix-list PL seq 5 permit 10.0.0.0/8 le 24
ip prefix-list PL seq 10 deny 0.0.0.0/0
";
    let output = lower(text);
    let list = &output.configuration.prefix_lists["PL"];
    assert_eq!(list.lines.len(), 2);
    assert_eq!(list.lines[1].action, LineAction::Deny);
}

#[test]
fn test_standard_community_list() {
    let output = lower("ip community-list standard CL permit 65000:100\n");
    let list = &output.configuration.standard_community_lists["CL"];
    assert_eq!(list.lines.len(), 1);
    assert_eq!(list.lines[0].communities, vec![(65000 << 16) | 100]);
}
