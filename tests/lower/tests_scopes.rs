//! Scope balance and file-level outcome tests.

use routecfg::{LowerOptions, WarningKind};

use crate::helpers::config_fixtures::{
    BGP_ADDRESS_FAMILY_POLICY, BGP_UNSUPPORTED_FAMILY, HOSTNAME_ONLY, UNTERMINATED_QUOTE,
    XR_ROUTE_POLICY,
};
use crate::helpers::lower_helpers::{lower, lower_with, warnings_of};

#[test]
fn test_scopes_balance_after_nested_blocks() {
    for text in [BGP_ADDRESS_FAMILY_POLICY, BGP_UNSUPPORTED_FAMILY, XR_ROUTE_POLICY] {
        let output = lower(text);
        let stats = output.scope_stats;
        assert!(stats.is_balanced(), "unbalanced scopes: {stats:?}");
    }
}

#[test]
fn test_hostname_only() {
    let output = lower(HOSTNAME_ONLY);
    assert_eq!(output.configuration.hostname.as_deref(), Some("r1"));
    assert!(!output.unrecognized);
    assert!(output.warnings.is_empty());
}

#[test]
fn test_unterminated_quote_is_unrecognized() {
    let output = lower(UNTERMINATED_QUOTE);
    assert!(output.unrecognized);
    assert!(output.configuration.unrecognized);
    let unrecognized = warnings_of(&output, WarningKind::Unrecognized);
    assert_eq!(unrecognized.len(), 1);
    assert_eq!(unrecognized[0].line, Some(2));
    // The rest of the file still lowers.
    assert_eq!(output.configuration.hostname.as_deref(), Some("r1"));
}

#[test]
fn test_unrecognized_as_red_flag() {
    let options = LowerOptions::default().with_unrecognized_as_red_flag(true);
    let output = lower_with(UNTERMINATED_QUOTE, &options);
    assert_eq!(warnings_of(&output, WarningKind::RedFlag).len(), 1);
}

#[test]
fn test_unimplemented_features_are_collected() {
    let output = lower("hostname r1\nip default-gateway 192.0.2.1\n");
    assert!(
        output
            .configuration
            .unimplemented_features
            .iter()
            .any(|f| f.contains("default-gateway"))
    );
}
