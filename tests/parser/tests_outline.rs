//! Outline parser tests through the public API.

use rstest::rstest;
use routecfg::parser::{Item, parse, parse_source};

use crate::helpers::config_fixtures::{
    BGP_UNSUPPORTED_FAMILY, FORWARD_REFERENCE, MANAGEMENT, OSPF_AREA_ASSIGNMENT,
    UNTERMINATED_QUOTE, XR_ROUTE_POLICY,
};

#[rstest]
#[case(FORWARD_REFERENCE)]
#[case(BGP_UNSUPPORTED_FAMILY)]
#[case(OSPF_AREA_ASSIGNMENT)]
#[case(XR_ROUTE_POLICY)]
#[case(MANAGEMENT)]
#[case(UNTERMINATED_QUOTE)]
#[case("interface Gi0/0\r\n description crlf\r\n")]
fn test_tree_is_lossless(#[case] text: &str) {
    assert_eq!(parse(text).syntax().to_string(), text);
}

#[test]
fn test_nested_stanzas() {
    let (parse, root) = parse_source(BGP_UNSUPPORTED_FAMILY);
    assert!(parse.ok());
    let root = root.unwrap();
    let stanzas: Vec<_> = root.stanzas().collect();
    assert_eq!(stanzas.len(), 1);

    let bgp = &stanzas[0];
    assert_eq!(bgp.text(), "router bgp 65000");
    let children = bgp.children();
    assert_eq!(children.len(), 3);
    assert!(children[1].has_children());
    assert_eq!(children[1].children()[0].text(), "neighbor 10.0.0.2 route-map VPN-IN in");
}

#[test]
fn test_quoted_word_value() {
    let (_, root) = parse_source("snmp-server location \"rack 4\"\n");
    let stanza = root.unwrap().stanzas().next().unwrap();
    let values: Vec<String> = stanza.words().iter().map(|w| w.value().to_string()).collect();
    assert_eq!(values, vec!["snmp-server", "location", "rack 4"]);
}

#[test]
fn test_unterminated_quote_becomes_error_item() {
    let (parse, root) = parse_source(UNTERMINATED_QUOTE);
    assert_eq!(parse.errors.len(), 1);
    let root = root.unwrap();
    let items: Vec<Item> = root.items().collect();
    assert_eq!(items.len(), 2);
    assert!(matches!(items[0], Item::Stanza(_)));
    assert!(matches!(items[1], Item::Error(_)));
}

#[test]
fn test_comments_are_not_stanzas() {
    let (_, root) = parse_source("! header\nhostname r1\n!\n");
    assert_eq!(root.unwrap().stanzas().count(), 1);
}
