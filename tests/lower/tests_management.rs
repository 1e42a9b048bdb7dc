//! Management-plane lowering tests.

use routecfg::symbols::StructureType;

use crate::helpers::config_fixtures::MANAGEMENT;
use crate::helpers::lower_helpers::lower;

#[test]
fn test_management_settings() {
    let output = lower(MANAGEMENT);
    let management = &output.configuration.management;
    assert_eq!(management.domain_name.as_deref(), Some("example.net"));
    assert!(management.ntp.servers["192.0.2.10"].prefer);
    assert!(management.logging.hosts.contains("192.0.2.20"));

    let community = &management.snmp.communities["public"];
    assert!(!community.read_write);
    assert_eq!(community.acl.as_deref(), Some("SNMP-ACL"));
}

#[test]
fn test_line_block() {
    let output = lower(MANAGEMENT);
    let line = &output.configuration.management.lines["vty 0 4"];
    assert_eq!(line.access_class_in.as_deref(), Some("VTY-IN"));
    assert_eq!(line.transport_input, vec!["ssh".to_string()]);
    assert!(output.registry.is_defined(StructureType::Line, "vty 0 4"));
}

#[test]
fn test_undefined_management_acls() {
    let output = lower(MANAGEMENT);
    let mut names: Vec<String> = output
        .snapshot()
        .undefined_references
        .iter()
        .map(|r| r.name.to_string())
        .collect();
    names.sort();
    assert_eq!(names, vec!["SNMP-ACL".to_string(), "VTY-IN".to_string()]);
}

#[test]
fn test_single_line_banner() {
    let output = lower("banner motd ^CAuthorized access only^C\n");
    assert_eq!(
        output.configuration.management.banners["motd"],
        "Authorized access only"
    );
}

#[test]
fn test_aaa_login_list_reference() {
    let text = "\
aaa new-model
aaa authentication login VTY group tacacs+ local
!
line vty 0 4
 login authentication VTY
";
    let output = lower(text);
    assert!(output.configuration.management.aaa.new_model);
    assert!(output.snapshot().undefined_references.is_empty());
}
