//! Route-policy lowering tests.

use routecfg::diagnostics::codes;
use routecfg::policy::{
    Boolean, Disposition, IfStatement, IntExpr, PrefixSetExpr, SetStatement, Statement,
};
use routecfg::{Dialect, WarningKind};

use crate::helpers::config_fixtures::XR_ROUTE_POLICY;
use crate::helpers::lower_helpers::{lower_as, red_flags_with_code, warnings_of};

#[test]
fn test_if_else_policy() {
    let output = lower_as(XR_ROUTE_POLICY, Dialect::IosXr);
    let policy = &output.configuration.route_policies["RP-IN"];
    let expected = vec![Statement::If(IfStatement {
        guard: Boolean::DestinationIn {
            set: PrefixSetExpr::Named("PS-CUST".into()),
        },
        body: vec![
            Statement::Set(SetStatement::LocalPreference(IntExpr::Literal(200))),
            Statement::Disposition(Disposition::Pass),
        ],
        else_ifs: vec![],
        otherwise: Some(vec![Statement::Disposition(Disposition::Drop)]),
    })];
    assert_eq!(policy.statements, expected);
    assert!(output.warnings.is_empty());
}

#[test]
fn test_prefix_set_elements() {
    let output = lower_as(XR_ROUTE_POLICY, Dialect::IosXr);
    let set = &output.configuration.prefix_sets["PS-CUST"];
    assert_eq!(set.elements.len(), 2);
    assert_eq!(set.elements[0].length.start, 8);
    assert_eq!(set.elements[0].length.end, 24);
    assert!(output.snapshot().undefined_references.is_empty());
}

#[test]
fn test_printed_policy() {
    let output = lower_as(XR_ROUTE_POLICY, Dialect::IosXr);
    let printed = output.configuration.route_policies["RP-IN"].to_string();
    assert_eq!(
        printed,
        "route-policy RP-IN\n  if destination in PS-CUST then\n    set local-preference 200\n    \
         pass\n  else\n    drop\n  endif\nend-policy\n"
    );
}

#[test]
fn test_unknown_statement_degrades_to_comment() {
    let text = "\
route-policy RP
  frobnicate the route
  pass
end-policy
";
    let output = lower_as(text, Dialect::IosXr);
    let policy = &output.configuration.route_policies["RP"];
    assert_eq!(policy.statements.len(), 2);
    assert!(matches!(&policy.statements[0], Statement::Comment(t) if t == "frobnicate the route"));

    let todos = warnings_of(&output, WarningKind::Todo);
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0].code, Some(codes::POLICY_STATEMENT_DEGRADED));
    assert_eq!(todos[0].line, Some(2));
}

#[test]
fn test_apply_references_policy() {
    let text = "\
route-policy CHILD
  pass
end-policy
!
route-policy PARENT
  apply CHILD
  apply MISSING
end-policy
";
    let output = lower_as(text, Dialect::IosXr);
    let undefined = output.snapshot().undefined_references;
    assert_eq!(undefined.len(), 1);
    assert_eq!(undefined[0].name, "MISSING");
    assert_eq!(undefined[0].line, 7);
}

#[test]
fn test_redefined_policy_replaces_with_warning() {
    let text = "\
route-policy RP
  drop
end-policy
!
route-policy RP
  pass
end-policy
";
    let output = lower_as(text, Dialect::IosXr);
    let policy = &output.configuration.route_policies["RP"];
    assert_eq!(policy.statements, vec![Statement::Disposition(Disposition::Pass)]);
    assert_eq!(red_flags_with_code(&output, codes::DUPLICATE_DEFINITION).len(), 1);
}

#[test]
fn test_repeated_reference_reported_per_line() {
    let text = "\
route-policy RP
  if destination in MISSING then
    pass
  endif
  if destination in MISSING then
    drop
  endif
end-policy
";
    let output = lower_as(text, Dialect::IosXr);
    let lines: Vec<(String, u32)> = output
        .snapshot()
        .undefined_references
        .iter()
        .map(|r| (r.name.to_string(), r.line))
        .collect();
    assert_eq!(lines, vec![("MISSING".to_string(), 2), ("MISSING".to_string(), 5)]);
}

#[test]
fn test_unparsable_elseif_keeps_rest_of_chain() {
    let text = "\
route-policy RP
  if med eq 1 then
    set local-preference 100
  elseif bogus-condition then
    set local-preference 200
  elseif destination in PS then
    set local-preference 300
  else
    drop
  endif
end-policy
";
    let output = lower_as(text, Dialect::IosXr);
    let policy = &output.configuration.route_policies["RP"];
    let Statement::If(stmt) = &policy.statements[0] else {
        panic!("expected if, got {:?}", policy.statements);
    };
    assert_eq!(stmt.branch_count(), 4);
    assert_eq!(
        stmt.else_ifs[0].guard,
        Boolean::Unsupported {
            text: "bogus-condition".to_string()
        }
    );
    assert_eq!(
        stmt.else_ifs[1].body,
        vec![Statement::Set(SetStatement::LocalPreference(IntExpr::Literal(300)))]
    );
    assert_eq!(stmt.otherwise, Some(vec![Statement::Disposition(Disposition::Drop)]));

    let todos = warnings_of(&output, WarningKind::Todo);
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0].line, Some(4));

    let undefined = output.snapshot().undefined_references;
    assert_eq!(undefined.len(), 1);
    assert_eq!(undefined[0].name, "PS");
    assert_eq!(undefined[0].line, 6);
}
