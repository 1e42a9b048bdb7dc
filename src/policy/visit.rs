//! Walk a policy for the named structures it uses.

use smol_str::SmolStr;

use super::ast::*;

/// A named structure mentioned by a policy.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PolicyReference {
    Policy(SmolStr),
    PrefixSet(SmolStr),
    CommunitySet(SmolStr),
    AsPathSet(SmolStr),
}

/// A reference and the body line that makes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineReference {
    pub line: u32,
    pub reference: PolicyReference,
}

/// Collect every named reference in source order, duplicates included.
pub fn policy_references(statements: &[Statement]) -> Vec<PolicyReference> {
    let mut out = Vec::new();
    for statement in statements {
        statement_refs(statement, &mut out);
    }
    out
}

pub(super) fn statement_refs(statement: &Statement, out: &mut Vec<PolicyReference>) {
    match statement {
        Statement::Set(SetStatement::Community { set, .. }) => community_refs(set, out),
        Statement::Set(_) => {}
        Statement::DeleteCommunity { set, .. } => community_refs(set, out),
        Statement::Apply(name) => out.push(PolicyReference::Policy(name.clone())),
        Statement::If(stmt) => {
            boolean_refs(&stmt.guard, out);
            stmt.body.iter().for_each(|s| statement_refs(s, out));
            for branch in &stmt.else_ifs {
                boolean_refs(&branch.guard, out);
                branch.body.iter().for_each(|s| statement_refs(s, out));
            }
            if let Some(otherwise) = &stmt.otherwise {
                otherwise.iter().for_each(|s| statement_refs(s, out));
            }
        }
        Statement::DeleteAllCommunities | Statement::Disposition(_) | Statement::Comment(_) => {}
    }
}

pub(super) fn boolean_refs(expr: &Boolean, out: &mut Vec<PolicyReference>) {
    match expr {
        Boolean::And { lhs, rhs } | Boolean::Or { lhs, rhs } => {
            boolean_refs(lhs, out);
            boolean_refs(rhs, out);
        }
        Boolean::Not { expr } => boolean_refs(expr, out),
        Boolean::Apply { policy } => out.push(PolicyReference::Policy(policy.clone())),
        Boolean::AsPathIn {
            set: AsPathSetExpr::Named(name),
        } => out.push(PolicyReference::AsPathSet(name.clone())),
        Boolean::CommunityMatchesAny { set } | Boolean::CommunityMatchesEvery { set } => {
            community_refs(set, out)
        }
        Boolean::DestinationIn { set }
        | Boolean::NextHopIn { set }
        | Boolean::RibHasRoute { set } => {
            if let PrefixSetExpr::Named(name) = set {
                out.push(PolicyReference::PrefixSet(name.clone()));
            }
        }
        Boolean::AsPathIn { .. }
        | Boolean::MedIs { .. }
        | Boolean::LocalPreferenceIs { .. }
        | Boolean::TagIs { .. }
        | Boolean::AsPath { .. }
        | Boolean::ProtocolIs { .. }
        | Boolean::RouteTypeIs { .. }
        | Boolean::Unsupported { .. } => {}
    }
}

fn community_refs(set: &CommunitySetExpr, out: &mut Vec<PolicyReference>) {
    if let CommunitySetExpr::Named(name) = set {
        out.push(PolicyReference::CommunitySet(name.clone()));
    }
}
