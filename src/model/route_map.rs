//! Route-maps.
//!
//! Match and set lines are closed enums, one variant per line kind. A
//! clause holds at most one line of each kind: writing a kind again
//! replaces the earlier line, matching CLI override behaviour.

use std::collections::BTreeMap;
use std::mem;
use std::net::IpAddr;

use serde::Serialize;
use smol_str::SmolStr;

use crate::base::RoutingProtocol;
use crate::policy::{IntExpr, OriginType, OspfMetricType};

use super::types::LineAction;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchLine {
    IpAccessList(Vec<SmolStr>),
    IpPrefixList(Vec<SmolStr>),
    Ipv6AccessList(Vec<SmolStr>),
    Ipv6PrefixList(Vec<SmolStr>),
    Community { lists: Vec<SmolStr>, exact: bool },
    AsPath(Vec<SmolStr>),
    Tag(Vec<u32>),
    Interface(Vec<SmolStr>),
    Metric(u32),
    SourceProtocol(Vec<RoutingProtocol>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SetLine {
    Community { communities: Vec<u32>, additive: bool },
    CommunityNone,
    CommListDelete(SmolStr),
    LocalPreference(u32),
    /// Literal, `+N` or `-N`.
    Metric(IntExpr),
    MetricType(OspfMetricType),
    NextHop(Vec<IpAddr>),
    NextHopPeerAddress,
    Origin(OriginType),
    AsPathPrepend(Vec<u32>),
    Tag(u32),
    Weight(u32),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteMapClause {
    pub sequence: u32,
    pub action: LineAction,
    pub description: Option<String>,
    pub match_lines: Vec<MatchLine>,
    pub set_lines: Vec<SetLine>,
    /// `continue` target; `Some(None)` continues to the next clause.
    pub continue_to: Option<Option<u32>>,
}

impl RouteMapClause {
    pub fn new(sequence: u32, action: LineAction) -> Self {
        Self {
            sequence,
            action,
            description: None,
            match_lines: Vec::new(),
            set_lines: Vec::new(),
            continue_to: None,
        }
    }

    /// Add `line`, replacing a line of the same kind.
    pub fn set_match(&mut self, line: MatchLine) {
        replace_same_kind(&mut self.match_lines, line);
    }

    /// Add `line`, replacing a line of the same kind. `set community` and
    /// `set community none` count as one kind.
    pub fn set_set(&mut self, line: SetLine) {
        if matches!(line, SetLine::Community { .. } | SetLine::CommunityNone) {
            self.set_lines
                .retain(|l| !matches!(l, SetLine::Community { .. } | SetLine::CommunityNone));
        }
        replace_same_kind(&mut self.set_lines, line);
    }
}

fn replace_same_kind<T>(lines: &mut Vec<T>, line: T) {
    let kind = mem::discriminant(&line);
    match lines.iter().position(|l| mem::discriminant(l) == kind) {
        Some(i) => lines[i] = line,
        None => lines.push(line),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteMap {
    pub name: SmolStr,
    pub clauses: BTreeMap<u32, RouteMapClause>,
}

impl RouteMap {
    pub fn new(name: &str) -> Self {
        Self {
            name: SmolStr::new(name),
            clauses: BTreeMap::new(),
        }
    }

    /// The clause numbered `sequence`, creating it if absent. The flag is
    /// `true` when the clause already existed.
    pub fn clause_mut(&mut self, sequence: u32, action: LineAction) -> (&mut RouteMapClause, bool) {
        let existed = self.clauses.contains_key(&sequence);
        let clause = self
            .clauses
            .entry(sequence)
            .or_insert_with(|| RouteMapClause::new(sequence, action));
        clause.action = action;
        (clause, existed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_kind_replaces() {
        let mut clause = RouteMapClause::new(10, LineAction::Permit);
        clause.set_set(SetLine::LocalPreference(100));
        clause.set_set(SetLine::Weight(5));
        clause.set_set(SetLine::LocalPreference(200));
        assert_eq!(
            clause.set_lines,
            vec![SetLine::LocalPreference(200), SetLine::Weight(5)]
        );
    }

    #[test]
    fn test_community_none_replaces_community() {
        let mut clause = RouteMapClause::new(10, LineAction::Permit);
        clause.set_set(SetLine::Community {
            communities: vec![1],
            additive: false,
        });
        clause.set_set(SetLine::CommunityNone);
        assert_eq!(clause.set_lines, vec![SetLine::CommunityNone]);
    }

    #[test]
    fn test_clause_reentry_reports_existing() {
        let mut map = RouteMap::new("RM");
        let (_, existed) = map.clause_mut(10, LineAction::Permit);
        assert!(!existed);
        let (clause, existed) = map.clause_mut(10, LineAction::Deny);
        assert!(existed);
        assert_eq!(clause.action, LineAction::Deny);
        assert_eq!(map.clauses.len(), 1);
    }
}
