//! Pretty-printer in route-policy surface syntax.

use std::fmt::{self, Display, Formatter, Write};

use crate::base::{SubRange, community_to_string};

use super::ast::*;

const INDENT: &str = "  ";

impl Display for RoutePolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "route-policy {}", self.name)?;
        write_statements(f, &self.statements, 1)?;
        writeln!(f, "end-policy")
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_statement(f, self, 0)
    }
}

fn write_statements(f: &mut Formatter<'_>, statements: &[Statement], depth: usize) -> fmt::Result {
    for statement in statements {
        write_statement(f, statement, depth)?;
    }
    Ok(())
}

fn write_statement(f: &mut Formatter<'_>, statement: &Statement, depth: usize) -> fmt::Result {
    let pad = INDENT.repeat(depth);
    match statement {
        Statement::Set(set) => writeln!(f, "{pad}{set}"),
        Statement::DeleteCommunity { negated, set } => {
            let not = if *negated { "not " } else { "" };
            writeln!(f, "{pad}delete community {not}in {set}")
        }
        Statement::DeleteAllCommunities => writeln!(f, "{pad}delete community all"),
        Statement::Disposition(d) => writeln!(f, "{pad}{d}"),
        Statement::Apply(name) => writeln!(f, "{pad}apply {name}"),
        Statement::Comment(text) => writeln!(f, "{pad}# {text}"),
        Statement::If(stmt) => {
            writeln!(f, "{pad}if {} then", stmt.guard)?;
            write_statements(f, &stmt.body, depth + 1)?;
            for branch in &stmt.else_ifs {
                writeln!(f, "{pad}elseif {} then", branch.guard)?;
                write_statements(f, &branch.body, depth + 1)?;
            }
            if let Some(otherwise) = &stmt.otherwise {
                writeln!(f, "{pad}else")?;
                write_statements(f, otherwise, depth + 1)?;
            }
            writeln!(f, "{pad}endif")
        }
    }
}

impl Display for Disposition {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Disposition::Done => "done",
            Disposition::Drop => "drop",
            Disposition::Pass => "pass",
            Disposition::UnsuppressRoute => "unsuppress-route",
        })
    }
}

impl Display for SetStatement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            SetStatement::Community { set, additive } => {
                write!(f, "set community {set}")?;
                if *additive {
                    f.write_str(" additive")?;
                }
                Ok(())
            }
            SetStatement::LocalPreference(v) => write!(f, "set local-preference {v}"),
            SetStatement::Med(v) => write!(f, "set med {v}"),
            SetStatement::NextHop(hop) => write!(f, "set next-hop {hop}"),
            SetStatement::Tag(v) => write!(f, "set tag {v}"),
            SetStatement::Weight(v) => write!(f, "set weight {v}"),
            SetStatement::Origin(origin) => write!(f, "set origin {origin}"),
            SetStatement::IsisLevel(level) => write!(f, "set level {}", level.as_str()),
            SetStatement::OspfMetricType(t) => write!(f, "set metric-type {}", t.as_str()),
            SetStatement::IsisMetricType(t) => write!(f, "set metric-type {}", t.as_str()),
            SetStatement::IsisMetric(v) => write!(f, "set isis-metric {v}"),
            SetStatement::AsPathPrepend { asn, count } => {
                write!(f, "prepend as-path {asn}")?;
                if let Some(count) = count {
                    write!(f, " {count}")?;
                }
                Ok(())
            }
        }
    }
}

impl Display for IntExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            IntExpr::Literal(v) => write!(f, "{v}"),
            IntExpr::Var(name) => f.write_str(name),
            IntExpr::Increment(v) => write!(f, "+{v}"),
            IntExpr::Decrement(v) => write!(f, "-{v}"),
            IntExpr::IgpCost => f.write_str("igp-cost"),
        }
    }
}

impl Display for AsExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AsExpr::Explicit(asn) => write!(f, "{asn}"),
            AsExpr::Var(name) => f.write_str(name),
            AsExpr::MostRecent => f.write_str("most-recent"),
            AsExpr::Auto => f.write_str("auto"),
        }
    }
}

impl Display for NextHop {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            NextHop::Ip(ip) => write!(f, "{ip}"),
            NextHop::PeerAddress => f.write_str("peer-address"),
            NextHop::SelfAddress => f.write_str("self"),
            NextHop::Discard => f.write_str("discard"),
        }
    }
}

impl Display for OriginExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            OriginExpr::Literal {
                origin,
                asn: Some(asn),
            } => write!(f, "{} {asn}", origin.as_str()),
            OriginExpr::Literal { origin, asn: None } => f.write_str(origin.as_str()),
            OriginExpr::Var(name) => f.write_str(name),
        }
    }
}

impl Display for PrefixRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.prefix)?;
        let len = u32::from(self.prefix.prefix());
        let max = if self.prefix.is_ipv4() { 32 } else { 128 };
        match (self.length.start, self.length.end) {
            (lo, hi) if lo == len && hi == len => Ok(()),
            (lo, hi) if lo == hi => write!(f, " eq {lo}"),
            (lo, hi) if lo == len => write!(f, " le {hi}"),
            (lo, hi) if hi == max => write!(f, " ge {lo}"),
            (lo, hi) => write!(f, " ge {lo} le {hi}"),
        }
    }
}

fn write_list<T: Display>(f: &mut Formatter<'_>, items: &[T]) -> fmt::Result {
    f.write_char('(')?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    f.write_char(')')
}

impl Display for PrefixSetExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            PrefixSetExpr::Named(name) | PrefixSetExpr::Var(name) => f.write_str(name),
            PrefixSetExpr::Inline(ranges) => write_list(f, ranges),
        }
    }
}

impl Display for CommunityHalf {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            CommunityHalf::Literal(v) => write!(f, "{v}"),
            CommunityHalf::Range(r) => write!(f, "[{}..{}]", r.start, r.end),
            CommunityHalf::Any => f.write_char('*'),
            CommunityHalf::PeerAs => f.write_str("peeras"),
            CommunityHalf::PrivateAs => f.write_str("private-as"),
            CommunityHalf::Var(name) => f.write_str(name),
        }
    }
}

impl Display for CommunitySetElem {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            CommunitySetElem::Value(v) => f.write_str(&community_to_string(*v)),
            CommunitySetElem::Halves { high, low } => write!(f, "{high}:{low}"),
            CommunitySetElem::Regex(re) => write!(f, "ios-regex '{re}'"),
        }
    }
}

impl Display for CommunitySetExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            CommunitySetExpr::Named(name) | CommunitySetExpr::Var(name) => f.write_str(name),
            CommunitySetExpr::Inline(elems) => write_list(f, elems),
        }
    }
}

struct AsRanges<'a>(&'a [SubRange]);

impl Display for AsRanges<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_char('\'')?;
        for (i, range) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_char(' ')?;
            }
            if range.is_single() {
                write!(f, "{}", range.start)?;
            } else {
                write!(f, "[{}..{}]", range.start, range.end)?;
            }
        }
        f.write_char('\'')
    }
}

impl Display for AsPathSetElem {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AsPathSetElem::IosRegex(re) => write!(f, "ios-regex '{re}'"),
            AsPathSetElem::Regex(re) => write!(f, "dfa-regex '{re}'"),
            AsPathSetElem::Length { comparator, value } => {
                write!(f, "length {} {value}", comparator.as_str())
            }
            AsPathSetElem::OriginatesFrom(r) => write!(f, "originates-from {}", AsRanges(r)),
            AsPathSetElem::PassesThrough(r) => write!(f, "passes-through {}", AsRanges(r)),
            AsPathSetElem::NeighborIs(r) => write!(f, "neighbor-is {}", AsRanges(r)),
        }
    }
}

impl Display for AsPathSetExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AsPathSetExpr::Named(name) | AsPathSetExpr::Var(name) => f.write_str(name),
            AsPathSetExpr::Inline(elems) => write_list(f, elems),
        }
    }
}

impl Boolean {
    fn is_atom(&self) -> bool {
        !matches!(
            self,
            Boolean::And { .. } | Boolean::Or { .. } | Boolean::Unsupported { .. }
        )
    }
}

struct Operand<'a>(&'a Boolean);

impl Display for Operand<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.0.is_atom() {
            write!(f, "{}", self.0)
        } else {
            write!(f, "({})", self.0)
        }
    }
}

impl Display for Boolean {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Boolean::And { lhs, rhs } => {
                // `and` is left-associative and binds tighter than `or`
                let left = match lhs.as_ref() {
                    Boolean::And { .. } => format!("{lhs}"),
                    other => format!("{}", Operand(other)),
                };
                write!(f, "{left} and {}", Operand(rhs))
            }
            Boolean::Or { lhs, rhs } => {
                let left = match lhs.as_ref() {
                    Boolean::Or { .. } | Boolean::And { .. } => format!("{lhs}"),
                    other => format!("{}", Operand(other)),
                };
                let right = match rhs.as_ref() {
                    Boolean::And { .. } => format!("{rhs}"),
                    other => format!("{}", Operand(other)),
                };
                write!(f, "{left} or {right}")
            }
            Boolean::Not { expr } => write!(f, "not {}", Operand(expr)),
            Boolean::Apply { policy } => write!(f, "apply {policy}"),
            Boolean::MedIs { comparator, value } => {
                write!(f, "med {} {value}", comparator.as_str())
            }
            Boolean::LocalPreferenceIs { comparator, value } => {
                write!(f, "local-preference {} {value}", comparator.as_str())
            }
            Boolean::TagIs { comparator, value } => {
                write!(f, "tag {} {value}", comparator.as_str())
            }
            Boolean::AsPathIn { set } => write!(f, "as-path in {set}"),
            Boolean::AsPath {
                position,
                ranges,
                exact,
            } => {
                write!(f, "as-path {} {}", position.as_str(), AsRanges(ranges))?;
                if *exact {
                    f.write_str(" exact")?;
                }
                Ok(())
            }
            Boolean::CommunityMatchesAny { set } => write!(f, "community matches-any {set}"),
            Boolean::CommunityMatchesEvery { set } => {
                write!(f, "community matches-every {set}")
            }
            Boolean::DestinationIn { set } => write!(f, "destination in {set}"),
            Boolean::NextHopIn { set } => write!(f, "next-hop in {set}"),
            Boolean::RibHasRoute { set } => write!(f, "rib-has-route in {set}"),
            Boolean::ProtocolIs { protocol } => write!(f, "protocol is {protocol}"),
            Boolean::RouteTypeIs { route_type } => {
                write!(f, "route-type is {}", route_type.as_str())
            }
            Boolean::Unsupported { text } => f.write_str(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smol_str::SmolStr;

    fn apply(name: &str) -> Boolean {
        Boolean::Apply {
            policy: SmolStr::new(name),
        }
    }

    #[test]
    fn test_precedence_parentheses() {
        let expr = Boolean::and(Boolean::or(apply("A"), apply("B")), apply("C"));
        assert_eq!(expr.to_string(), "(apply A or apply B) and apply C");

        let expr = Boolean::or(apply("A"), Boolean::and(apply("B"), apply("C")));
        assert_eq!(expr.to_string(), "apply A or apply B and apply C");

        let expr = Boolean::not(Boolean::and(apply("A"), apply("B")));
        assert_eq!(expr.to_string(), "not (apply A and apply B)");
    }

    #[test]
    fn test_if_chain_layout() {
        let stmt = Statement::If(IfStatement {
            guard: apply("A"),
            body: vec![Statement::Disposition(Disposition::Pass)],
            else_ifs: vec![ElseIf {
                guard: apply("B"),
                body: vec![Statement::Set(SetStatement::Med(IntExpr::Increment(5)))],
            }],
            otherwise: Some(vec![Statement::Disposition(Disposition::Drop)]),
        });
        assert_eq!(
            stmt.to_string(),
            "if apply A then\n  pass\nelseif apply B then\n  set med +5\nelse\n  drop\nendif\n"
        );
    }

    #[test]
    fn test_as_path_ranges() {
        let expr = Boolean::AsPath {
            position: AsPathPosition::PassesThrough,
            ranges: vec![SubRange::single(65000), SubRange::new(100, 200)],
            exact: true,
        };
        assert_eq!(expr.to_string(), "as-path passes-through '65000 [100..200]' exact");
    }
}
