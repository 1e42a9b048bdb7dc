//! Route-policy expression and statement trees.
//!
//! Both families are closed enums. Every consumer (printer, reference
//! walker, downstream evaluator) matches them exhaustively, so adding a
//! variant is a compile error everywhere it needs handling.

use std::net::IpAddr;

use ipnetwork::IpNetwork;
use serde::Serialize;
use smol_str::SmolStr;

use crate::base::{RoutingProtocol, SubRange};

// ============================================================================
// POLICY
// ============================================================================

/// A named route-policy: an ordered statement list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutePolicy {
    pub name: SmolStr,
    pub statements: Vec<Statement>,
}

impl RoutePolicy {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            statements: Vec::new(),
        }
    }
}

// ============================================================================
// STATEMENTS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Statement {
    Set(SetStatement),
    /// Remove matching communities; `negated` removes everything else.
    DeleteCommunity {
        negated: bool,
        set: CommunitySetExpr,
    },
    DeleteAllCommunities,
    /// Terminal verdict.
    Disposition(Disposition),
    /// Inline invocation of another policy.
    Apply(SmolStr),
    If(IfStatement),
    /// No-op carrying source text, including degraded statements.
    Comment(String),
}

/// `if` with its `elseif` branches and optional `else`, in source order.
/// The first branch whose guard holds runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IfStatement {
    pub guard: Boolean,
    pub body: Vec<Statement>,
    pub else_ifs: Vec<ElseIf>,
    pub otherwise: Option<Vec<Statement>>,
}

impl IfStatement {
    /// Guards in test order.
    pub fn guards(&self) -> impl Iterator<Item = &Boolean> {
        std::iter::once(&self.guard).chain(self.else_ifs.iter().map(|b| &b.guard))
    }

    /// Number of branches including `else`.
    pub fn branch_count(&self) -> usize {
        1 + self.else_ifs.len() + usize::from(self.otherwise.is_some())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElseIf {
    pub guard: Boolean,
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Disposition {
    Done,
    Drop,
    Pass,
    UnsuppressRoute,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "attribute", content = "value", rename_all = "kebab-case")]
pub enum SetStatement {
    Community {
        set: CommunitySetExpr,
        additive: bool,
    },
    LocalPreference(IntExpr),
    Med(IntExpr),
    NextHop(NextHop),
    Tag(IntExpr),
    Weight(IntExpr),
    Origin(OriginExpr),
    IsisLevel(IsisLevel),
    OspfMetricType(OspfMetricType),
    IsisMetricType(IsisMetricType),
    IsisMetric(IntExpr),
    AsPathPrepend {
        asn: AsExpr,
        count: Option<IntExpr>,
    },
}

// ============================================================================
// SCALAR EXPRESSIONS
// ============================================================================

/// Numeric operand. Literal, late-bound and relative forms stay distinct
/// because they evaluate differently.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "form", content = "value", rename_all = "kebab-case")]
pub enum IntExpr {
    Literal(u32),
    Var(SmolStr),
    Increment(u32),
    Decrement(u32),
    IgpCost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum IntComparator {
    Eq,
    Ge,
    Le,
}

impl IntComparator {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntComparator::Eq => "eq",
            IntComparator::Ge => "ge",
            IntComparator::Le => "le",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AsExpr {
    Explicit(u32),
    Var(SmolStr),
    MostRecent,
    Auto,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NextHop {
    Ip(IpAddr),
    PeerAddress,
    SelfAddress,
    Discard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OriginType {
    Igp,
    Egp,
    Incomplete,
}

impl OriginType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OriginType::Igp => "igp",
            OriginType::Egp => "egp",
            OriginType::Incomplete => "incomplete",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OriginExpr {
    Literal {
        origin: OriginType,
        asn: Option<u32>,
    },
    Var(SmolStr),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum IsisLevel {
    Level1,
    Level2,
    Level12,
}

impl IsisLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            IsisLevel::Level1 => "level-1",
            IsisLevel::Level2 => "level-2",
            IsisLevel::Level12 => "level-1-2",
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "level-1" => Some(IsisLevel::Level1),
            "level-2" | "level-2-only" => Some(IsisLevel::Level2),
            "level-1-2" => Some(IsisLevel::Level12),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OspfMetricType {
    E1,
    E2,
}

impl OspfMetricType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OspfMetricType::E1 => "type-1",
            OspfMetricType::E2 => "type-2",
        }
    }

    /// `1`, `2`, `type-1`, `type-2`.
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "1" | "type-1" => Some(OspfMetricType::E1),
            "2" | "type-2" => Some(OspfMetricType::E2),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum IsisMetricType {
    Internal,
    External,
    RibMetricAsInternal,
    RibMetricAsExternal,
}

impl IsisMetricType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IsisMetricType::Internal => "internal",
            IsisMetricType::External => "external",
            IsisMetricType::RibMetricAsInternal => "rib-metric-as-internal",
            IsisMetricType::RibMetricAsExternal => "rib-metric-as-external",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RouteType {
    Internal,
    External,
    Interarea,
    Local,
    Level1,
    Level2,
    Type1,
    Type2,
}

impl RouteType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteType::Internal => "internal",
            RouteType::External => "external",
            RouteType::Interarea => "interarea",
            RouteType::Local => "local",
            RouteType::Level1 => "level-1",
            RouteType::Level2 => "level-2",
            RouteType::Type1 => "type-1",
            RouteType::Type2 => "type-2",
        }
    }

    /// `level-1-2` is read as inter-area.
    pub fn parse(text: &str) -> Option<Self> {
        Some(match text {
            "internal" => RouteType::Internal,
            "external" => RouteType::External,
            "interarea" | "level-1-2" => RouteType::Interarea,
            "local" => RouteType::Local,
            "level-1" => RouteType::Level1,
            "level-2" => RouteType::Level2,
            "type-1" => RouteType::Type1,
            "type-2" => RouteType::Type2,
            _ => return None,
        })
    }
}

// ============================================================================
// SET EXPRESSIONS
// ============================================================================

/// One prefix with an inclusive length window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PrefixRange {
    pub prefix: IpNetwork,
    pub length: SubRange,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PrefixSetExpr {
    Named(SmolStr),
    Var(SmolStr),
    Inline(Vec<PrefixRange>),
}

/// Half of an `AA:NN` community pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommunityHalf {
    Literal(u16),
    Range(SubRange),
    Any,
    PeerAs,
    PrivateAs,
    Var(SmolStr),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommunitySetElem {
    /// A fully literal community, including the well-known names.
    Value(u32),
    Halves {
        high: CommunityHalf,
        low: CommunityHalf,
    },
    Regex(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommunitySetExpr {
    Named(SmolStr),
    Var(SmolStr),
    Inline(Vec<CommunitySetElem>),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AsPathSetElem {
    IosRegex(String),
    Regex(String),
    Length {
        comparator: IntComparator,
        value: u32,
    },
    OriginatesFrom(Vec<SubRange>),
    PassesThrough(Vec<SubRange>),
    NeighborIs(Vec<SubRange>),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AsPathSetExpr {
    Named(SmolStr),
    Var(SmolStr),
    Inline(Vec<AsPathSetElem>),
}

/// Which part of the AS path a structural predicate inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AsPathPosition {
    /// The origin (right-most) end.
    OriginatesFrom,
    /// Anywhere in the path.
    PassesThrough,
    /// The neighbor (left-most) end.
    NeighborIs,
}

impl AsPathPosition {
    pub fn as_str(&self) -> &'static str {
        match self {
            AsPathPosition::OriginatesFrom => "originates-from",
            AsPathPosition::PassesThrough => "passes-through",
            AsPathPosition::NeighborIs => "neighbor-is",
        }
    }
}

// ============================================================================
// BOOLEANS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum Boolean {
    And {
        lhs: Box<Boolean>,
        rhs: Box<Boolean>,
    },
    Or {
        lhs: Box<Boolean>,
        rhs: Box<Boolean>,
    },
    Not {
        expr: Box<Boolean>,
    },
    /// True when the named policy passes the route.
    Apply {
        policy: SmolStr,
    },
    MedIs {
        comparator: IntComparator,
        value: IntExpr,
    },
    LocalPreferenceIs {
        comparator: IntComparator,
        value: IntExpr,
    },
    TagIs {
        comparator: IntComparator,
        value: IntExpr,
    },
    AsPathIn {
        set: AsPathSetExpr,
    },
    /// Structural AS-path match. With `exact` the ranges must span the
    /// whole path, otherwise they may occur as a contiguous run.
    AsPath {
        position: AsPathPosition,
        ranges: Vec<SubRange>,
        exact: bool,
    },
    CommunityMatchesAny {
        set: CommunitySetExpr,
    },
    CommunityMatchesEvery {
        set: CommunitySetExpr,
    },
    DestinationIn {
        set: PrefixSetExpr,
    },
    NextHopIn {
        set: PrefixSetExpr,
    },
    RibHasRoute {
        set: PrefixSetExpr,
    },
    ProtocolIs {
        protocol: RoutingProtocol,
    },
    RouteTypeIs {
        route_type: RouteType,
    },
    /// A guard that did not compile, kept as source text so its branch
    /// keeps its place in the chain.
    Unsupported {
        text: String,
    },
}

impl Boolean {
    pub fn and(lhs: Boolean, rhs: Boolean) -> Self {
        Boolean::And {
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn or(lhs: Boolean, rhs: Boolean) -> Self {
        Boolean::Or {
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn not(expr: Boolean) -> Self {
        Boolean::Not {
            expr: Box::new(expr),
        }
    }
}
