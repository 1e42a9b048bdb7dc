//! Route-policy language: AST, compiler, printer and reference walker.
//!
//! ```text
//! route-policy body lines
//!     ↓
//! [compile_policy] → RoutePolicy { Vec<Statement> } + issues + line references
//!     ↓
//! [policy_references] → named sets and policies for the registry
//! ```

mod ast;
mod compile;
mod display;
mod visit;

pub use ast::*;
pub use compile::{
    CompileIssue, CompiledPolicy, PolicyLine, compile_policy, parse_as_path_set_elem,
    parse_as_ranges, parse_boolean, parse_community_set_elem, parse_prefix_range,
};
pub use visit::{LineReference, PolicyReference, policy_references};
