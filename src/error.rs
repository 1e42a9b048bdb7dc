//! Error types for lowering.
//!
//! These are broken internal contracts, not bad input. Bad input becomes a
//! [`Warning`](crate::diagnostics::Warning). A `LowerError` aborts the one
//! file being lowered and nothing else.

use thiserror::Error;

/// Errors that abort lowering of the current file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LowerError {
    /// `pop` with nothing pushed.
    #[error("line {line}: scope stack underflow while leaving {block}")]
    ScopeUnderflow { line: u32, block: &'static str },

    /// A scoped setter ran with no scope of the required kind active.
    #[error("line {line}: {statement} requires an active {scope} scope")]
    MissingScope {
        line: u32,
        statement: &'static str,
        scope: &'static str,
    },

    /// The walk finished with scopes still open.
    #[error("scope stack unbalanced after walk: {pushes} pushes, {pops} pops")]
    UnbalancedScopes { pushes: usize, pops: usize },

    /// The tree handed to the driver has no source-file root.
    #[error("input tree root is {0}, expected a source file")]
    InvalidRoot(String),
}

impl LowerError {
    /// Create a scope underflow error.
    pub fn underflow(line: u32, block: &'static str) -> Self {
        Self::ScopeUnderflow { line, block }
    }

    /// Create a missing scope error.
    pub fn missing_scope(line: u32, statement: &'static str, scope: &'static str) -> Self {
        Self::MissingScope {
            line,
            statement,
            scope,
        }
    }
}

/// Result alias for lowering operations.
pub type Result<T> = std::result::Result<T, LowerError>;
