//! # routecfg
//!
//! Lowering front end for Cisco-family router and switch configurations.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! batch       → many files in parallel (rayon)
//!   ↓
//! lower       → scope stacks + depth-first tree-lowering driver
//!   ↓
//! model       → vendor-neutral Configuration and its structures
//!   ↓
//! policy      → route-policy AST, compiler, printer, reference walker
//!   ↓
//! symbols     → structure registry: definitions, references, queries
//!   ↓
//! parser      → logos lexer, indentation outline parser, rowan CST
//!   ↓
//! base        → LineIndex, Dialect, value parsers
//! ```
//!
//! `diagnostics` and `error` sit beside the stack: every layer above
//! `parser` reports through them.

// ============================================================================
// MODULES (dependency order: base → parser → symbols → policy → model → lower → batch)
// ============================================================================

/// Foundation types: line index, dialect defaults, communities and AS numbers
pub mod base;

/// Parser: logos lexer, outline parser, typed CST wrappers
pub mod parser;

/// Warnings, warning codes and the shared cross-thread sink
pub mod diagnostics;

/// Contract violations that abort one file
pub mod error;

/// Structure registry
pub mod symbols;

/// Route-policy expression language
pub mod policy;

/// Vendor-neutral configuration model
pub mod model;

/// Tree-lowering driver
pub mod lower;

/// Parallel lowering of many files
pub mod batch;

// Re-export the entry points
pub use batch::{BatchReport, ConfigSource, FileOutcome, lower_batch, lower_batch_into};
pub use lower::{LowerOptions, LowerOutput, lower_source, lower_tree};

// Re-export foundation types
pub use base::{Dialect, LineIndex, TextRange, TextSize};
pub use diagnostics::{SharedSink, Warning, WarningKind, Warnings};
pub use error::LowerError;
pub use model::Configuration;
