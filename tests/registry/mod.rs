//! Registry tests
//!
//! Definitions and references recorded while lowering, and the
//! undefined/unused queries over them.

pub mod tests_references;
