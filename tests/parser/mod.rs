//! Parser tests
//!
//! Outline structure and losslessness of the rowan tree.

pub mod tests_outline;
