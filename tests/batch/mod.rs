//! Batch tests
//!
//! Parallel lowering of many files and warning aggregation.

pub mod tests_batch;
