//! Route-policy tests
//!
//! Policies and named sets lowered from whole configurations.

pub mod tests_route_policy;
