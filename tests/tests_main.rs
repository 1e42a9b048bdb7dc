#[path = "helpers/mod.rs"]
mod helpers;

#[path = "batch/mod.rs"]
mod batch;

#[path = "lower/mod.rs"]
mod lower;

#[path = "parser/mod.rs"]
mod parser;

#[path = "policy/mod.rs"]
mod policy;

#[path = "registry/mod.rs"]
mod registry;
