//! Symbol/structure registry.
//!
//! Every named configuration object (ACL, route-map, interface, ...) is
//! keyed by `(StructureType, name)`. The driver calls
//! [`StructureRegistry::define`] once per physical line of a defining block
//! and [`StructureRegistry::reference`] wherever another construct names the
//! object. After the walk the registry answers undefined/unused queries.
//!
//! # Module structure
//!
//! - [`types`]: structure types, usage kinds, duplicate policy
//! - [`registry`]: the accumulator and its snapshot

mod registry;
mod types;

pub use registry::{RegistrySnapshot, StructureReference, StructureRegistry, UnusedStructure};
pub use types::{DuplicatePolicy, StructureType, StructureUsage};
