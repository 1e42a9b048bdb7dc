//! Definition and reference accumulator.
//!
//! The registry is filled during the walk and only queried once the walk is
//! over, since a file may name a structure before defining it.

use std::collections::BTreeSet;
use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use serde::Serialize;
use smol_str::SmolStr;

use crate::diagnostics::{Warning, codes};

use super::types::{StructureType, StructureUsage};

/// One place a structure is named.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct StructureReference {
    pub structure_type: StructureType,
    pub name: SmolStr,
    pub usage: StructureUsage,
    pub line: u32,
}

/// A definition nobody references.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UnusedStructure {
    pub structure_type: StructureType,
    pub name: SmolStr,
    pub lines: Vec<u32>,
}

/// Records structure definitions and references for one file.
#[derive(Clone, Debug, Default)]
pub struct StructureRegistry {
    definitions: IndexMap<(StructureType, SmolStr), BTreeSet<u32>>,
    references: Vec<StructureReference>,
}

impl StructureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `line` to the definition set of `(ty, name)`. Idempotent per line.
    pub fn define(&mut self, ty: StructureType, name: &str, line: u32) {
        self.definitions
            .entry((ty, SmolStr::new(name)))
            .or_default()
            .insert(line);
    }

    /// Forget every definition of `(ty, name)`, as `no route-map NAME` does.
    /// References already recorded stay and are checked after the walk.
    pub fn undefine(&mut self, ty: StructureType, name: &str) {
        self.definitions.shift_remove(&(ty, SmolStr::new(name)));
    }

    /// Record a use of `(ty, name)`. No definition is required yet.
    pub fn reference(&mut self, ty: StructureType, name: &str, usage: StructureUsage, line: u32) {
        self.references.push(StructureReference {
            structure_type: ty,
            name: SmolStr::new(name),
            usage,
            line,
        });
    }

    /// Whether a reference of type `ty` to `name` is satisfied.
    pub fn is_defined(&self, ty: StructureType, name: &str) -> bool {
        if self.definitions.contains_key(&(ty, SmolStr::new(name))) {
            return true;
        }
        ty.concrete_types()
            .iter()
            .any(|c| self.definitions.contains_key(&(*c, SmolStr::new(name))))
    }

    /// Every `(type, name)` definition some reference would be satisfied
    /// by, abstract reference types expanded to their concrete types.
    fn referenced_definitions(&self) -> FxHashSet<(StructureType, &str)> {
        let mut referenced = FxHashSet::default();
        for r in &self.references {
            referenced.insert((r.structure_type, r.name.as_str()));
            for concrete in r.structure_type.concrete_types() {
                referenced.insert((*concrete, r.name.as_str()));
            }
        }
        referenced
    }

    /// Lines defining `(ty, name)`, if defined.
    pub fn definition_lines(&self, ty: StructureType, name: &str) -> Option<&BTreeSet<u32>> {
        self.definitions.get(&(ty, SmolStr::new(name)))
    }

    pub fn references(&self) -> &[StructureReference] {
        &self.references
    }

    pub fn definition_count(&self) -> usize {
        self.definitions.len()
    }

    /// Every reference with no satisfying definition, once per distinct
    /// (type, name, usage, line), in recording order.
    pub fn undefined_references(&self) -> Vec<StructureReference> {
        let mut seen = BTreeSet::new();
        self.references
            .iter()
            .filter(|r| !self.is_defined(r.structure_type, &r.name))
            .filter(|r| seen.insert((*r).clone()))
            .cloned()
            .collect()
    }

    /// Every definition with no reference, skipping implicitly used types.
    pub fn unused_structures(&self) -> Vec<UnusedStructure> {
        let referenced = self.referenced_definitions();
        self.definitions
            .iter()
            .filter(|((ty, name), _)| !ty.is_implicitly_used(name))
            .filter(|((ty, name), _)| !referenced.contains(&(*ty, name.as_str())))
            .map(|((ty, name), lines)| UnusedStructure {
                structure_type: *ty,
                name: name.clone(),
                lines: lines.iter().copied().collect(),
            })
            .collect()
    }

    /// Freeze the query results for downstream linting.
    pub fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot {
            undefined_references: self.undefined_references(),
            unused_structures: self.unused_structures(),
        }
    }
}

// ============================================================================
// SNAPSHOT
// ============================================================================

/// Registry query results after a full walk.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RegistrySnapshot {
    pub undefined_references: Vec<StructureReference>,
    pub unused_structures: Vec<UnusedStructure>,
}

impl RegistrySnapshot {
    pub fn is_clean(&self) -> bool {
        self.undefined_references.is_empty() && self.unused_structures.is_empty()
    }

    /// Render both lists as coded warnings.
    pub fn diagnostics(&self) -> Vec<Warning> {
        let undefined = self.undefined_references.iter().map(|r| {
            Warning::red_flag(format!(
                "undefined reference to {} '{}' ({})",
                r.structure_type, r.name, r.usage
            ))
            .with_line(r.line)
            .with_code(codes::UNDEFINED_REFERENCE)
        });
        let unused = self.unused_structures.iter().map(|u| {
            let message: Arc<str> =
                format!("{} '{}' is defined but never used", u.structure_type, u.name).into();
            let warning = Warning::pedantic(message).with_code(codes::UNUSED_STRUCTURE);
            match u.lines.first() {
                Some(line) => warning.with_line(*line),
                None => warning,
            }
        });
        undefined.chain(unused).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_define_is_idempotent_per_line() {
        let mut registry = StructureRegistry::new();
        registry.define(StructureType::RouteMap, "RM", 3);
        registry.define(StructureType::RouteMap, "RM", 3);
        registry.define(StructureType::RouteMap, "RM", 4);
        let lines = registry.definition_lines(StructureType::RouteMap, "RM").unwrap();
        assert_eq!(lines.iter().copied().collect::<Vec<_>>(), vec![3, 4]);
    }

    #[test]
    fn test_undefine_forgets_every_line() {
        let mut registry = StructureRegistry::new();
        registry.define(StructureType::PrefixList, "PL", 1);
        registry.define(StructureType::PrefixList, "PL", 2);
        registry.undefine(StructureType::PrefixList, "PL");
        assert!(!registry.is_defined(StructureType::PrefixList, "PL"));
        assert_eq!(registry.definition_count(), 0);
    }

    #[test]
    fn test_forward_reference_is_not_undefined() {
        let mut registry = StructureRegistry::new();
        registry.reference(
            StructureType::Ipv4AccessList,
            "AL1",
            StructureUsage::RouteMapMatchIpAccessList,
            2,
        );
        registry.define(StructureType::Ipv4AccessListStandard, "AL1", 9);
        assert!(registry.undefined_references().is_empty());
        assert!(registry.unused_structures().is_empty());
    }

    #[test]
    fn test_undefined_reported_once_per_line() {
        let mut registry = StructureRegistry::new();
        for line in [5, 5, 6] {
            registry.reference(
                StructureType::RouteMap,
                "MISSING",
                StructureUsage::BgpNeighborRouteMapIn,
                line,
            );
        }
        let undefined = registry.undefined_references();
        assert_eq!(undefined.len(), 2);
        assert_eq!(undefined[0].line, 5);
        assert_eq!(undefined[1].line, 6);
    }

    #[test]
    fn test_unused_skips_implicit() {
        let mut registry = StructureRegistry::new();
        registry.define(StructureType::Interface, "Loopback0", 1);
        registry.define(StructureType::AaaLoginList, "default", 2);
        registry.define(StructureType::PrefixList, "PL", 3);
        let unused = registry.unused_structures();
        assert_eq!(unused.len(), 1);
        assert_eq!(unused[0].name, "PL");
        assert_eq!(unused[0].lines, vec![3]);
    }

    #[test]
    fn test_snapshot_diagnostics_codes() {
        let mut registry = StructureRegistry::new();
        registry.define(StructureType::PrefixList, "PL", 3);
        registry.reference(
            StructureType::RouteMap,
            "RM",
            StructureUsage::BgpNeighborRouteMapOut,
            8,
        );
        let warnings = registry.snapshot().diagnostics();
        let codes: Vec<_> = warnings.iter().map(|w| w.code).collect();
        assert_eq!(codes, vec![Some("E0001"), Some("W0001")]);
        assert_eq!(warnings[0].line, Some(8));
    }
}
