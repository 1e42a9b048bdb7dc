//! Diagnostics: conversion warnings.
//!
//! Everything that goes wrong while lowering a file, short of a broken
//! internal contract, is recorded here as a [`Warning`] and lowering carries
//! on. Callers decide whether warnings gate downstream use.

use std::collections::BTreeSet;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;

// ============================================================================
// WARNING TYPES
// ============================================================================

/// Category of a conversion warning.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WarningKind {
    /// A line the grammar could not classify.
    Unrecognized,
    /// A recognized construct that is not translated yet.
    Todo,
    /// A soft semantic anomaly: duplicates, collisions, bad values.
    RedFlag,
    /// Noise that is only interesting when asked for.
    Pedantic,
}

impl WarningKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningKind::Unrecognized => "unrecognized",
            WarningKind::Todo => "todo",
            WarningKind::RedFlag => "red-flag",
            WarningKind::Pedantic => "pedantic",
        }
    }
}

/// A conversion warning with location.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Warning {
    pub kind: WarningKind,
    /// 1-based line, when the warning is tied to one.
    pub line: Option<u32>,
    /// Raw source text of the offending line.
    pub text: Option<Arc<str>>,
    /// Warning code (e.g., "W0010").
    pub code: Option<&'static str>,
    pub message: Arc<str>,
}

impl Warning {
    fn new(kind: WarningKind, message: impl Into<Arc<str>>) -> Self {
        Self {
            kind,
            line: None,
            text: None,
            code: None,
            message: message.into(),
        }
    }

    /// A line nothing could make sense of.
    pub fn unrecognized(line: u32, text: impl Into<Arc<str>>) -> Self {
        let text = text.into();
        Self::new(
            WarningKind::Unrecognized,
            format!("Line {line} unrecognized: {text}"),
        )
        .with_line(line)
        .with_text(text)
        .with_code(codes::UNRECOGNIZED_LINE)
    }

    /// A construct that is understood but not translated.
    pub fn todo(feature: &str) -> Self {
        Self::new(WarningKind::Todo, format!("Unimplemented feature: {feature}"))
            .with_code(codes::UNSUPPORTED_FEATURE)
    }

    pub fn red_flag(message: impl Into<Arc<str>>) -> Self {
        Self::new(WarningKind::RedFlag, message)
    }

    pub fn pedantic(message: impl Into<Arc<str>>) -> Self {
        Self::new(WarningKind::Pedantic, message)
    }

    pub fn with_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_text(mut self, text: impl Into<Arc<str>>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_code(mut self, code: &'static str) -> Self {
        self.code = Some(code);
        self
    }
}

// ============================================================================
// WARNING CODES
// ============================================================================

/// Stable warning codes.
///
/// ## Code Ranges
///
/// - **E0001-E0099**: Cross-reference errors reported after the walk
/// - **W0001-W0009**: Cross-reference warnings reported after the walk
/// - **W0010-W0099**: Conversion warnings recorded during the walk
#[allow(dead_code)]
pub mod codes {
    /// Reference to a structure that is never defined.
    pub const UNDEFINED_REFERENCE: &str = "E0001";

    /// Structure defined but never referenced.
    pub const UNUSED_STRUCTURE: &str = "W0001";

    /// Line the grammar could not classify.
    pub const UNRECOGNIZED_LINE: &str = "W0010";
    /// Recognized construct that is not translated.
    pub const UNSUPPORTED_FEATURE: &str = "W0011";
    /// Structure or clause defined more than once.
    pub const DUPLICATE_DEFINITION: &str = "W0012";
    /// Neighbor statement naming a peer that was never declared.
    pub const UNDECLARED_PEER: &str = "W0013";
    /// Number, address or keyword that does not parse.
    pub const INVALID_VALUE: &str = "W0014";
    /// Statement typed under a scope where it means nothing.
    pub const MISPLACED_STATEMENT: &str = "W0015";
    /// Route-policy statement that degraded to a comment.
    pub const POLICY_STATEMENT_DEGRADED: &str = "W0016";
}

// ============================================================================
// WARNING COLLECTOR
// ============================================================================

/// Collects warnings during lowering of one file.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Warnings {
    warnings: Vec<Warning>,
    unimplemented_features: BTreeSet<String>,
}

impl Warnings {
    /// Create a new empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a warning.
    pub fn add(&mut self, warning: Warning) {
        match warning.kind {
            WarningKind::RedFlag => tracing::warn!(line = ?warning.line, "{}", warning.message),
            _ => tracing::debug!(
                kind = warning.kind.as_str(),
                line = ?warning.line,
                "{}",
                warning.message
            ),
        }
        self.warnings.push(warning);
    }

    /// Record a recognized but untranslated construct.
    pub fn todo(&mut self, line: u32, text: &str, feature: &str) {
        self.unimplemented_features.insert(feature.to_string());
        self.add(Warning::todo(feature).with_line(line).with_text(text));
    }

    pub fn red_flag(&mut self, line: u32, message: impl Into<Arc<str>>) {
        self.add(Warning::red_flag(message).with_line(line));
    }

    pub fn iter(&self) -> impl Iterator<Item = &Warning> {
        self.warnings.iter()
    }

    pub fn of_kind(&self, kind: WarningKind) -> impl Iterator<Item = &Warning> {
        self.warnings.iter().filter(move |w| w.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Features logged through [`Warnings::todo`], deduplicated.
    pub fn unimplemented_features(&self) -> &BTreeSet<String> {
        &self.unimplemented_features
    }

    pub fn into_vec(self) -> Vec<Warning> {
        self.warnings
    }
}

// ============================================================================
// SHARED SINK
// ============================================================================

/// A warning tagged with the file it came from.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FileWarning {
    pub file: Arc<str>,
    pub warning: Warning,
}

/// Thread-safe warning sink shared by parallel workers.
#[derive(Clone, Debug, Default)]
pub struct SharedSink {
    inner: Arc<Mutex<Vec<FileWarning>>>,
}

impl SharedSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append every warning of one file.
    pub fn extend(&self, file: &str, warnings: &Warnings) {
        let file: Arc<str> = Arc::from(file);
        let mut guard = self.inner.lock();
        guard.extend(warnings.iter().map(|w| FileWarning {
            file: file.clone(),
            warning: w.clone(),
        }));
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Take everything collected so far, leaving the sink empty.
    pub fn drain(&self) -> Vec<FileWarning> {
        std::mem::take(&mut *self.inner.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unrecognized_carries_line_and_text() {
        let warning = Warning::unrecognized(7, "bogus command");
        assert_eq!(warning.kind, WarningKind::Unrecognized);
        assert_eq!(warning.line, Some(7));
        assert_eq!(warning.text.as_deref(), Some("bogus command"));
        assert_eq!(&*warning.message, "Line 7 unrecognized: bogus command");
    }

    #[test]
    fn test_todo_tracks_feature_once() {
        let mut warnings = Warnings::new();
        warnings.todo(1, "ip nat inside", "ip nat");
        warnings.todo(2, "ip nat outside", "ip nat");
        assert_eq!(warnings.len(), 2);
        assert_eq!(warnings.unimplemented_features().len(), 1);
    }

    #[test]
    fn test_shared_sink_tags_file() {
        let sink = SharedSink::new();
        let mut warnings = Warnings::new();
        warnings.red_flag(3, "duplicate");
        sink.extend("r1.cfg", &warnings);
        let drained = sink.drain();
        assert_eq!(drained.len(), 1);
        assert_eq!(&*drained[0].file, "r1.cfg");
        assert!(sink.is_empty());
    }
}
