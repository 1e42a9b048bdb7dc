//! Tree-lowering driver.
//!
//! ```text
//! SourceFile (outline CST)
//!     ↓
//! [Lowerer] single depth-first walk, scope push/pop per block
//!     ↓
//! Configuration + Warnings + StructureRegistry
//! ```
//!
//! Each block handler dispatches on its lines' words with slice patterns.
//! Lines with no handler are skipped. Lines that are understood but not
//! translated are recorded as todo warnings. Malformed values become red
//! flags and the line is skipped. Only a broken internal contract, such as
//! popping an empty scope stack, aborts the file.

mod acl;
mod bgp;
mod context;
mod global;
mod helpers;
mod igp;
mod interface;
mod lists;
mod management;
mod object_group;
mod ospf;
mod route_map;
mod route_policy;
mod static_route;

use serde::Serialize;

use crate::base::{Dialect, LineIndex};
use crate::diagnostics::Warnings;
use crate::error::{LowerError, Result};
use crate::model::Configuration;
use crate::parser::{AstNode, Item, Parse, SourceFile, parse};
use crate::symbols::{RegistrySnapshot, StructureRegistry};

pub use context::{LowerContext, PeerScope, ScopeStack, ScopeStats};

// ============================================================================
// OPTIONS AND OUTPUT
// ============================================================================

/// Per-run settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LowerOptions {
    pub dialect: Dialect,
    /// Record pedantic warnings.
    pub pedantic: bool,
    /// Also file every unrecognized line as a red flag.
    pub unrecognized_as_red_flag: bool,
}

impl LowerOptions {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            ..Self::default()
        }
    }

    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn with_pedantic(mut self, pedantic: bool) -> Self {
        self.pedantic = pedantic;
        self
    }

    pub fn with_unrecognized_as_red_flag(mut self, enabled: bool) -> Self {
        self.unrecognized_as_red_flag = enabled;
        self
    }
}

/// Everything lowering one file produces.
#[derive(Debug, Clone)]
pub struct LowerOutput {
    pub configuration: Configuration,
    pub warnings: Warnings,
    pub registry: StructureRegistry,
    /// Whether any line went unrecognized.
    pub unrecognized: bool,
    pub scope_stats: ScopeStats,
}

impl LowerOutput {
    /// Undefined references and unused structures.
    pub fn snapshot(&self) -> RegistrySnapshot {
        self.registry.snapshot()
    }
}

// ============================================================================
// ENTRY POINTS
// ============================================================================

/// Parse `text` and lower it.
pub fn lower_source(file: &str, text: &str, options: &LowerOptions) -> Result<LowerOutput> {
    let parse = parse(text);
    lower_tree(file, &parse, text, options)
}

/// Lower an already parsed tree. `text` must be the text it was parsed
/// from; it is used for line numbers.
pub fn lower_tree(
    file: &str,
    parse: &Parse,
    text: &str,
    options: &LowerOptions,
) -> Result<LowerOutput> {
    let root = parse.syntax();
    let kind = root.kind();
    let source =
        SourceFile::cast(root).ok_or_else(|| LowerError::InvalidRoot(format!("{kind:?}")))?;

    let mut lowerer = Lowerer::new(options, LineIndex::new(text));
    for item in source.items() {
        match item {
            Item::Stanza(stanza) => lowerer.lower_global(&stanza)?,
            Item::Error(error) => lowerer.unrecognized(&error),
        }
    }
    lowerer.finish(file)
}

// ============================================================================
// LOWERER
// ============================================================================

/// Walk state for one file.
pub(crate) struct Lowerer<'o> {
    options: &'o LowerOptions,
    line_index: LineIndex,
    config: Configuration,
    warnings: Warnings,
    registry: StructureRegistry,
    ctx: LowerContext,
}

impl<'o> Lowerer<'o> {
    fn new(options: &'o LowerOptions, line_index: LineIndex) -> Self {
        Self {
            options,
            line_index,
            config: Configuration::new(options.dialect),
            warnings: Warnings::new(),
            registry: StructureRegistry::new(),
            ctx: LowerContext::default(),
        }
    }

    fn dialect(&self) -> Dialect {
        self.options.dialect
    }

    fn finish(mut self, file: &str) -> Result<LowerOutput> {
        let scope_stats = self.ctx.finish()?;
        self.config.unimplemented_features = self.warnings.unimplemented_features().clone();
        tracing::info!(
            file,
            lines = self.line_index.line_count(),
            warnings = self.warnings.len(),
            "lowered configuration"
        );
        Ok(LowerOutput {
            unrecognized: self.config.unrecognized,
            configuration: self.config,
            warnings: self.warnings,
            registry: self.registry,
            scope_stats,
        })
    }
}
