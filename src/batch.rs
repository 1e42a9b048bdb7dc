//! Lower many configuration files in parallel.
//!
//! Each file is lowered by one rayon worker, start to finish; nothing
//! inside a file runs in parallel. A file that breaks an internal contract
//! fails on its own and the rest of the batch carries on.
//!
//! Two ways to collect warnings:
//!
//! - [`lower_batch`] keeps each file's warnings inside its [`LowerOutput`]
//!   and merges them into the report after the workers finish.
//! - [`lower_batch_into`] has every worker append to a [`SharedSink`] as
//!   soon as its file is done.

use std::sync::Arc;

use rayon::prelude::*;
use serde::Serialize;

use crate::diagnostics::{FileWarning, SharedSink};
use crate::error::LowerError;
use crate::lower::{LowerOptions, LowerOutput, lower_source};

/// One file to lower.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSource {
    pub name: String,
    pub text: String,
}

impl ConfigSource {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

/// The result of lowering one file.
#[derive(Debug, Clone)]
pub struct FileOutcome {
    pub file: String,
    pub result: Result<LowerOutput, LowerError>,
}

impl FileOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Counts over a whole batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub files: usize,
    pub lowered: usize,
    pub failed: usize,
    pub warnings: usize,
    pub unrecognized_files: usize,
}

/// Per-file outcomes in input order, plus every warning tagged with its file.
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub outcomes: Vec<FileOutcome>,
    pub warnings: Vec<FileWarning>,
}

impl BatchReport {
    pub fn summary(&self) -> BatchSummary {
        let lowered = self.outcomes.iter().filter(|o| o.is_ok()).count();
        BatchSummary {
            files: self.outcomes.len(),
            lowered,
            failed: self.outcomes.len() - lowered,
            warnings: self.warnings.len(),
            unrecognized_files: self
                .outcomes
                .iter()
                .filter(|o| o.result.as_ref().is_ok_and(|out| out.unrecognized))
                .count(),
        }
    }

    /// Outcomes that failed, with their errors.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &LowerError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.file.as_str(), e)))
    }
}

fn lower_one<F>(source: &ConfigSource, lower: &F) -> FileOutcome
where
    F: Fn(&ConfigSource) -> Result<LowerOutput, LowerError>,
{
    let result = lower(source);
    if let Err(error) = &result {
        tracing::warn!(file = %source.name, %error, "lowering failed");
    }
    FileOutcome {
        file: source.name.clone(),
        result,
    }
}

/// Lower every source in parallel, then merge warnings in input order.
pub fn lower_batch(sources: &[ConfigSource], options: &LowerOptions) -> BatchReport {
    run_batch(sources, |source| lower_source(&source.name, &source.text, options))
}

fn run_batch<F>(sources: &[ConfigSource], lower: F) -> BatchReport
where
    F: Fn(&ConfigSource) -> Result<LowerOutput, LowerError> + Sync,
{
    let outcomes: Vec<FileOutcome> = sources
        .par_iter()
        .map(|source| lower_one(source, &lower))
        .collect();

    let mut warnings = Vec::new();
    for outcome in &outcomes {
        let Ok(output) = &outcome.result else {
            continue;
        };
        let file: Arc<str> = Arc::from(outcome.file.as_str());
        warnings.extend(output.warnings.iter().map(|warning| FileWarning {
            file: file.clone(),
            warning: warning.clone(),
        }));
    }

    let report = BatchReport { outcomes, warnings };
    let summary = report.summary();
    tracing::info!(
        files = summary.files,
        failed = summary.failed,
        warnings = summary.warnings,
        "batch lowered"
    );
    report
}

/// Lower every source in parallel, each worker appending its warnings to
/// `sink` when its file finishes. Outcomes come back in input order.
pub fn lower_batch_into(
    sources: &[ConfigSource],
    options: &LowerOptions,
    sink: &SharedSink,
) -> Vec<FileOutcome> {
    sources
        .par_iter()
        .map(|source| {
            let outcome = lower_one(source, &|source: &ConfigSource| {
                lower_source(&source.name, &source.text, options)
            });
            if let Ok(output) = &outcome.result {
                sink.extend(&outcome.file, &output.warnings);
            }
            outcome
        })
        .collect()
}
