//! Lowering helpers and warning assertions.

use routecfg::{Dialect, LowerOptions, LowerOutput, Warning, WarningKind, lower_source};

/// Lower `text` with default options, failing the test on a lowering error.
pub fn lower(text: &str) -> LowerOutput {
    lower_with(text, &LowerOptions::default())
}

pub fn lower_with(text: &str, options: &LowerOptions) -> LowerOutput {
    match lower_source("test.cfg", text, options) {
        Ok(output) => output,
        Err(error) => panic!("lowering failed: {error}"),
    }
}

pub fn lower_as(text: &str, dialect: Dialect) -> LowerOutput {
    lower_with(text, &LowerOptions::new(dialect))
}

/// Warnings of one kind.
pub fn warnings_of(output: &LowerOutput, kind: WarningKind) -> Vec<&Warning> {
    output.warnings.of_kind(kind).collect()
}

/// Red flags carrying `code`.
pub fn red_flags_with_code<'a>(output: &'a LowerOutput, code: &str) -> Vec<&'a Warning> {
    output
        .warnings
        .of_kind(WarningKind::RedFlag)
        .filter(|w| w.code == Some(code))
        .collect()
}

/// Assert lowering produced no red flags.
pub fn assert_no_red_flags(output: &LowerOutput) {
    let flags = warnings_of(output, WarningKind::RedFlag);
    assert!(
        flags.is_empty(),
        "Expected no red flags, got {}:\n{}",
        flags.len(),
        flags
            .iter()
            .map(|w| format!("  Line {:?}: {}", w.line, w.message))
            .collect::<Vec<_>>()
            .join("\n")
    );
}
