//! Batch lowering tests.

use routecfg::{ConfigSource, LowerOptions, SharedSink, lower_batch, lower_batch_into};

use crate::helpers::config_fixtures::{
    BGP_UNDECLARED_NEIGHBOR, DUPLICATE_ROUTE_MAP_CLAUSE, FORWARD_REFERENCE, HOSTNAME_ONLY,
    OSPF_AREA_ASSIGNMENT, UNTERMINATED_QUOTE,
};

fn sources(count: usize) -> Vec<ConfigSource> {
    let texts = [
        HOSTNAME_ONLY,
        FORWARD_REFERENCE,
        DUPLICATE_ROUTE_MAP_CLAUSE,
        BGP_UNDECLARED_NEIGHBOR,
        OSPF_AREA_ASSIGNMENT,
        UNTERMINATED_QUOTE,
    ];
    (0..count)
        .map(|i| ConfigSource::new(format!("r{i}.cfg"), texts[i % texts.len()]))
        .collect()
}

#[test]
fn test_one_outcome_per_file_in_order() {
    let inputs = sources(24);
    let report = lower_batch(&inputs, &LowerOptions::default());
    assert_eq!(report.outcomes.len(), 24);
    for (input, outcome) in inputs.iter().zip(&report.outcomes) {
        assert_eq!(input.name, outcome.file);
        assert!(outcome.is_ok());
    }
    assert_eq!(report.failures().count(), 0);
}

#[test]
fn test_summary_counts() {
    let report = lower_batch(&sources(6), &LowerOptions::default());
    let summary = report.summary();
    assert_eq!(summary.files, 6);
    assert_eq!(summary.lowered, 6);
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.unrecognized_files, 1);
    assert_eq!(summary.warnings, report.warnings.len());
}

#[test]
fn test_batch_matches_single_file_lowering() {
    let inputs = sources(6);
    let report = lower_batch(&inputs, &LowerOptions::default());
    for (input, outcome) in inputs.iter().zip(&report.outcomes) {
        let single = routecfg::lower_source(&input.name, &input.text, &LowerOptions::default())
            .unwrap();
        let batched = outcome.result.as_ref().unwrap();
        assert_eq!(single.configuration, batched.configuration);
        assert_eq!(single.warnings.len(), batched.warnings.len());
    }
}

#[test]
fn test_merged_warnings_keep_file_order() {
    let report = lower_batch(&sources(6), &LowerOptions::default());
    let files: Vec<&str> = report.warnings.iter().map(|w| &*w.file).collect();
    let mut sorted = files.clone();
    sorted.sort_by_key(|f| f[1..f.len() - 4].parse::<usize>().unwrap());
    assert_eq!(files, sorted);
}

#[test]
fn test_shared_sink_receives_every_warning() {
    let inputs = sources(12);
    let sink = SharedSink::new();
    let outcomes = lower_batch_into(&inputs, &LowerOptions::default(), &sink);
    assert_eq!(outcomes.len(), 12);

    let expected: usize = outcomes
        .iter()
        .filter_map(|o| o.result.as_ref().ok())
        .map(|out| out.warnings.len())
        .sum();
    assert_eq!(sink.len(), expected);
    let drained = sink.drain();
    assert_eq!(drained.len(), expected);
    assert!(sink.is_empty());
}

#[test]
fn test_empty_batch() {
    let report = lower_batch(&[], &LowerOptions::default());
    assert!(report.outcomes.is_empty());
    assert_eq!(report.summary().files, 0);
}
