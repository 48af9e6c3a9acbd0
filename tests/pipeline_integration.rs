use std::collections::HashMap;

use fragscore::{
    score_records, score_records_with_config, AggregateConfig, ContributionConfig,
    FragmentCounts, FragmentExtractor, FragmentId, FragscoreConfig, InvalidRecordPolicy,
    PipelineError,
};

/// Stand-in for a fingerprinting toolkit: a lookup table from structure
/// string to its fragment multiset. Unknown structures fail to "parse".
struct TableFingerprinter {
    table: HashMap<&'static str, Vec<(u64, u64)>>,
}

impl TableFingerprinter {
    fn new() -> Self {
        let mut table = HashMap::new();
        // Atom-environment hashes in the style of radius-2 Morgan fingerprints.
        table.insert("CCO", vec![(2246728737, 2), (864662311, 1), (1016841875, 1)]);
        table.insert("CC", vec![(2246728737, 2)]);
        table.insert("CO", vec![(2246728737, 1), (864662311, 1)]);
        table.insert("CCC", vec![(2246728737, 2), (2245384272, 1)]);
        Self { table }
    }
}

impl FragmentExtractor<&str> for TableFingerprinter {
    type Error = String;

    fn extract(&self, smiles: &&str) -> Result<FragmentCounts, String> {
        self.table
            .get(*smiles)
            .map(|pairs| pairs.iter().copied().collect())
            .ok_or_else(|| format!("cannot parse structure {smiles}"))
    }
}

#[test]
fn structures_to_scores_end_to_end() {
    let run = score_records(
        ["CCO", "CC", "CO", "CCC", "C1CC", ""],
        &TableFingerprinter::new(),
        &AggregateConfig::default(),
        &ContributionConfig::default(),
        InvalidRecordPolicy::Skip,
    )
    .expect("pipeline should succeed");

    assert_eq!(run.records_seen, 6);
    assert_eq!(run.records_skipped, 2);

    let report = &run.report;
    // CH3 environment: 2 + 2 + 1 + 2 = 7, OH: 2, others 1 each; total 11.
    assert_eq!(report.total, 11);
    assert_eq!(report.distinct_fragments, 4);
    // 7 < 8.8 <= 9 -> the two most common environments form the frequent set.
    assert_eq!(report.frequent_count, 2);
    assert_eq!(
        report.frequent,
        vec![FragmentId(2246728737), FragmentId(864662311)]
    );
    assert_eq!(report.score(FragmentId(864662311)), Some(0.0));
    assert!(report.score(FragmentId(1016841875)).unwrap() < 0.0);
    assert_eq!(report.top_n(1)[0].0, FragmentId(2246728737));
}

#[test]
fn strict_policy_stops_on_unparseable_structure() {
    let result = score_records(
        ["CCO", "not-a-smiles", "CC"],
        &TableFingerprinter::new(),
        &AggregateConfig::default(),
        &ContributionConfig::default(),
        InvalidRecordPolicy::Fail,
    );

    assert_eq!(
        result,
        Err(PipelineError::Extraction {
            index: 1,
            message: "cannot parse structure not-a-smiles".to_string(),
        })
    );
}

#[test]
fn yaml_config_drives_the_pipeline() {
    let config = FragscoreConfig::from_yaml(
        r#"
version: "1.0"
contribution:
  frequent_fraction: 1.0
  include_frequent_set: false
pipeline:
  invalid_records: "skip"
"#,
    )
    .expect("valid config");

    let run = score_records_with_config(
        ["CCO", "CCC", "bogus"],
        &TableFingerprinter::new(),
        &config,
    )
    .expect("pipeline should succeed");

    assert_eq!(run.records_skipped, 1);
    assert_eq!(run.report.frequent_count, run.report.distinct_fragments);
    assert!(run.report.frequent.is_empty());
    assert_eq!(run.report.meta.frequent_fraction, 1.0);
}

#[test]
fn closure_extractor_over_json_lines() {
    let lines = vec![
        r#"{"1": 3, "2": 1}"#.to_string(),
        "garbage".to_string(),
        r#"{"1": 1, "3": 0}"#.to_string(),
    ];
    let parse = |line: &String| serde_json::from_str::<FragmentCounts>(line);

    let run = score_records(
        lines,
        &parse,
        &AggregateConfig::default(),
        &ContributionConfig::default(),
        InvalidRecordPolicy::Skip,
    )
    .expect("pipeline should succeed");

    assert_eq!(run.records_skipped, 1);
    assert_eq!(run.report.total, 5);
    assert_eq!(run.report.distinct_fragments, 2);
    assert_eq!(run.report.to_tsv(), format!("1\t{}\n2\t0\n", 4f64.ln()));
}
