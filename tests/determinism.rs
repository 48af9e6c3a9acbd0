use fragscore::{
    score_fragment_counts, AggregateConfig, ContributionConfig, FragmentCounts, FragmentId,
};

fn library() -> Vec<FragmentCounts> {
    (0u64..200)
        .map(|i| {
            [(i % 7, 3), (i % 13, 1), (100 + i % 3, 2), (2246728737, 1)]
                .into_iter()
                .collect()
        })
        .collect()
}

#[test]
fn repeated_runs_are_exactly_equal() {
    let agg_cfg = AggregateConfig::default();
    let cfg = ContributionConfig::default();

    let first = score_fragment_counts(library(), &agg_cfg, &cfg).expect("first run");
    let second = score_fragment_counts(library(), &agg_cfg, &cfg).expect("second run");

    assert_eq!(first.scores, second.scores);
    assert_eq!(first.frequent, second.frequent);
    assert_eq!(first.to_tsv(), second.to_tsv());
}

#[test]
fn record_order_does_not_change_scores() {
    let agg_cfg = AggregateConfig::default();
    let cfg = ContributionConfig::default();

    let forward = score_fragment_counts(library(), &agg_cfg, &cfg).expect("forward");
    let mut reversed_records = library();
    reversed_records.reverse();
    let reversed = score_fragment_counts(reversed_records, &agg_cfg, &cfg).expect("reversed");

    assert_eq!(forward.scores, reversed.scores);
    assert_eq!(forward.frequent, reversed.frequent);
}

#[test]
fn parallel_and_sequential_runs_agree() {
    let cfg = ContributionConfig::default();
    let sequential =
        score_fragment_counts(library(), &AggregateConfig::default(), &cfg).expect("sequential");
    let parallel = score_fragment_counts(
        library(),
        &AggregateConfig::new()
            .with_parallel(true)
            .with_min_parallel_records(1),
        &cfg,
    )
    .expect("parallel");

    assert_eq!(sequential, parallel);
}

#[test]
fn ties_at_the_boundary_resolve_by_fragment_id() {
    // 30 + 30 + 30 = 90 >= 80 after three of the four tied fragments.
    let counts: FragmentCounts = [(40u64, 30), (10u64, 30), (30u64, 30), (20u64, 10)]
        .into_iter()
        .collect();
    let report = score_fragment_counts(
        vec![counts],
        &AggregateConfig::default(),
        &ContributionConfig::default(),
    )
    .expect("scoring");

    assert_eq!(
        report.frequent,
        vec![FragmentId(10), FragmentId(30), FragmentId(40)]
    );
}
