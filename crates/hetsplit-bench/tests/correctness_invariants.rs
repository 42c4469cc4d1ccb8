//! Post-operation invariant tests using generated data.
#![allow(clippy::expect_used)]

use hetsplit_bench::correctness;
use hetsplit_bench::{SizeTier, generate_tables};
use hetsplit_core::{
    Artifact, Encoding, HeteroGraph, ReversePairing, SplitConfig, SplitOutput, TableColumns,
    build_graph, check_splits, resolve_reverse, split,
};

fn graph(tier: SizeTier, seed: u64) -> HeteroGraph {
    let tables = generate_tables(&tier.config(seed)).expect("tables");
    let (graph, _) =
        build_graph(&tables.nodes, &tables.edges, &TableColumns::default()).expect("builds");
    graph
}

fn split_with(graph: &HeteroGraph, config: &SplitConfig) -> (ReversePairing, SplitOutput) {
    let pairing = resolve_reverse(graph.relation_triplets());
    let output = split(graph, &pairing, config).expect("splits");
    (pairing, output)
}

#[test]
fn pairing_covers_generated_relations() {
    let g = graph(SizeTier::Medium, 42);
    let pairing = resolve_reverse(g.relation_triplets());
    correctness::check_pairing(&g, &pairing).expect("pairing invariants hold");
    // gda, indication, target, ppi
    assert_eq!(pairing.len(), 4);
}

#[test]
fn default_split_invariants() {
    let g = graph(SizeTier::Medium, 42);
    let (pairing, output) = split_with(&g, &SplitConfig::default());

    correctness::check_no_leakage(&output).expect("no leakage");
    correctness::check_negatives(&g, &output).expect("negatives valid");
    correctness::check_partition(&output).expect("partition exact");

    let report = check_splits(&g, output.splits(), &pairing);
    assert!(
        report.is_ok(),
        "integrity failures: {:?}",
        report.failures().collect::<Vec<_>>()
    );
    assert_eq!(report.checks(), 4 * 3 * 2);
}

#[test]
fn non_disjoint_split_invariants() {
    let g = graph(SizeTier::Small, 9);
    let config = SplitConfig {
        disjoint_train_ratio: 0.0,
        ..SplitConfig::default()
    };
    let (pairing, output) = split_with(&g, &config);
    correctness::check_no_leakage(&output).expect("no leakage");
    correctness::check_partition(&output).expect("partition exact");
    assert!(check_splits(&g, output.splits(), &pairing).is_ok());
}

#[test]
fn uneven_proportions_and_negative_ratio() {
    let g = graph(SizeTier::Small, 5);
    let config = SplitConfig {
        p_val: 0.15,
        p_test: 0.25,
        disjoint_train_ratio: 0.3,
        negative_ratio: 2.0,
        seed: 77,
    };
    let (pairing, output) = split_with(&g, &config);
    correctness::check_no_leakage(&output).expect("no leakage");
    correctness::check_negatives(&g, &output).expect("negatives valid");
    correctness::check_partition(&output).expect("partition exact");
    assert!(check_splits(&g, output.splits(), &pairing).is_ok());

    for summary in &output.summaries {
        assert_eq!(summary.negatives[1], 2 * summary.validation);
        assert_eq!(summary.negatives[2], 2 * summary.test);
    }
}

#[test]
fn split_is_deterministic_on_generated_data() {
    let g = graph(SizeTier::Small, 11);
    let config = SplitConfig {
        seed: 1234,
        ..SplitConfig::default()
    };
    let (_, a) = split_with(&g, &config);
    let (_, b) = split_with(&g, &config);
    assert_eq!(a.train, b.train);
    assert_eq!(a.val, b.val);
    assert_eq!(a.test, b.test);
    assert_eq!(a.summaries, b.summaries);
}

#[test]
fn artifacts_round_trip_in_every_encoding() {
    let g = graph(SizeTier::Small, 42);
    let (_, output) = split_with(&g, &SplitConfig::default());
    let artifacts = [
        Artifact::Graph(g),
        Artifact::Split(output.train),
        Artifact::Split(output.test),
    ];
    for artifact in &artifacts {
        for encoding in [Encoding::Json, Encoding::Cbor] {
            for compress in [false, true] {
                correctness::check_round_trip(artifact, encoding, compress)
                    .expect("round trip preserves the artifact");
            }
        }
    }
}
