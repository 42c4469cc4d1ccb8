//! Group 3: Artifact encode/decode benchmarks (JSON, CBOR, zstd).
#![allow(clippy::expect_used)]

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use hetsplit_bench::{SizeTier, generate_tables};
use hetsplit_core::{
    Artifact, DEFAULT_MAX_ARTIFACT_SIZE, Encoding, SplitConfig, TableColumns, build_graph,
    decode_artifact, encode_artifact, fingerprint, resolve_reverse, split,
};

const TIERS: [(&str, SizeTier); 3] = [
    ("S", SizeTier::Small),
    ("M", SizeTier::Medium),
    ("L", SizeTier::Large),
];

const FORMATS: [(&str, Encoding, bool); 4] = [
    ("json", Encoding::Json, false),
    ("cbor", Encoding::Cbor, false),
    ("json_zstd", Encoding::Json, true),
    ("cbor_zstd", Encoding::Cbor, true),
];

/// The train split: the largest artifact a pipeline run writes after the
/// full graph, carrying both structure and supervision.
fn train_artifact(tier: SizeTier) -> Artifact {
    let tables = generate_tables(&tier.config(42)).expect("tables");
    let (graph, _) =
        build_graph(&tables.nodes, &tables.edges, &TableColumns::default()).expect("builds");
    let pairing = resolve_reverse(graph.relation_triplets());
    let output = split(&graph, &pairing, &SplitConfig::default()).expect("splits");
    Artifact::Split(output.train)
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    for (name, tier) in TIERS {
        let artifact = train_artifact(tier);
        for (label, encoding, compress) in FORMATS {
            let len = encode_artifact(&artifact, encoding, compress)
                .expect("encode")
                .len() as u64;
            group.throughput(Throughput::Bytes(len));
            group.bench_with_input(BenchmarkId::new(label, name), &artifact, |b, a| {
                b.iter(|| {
                    let _ = encode_artifact(a, encoding, compress).expect("encode");
                });
            });
        }
    }
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    for (name, tier) in TIERS {
        let artifact = train_artifact(tier);
        for (label, encoding, compress) in FORMATS {
            let bytes = encode_artifact(&artifact, encoding, compress).expect("encode");
            group.throughput(Throughput::Bytes(bytes.len() as u64));
            group.bench_with_input(BenchmarkId::new(label, name), &bytes, |b, bytes| {
                b.iter(|| {
                    let _ = decode_artifact(bytes, DEFAULT_MAX_ARTIFACT_SIZE).expect("decode");
                });
            });
        }
    }
    group.finish();
}

fn bench_fingerprint(c: &mut Criterion) {
    let mut group = c.benchmark_group("fingerprint");
    for (name, tier) in TIERS {
        let artifact = train_artifact(tier);
        group.bench_with_input(BenchmarkId::new("sha256", name), &artifact, |b, a| {
            b.iter(|| {
                let _ = fingerprint(a).expect("fingerprint");
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode, bench_fingerprint);
criterion_main!(benches);
