//! Post-operation invariant checkers for correctness validation.

use std::collections::HashSet;

use hetsplit_core::{
    Artifact, DEFAULT_MAX_ARTIFACT_SIZE, Encoding, HeteroGraph, RelationTriplet, ReversePairing,
    SplitGraph, SplitOutput, Table, decode_artifact, encode_artifact, fingerprint,
};

type PairSet = HashSet<(usize, usize)>;

/// Verifies graph construction invariants against the source tables.
///
/// Every edge row becomes exactly one directed edge, every node row exactly
/// one node, and every index is in range for its endpoint type.
pub fn check_graph_invariants(
    nodes: &Table,
    edges: &Table,
    graph: &HeteroGraph,
) -> Result<(), String> {
    if graph.total_nodes() != nodes.len() {
        return Err(format!(
            "node count mismatch: graph={}, table={}",
            graph.total_nodes(),
            nodes.len()
        ));
    }
    if graph.total_edges() != edges.len() {
        return Err(format!(
            "edge count mismatch: graph={}, table={}",
            graph.total_edges(),
            edges.len()
        ));
    }
    for relation in graph.relations() {
        let t = &relation.triplet;
        let n_src = graph
            .node_count(&t.src)
            .ok_or_else(|| format!("{t}: unknown source type"))?;
        let n_dst = graph
            .node_count(&t.dst)
            .ok_or_else(|| format!("{t}: unknown destination type"))?;
        if let Some((s, d)) = relation
            .edges
            .pairs()
            .find(|&(s, d)| s >= n_src || d >= n_dst)
        {
            return Err(format!("{t}: edge ({s}, {d}) out of range"));
        }
    }
    Ok(())
}

/// Verifies that `pairing` covers every relation of `graph` and that each
/// pair swaps its endpoint types.
pub fn check_pairing(graph: &HeteroGraph, pairing: &ReversePairing) -> Result<(), String> {
    if pairing.forward.len() != pairing.reverse.len() {
        return Err("forward and reverse lists differ in length".to_owned());
    }
    let mut covered: HashSet<&RelationTriplet> = HashSet::new();
    for (forward, reverse) in pairing.pairs() {
        if *reverse != forward.reversed() {
            return Err(format!("{reverse} is not the reverse of {forward}"));
        }
        covered.insert(forward);
        covered.insert(reverse);
    }
    if let Some(missing) = graph.relation_triplets().find(|t| !covered.contains(t)) {
        return Err(format!("{missing} is not covered by the pairing"));
    }
    Ok(())
}

/// Verifies that no supervision edge leaks into an earlier split's view.
///
/// For each supervised relation: train, validation and test positives are
/// pairwise disjoint; validation and test positives are absent from train
/// message passing; test positives are absent from validation message
/// passing. When the train split is disjoint, its positives are absent from
/// its own message passing too.
pub fn check_no_leakage(output: &SplitOutput) -> Result<(), String> {
    for sup in &output.train.supervision {
        let t = &sup.triplet;
        let positives = |split: &SplitGraph| -> Result<PairSet, String> {
            split
                .supervision(t)
                .map(|s| s.positive_pairs().collect())
                .ok_or_else(|| format!("{t}: missing from {} supervision", split.kind))
        };
        let message_passing = |split: &SplitGraph| -> Result<PairSet, String> {
            split
                .message_passing(t)
                .map(|e| e.pairs().collect())
                .map_err(|e| e.to_string())
        };

        let train = positives(&output.train)?;
        let val = positives(&output.val)?;
        let test = positives(&output.test)?;
        if !train.is_disjoint(&val) || !train.is_disjoint(&test) || !val.is_disjoint(&test) {
            return Err(format!("{t}: supervision groups overlap"));
        }

        let train_mp = message_passing(&output.train)?;
        let val_mp = message_passing(&output.val)?;
        if !val.is_disjoint(&train_mp) || !test.is_disjoint(&train_mp) {
            return Err(format!("{t}: held-out edge in train message passing"));
        }
        if !test.is_disjoint(&val_mp) {
            return Err(format!("{t}: test edge in validation message passing"));
        }
        if output.train.config.is_disjoint() && !train.is_disjoint(&train_mp) {
            return Err(format!("{t}: train supervision in train message passing"));
        }
    }
    Ok(())
}

/// Verifies that negatives are unique, in range, and never true edges of the
/// full graph.
pub fn check_negatives(full: &HeteroGraph, output: &SplitOutput) -> Result<(), String> {
    for split in output.splits() {
        for sup in &split.supervision {
            let t = &sup.triplet;
            let edges = full.edge_set(t).map_err(|e| e.to_string())?;
            let positives: PairSet = edges.pairs().collect();
            let n_src = full.node_count(&t.src).unwrap_or(0);
            let n_dst = full.node_count(&t.dst).unwrap_or(0);
            let mut seen = PairSet::new();
            for (s, d) in sup.negative_pairs() {
                if s >= n_src || d >= n_dst {
                    return Err(format!("{}/{t}: negative ({s}, {d}) out of range", split.kind));
                }
                if positives.contains(&(s, d)) {
                    return Err(format!("{}/{t}: negative ({s}, {d}) is an edge", split.kind));
                }
                if !seen.insert((s, d)) {
                    return Err(format!("{}/{t}: negative ({s}, {d}) repeated", split.kind));
                }
            }
        }
    }
    Ok(())
}

/// Verifies that each relation's summary partitions its population exactly.
pub fn check_partition(output: &SplitOutput) -> Result<(), String> {
    for s in &output.summaries {
        let disjoint = output.train.config.is_disjoint();
        let train = if disjoint {
            s.train_message_passing + s.train_supervision
        } else {
            s.train_message_passing
        };
        let sum = train + s.validation + s.test;
        if s.total != 0 && sum != s.total {
            return Err(format!(
                "{}: train {train} + val {} + test {} != total {}",
                s.supervised, s.validation, s.test, s.total
            ));
        }
    }
    Ok(())
}

/// Verifies that `artifact` survives an encode/decode cycle unchanged and
/// keeps its fingerprint.
pub fn check_round_trip(
    artifact: &Artifact,
    encoding: Encoding,
    compress: bool,
) -> Result<(), String> {
    let bytes = encode_artifact(artifact, encoding, compress).map_err(|e| e.to_string())?;
    let back = decode_artifact(&bytes, DEFAULT_MAX_ARTIFACT_SIZE).map_err(|e| e.to_string())?;
    if back != *artifact {
        return Err(format!("{encoding:?} (compress={compress}): decoded artifact differs"));
    }
    let before = fingerprint(artifact).map_err(|e| e.to_string())?;
    let after = fingerprint(&back).map_err(|e| e.to_string())?;
    if before != after {
        return Err("fingerprint changed across round trip".to_owned());
    }
    Ok(())
}
