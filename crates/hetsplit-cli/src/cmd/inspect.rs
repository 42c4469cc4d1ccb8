//! Implementation of `hetsplit inspect <file>`.
//!
//! Decodes a persisted artifact (any encoding, compressed or not) and prints
//! summary statistics to stdout:
//! - artifact kind (graph or train / validation / test split)
//! - node count by type
//! - edge count by relation
//! - for splits: the split configuration and supervision positives/negatives
//!   per relation
//! - for graphs: the forward/reverse relation pairing
//! - the content fingerprint
//!
//! In `--format json` mode a single JSON object is emitted to stdout.
//!
//! Exit codes: 0 = success, 2 = unreadable or undecodable input.
use std::collections::BTreeMap;
use std::io::Write;

use hetsplit_core::{Artifact, SplitConfig, decode_artifact, fingerprint, resolve_reverse};

use crate::cmd::stdout_error;
use crate::error::CliError;
use crate::io::read_input;
use crate::{OutputFormat, PathOrStdin};

/// Supervision counts for one relation of a split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupervisionStats {
    /// Positive supervision edges.
    pub positives: usize,
    /// Negative supervision edges.
    pub negatives: usize,
}

/// Statistics gathered from a decoded [`Artifact`].
#[derive(Debug, Clone)]
pub struct InspectStats {
    /// `"graph"` or the split name.
    pub kind: &'static str,
    /// Total number of nodes.
    pub node_count: usize,
    /// Node count per type.
    pub node_counts: BTreeMap<String, usize>,
    /// Total number of edges.
    pub edge_count: usize,
    /// Edge count per relation, keyed by the triplet's display form.
    pub edge_counts: BTreeMap<String, usize>,
    /// Split configuration, for splits.
    pub config: Option<SplitConfig>,
    /// Supervision per relation, for splits.
    pub supervision: BTreeMap<String, SupervisionStats>,
    /// Forward/reverse pairs, for graphs.
    pub pairs: Vec<(String, String)>,
    /// SHA-256 of the JSON encoding.
    pub fingerprint: String,
}

impl InspectStats {
    /// Computes statistics from a decoded [`Artifact`].
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Pipeline`] if the fingerprint cannot be computed.
    pub fn from_artifact(artifact: &Artifact) -> Result<Self, CliError> {
        let graph = artifact.graph();
        let node_counts = graph
            .node_counts()
            .iter()
            .map(|(t, n)| (t.to_string(), *n))
            .collect();
        let edge_counts = graph
            .relations()
            .iter()
            .map(|r| (r.triplet.to_string(), r.edges.len()))
            .collect();

        let (config, supervision, pairs) = match artifact {
            Artifact::Split(s) => {
                let supervision = s
                    .supervision
                    .iter()
                    .map(|sup| {
                        (
                            sup.triplet.to_string(),
                            SupervisionStats {
                                positives: sup.positives(),
                                negatives: sup.negatives(),
                            },
                        )
                    })
                    .collect();
                (Some(s.config), supervision, Vec::new())
            }
            Artifact::Graph(g) => {
                let pairing = resolve_reverse(g.relation_triplets());
                let pairs = pairing
                    .pairs()
                    .map(|(f, r)| (f.to_string(), r.to_string()))
                    .collect();
                (None, BTreeMap::new(), pairs)
            }
        };

        let fingerprint = fingerprint(artifact).map_err(|e| CliError::Pipeline {
            stage: "fingerprint",
            detail: e.to_string(),
        })?;

        Ok(Self {
            kind: match artifact {
                Artifact::Graph(_) => "graph",
                Artifact::Split(s) => s.kind.as_str(),
            },
            node_count: graph.total_nodes(),
            node_counts,
            edge_count: graph.total_edges(),
            edge_counts,
            config,
            supervision,
            pairs,
            fingerprint,
        })
    }
}

/// Runs the `inspect` command.
///
/// # Errors
///
/// Returns [`CliError`] with exit code 2 if the input cannot be read or
/// decoded.
pub fn run(source: &PathOrStdin, format: OutputFormat, max_file_size: u64) -> Result<(), CliError> {
    let bytes = read_input(source, max_file_size)?;
    let artifact = decode_artifact(&bytes, max_file_size).map_err(|e| CliError::Decode {
        path: source.to_string().into(),
        detail: e.to_string(),
    })?;
    let stats = InspectStats::from_artifact(&artifact)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Human => print_human(&mut out, &stats),
        OutputFormat::Json => print_json(&mut out, &stats),
    }
    .map_err(|e| stdout_error(&e))
}

/// Writes inspect statistics in human-readable aligned format.
fn print_human<W: Write>(w: &mut W, stats: &InspectStats) -> std::io::Result<()> {
    writeln!(w, "kind:           {}", stats.kind)?;
    if let Some(c) = &stats.config {
        writeln!(w, "seed:           {}", c.seed)?;
        writeln!(
            w,
            "proportions:    val {} / test {} / disjoint {}",
            c.p_val, c.p_test, c.disjoint_train_ratio
        )?;
        writeln!(w, "negative_ratio: {}", c.negative_ratio)?;
    }
    writeln!(w, "nodes:          {}", stats.node_count)?;
    for (node_type, count) in &stats.node_counts {
        writeln!(w, "  {node_type}: {count}")?;
    }
    writeln!(w, "edges:          {}", stats.edge_count)?;
    for (relation, count) in &stats.edge_counts {
        writeln!(w, "  {relation}: {count}")?;
    }
    if !stats.supervision.is_empty() {
        writeln!(w, "supervision:")?;
        for (relation, s) in &stats.supervision {
            writeln!(w, "  {relation}: {} positive, {} negative", s.positives, s.negatives)?;
        }
    }
    if !stats.pairs.is_empty() {
        writeln!(w, "reverse pairs:")?;
        for (forward, reverse) in &stats.pairs {
            writeln!(w, "  {forward} <-> {reverse}")?;
        }
    }
    writeln!(w, "fingerprint:    {}", stats.fingerprint)
}

/// Writes inspect statistics as a single JSON object.
fn print_json<W: Write>(w: &mut W, stats: &InspectStats) -> std::io::Result<()> {
    let supervision: serde_json::Map<String, serde_json::Value> = stats
        .supervision
        .iter()
        .map(|(k, s)| {
            (
                k.clone(),
                serde_json::json!({ "positives": s.positives, "negatives": s.negatives }),
            )
        })
        .collect();
    let pairs: Vec<serde_json::Value> = stats
        .pairs
        .iter()
        .map(|(f, r)| serde_json::json!({ "forward": f, "reverse": r }))
        .collect();

    let mut obj = serde_json::json!({
        "kind": stats.kind,
        "node_count": stats.node_count,
        "node_counts": stats.node_counts,
        "edge_count": stats.edge_count,
        "edge_counts": stats.edge_counts,
        "fingerprint": stats.fingerprint,
    });
    if let Some(map) = obj.as_object_mut() {
        if let Some(c) = &stats.config {
            map.insert("config".to_owned(), serde_json::json!(c));
            map.insert("supervision".to_owned(), serde_json::Value::Object(supervision));
        } else {
            map.insert("reverse_pairs".to_owned(), serde_json::Value::Array(pairs));
        }
    }
    writeln!(w, "{obj}")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use std::collections::BTreeMap;

    use hetsplit_core::{EdgeSet, HeteroGraph, NodeType, RelationTriplet, SplitConfig, split};

    use super::*;

    fn graph() -> HeteroGraph {
        let gene = NodeType::try_from("gene").expect("valid");
        let disease = NodeType::try_from("disease").expect("valid");
        let fwd = RelationTriplet::new(
            gene.clone(),
            "gda".try_into().expect("valid"),
            disease.clone(),
        );
        let mut edges = EdgeSet::new();
        for g in 0..6 {
            for d in 0..6 {
                if (g + d) % 2 == 0 {
                    edges.push(g, d);
                }
            }
        }
        let reverse = edges.flipped();
        let mut counts = BTreeMap::new();
        counts.insert(gene, 6);
        counts.insert(disease, 6);
        HeteroGraph::assemble(counts, vec![(fwd.reversed(), reverse), (fwd, edges)])
            .expect("valid graph")
    }

    #[test]
    fn graph_stats_list_pairs() {
        let stats = InspectStats::from_artifact(&Artifact::Graph(graph())).expect("stats");
        assert_eq!(stats.kind, "graph");
        assert_eq!(stats.node_count, 12);
        assert_eq!(stats.edge_count, 36);
        assert_eq!(stats.edge_counts.get("(gene, gda, disease)"), Some(&18));
        assert_eq!(stats.pairs.len(), 1);
        assert!(stats.config.is_none());
        assert_eq!(stats.fingerprint.len(), 64);
    }

    #[test]
    fn split_stats_show_supervision() {
        let g = graph();
        let pairing = resolve_reverse(g.relation_triplets());
        let out = split(&g, &pairing, &SplitConfig::default()).expect("split");
        let stats = InspectStats::from_artifact(&Artifact::Split(out.test)).expect("stats");
        assert_eq!(stats.kind, "test");
        assert_eq!(stats.config, Some(SplitConfig::default()));
        let sup = stats.supervision.values().next().expect("one supervised relation");
        assert_eq!(sup.positives, 2);
        assert_eq!(sup.negatives, 2);
        assert!(stats.pairs.is_empty());
    }

    #[test]
    fn human_and_json_output() {
        let stats = InspectStats::from_artifact(&Artifact::Graph(graph())).expect("stats");

        let mut buf = Vec::new();
        print_human(&mut buf, &stats).expect("write");
        let human = String::from_utf8(buf).expect("utf8");
        assert!(human.contains("kind:           graph"), "{human}");
        assert!(human.contains("reverse pairs:"), "{human}");

        let mut buf = Vec::new();
        print_json(&mut buf, &stats).expect("write");
        let json: serde_json::Value = serde_json::from_slice(&buf).expect("valid JSON");
        assert_eq!(json["edge_count"], 36);
        assert_eq!(json["node_counts"]["gene"], 6);
        assert!(json["reverse_pairs"].is_array());
        assert!(json.get("config").is_none());
    }
}
