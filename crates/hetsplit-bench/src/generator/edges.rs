//! Edge rows: three bipartite relations and one protein interaction relation.

use std::collections::HashSet;

use hetsplit_core::{Table, TableError};
use rand::Rng;
use rand::rngs::StdRng;
use rand::seq::index::sample;

use super::GeneratorConfig;
use super::nodes::{DISEASE, DRUG, GENE, GeneratedNodes};

/// Generated edge rows in table column order.
#[derive(Debug, Clone, Default)]
pub struct GeneratedEdges {
    rows: Vec<[String; 6]>,
}

impl GeneratedEdges {
    /// Number of edge rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if no rows were generated.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Converts the rows into an edge [`Table`].
    ///
    /// # Errors
    ///
    /// Propagates [`Table::new`] failures.
    pub fn into_table(self) -> Result<Table, TableError> {
        let headers = [
            "edge_type",
            "display_relation",
            "x_index",
            "x_type",
            "y_index",
            "y_type",
        ]
        .map(str::to_owned)
        .to_vec();
        let rows = self
            .rows
            .into_iter()
            .map(|row| row.into_iter().map(Some).collect())
            .collect();
        Table::new(headers, rows)
    }

    fn push(&mut self, label: &str, display: &str, src: (&str, &str), dst: (&str, &str)) {
        self.rows.push([
            label.to_owned(),
            display.to_owned(),
            src.0.to_owned(),
            src.1.to_owned(),
            dst.0.to_owned(),
            dst.1.to_owned(),
        ]);
    }
}

/// One bipartite relation to generate.
struct Bipartite<'a> {
    label: &'a str,
    display: &'a str,
    src_type: &'a str,
    src_ids: &'a [String],
    dst_type: &'a str,
    dst_ids: &'a [String],
    per_src: usize,
}

/// Builds all edge rows for `nodes`.
pub fn build_edges(
    config: &GeneratorConfig,
    nodes: &GeneratedNodes,
    rng: &mut StdRng,
) -> GeneratedEdges {
    let mut edges = GeneratedEdges::default();
    let relations = [
        Bipartite {
            label: "gda",
            display: "associated with",
            src_type: GENE,
            src_ids: &nodes.genes,
            dst_type: DISEASE,
            dst_ids: &nodes.diseases,
            per_src: config.diseases_per_gene,
        },
        Bipartite {
            label: "indication",
            display: "indication",
            src_type: DRUG,
            src_ids: &nodes.drugs,
            dst_type: DISEASE,
            dst_ids: &nodes.diseases,
            per_src: config.indications_per_drug,
        },
        Bipartite {
            label: "target",
            display: "target",
            src_type: DRUG,
            src_ids: &nodes.drugs,
            dst_type: GENE,
            dst_ids: &nodes.genes,
            per_src: config.targets_per_drug,
        },
    ];
    for relation in &relations {
        push_bipartite(&mut edges, relation, config.emit_reverse, rng);
    }
    push_interactions(&mut edges, &nodes.genes, config.ppi_per_gene, rng);
    edges
}

/// Each source gets `per_src` distinct destinations.
fn push_bipartite(
    edges: &mut GeneratedEdges,
    rel: &Bipartite<'_>,
    emit_reverse: bool,
    rng: &mut StdRng,
) {
    let amount = rel.per_src.min(rel.dst_ids.len());
    for src in rel.src_ids {
        for d in sample(rng, rel.dst_ids.len(), amount) {
            let dst = &rel.dst_ids[d];
            edges.push(
                rel.label,
                rel.display,
                (src.as_str(), rel.src_type),
                (dst.as_str(), rel.dst_type),
            );
            if emit_reverse {
                edges.push(
                    rel.label,
                    rel.display,
                    (dst.as_str(), rel.dst_type),
                    (src.as_str(), rel.src_type),
                );
            }
        }
    }
}

/// Undirected gene-gene interactions, always written in both directions.
fn push_interactions(
    edges: &mut GeneratedEdges,
    genes: &[String],
    per_gene: usize,
    rng: &mut StdRng,
) {
    if genes.len() < 2 {
        return;
    }
    let mut seen: HashSet<(usize, usize)> = HashSet::new();
    for a in 0..genes.len() {
        for _ in 0..per_gene {
            let b = rng.gen_range(0..genes.len());
            if a == b {
                continue;
            }
            if !seen.insert((a.min(b), a.max(b))) {
                continue;
            }
            let (ga, gb) = (genes[a].as_str(), genes[b].as_str());
            edges.push("ppi", "ppi", (ga, GENE), (gb, GENE));
            edges.push("ppi", "ppi", (gb, GENE), (ga, GENE));
        }
    }
}
