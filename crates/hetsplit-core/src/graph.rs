/// Heterogeneous graph store and end-to-end construction from tables.
///
/// A [`HeteroGraph`] holds a node count per [`NodeType`] and one [`EdgeSet`]
/// per [`RelationTriplet`]. It is immutable after construction: the link
/// splitter derives fresh graphs rather than editing one in place.
///
/// # Construction
///
/// [`build_graph`] runs the three stages in order:
/// 1. **Identifier mapping**: [`crate::mapping::build_mappings`] assigns
///    dense per-type indices to the node table's raw identifiers.
/// 2. **Edge assembly**: [`crate::assemble::assemble_edges`] groups the edge
///    table by triplet and rewrites endpoints through the mappings.
/// 3. **Store assembly**: [`HeteroGraph::assemble`] checks every endpoint
///    against its type's count.
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::assemble::{EdgeColumns, assemble_edges};
use crate::mapping::{NodeMappings, build_mappings};
use crate::newtypes::NodeType;
use crate::table::{Table, TableColumns};
use crate::types::{EdgeSet, RelationTriplet};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors raised while building or addressing a [`HeteroGraph`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// An input table is malformed: a required column is missing or a
    /// required cell is null or not a valid label.
    Schema {
        /// Which table the problem was found in (`"nodes"` or `"edges"`).
        table: &'static str,
        /// Zero-based data row, when the problem is row-specific.
        row: Option<usize>,
        /// Human-readable description.
        detail: String,
    },
    /// An edge endpoint references a raw identifier absent from its type's
    /// mapping.
    UnknownIdentifier {
        /// Zero-based edge table row.
        row: usize,
        /// The endpoint's declared node type.
        node_type: String,
        /// The raw identifier that could not be resolved.
        id: String,
    },
    /// An internal invariant does not hold (out-of-range index, ragged edge
    /// arrays, undeclared node type, duplicate triplet).
    Consistency {
        /// Relation the violation was found in.
        relation: String,
        /// Human-readable description.
        detail: String,
    },
    /// A lookup named a relation the graph does not contain.
    RelationNotFound(RelationTriplet),
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Schema {
                table,
                row: Some(row),
                detail,
            } => write!(f, "schema error in {table} table, row {row}: {detail}"),
            Self::Schema {
                table,
                row: None,
                detail,
            } => write!(f, "schema error in {table} table: {detail}"),
            Self::UnknownIdentifier { row, node_type, id } => write!(
                f,
                "edge row {row} references unknown {node_type} identifier {id:?}"
            ),
            Self::Consistency { relation, detail } => {
                write!(f, "inconsistent relation {relation}: {detail}")
            }
            Self::RelationNotFound(t) => write!(f, "relation {t} not found in graph"),
        }
    }
}

impl std::error::Error for GraphError {}

// ---------------------------------------------------------------------------
// HeteroGraph
// ---------------------------------------------------------------------------

/// One relation's edges as stored in a [`HeteroGraph`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    /// The relation key.
    pub triplet: RelationTriplet,
    /// The relation's directed edges.
    pub edges: EdgeSet,
}

/// A multi-relational graph with per-type node counts.
///
/// Relations keep the insertion order they were assembled in; that order is
/// part of the reproducibility contract of the link splitter.
///
/// Deserialization re-runs [`HeteroGraph::assemble`], so a persisted graph
/// with out-of-range endpoints is rejected on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GraphParts")]
pub struct HeteroGraph {
    node_counts: BTreeMap<NodeType, usize>,
    relations: Vec<Relation>,
}

/// Unchecked serialized form of a [`HeteroGraph`].
#[derive(Deserialize)]
struct GraphParts {
    node_counts: BTreeMap<NodeType, usize>,
    relations: Vec<Relation>,
}

impl TryFrom<GraphParts> for HeteroGraph {
    type Error = GraphError;

    fn try_from(parts: GraphParts) -> Result<Self, Self::Error> {
        HeteroGraph::assemble(
            parts.node_counts,
            parts
                .relations
                .into_iter()
                .map(|r| (r.triplet, r.edges))
                .collect(),
        )
    }
}

impl HeteroGraph {
    /// Composes node counts and per-relation edge sets into a graph.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Consistency`] if a relation names a node type
    /// absent from `node_counts`, if its endpoint arrays differ in length,
    /// if any endpoint is `>=` its type's count, or if a triplet appears
    /// twice.
    pub fn assemble(
        node_counts: BTreeMap<NodeType, usize>,
        edge_sets: Vec<(RelationTriplet, EdgeSet)>,
    ) -> Result<Self, GraphError> {
        let mut relations: Vec<Relation> = Vec::with_capacity(edge_sets.len());

        for (triplet, edges) in edge_sets {
            if relations.iter().any(|r| r.triplet == triplet) {
                return Err(consistency(&triplet, "relation appears more than once"));
            }
            if edges.src.len() != edges.dst.len() {
                return Err(consistency(
                    &triplet,
                    &format!(
                        "endpoint arrays differ in length ({} sources, {} destinations)",
                        edges.src.len(),
                        edges.dst.len()
                    ),
                ));
            }
            let src_count = declared_count(&node_counts, &triplet, &triplet.src)?;
            let dst_count = declared_count(&node_counts, &triplet, &triplet.dst)?;

            for (pos, (s, d)) in edges.pairs().enumerate() {
                if s >= src_count {
                    return Err(consistency(
                        &triplet,
                        &format!("edge {pos}: source index {s} >= {} count {src_count}", triplet.src),
                    ));
                }
                if d >= dst_count {
                    return Err(consistency(
                        &triplet,
                        &format!("edge {pos}: destination index {d} >= {} count {dst_count}", triplet.dst),
                    ));
                }
            }

            relations.push(Relation { triplet, edges });
        }

        Ok(Self {
            node_counts,
            relations,
        })
    }

    /// Returns the node count of `node_type`, or `None` if the type is absent.
    pub fn node_count(&self, node_type: &NodeType) -> Option<usize> {
        self.node_counts.get(node_type).copied()
    }

    /// Node types and their counts, sorted by type label.
    pub fn node_counts(&self) -> &BTreeMap<NodeType, usize> {
        &self.node_counts
    }

    /// Total node count over all types.
    pub fn total_nodes(&self) -> usize {
        self.node_counts.values().sum()
    }

    /// Relation triplets in insertion order.
    pub fn relation_triplets(&self) -> impl Iterator<Item = &RelationTriplet> {
        self.relations.iter().map(|r| &r.triplet)
    }

    /// All relations in insertion order.
    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    /// Returns `true` if the graph stores an edge set for `triplet`.
    pub fn contains_relation(&self, triplet: &RelationTriplet) -> bool {
        self.relations.iter().any(|r| &r.triplet == triplet)
    }

    /// Looks up the edge set of `triplet`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::RelationNotFound`] if the triplet is absent.
    pub fn edge_set(&self, triplet: &RelationTriplet) -> Result<&EdgeSet, GraphError> {
        self.relations
            .iter()
            .find(|r| &r.triplet == triplet)
            .map(|r| &r.edges)
            .ok_or_else(|| GraphError::RelationNotFound(triplet.clone()))
    }

    /// Number of directed edges of `triplet`; zero when the relation is absent.
    pub fn edge_count(&self, triplet: &RelationTriplet) -> usize {
        self.edge_set(triplet).map_or(0, EdgeSet::len)
    }

    /// Total directed edge count over all relations.
    pub fn total_edges(&self) -> usize {
        self.relations.iter().map(|r| r.edges.len()).sum()
    }
}

fn declared_count(
    node_counts: &BTreeMap<NodeType, usize>,
    triplet: &RelationTriplet,
    node_type: &NodeType,
) -> Result<usize, GraphError> {
    node_counts.get(node_type).copied().ok_or_else(|| {
        consistency(
            triplet,
            &format!("node type {node_type:?} is not declared"),
        )
    })
}

fn consistency(triplet: &RelationTriplet, detail: &str) -> GraphError {
    GraphError::Consistency {
        relation: triplet.to_string(),
        detail: detail.to_owned(),
    }
}

// ---------------------------------------------------------------------------
// Construction from tables
// ---------------------------------------------------------------------------

/// Builds a [`HeteroGraph`] from a node table and an edge table.
///
/// Returns the graph together with the identifier mappings so callers can
/// translate local indices back to raw identifiers.
///
/// # Errors
///
/// - [`GraphError::Schema`]: a required column is missing or a required
///   cell is null.
/// - [`GraphError::UnknownIdentifier`]: an edge endpoint is absent from its
///   type's mapping.
/// - [`GraphError::Consistency`]: assembly found an invariant violation.
pub fn build_graph(
    nodes: &Table,
    edges: &Table,
    columns: &TableColumns,
) -> Result<(HeteroGraph, NodeMappings), GraphError> {
    let mappings = build_mappings(nodes, &columns.node_id, &columns.node_type)?;
    let edge_sets = assemble_edges(edges, &EdgeColumns::from(columns), &mappings)?;
    let graph = HeteroGraph::assemble(mappings.node_counts(), edge_sets)?;

    tracing::info!(
        node_types = graph.node_counts().len(),
        nodes = graph.total_nodes(),
        relations = graph.relations().len(),
        edges = graph.total_edges(),
        "built heterogeneous graph"
    );

    Ok((graph, mappings))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;
    use crate::newtypes::RelationLabel;

    fn nt(s: &str) -> NodeType {
        NodeType::try_from(s).expect("valid NodeType")
    }

    fn triplet(src: &str, rel: &str, dst: &str) -> RelationTriplet {
        RelationTriplet::new(nt(src), RelationLabel::try_from(rel).expect("valid"), nt(dst))
    }

    fn counts(pairs: &[(&str, usize)]) -> BTreeMap<NodeType, usize> {
        pairs.iter().map(|(t, n)| (nt(t), *n)).collect()
    }

    #[test]
    fn assemble_accepts_in_range_edges() {
        let g = HeteroGraph::assemble(
            counts(&[("a", 2), ("b", 3)]),
            vec![(triplet("a", "r", "b"), [(0, 2), (1, 0)].into_iter().collect())],
        )
        .expect("assemble");
        assert_eq!(g.total_nodes(), 5);
        assert_eq!(g.total_edges(), 2);
        assert_eq!(g.edge_count(&triplet("a", "r", "b")), 2);
    }

    #[test]
    fn assemble_rejects_out_of_range_destination() {
        let err = HeteroGraph::assemble(
            counts(&[("a", 2), ("b", 3)]),
            vec![(triplet("a", "r", "b"), [(0, 3)].into_iter().collect())],
        )
        .expect_err("index 3 is out of range for b");
        assert!(matches!(err, GraphError::Consistency { .. }), "{err}");
        assert!(err.to_string().contains("destination index 3"), "{err}");
    }

    #[test]
    fn assemble_rejects_undeclared_type() {
        let err = HeteroGraph::assemble(
            counts(&[("a", 2)]),
            vec![(triplet("a", "r", "b"), EdgeSet::new())],
        )
        .expect_err("b is not declared");
        assert!(err.to_string().contains("\"b\""), "{err}");
    }

    #[test]
    fn assemble_rejects_ragged_edge_arrays() {
        let err = HeteroGraph::assemble(
            counts(&[("a", 2)]),
            vec![(
                triplet("a", "r", "a"),
                EdgeSet {
                    src: vec![0, 1],
                    dst: vec![1],
                },
            )],
        )
        .expect_err("ragged");
        assert!(err.to_string().contains("differ in length"), "{err}");
    }

    #[test]
    fn assemble_rejects_duplicate_triplet() {
        let t = triplet("a", "r", "a");
        HeteroGraph::assemble(
            counts(&[("a", 2)]),
            vec![(t.clone(), EdgeSet::new()), (t, EdgeSet::new())],
        )
        .expect_err("duplicate relation");
    }

    #[test]
    fn edge_set_lookup_reports_not_found() {
        let g = HeteroGraph::assemble(counts(&[("a", 1)]), vec![]).expect("assemble");
        let missing = triplet("a", "r", "a");
        assert_eq!(
            g.edge_set(&missing).expect_err("absent"),
            GraphError::RelationNotFound(missing.clone())
        );
        assert_eq!(g.edge_count(&missing), 0);
    }

    #[test]
    fn relation_order_is_insertion_order() {
        let g = HeteroGraph::assemble(
            counts(&[("a", 1), ("b", 1)]),
            vec![
                (triplet("b", "z", "a"), EdgeSet::new()),
                (triplet("a", "y", "b"), EdgeSet::new()),
            ],
        )
        .expect("assemble");
        let order: Vec<String> = g.relation_triplets().map(ToString::to_string).collect();
        assert_eq!(order, vec!["(b, z, a)", "(a, y, b)"]);
    }

    #[test]
    fn deserialize_rechecks_bounds() {
        let json = r#"{
            "node_counts": {"a": 1},
            "relations": [
                {"triplet": {"src": "a", "relation": "r", "dst": "a"},
                 "edges": {"src": [0], "dst": [4]}}
            ]
        }"#;
        serde_json::from_str::<HeteroGraph>(json).expect_err("index 4 out of range");
    }

    #[test]
    fn build_graph_from_tables() {
        let nodes = Table::from_str_rows(
            &["node_index", "node_type", "name"],
            &[
                &["10", "gene_protein", "TP53"],
                &["11", "gene_protein", "BRCA1"],
                &["20", "disease", "glioma"],
            ],
        )
        .expect("nodes");
        let edges = Table::from_str_rows(
            &["x_index", "y_index", "edge_type", "x_type", "y_type"],
            &[
                &["10", "20", "gda", "gene_protein", "disease"],
                &["20", "10", "gda", "disease", "gene_protein"],
                &["11", "20", "gda", "gene_protein", "disease"],
                &["20", "11", "gda", "disease", "gene_protein"],
            ],
        )
        .expect("edges");

        let (g, mappings) =
            build_graph(&nodes, &edges, &TableColumns::default()).expect("build graph");

        assert_eq!(g.node_count(&nt("gene_protein")), Some(2));
        assert_eq!(g.node_count(&nt("disease")), Some(1));
        let fwd = g
            .edge_set(&triplet("gene_protein", "gda", "disease"))
            .expect("forward relation");
        assert_eq!(fwd.src, vec![0, 1]);
        assert_eq!(fwd.dst, vec![0, 0]);
        assert_eq!(mappings.index_of(&nt("gene_protein"), "11"), Some(1));
    }
}
