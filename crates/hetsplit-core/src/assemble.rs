/// Typed edge assembly: groups edge rows by relation triplet and rewrites
/// raw endpoint identifiers into per-type local indices.
///
/// Triplets are emitted in order of first occurrence in the edge table and
/// edges within a triplet keep table order, so a fixed input order yields a
/// fixed assembly.
use std::collections::HashMap;

use crate::graph::GraphError;
use crate::mapping::NodeMappings;
use crate::newtypes::{NodeType, RelationLabel};
use crate::table::{Table, TableColumns};
use crate::types::{EdgeSet, RelationTriplet};

/// Edge table column names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeColumns {
    /// Source raw identifier.
    pub src_id: String,
    /// Destination raw identifier.
    pub dst_id: String,
    /// Relation label.
    pub relation: String,
    /// Source node type.
    pub src_type: String,
    /// Destination node type.
    pub dst_type: String,
}

impl From<&TableColumns> for EdgeColumns {
    fn from(c: &TableColumns) -> Self {
        Self {
            src_id: c.edge_src.clone(),
            dst_id: c.edge_dst.clone(),
            relation: c.relation.clone(),
            src_type: c.src_type.clone(),
            dst_type: c.dst_type.clone(),
        }
    }
}

/// Resolved column positions for one edge table.
struct ColumnIndex {
    src_id: usize,
    dst_id: usize,
    relation: usize,
    src_type: usize,
    dst_type: usize,
}

/// Builds one [`EdgeSet`] per relation triplet found in `edges`.
///
/// # Errors
///
/// - [`GraphError::Schema`]: a column is missing, a cell is null, or a
///   type/relation cell is not a valid label.
/// - [`GraphError::UnknownIdentifier`]: an endpoint's raw identifier is not
///   in its declared type's mapping (including when the type has no mapping
///   at all).
pub fn assemble_edges(
    edges: &Table,
    columns: &EdgeColumns,
    mappings: &NodeMappings,
) -> Result<Vec<(RelationTriplet, EdgeSet)>, GraphError> {
    let cols = resolve_columns(edges, columns)?;

    let mut grouped: Vec<(RelationTriplet, EdgeSet)> = Vec::new();
    let mut slot_of: HashMap<RelationTriplet, usize> = HashMap::new();

    for row in 0..edges.len() {
        let src_type = NodeType::try_from(required(edges, row, cols.src_type, &columns.src_type)?)
            .map_err(|e| schema(Some(row), e.to_string()))?;
        let dst_type = NodeType::try_from(required(edges, row, cols.dst_type, &columns.dst_type)?)
            .map_err(|e| schema(Some(row), e.to_string()))?;
        let relation =
            RelationLabel::try_from(required(edges, row, cols.relation, &columns.relation)?)
                .map_err(|e| schema(Some(row), e.to_string()))?;

        let src_raw = required(edges, row, cols.src_id, &columns.src_id)?;
        let dst_raw = required(edges, row, cols.dst_id, &columns.dst_id)?;
        let src = resolve(mappings, &src_type, src_raw, row)?;
        let dst = resolve(mappings, &dst_type, dst_raw, row)?;

        let triplet = RelationTriplet::new(src_type, relation, dst_type);
        let slot = match slot_of.get(&triplet) {
            Some(&slot) => slot,
            None => {
                let slot = grouped.len();
                slot_of.insert(triplet.clone(), slot);
                grouped.push((triplet, EdgeSet::new()));
                slot
            }
        };
        if let Some((_, set)) = grouped.get_mut(slot) {
            set.push(src, dst);
        }
    }

    tracing::debug!(
        relations = grouped.len(),
        rows = edges.len(),
        "assembled typed edge sets"
    );

    Ok(grouped)
}

fn resolve_columns(edges: &Table, columns: &EdgeColumns) -> Result<ColumnIndex, GraphError> {
    let find = |name: &str| edges.column(name).map_err(|e| schema(None, e.to_string()));
    Ok(ColumnIndex {
        src_id: find(&columns.src_id)?,
        dst_id: find(&columns.dst_id)?,
        relation: find(&columns.relation)?,
        src_type: find(&columns.src_type)?,
        dst_type: find(&columns.dst_type)?,
    })
}

fn required<'t>(
    edges: &'t Table,
    row: usize,
    col: usize,
    name: &str,
) -> Result<&'t str, GraphError> {
    edges
        .cell(row, col)
        .ok_or_else(|| schema(Some(row), format!("null value in column {name:?}")))
}

fn resolve(
    mappings: &NodeMappings,
    node_type: &NodeType,
    raw_id: &str,
    row: usize,
) -> Result<usize, GraphError> {
    mappings
        .index_of(node_type, raw_id)
        .ok_or_else(|| GraphError::UnknownIdentifier {
            row,
            node_type: node_type.to_string(),
            id: raw_id.to_owned(),
        })
}

fn schema(row: Option<usize>, detail: String) -> GraphError {
    GraphError::Schema {
        table: "edges",
        row,
        detail,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;
    use crate::mapping::build_mappings;

    const EDGE_HEADERS: [&str; 5] = ["x_index", "y_index", "edge_type", "x_type", "y_type"];

    fn mappings() -> NodeMappings {
        let nodes = Table::from_str_rows(
            &["node_index", "node_type"],
            &[
                &["g1", "gene"],
                &["g2", "gene"],
                &["d1", "disease"],
            ],
        )
        .expect("nodes");
        build_mappings(&nodes, "node_index", "node_type").expect("mappings")
    }

    fn columns() -> EdgeColumns {
        EdgeColumns::from(&TableColumns::default())
    }

    #[test]
    fn groups_by_triplet_in_first_occurrence_order() {
        let edges = Table::from_str_rows(
            &EDGE_HEADERS,
            &[
                &["g2", "d1", "gda", "gene", "disease"],
                &["g1", "g2", "ppi", "gene", "gene"],
                &["g1", "d1", "gda", "gene", "disease"],
                &["d1", "g1", "gda", "disease", "gene"],
            ],
        )
        .expect("edges");

        let sets = assemble_edges(&edges, &columns(), &mappings()).expect("assemble");
        let order: Vec<String> = sets.iter().map(|(t, _)| t.to_string()).collect();
        assert_eq!(
            order,
            vec!["(gene, gda, disease)", "(gene, ppi, gene)", "(disease, gda, gene)"]
        );
        let gda = &sets[0].1;
        assert_eq!(gda.src, vec![1, 0]);
        assert_eq!(gda.dst, vec![0, 0]);
    }

    #[test]
    fn multi_edges_are_preserved() {
        let edges = Table::from_str_rows(
            &EDGE_HEADERS,
            &[
                &["g1", "d1", "gda", "gene", "disease"],
                &["g1", "d1", "gda", "gene", "disease"],
            ],
        )
        .expect("edges");
        let sets = assemble_edges(&edges, &columns(), &mappings()).expect("assemble");
        assert_eq!(sets[0].1.len(), 2);
    }

    #[test]
    fn unknown_source_identifier_is_rejected() {
        let edges = Table::from_str_rows(
            &EDGE_HEADERS,
            &[&["g404", "d1", "gda", "gene", "disease"]],
        )
        .expect("edges");
        let err = assemble_edges(&edges, &columns(), &mappings()).expect_err("unknown id");
        assert_eq!(
            err,
            GraphError::UnknownIdentifier {
                row: 0,
                node_type: "gene".to_owned(),
                id: "g404".to_owned(),
            }
        );
    }

    #[test]
    fn identifier_under_wrong_type_is_unknown() {
        let edges = Table::from_str_rows(
            &EDGE_HEADERS,
            &[&["d1", "g1", "gda", "gene", "disease"]],
        )
        .expect("edges");
        let err = assemble_edges(&edges, &columns(), &mappings()).expect_err("wrong type");
        assert!(matches!(err, GraphError::UnknownIdentifier { .. }), "{err}");
    }

    #[test]
    fn undeclared_type_is_unknown_identifier() {
        let edges = Table::from_str_rows(
            &EDGE_HEADERS,
            &[&["x", "d1", "treats", "drug", "disease"]],
        )
        .expect("edges");
        let err = assemble_edges(&edges, &columns(), &mappings()).expect_err("no drug nodes");
        assert!(err.to_string().contains("drug"), "{err}");
    }

    #[test]
    fn null_relation_is_schema_error() {
        let edges = Table::from_str_rows(&EDGE_HEADERS, &[&["g1", "d1", "", "gene", "disease"]])
            .expect("edges");
        let err = assemble_edges(&edges, &columns(), &mappings()).expect_err("null relation");
        assert!(matches!(err, GraphError::Schema { row: Some(0), .. }), "{err}");
    }

    #[test]
    fn missing_column_is_schema_error() {
        let edges = Table::from_str_rows(&["x_index", "y_index"], &[]).expect("edges");
        let err = assemble_edges(&edges, &columns(), &mappings()).expect_err("missing");
        assert!(matches!(err, GraphError::Schema { row: None, .. }), "{err}");
    }
}
