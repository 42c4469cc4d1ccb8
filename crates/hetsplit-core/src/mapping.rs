/// Per-type identifier mapping: raw external IDs to dense local indices.
///
/// Indices are assigned per node type in order of first appearance in the
/// node table. A raw identifier that repeats within a type keeps its first
/// index; the same raw identifier under two types gets an index in each.
use std::collections::{BTreeMap, HashMap};

use crate::graph::GraphError;
use crate::newtypes::NodeType;
use crate::table::Table;

/// A bijection from one node type's raw identifiers onto `[0, len)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentifierMapping {
    raw_ids: Vec<String>,
    index: HashMap<String, usize>,
}

impl IdentifierMapping {
    /// Returns the local index for `raw_id`, inserting it if unseen.
    fn insert(&mut self, raw_id: &str) -> usize {
        if let Some(&idx) = self.index.get(raw_id) {
            return idx;
        }
        let idx = self.raw_ids.len();
        self.raw_ids.push(raw_id.to_owned());
        self.index.insert(raw_id.to_owned(), idx);
        idx
    }

    /// Looks up the local index of `raw_id`.
    pub fn get(&self, raw_id: &str) -> Option<usize> {
        self.index.get(raw_id).copied()
    }

    /// Returns the raw identifier stored at local index `idx`.
    pub fn raw_id(&self, idx: usize) -> Option<&str> {
        self.raw_ids.get(idx).map(String::as_str)
    }

    /// Number of distinct identifiers (the node count of the type).
    pub fn len(&self) -> usize {
        self.raw_ids.len()
    }

    /// Returns `true` when no identifiers are mapped.
    pub fn is_empty(&self) -> bool {
        self.raw_ids.is_empty()
    }

    /// Raw identifiers in local index order.
    pub fn raw_ids(&self) -> &[String] {
        &self.raw_ids
    }
}

/// Identifier mappings for every node type in a node table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeMappings {
    by_type: BTreeMap<NodeType, IdentifierMapping>,
}

impl NodeMappings {
    /// Returns the mapping of `node_type`.
    pub fn get(&self, node_type: &NodeType) -> Option<&IdentifierMapping> {
        self.by_type.get(node_type)
    }

    /// Looks up the local index of `raw_id` within `node_type`.
    pub fn index_of(&self, node_type: &NodeType, raw_id: &str) -> Option<usize> {
        self.get(node_type)?.get(raw_id)
    }

    /// Iterates node types with their mappings, sorted by type label.
    pub fn iter(&self) -> impl Iterator<Item = (&NodeType, &IdentifierMapping)> {
        self.by_type.iter()
    }

    /// Node count per type, in the shape [`crate::HeteroGraph::assemble`] takes.
    pub fn node_counts(&self) -> BTreeMap<NodeType, usize> {
        self.by_type
            .iter()
            .map(|(t, m)| (t.clone(), m.len()))
            .collect()
    }
}

/// Builds per-type identifier mappings from a node table.
///
/// Passthrough columns other than `id_column` and `type_column` are ignored.
///
/// # Errors
///
/// Returns [`GraphError::Schema`] if either column is missing, or if any row
/// has a null identifier, a null type, or a type that is not a valid label.
pub fn build_mappings(
    nodes: &Table,
    id_column: &str,
    type_column: &str,
) -> Result<NodeMappings, GraphError> {
    let id_col = nodes.column(id_column).map_err(|e| schema(None, e.to_string()))?;
    let type_col = nodes
        .column(type_column)
        .map_err(|e| schema(None, e.to_string()))?;

    let mut by_type: BTreeMap<NodeType, IdentifierMapping> = BTreeMap::new();

    for row in 0..nodes.len() {
        let raw_id = nodes
            .cell(row, id_col)
            .ok_or_else(|| schema(Some(row), format!("null value in column {id_column:?}")))?;
        let raw_type = nodes
            .cell(row, type_col)
            .ok_or_else(|| schema(Some(row), format!("null value in column {type_column:?}")))?;
        let node_type = NodeType::try_from(raw_type).map_err(|e| schema(Some(row), e.to_string()))?;

        by_type.entry(node_type).or_default().insert(raw_id);
    }

    tracing::debug!(node_types = by_type.len(), rows = nodes.len(), "built identifier mappings");

    Ok(NodeMappings { by_type })
}

fn schema(row: Option<usize>, detail: String) -> GraphError {
    GraphError::Schema {
        table: "nodes",
        row,
        detail,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;

    fn nt(s: &str) -> NodeType {
        NodeType::try_from(s).expect("valid NodeType")
    }

    fn node_table(rows: &[&[&str]]) -> Table {
        Table::from_str_rows(&["node_index", "node_type"], rows).expect("table")
    }

    #[test]
    fn indices_follow_first_appearance_per_type() {
        let t = node_table(&[
            &["g7", "gene"],
            &["d1", "disease"],
            &["g3", "gene"],
            &["g7", "gene"],
            &["d9", "disease"],
        ]);
        let m = build_mappings(&t, "node_index", "node_type").expect("mappings");

        let genes = m.get(&nt("gene")).expect("gene mapping");
        assert_eq!(genes.raw_ids(), ["g7", "g3"]);
        assert_eq!(genes.get("g3"), Some(1));
        assert_eq!(m.index_of(&nt("disease"), "d9"), Some(1));
    }

    #[test]
    fn every_mapping_is_gapless() {
        let t = node_table(&[&["a", "x"], &["b", "x"], &["c", "y"], &["a", "x"]]);
        let m = build_mappings(&t, "node_index", "node_type").expect("mappings");
        for (_, mapping) in m.iter() {
            let mut seen: Vec<usize> = mapping
                .raw_ids()
                .iter()
                .map(|id| mapping.get(id).expect("mapped"))
                .collect();
            seen.sort_unstable();
            assert_eq!(seen, (0..mapping.len()).collect::<Vec<_>>());
        }
    }

    #[test]
    fn same_raw_id_under_two_types_maps_independently() {
        let t = node_table(&[&["1", "gene"], &["1", "disease"]]);
        let m = build_mappings(&t, "node_index", "node_type").expect("mappings");
        assert_eq!(m.index_of(&nt("gene"), "1"), Some(0));
        assert_eq!(m.index_of(&nt("disease"), "1"), Some(0));
        assert_eq!(m.node_counts().values().sum::<usize>(), 2);
    }

    #[test]
    fn null_identifier_is_schema_error() {
        let t = node_table(&[&["a", "gene"], &["", "gene"]]);
        let err = build_mappings(&t, "node_index", "node_type").expect_err("null id");
        assert!(
            matches!(err, GraphError::Schema { row: Some(1), .. }),
            "{err}"
        );
    }

    #[test]
    fn null_type_is_schema_error() {
        let t = node_table(&[&["a", ""]]);
        build_mappings(&t, "node_index", "node_type").expect_err("null type");
    }

    #[test]
    fn missing_column_is_schema_error() {
        let t = node_table(&[]);
        let err = build_mappings(&t, "id", "node_type").expect_err("missing column");
        assert!(matches!(err, GraphError::Schema { row: None, .. }), "{err}");
    }
}
