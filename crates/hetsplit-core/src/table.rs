/// Row-oriented, column-indexed tables: the read contract the loaders share.
///
/// `hetsplit-core` never parses files. Format crates (CSV, Excel) produce a
/// [`Table`] and the identifier mapper and edge assembler consume it by
/// column name. Empty cells are stored as `None` and treated as null.
use std::fmt;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors raised while constructing or addressing a [`Table`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// A required column header is absent.
    MissingColumn {
        /// The header that was requested.
        column: String,
    },
    /// A row has a different number of cells than the header.
    RaggedRow {
        /// Zero-based data row index.
        row: usize,
        /// Number of header columns.
        expected: usize,
        /// Number of cells found.
        got: usize,
    },
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingColumn { column } => write!(f, "missing required column {column:?}"),
            Self::RaggedRow { row, expected, got } => write!(
                f,
                "row {row} has {got} cell(s), header has {expected} column(s)"
            ),
        }
    }
}

impl std::error::Error for TableError {}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// An in-memory table of optional string cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl Table {
    /// Builds a table, rejecting rows whose width differs from the header.
    ///
    /// Cells are trimmed; cells that are empty after trimming become `None`.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::RaggedRow`] for the first row of the wrong width.
    pub fn new(
        headers: Vec<String>,
        rows: Vec<Vec<Option<String>>>,
    ) -> Result<Self, TableError> {
        let width = headers.len();
        let mut normalized = Vec::with_capacity(rows.len());
        for (row_idx, row) in rows.into_iter().enumerate() {
            if row.len() != width {
                return Err(TableError::RaggedRow {
                    row: row_idx,
                    expected: width,
                    got: row.len(),
                });
            }
            normalized.push(row.into_iter().map(normalize_cell).collect());
        }
        Ok(Self {
            headers: headers.into_iter().map(|h| h.trim().to_owned()).collect(),
            rows: normalized,
        })
    }

    /// Convenience constructor from string slices; `""` cells become `None`.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::RaggedRow`] as for [`Table::new`].
    pub fn from_str_rows(headers: &[&str], rows: &[&[&str]]) -> Result<Self, TableError> {
        Self::new(
            headers.iter().map(|h| (*h).to_owned()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| Some((*c).to_owned())).collect())
                .collect(),
        )
    }

    /// Header names in column order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` when the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Resolves a header name to its column index.
    ///
    /// Matching is case-insensitive. When a header repeats, the first
    /// occurrence wins.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::MissingColumn`] if no header matches.
    pub fn column(&self, name: &str) -> Result<usize, TableError> {
        let wanted = name.trim();
        self.headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(wanted))
            .ok_or_else(|| TableError::MissingColumn {
                column: name.to_owned(),
            })
    }

    /// Returns the cell at (`row`, `col`), or `None` when it is null or out
    /// of range.
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col)?.as_deref()
    }

    /// Iterates over rows as slices of optional cells.
    pub fn rows(&self) -> impl Iterator<Item = &[Option<String>]> {
        self.rows.iter().map(Vec::as_slice)
    }
}

fn normalize_cell(cell: Option<String>) -> Option<String> {
    let s = cell?;
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == s.len() {
        Some(s)
    } else {
        Some(trimmed.to_owned())
    }
}

// ---------------------------------------------------------------------------
// TableColumns
// ---------------------------------------------------------------------------

/// Column names the pipeline reads from the node and edge tables.
///
/// Defaults match the processed knowledge-graph exports the tool was built
/// for: a node table keyed by `node_index`/`node_type` and an edge table with
/// `x_*`/`y_*` endpoint columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableColumns {
    /// Raw node identifier column in the node table.
    pub node_id: String,
    /// Node type column in the node table.
    pub node_type: String,
    /// Source raw identifier column in the edge table.
    pub edge_src: String,
    /// Destination raw identifier column in the edge table.
    pub edge_dst: String,
    /// Relation label column in the edge table.
    pub relation: String,
    /// Source node type column in the edge table.
    pub src_type: String,
    /// Destination node type column in the edge table.
    pub dst_type: String,
}

impl Default for TableColumns {
    fn default() -> Self {
        Self {
            node_id: "node_index".to_owned(),
            node_type: "node_type".to_owned(),
            edge_src: "x_index".to_owned(),
            edge_dst: "y_index".to_owned(),
            relation: "edge_type".to_owned(),
            src_type: "x_type".to_owned(),
            dst_type: "y_type".to_owned(),
        }
    }
}
