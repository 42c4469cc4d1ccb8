/// Delimited-text (CSV/TSV) table loading.
///
/// The first record is the header. Records are read with the `csv` crate in
/// flexible mode so a short or long row surfaces as a
/// [`hetsplit_core::TableError::RaggedRow`] with its data-row index rather
/// than a reader-level error.
use std::io::Read;

use hetsplit_core::Table;

use crate::error::ImportError;

/// Reads a headered delimited table from `reader`.
pub fn read_delimited<R: Read>(reader: R, delimiter: u8) -> Result<Table, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_owned).collect();
    if headers.is_empty() {
        return Err(ImportError::MissingHeader);
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(|c| Some(c.to_owned())).collect());
    }

    Ok(Table::new(headers, rows)?)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use hetsplit_core::TableError;

    use super::*;

    #[test]
    fn reads_headers_and_nulls() {
        let input = "node_index,node_type,node_name\n\
                     9796,gene_protein,PHYHIP\n\
                     7918,,GPANK1\n";
        let table = read_delimited(input.as_bytes(), b',').expect("table");
        assert_eq!(table.headers(), ["node_index", "node_type", "node_name"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.cell(0, 1), Some("gene_protein"));
        assert_eq!(table.cell(1, 1), None);
    }

    #[test]
    fn quoted_cells_keep_commas() {
        let input = "id,name\n1,\"a, b\"\n";
        let table = read_delimited(input.as_bytes(), b',').expect("table");
        assert_eq!(table.cell(0, 1), Some("a, b"));
    }

    #[test]
    fn tab_delimiter() {
        let input = "x_index\ty_index\n1\t2\n";
        let table = read_delimited(input.as_bytes(), b'\t').expect("table");
        assert_eq!(table.cell(0, 1), Some("2"));
    }

    #[test]
    fn ragged_row_reports_data_row() {
        let input = "a,b\n1,2\n3\n";
        let err = read_delimited(input.as_bytes(), b',').expect_err("ragged");
        assert!(
            matches!(
                err,
                ImportError::Table(TableError::RaggedRow {
                    row: 1,
                    expected: 2,
                    got: 1
                })
            ),
            "{err}"
        );
    }

    #[test]
    fn empty_input_has_no_header() {
        let err = read_delimited("".as_bytes(), b',').expect_err("empty");
        assert!(matches!(err, ImportError::MissingHeader), "{err}");
    }
}
