/// Worksheet-to-table conversion for `.xlsx` sources.
///
/// The first row is the header. Fully blank rows are skipped, so trailing
/// formatting in a workbook does not produce null-filled records.
use calamine::{Data, Range};

use hetsplit_core::Table;

use crate::error::ImportError;

/// Converts a `calamine::Data` cell to a trimmed `String`.
///
/// Returns an empty string for empty, blank, or error cells.
pub fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_owned(),
        Data::Float(f) => {
            // Numeric identifiers are stored as floats; keep them integral.
            if *f == f.floor() && f.abs() < 1e15 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(_) => String::new(),
        Data::Empty => String::new(),
    }
}

/// Builds a [`Table`] from a worksheet range.
pub fn range_to_table(range: &Range<Data>) -> Result<Table, ImportError> {
    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .ok_or(ImportError::MissingHeader)?
        .iter()
        .map(cell_to_string)
        .collect();

    let body: Vec<Vec<Option<String>>> = rows
        .map(|row| row.iter().map(cell_to_string).collect::<Vec<_>>())
        .filter(|cells| cells.iter().any(|c| !c.is_empty()))
        .map(|cells| cells.into_iter().map(Some).collect())
        .collect();

    Ok(Table::new(headers, body)?)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;

    #[test]
    fn whole_floats_render_as_integers() {
        assert_eq!(cell_to_string(&Data::Float(42.0)), "42");
        assert_eq!(cell_to_string(&Data::Float(1.5)), "1.5");
        assert_eq!(cell_to_string(&Data::Int(-3)), "-3");
    }

    #[test]
    fn strings_are_trimmed_and_empties_blank() {
        assert_eq!(cell_to_string(&Data::String("  gene ".into())), "gene");
        assert_eq!(cell_to_string(&Data::Empty), "");
    }

    #[test]
    fn range_becomes_table_without_blank_rows() {
        let mut range: Range<Data> = Range::new((0, 0), (3, 1));
        range.set_value((0, 0), Data::String("node_index".into()));
        range.set_value((0, 1), Data::String("node_type".into()));
        range.set_value((1, 0), Data::Float(7.0));
        range.set_value((1, 1), Data::String("gene".into()));
        range.set_value((3, 0), Data::String("d1".into()));
        range.set_value((3, 1), Data::String("disease".into()));

        let table = range_to_table(&range).expect("table");
        assert_eq!(table.headers(), ["node_index", "node_type"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.cell(0, 0), Some("7"));
        assert_eq!(table.cell(1, 1), Some("disease"));
    }

    #[test]
    fn empty_range_has_no_header() {
        let range: Range<Data> = Range::empty();
        let err = range_to_table(&range).expect_err("no header");
        assert!(matches!(err, ImportError::MissingHeader));
    }
}
