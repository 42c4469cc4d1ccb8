/// Table loading for the hetsplit pipeline.
///
/// Reads node and edge tables from CSV, TSV, or Excel `.xlsx` sources into
/// the core's [`hetsplit_core::Table`]. The `csv` and `calamine`
/// dependencies are confined to this crate and do not bleed into
/// `hetsplit-core` or `hetsplit-cli`.
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use calamine::{Reader, Xlsx, open_workbook_from_rs};

use hetsplit_core::Table;

mod delimited;
pub mod error;
mod sheet;

pub use delimited::read_delimited;
pub use error::ImportError;
pub use sheet::cell_to_string;

/// Supported table formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    /// Comma-separated values.
    Csv,
    /// Tab-separated values.
    Tsv,
    /// Excel Open XML workbook.
    Xlsx,
}

impl TableFormat {
    /// Infers the format from a file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(Self::Csv),
            "tsv" | "tab" => Some(Self::Tsv),
            "xlsx" => Some(Self::Xlsx),
            _ => None,
        }
    }
}

/// Reads an `.xlsx` workbook sheet into a [`Table`].
///
/// `sheet` selects a worksheet by name; `None` takes the first one.
///
/// # Errors
///
/// Returns [`ImportError::ExcelRead`] if the workbook cannot be opened,
/// [`ImportError::MissingSheet`] if the sheet does not exist, and
/// [`ImportError::Table`] if the rows are malformed.
pub fn read_xlsx<R: Read + Seek>(reader: R, sheet: Option<&str>) -> Result<Table, ImportError> {
    let mut workbook: Xlsx<R> =
        open_workbook_from_rs(reader).map_err(|e: calamine::XlsxError| ImportError::ExcelRead {
            detail: e.to_string(),
        })?;

    let name = match sheet {
        Some(name) => name.to_owned(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ImportError::MissingSheet {
                sheet: "<first>".to_owned(),
            })?,
    };
    if !workbook.sheet_names().iter().any(|s| *s == name) {
        return Err(ImportError::MissingSheet { sheet: name });
    }

    let range = workbook
        .worksheet_range(&name)
        .map_err(|e| ImportError::ExcelRead {
            detail: e.to_string(),
        })?;
    sheet::range_to_table(&range)
}

/// Loads a table from `path`, choosing the reader from its extension.
///
/// # Errors
///
/// Returns [`ImportError::UnsupportedFormat`] for unknown extensions,
/// [`ImportError::Io`] if the file cannot be opened, and any error of the
/// format-specific reader.
pub fn load_table(path: &Path, sheet: Option<&str>) -> Result<Table, ImportError> {
    let format = TableFormat::from_path(path).ok_or_else(|| ImportError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;
    let file = File::open(path)?;
    match format {
        TableFormat::Csv => read_delimited(BufReader::new(file), b','),
        TableFormat::Tsv => read_delimited(BufReader::new(file), b'\t'),
        TableFormat::Xlsx => read_xlsx(BufReader::new(file), sheet),
    }
}
