//! Errors produced while loading node and edge tables.

use std::path::PathBuf;

use hetsplit_core::TableError;
use thiserror::Error;

/// All error conditions that can occur while loading a table.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The file extension names no supported table format.
    #[error("unsupported table format for {path}: expected .csv, .tsv, or .xlsx")]
    UnsupportedFormat {
        /// The offending path.
        path: PathBuf,
    },

    /// Opening or reading the source failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The CSV reader rejected the input.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// calamine could not open or read the workbook.
    #[error("Excel read error: {detail}")]
    ExcelRead {
        /// Human-readable description of the error.
        detail: String,
    },

    /// The requested worksheet does not exist.
    #[error("missing sheet {sheet:?}")]
    MissingSheet {
        /// Name of the requested sheet.
        sheet: String,
    },

    /// The source has no header row.
    #[error("table has no header row")]
    MissingHeader,

    /// The rows do not form a valid table.
    #[error(transparent)]
    Table(#[from] TableError),
}
