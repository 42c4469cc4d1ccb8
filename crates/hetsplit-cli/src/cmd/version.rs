//! Implementation of `hetsplit version`.
use std::io::Write as _;

use crate::OutputFormat;
use crate::cmd::stdout_error;
use crate::error::CliError;

/// Prints the hetsplit-core library version.
///
/// # Errors
///
/// Returns [`CliError::IoError`] if stdout cannot be written.
pub fn run(format: OutputFormat) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Human => writeln!(out, "{}", hetsplit_core::version()),
        OutputFormat::Json => writeln!(
            out,
            "{}",
            serde_json::json!({ "version": hetsplit_core::version() })
        ),
    }
    .map_err(|e| stdout_error(&e))
}
