/// File and stdin I/O with size enforcement.
///
/// This module is the single entry point for all filesystem access in the
/// `hetsplit` binary. `hetsplit-core` never touches the filesystem; tables
/// are loaded through `hetsplit-import` and artifacts are handed to the core
/// as byte buffers.
///
/// Key behaviours:
/// - Disk files: size checked via `std::fs::metadata` before any read.
/// - Stdin: buffered with a `Read::take` cap so allocation is bounded.
/// - All read errors are converted to [`CliError`] variants with exit code 2.
use std::io::Read as _;
use std::path::{Path, PathBuf};

use hetsplit_core::{Encoding, artifact_file_name};

use crate::PathOrStdin;
use crate::error::CliError;

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

/// Reads the entire contents of `source` into memory.
///
/// # Errors
///
/// Returns [`CliError`] (exit code 2) for a missing file, denied permission,
/// input over `max_size`, or any other I/O error.
pub fn read_input(source: &PathOrStdin, max_size: u64) -> Result<Vec<u8>, CliError> {
    match source {
        PathOrStdin::Path(path) => read_file(path, max_size),
        PathOrStdin::Stdin => read_stdin(max_size),
    }
}

/// Fails unless `path` exists and is at most `max_size` bytes.
///
/// Used before handing a table path to the importer, which opens the file
/// itself.
///
/// # Errors
///
/// Returns [`CliError::FileNotFound`], [`CliError::PermissionDenied`],
/// [`CliError::FileTooLarge`], or [`CliError::IoError`].
pub fn check_size(path: &Path, max_size: u64) -> Result<(), CliError> {
    let file_size = std::fs::metadata(path)
        .map_err(|e| io_error_to_cli(&e, path))?
        .len();
    if file_size > max_size {
        return Err(CliError::FileTooLarge {
            source: path.display().to_string(),
            limit: max_size,
            actual: Some(file_size),
        });
    }
    Ok(())
}

fn read_file(path: &Path, max_size: u64) -> Result<Vec<u8>, CliError> {
    check_size(path, max_size)?;
    std::fs::read(path).map_err(|e| io_error_to_cli(&e, path))
}

/// Reads stdin, capped at `max_size` bytes.
///
/// One byte past the cap is requested so that "exactly at the limit" and
/// "over the limit" can be told apart.
fn read_stdin(max_size: u64) -> Result<Vec<u8>, CliError> {
    let stdin = std::io::stdin();
    let mut buf: Vec<u8> = Vec::new();
    stdin
        .lock()
        .take(max_size.saturating_add(1))
        .read_to_end(&mut buf)
        .map_err(|e| CliError::IoError {
            source: "-".to_owned(),
            detail: e.to_string(),
        })?;

    if buf.len() as u64 > max_size {
        return Err(CliError::FileTooLarge {
            source: "-".to_owned(),
            limit: max_size,
            actual: None,
        });
    }
    Ok(buf)
}

/// Maps a `std::io::Error` arising from a disk-file operation to a [`CliError`].
pub fn io_error_to_cli(e: &std::io::Error, path: &Path) -> CliError {
    match e.kind() {
        std::io::ErrorKind::NotFound => CliError::FileNotFound {
            path: path.to_path_buf(),
        },
        std::io::ErrorKind::PermissionDenied => CliError::PermissionDenied {
            path: path.to_path_buf(),
        },
        // Everything else is reported verbatim. The common kinds are listed
        // to satisfy the exhaustiveness lint.
        std::io::ErrorKind::AlreadyExists
        | std::io::ErrorKind::NotADirectory
        | std::io::ErrorKind::IsADirectory
        | std::io::ErrorKind::DirectoryNotEmpty
        | std::io::ErrorKind::ReadOnlyFilesystem
        | std::io::ErrorKind::InvalidInput
        | std::io::ErrorKind::InvalidData
        | std::io::ErrorKind::TimedOut
        | std::io::ErrorKind::WriteZero
        | std::io::ErrorKind::StorageFull
        | std::io::ErrorKind::QuotaExceeded
        | std::io::ErrorKind::FileTooLarge
        | std::io::ErrorKind::ResourceBusy
        | std::io::ErrorKind::Interrupted
        | std::io::ErrorKind::Unsupported
        | std::io::ErrorKind::UnexpectedEof
        | std::io::ErrorKind::OutOfMemory
        | std::io::ErrorKind::Other
        | _ => CliError::IoError {
            source: path.display().to_string(),
            detail: e.to_string(),
        },
    }
}

// ---------------------------------------------------------------------------
// Split directories
// ---------------------------------------------------------------------------

/// Creates `dir` (and its parents) if missing.
///
/// # Errors
///
/// Returns [`CliError::PermissionDenied`] or [`CliError::IoError`].
pub fn ensure_dir(dir: &Path) -> Result<(), CliError> {
    std::fs::create_dir_all(dir).map_err(|e| io_error_to_cli(&e, dir))
}

/// Writes `bytes` to `dir/file_name`, replacing any existing file.
///
/// # Errors
///
/// Returns [`CliError::PermissionDenied`] or [`CliError::IoError`].
pub fn write_file(dir: &Path, file_name: &str, bytes: &[u8]) -> Result<PathBuf, CliError> {
    let path = dir.join(file_name);
    std::fs::write(&path, bytes).map_err(|e| io_error_to_cli(&e, &path))?;
    Ok(path)
}

/// Writes every `(file_name, bytes)` pair into `dir`, or none of them.
///
/// Files are first written to a staging directory inside `dir`, then renamed
/// into place. If a rename fails, the files already moved are removed again.
/// The staging directory is removed on every path.
///
/// # Errors
///
/// Returns [`CliError::PermissionDenied`] or [`CliError::IoError`] for the
/// first write or rename that fails.
pub fn write_all_or_nothing(
    dir: &Path,
    files: &[(String, Vec<u8>)],
) -> Result<Vec<PathBuf>, CliError> {
    ensure_dir(dir)?;
    let staging = tempfile::Builder::new()
        .prefix(".hetsplit-staging-")
        .tempdir_in(dir)
        .map_err(|e| io_error_to_cli(&e, dir))?;
    for (name, bytes) in files {
        write_file(staging.path(), name, bytes)?;
    }

    let mut placed: Vec<PathBuf> = Vec::with_capacity(files.len());
    for (name, _) in files {
        let target = dir.join(name);
        if let Err(e) = std::fs::rename(staging.path().join(name), &target) {
            for path in &placed {
                if let Err(cleanup) = std::fs::remove_file(path) {
                    tracing::warn!(path = %path.display(), "cannot remove partial output: {cleanup}");
                }
            }
            return Err(io_error_to_cli(&e, &target));
        }
        placed.push(target);
    }
    Ok(placed)
}

/// Locates the artifact saved under `stem` in `dir`, whatever its encoding.
///
/// Candidates are tried in a fixed order: JSON, CBOR, then their compressed
/// forms.
///
/// # Errors
///
/// Returns [`CliError::MissingArtifact`] if no candidate exists.
pub fn find_artifact(dir: &Path, stem: &str) -> Result<PathBuf, CliError> {
    let candidates = [
        (Encoding::Json, false),
        (Encoding::Cbor, false),
        (Encoding::Json, true),
        (Encoding::Cbor, true),
    ];
    candidates
        .iter()
        .map(|&(encoding, compress)| dir.join(artifact_file_name(stem, encoding, compress)))
        .find(|p| p.is_file())
        .ok_or_else(|| CliError::MissingArtifact {
            dir: dir.to_path_buf(),
            stem: stem.to_owned(),
        })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
