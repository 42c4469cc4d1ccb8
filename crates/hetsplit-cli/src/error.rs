/// CLI error types with associated exit codes.
///
/// [`CliError`] is the top-level error type for the `hetsplit` binary. Every
/// variant maps to a stable exit code (1 or 2) via [`CliError::exit_code`]:
///
/// - Exit code **2**: input failure: a table or artifact could not be read
///   or decoded. These errors terminate before any graph is built.
/// - Exit code **1**: logical failure: the inputs were read but the pipeline
///   rejected them, or the integrity report found a violation.
use std::fmt;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// CliError
// ---------------------------------------------------------------------------

/// All error conditions that the `hetsplit` CLI can produce.
///
/// Use [`CliError::exit_code`] to obtain the exit code associated with each
/// variant. [`CliError::message`] returns the human-readable error string
/// that should be printed to stderr before exiting.
#[derive(Debug)]
pub enum CliError {
    // --- Exit code 2: input failures ---
    /// A file argument could not be found on the filesystem.
    FileNotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// The process lacks permission to read or write a path.
    PermissionDenied {
        /// The offending path.
        path: PathBuf,
    },

    /// The input exceeds the configured `--max-file-size` limit.
    FileTooLarge {
        /// The filesystem path.
        source: String,
        /// The configured size limit in bytes.
        limit: u64,
        /// The actual size in bytes, if known.
        actual: Option<u64>,
    },

    /// A node or edge table could not be loaded.
    TableLoad {
        /// The table path.
        path: PathBuf,
        /// The loader's error message.
        detail: String,
    },

    /// A persisted artifact could not be decoded.
    Decode {
        /// The artifact path.
        path: PathBuf,
        /// The decoder's error message.
        detail: String,
    },

    /// A split directory is missing one of its standard artifacts.
    MissingArtifact {
        /// The directory searched.
        dir: PathBuf,
        /// The stem that was not found (e.g. `"validation"`).
        stem: String,
    },

    /// A generic I/O error not covered by the more specific variants above.
    IoError {
        /// A human-readable label for the source.
        source: String,
        /// The underlying I/O error message.
        detail: String,
    },

    // --- Exit code 1: logical failures ---
    /// Graph construction, splitting, or encoding rejected the input.
    Pipeline {
        /// The pipeline stage that failed.
        stage: &'static str,
        /// The underlying error message.
        detail: String,
    },

    /// The stored splits pass the integrity report but differ from a fresh
    /// split made with their own configuration.
    NotReproducible {
        /// The seed recorded in the splits.
        seed: u64,
    },

    /// The integrity report contains one or more failed checks.
    ///
    /// The failures have already been printed; this variant exists so
    /// `main` can call `process::exit(1)` cleanly.
    IntegrityFailed {
        /// Number of failed checks.
        failures: usize,
    },
}

impl CliError {
    /// Returns the process exit code for this error.
    ///
    /// - `2`: input failure (file not found, unreadable table, etc.).
    /// - `1`: logical failure (pipeline error, integrity failure).
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FileNotFound { .. }
            | Self::PermissionDenied { .. }
            | Self::FileTooLarge { .. }
            | Self::TableLoad { .. }
            | Self::Decode { .. }
            | Self::MissingArtifact { .. }
            | Self::IoError { .. } => 2,

            Self::Pipeline { .. } | Self::NotReproducible { .. } | Self::IntegrityFailed { .. } => 1,
        }
    }

    /// Returns a human-readable error message suitable for printing to stderr.
    pub fn message(&self) -> String {
        match self {
            Self::FileNotFound { path } => {
                format!("error: file not found: {}", path.display())
            }
            Self::PermissionDenied { path } => {
                format!("error: permission denied: {}", path.display())
            }
            Self::FileTooLarge {
                source,
                limit,
                actual: Some(actual),
            } => {
                format!("error: file too large: {source} is {actual} bytes, limit is {limit} bytes")
            }
            Self::FileTooLarge {
                source,
                limit,
                actual: None,
            } => {
                format!("error: file too large: {source} exceeded limit of {limit} bytes")
            }
            Self::TableLoad { path, detail } => {
                format!("error: cannot load table {}: {detail}", path.display())
            }
            Self::Decode { path, detail } => {
                format!("error: cannot decode {}: {detail}", path.display())
            }
            Self::MissingArtifact { dir, stem } => {
                format!("error: no {stem} artifact in {}", dir.display())
            }
            Self::IoError { source, detail } => {
                format!("error: I/O error on {source}: {detail}")
            }
            Self::Pipeline { stage, detail } => {
                format!("error: {stage} failed: {detail}")
            }
            Self::NotReproducible { seed } => {
                format!("error: stored splits are not reproducible with seed {seed}")
            }
            Self::IntegrityFailed { failures } => {
                format!("error: integrity check failed with {failures} violation(s)")
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for CliError {}
