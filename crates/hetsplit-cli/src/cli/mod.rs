//! Clap CLI definition: root struct, subcommands, and shared argument types.
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use hetsplit_core::{Encoding, SplitConfig, TableColumns};

/// A CLI argument that is either a filesystem path or the stdin sentinel `"-"`.
///
/// Parsing `"-"` yields [`PathOrStdin::Stdin`]; anything else yields
/// [`PathOrStdin::Path`].
#[derive(Clone, Debug)]
pub enum PathOrStdin {
    /// Read from standard input.
    Stdin,
    /// Read from the given filesystem path.
    Path(PathBuf),
}

impl std::str::FromStr for PathOrStdin {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "-" {
            Ok(PathOrStdin::Stdin)
        } else {
            Ok(PathOrStdin::Path(PathBuf::from(s)))
        }
    }
}

impl std::fmt::Display for PathOrStdin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathOrStdin::Stdin => f.write_str("-"),
            PathOrStdin::Path(p) => write!(f, "{}", p.display()),
        }
    }
}

/// Output format for CLI commands.
///
/// `Human` emits aligned key/value lines to stdout and colored check results
/// to stderr. `Json` emits a single JSON object to stdout and NDJSON check
/// results to stderr.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable, optionally colored output (default).
    Human,
    /// Structured JSON / NDJSON output.
    Json,
}

/// Target serialization encoding for written artifacts.
///
/// Only `json` and `cbor` are valid targets; zstd is the compression layer,
/// not an encoding, and is controlled separately via `--compress`.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum TargetEncoding {
    /// JSON encoding (default).
    Json,
    /// CBOR encoding with self-describing tag 55799.
    Cbor,
}

impl From<TargetEncoding> for Encoding {
    fn from(t: TargetEncoding) -> Self {
        match t {
            TargetEncoding::Json => Encoding::Json,
            TargetEncoding::Cbor => Encoding::Cbor,
        }
    }
}

/// Split proportions, negative sampling, and seed for `hetsplit split`.
#[derive(Args, Debug, Clone)]
pub struct SplitArgs {
    /// Fraction of each relation held out for validation.
    #[arg(long, env = "HETSPLIT_P_VAL", default_value = "0.1")]
    pub p_val: f64,

    /// Fraction of each relation held out for testing.
    #[arg(long, env = "HETSPLIT_P_TEST", default_value = "0.1")]
    pub p_test: f64,

    /// Fraction of train edges used only as supervision (0 disables).
    #[arg(long, env = "HETSPLIT_DISJOINT_TRAIN_RATIO", default_value = "0.2")]
    pub disjoint_train_ratio: f64,

    /// Negatives drawn per positive supervision edge.
    #[arg(long, env = "HETSPLIT_NEGATIVE_RATIO", default_value = "1.0")]
    pub negative_ratio: f64,

    /// Seed for the split's random generator.
    #[arg(long, env = "HETSPLIT_SEED", default_value = "0")]
    pub seed: u64,
}

impl From<&SplitArgs> for SplitConfig {
    fn from(a: &SplitArgs) -> Self {
        SplitConfig {
            p_val: a.p_val,
            p_test: a.p_test,
            disjoint_train_ratio: a.disjoint_train_ratio,
            negative_ratio: a.negative_ratio,
            seed: a.seed,
        }
    }
}

/// Column-name overrides for the node and edge tables.
#[derive(Args, Debug, Clone)]
pub struct ColumnArgs {
    /// Raw node identifier column in the node table.
    #[arg(long, default_value = "node_index", value_name = "NAME")]
    pub node_id_column: String,

    /// Node type column in the node table.
    #[arg(long, default_value = "node_type", value_name = "NAME")]
    pub node_type_column: String,

    /// Source identifier column in the edge table.
    #[arg(long, default_value = "x_index", value_name = "NAME")]
    pub src_column: String,

    /// Destination identifier column in the edge table.
    #[arg(long, default_value = "y_index", value_name = "NAME")]
    pub dst_column: String,

    /// Relation label column in the edge table.
    #[arg(long, default_value = "edge_type", value_name = "NAME")]
    pub relation_column: String,

    /// Source node type column in the edge table.
    #[arg(long, default_value = "x_type", value_name = "NAME")]
    pub src_type_column: String,

    /// Destination node type column in the edge table.
    #[arg(long, default_value = "y_type", value_name = "NAME")]
    pub dst_type_column: String,
}

impl From<&ColumnArgs> for TableColumns {
    fn from(c: &ColumnArgs) -> Self {
        TableColumns {
            node_id: c.node_id_column.clone(),
            node_type: c.node_type_column.clone(),
            edge_src: c.src_column.clone(),
            edge_dst: c.dst_column.clone(),
            relation: c.relation_column.clone(),
            src_type: c.src_type_column.clone(),
            dst_type: c.dst_type_column.clone(),
        }
    }
}

/// All top-level subcommands exposed by the `hetsplit` binary.
#[derive(Subcommand)]
pub enum Command {
    /// Build a heterogeneous graph from node and edge tables and split its
    /// links into train, validation, and test sets.
    Split {
        /// Node table (.csv, .tsv, or .xlsx).
        #[arg(long, value_name = "TABLE")]
        nodes: PathBuf,
        /// Edge table (.csv, .tsv, or .xlsx).
        #[arg(long, value_name = "TABLE")]
        edges: PathBuf,
        /// Output directory; created if missing.
        #[arg(long, value_name = "DIR")]
        out: PathBuf,
        /// Worksheet to read when the node table is .xlsx (default: first).
        #[arg(long, value_name = "SHEET")]
        nodes_sheet: Option<String>,
        /// Worksheet to read when the edge table is .xlsx (default: first).
        #[arg(long, value_name = "SHEET")]
        edges_sheet: Option<String>,
        /// Artifact encoding: json (default) or cbor.
        #[arg(long, default_value = "json", value_enum)]
        encoding: TargetEncoding,
        /// Compress artifacts with zstd after serialization.
        #[arg(long)]
        compress: bool,
        #[command(flatten)]
        split: SplitArgs,
        #[command(flatten)]
        columns: ColumnArgs,
    },

    /// Print summary statistics for a persisted graph or split.
    Inspect {
        /// Path to an artifact, or `-` for stdin.
        #[arg(value_name = "FILE")]
        file: PathOrStdin,
    },

    /// Reload a split directory and rerun the integrity checks.
    Check {
        /// Directory written by `hetsplit split`.
        #[arg(value_name = "DIR")]
        dir: PathBuf,
    },

    /// Print the hetsplit-core library version.
    Version,
}

/// Root CLI struct for the `hetsplit` binary.
///
/// All global flags are defined here and marked `global = true` so that clap
/// propagates them to every subcommand.
#[derive(Parser)]
#[command(
    name = "hetsplit",
    version,
    about = "Heterogeneous graph construction and link splitting",
    long_about = "Builds a typed multi-relational graph from node and edge tables,\n\
                  splits its links into train/validation/test sets without leakage,\n\
                  and verifies and inspects the persisted splits."
)]
pub struct Cli {
    /// Active subcommand.
    #[command(subcommand)]
    pub command: Command,

    /// Output format: human (default) or json.
    #[arg(long, short = 'f', default_value = "human", global = true)]
    pub format: OutputFormat,

    /// Suppress all stderr output except errors (incompatible with `--verbose`).
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log per-relation split sizes to stderr (incompatible with `--quiet`).
    #[arg(long, short = 'v', global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Maximum input file size in bytes.
    ///
    /// Can also be set via the `HETSPLIT_MAX_FILE_SIZE` environment variable.
    /// The CLI flag takes precedence over the environment variable.
    /// Default: 1073741824 (1 GiB).
    #[arg(
        long,
        global = true,
        env = "HETSPLIT_MAX_FILE_SIZE",
        default_value = "1073741824"
    )]
    pub max_file_size: u64,

    /// Disable ANSI color codes in human output.
    ///
    /// Also respects the `NO_COLOR` environment variable per
    /// <https://no-color.org>.
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,
}

#[cfg(test)]
mod tests;
