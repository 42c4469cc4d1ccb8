//! Implementation of `hetsplit split`.
//!
//! Runs the whole pipeline:
//! 1. load the node and edge tables (`hetsplit-import`)
//! 2. build the heterogeneous graph and resolve reverse relations
//! 3. split every relation pair into train / validation / test
//! 4. run the integrity report over the three splits
//! 5. write `full_dataset`, `train`, `validation`, `test` into `--out`
//!
//! The four artifacts are written together or not at all. Nothing is written
//! when any stage fails, including the integrity report.
//!
//! Exit codes: 0 = success, 1 = pipeline or integrity failure,
//! 2 = unreadable input or output directory.
use std::io::Write;
use std::path::{Path, PathBuf};

use hetsplit_core::{
    Artifact, Encoding, IntegrityReport, RelationSplitSummary, SplitConfig,
    SplitOutput, Table, TableColumns, artifact_file_name, build_graph, check_splits,
    encode_artifact, fingerprint, resolve_reverse, split,
};

use crate::OutputFormat;
use crate::cmd::{pair_mode_name, stdout_error};
use crate::error::CliError;
use crate::format::{self, FormatterConfig};
use crate::io::{check_size, write_all_or_nothing};

/// Parsed arguments of `hetsplit split`.
pub struct SplitRequest<'a> {
    /// Node table path.
    pub nodes: &'a Path,
    /// Edge table path.
    pub edges: &'a Path,
    /// Output directory.
    pub out: &'a Path,
    /// Worksheet for an `.xlsx` node table.
    pub nodes_sheet: Option<&'a str>,
    /// Worksheet for an `.xlsx` edge table.
    pub edges_sheet: Option<&'a str>,
    /// Artifact encoding.
    pub encoding: Encoding,
    /// Wrap artifacts in zstd.
    pub compress: bool,
    /// Split parameters.
    pub config: SplitConfig,
    /// Table column names.
    pub columns: TableColumns,
}

/// One artifact written to the output directory.
struct Written {
    stem: &'static str,
    path: PathBuf,
    fingerprint: String,
}

/// Runs the `split` command.
///
/// # Errors
///
/// - exit 2: a table is missing, too large, or unreadable; the output
///   directory cannot be written. No artifact is left behind.
/// - exit 1: graph construction or splitting rejected the input, or the
///   integrity report has failures.
pub fn run(
    req: &SplitRequest<'_>,
    format: OutputFormat,
    max_file_size: u64,
    fmt_config: &FormatterConfig,
) -> Result<(), CliError> {
    let nodes = load(req.nodes, req.nodes_sheet, max_file_size)?;
    let edges = load(req.edges, req.edges_sheet, max_file_size)?;

    let (graph, _mappings) =
        build_graph(&nodes, &edges, &req.columns).map_err(|e| CliError::Pipeline {
            stage: "graph build",
            detail: e.to_string(),
        })?;
    let pairing = resolve_reverse(graph.relation_triplets());
    let output = split(&graph, &pairing, &req.config).map_err(|e| CliError::Pipeline {
        stage: "split",
        detail: e.to_string(),
    })?;
    let report = check_splits(&graph, output.splits(), &pairing);

    let SplitOutput {
        train,
        val,
        test,
        summaries,
    } = output;
    let node_total = graph.total_nodes();
    let edge_total = graph.total_edges();
    let artifacts = [
        Artifact::Graph(graph),
        Artifact::Split(train),
        Artifact::Split(val),
        Artifact::Split(test),
    ];

    let written = if report.is_ok() {
        write_artifacts(&artifacts, req)?
    } else {
        tracing::warn!(out = %req.out.display(), "integrity report failed; no artifacts written");
        Vec::new()
    };

    {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        let view = SplitView {
            nodes: node_total,
            edges: edge_total,
            config: &req.config,
            written: &written,
            summaries: &summaries,
            report: &report,
        };
        match format {
            OutputFormat::Human => print_human(&mut out, &view),
            OutputFormat::Json => print_json(&mut out, &view),
        }
        .map_err(|e| stdout_error(&e))?;
    }

    let stderr = std::io::stderr();
    let mut err = stderr.lock();
    format::write_report(&mut err, &report, format.into(), fmt_config).map_err(|e| {
        CliError::IoError {
            source: "stderr".to_owned(),
            detail: e.to_string(),
        }
    })?;

    if report.is_ok() {
        Ok(())
    } else {
        Err(CliError::IntegrityFailed {
            failures: report.failures().count(),
        })
    }
}

fn load(path: &Path, sheet: Option<&str>, max_file_size: u64) -> Result<Table, CliError> {
    check_size(path, max_file_size)?;
    let table = hetsplit_import::load_table(path, sheet).map_err(|e| CliError::TableLoad {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;
    tracing::debug!(path = %path.display(), rows = table.len(), "loaded table");
    Ok(table)
}

/// Encodes every artifact up front, then writes them all or none.
fn write_artifacts(artifacts: &[Artifact], req: &SplitRequest<'_>) -> Result<Vec<Written>, CliError> {
    let mut files = Vec::with_capacity(artifacts.len());
    let mut prints = Vec::with_capacity(artifacts.len());
    for artifact in artifacts {
        let stem = artifact.stem();
        let encode_error = |e: hetsplit_core::PersistError| CliError::Pipeline {
            stage: "encode",
            detail: format!("{stem}: {e}"),
        };
        let bytes = encode_artifact(artifact, req.encoding, req.compress).map_err(encode_error)?;
        prints.push((stem, fingerprint(artifact).map_err(encode_error)?));
        files.push((artifact_file_name(stem, req.encoding, req.compress), bytes));
    }

    let paths = write_all_or_nothing(req.out, &files)?;
    Ok(prints
        .into_iter()
        .zip(paths)
        .zip(&files)
        .map(|(((stem, fingerprint), path), (_, bytes))| {
            tracing::info!(path = %path.display(), bytes = bytes.len(), "wrote {stem}");
            Written {
                stem,
                path,
                fingerprint,
            }
        })
        .collect())
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

struct SplitView<'a> {
    nodes: usize,
    edges: usize,
    config: &'a SplitConfig,
    written: &'a [Written],
    summaries: &'a [RelationSplitSummary],
    report: &'a IntegrityReport,
}

fn print_human<W: Write>(w: &mut W, view: &SplitView<'_>) -> std::io::Result<()> {
    let c = view.config;
    writeln!(w, "nodes:          {}", view.nodes)?;
    writeln!(w, "edges:          {}", view.edges)?;
    writeln!(
        w,
        "config:         p_val={} p_test={} disjoint_train_ratio={} negative_ratio={} seed={}",
        c.p_val, c.p_test, c.disjoint_train_ratio, c.negative_ratio, c.seed
    )?;
    writeln!(w, "relations:      {}", view.summaries.len())?;
    for s in view.summaries {
        writeln!(
            w,
            "  {} [{}]: total {}, train {} mp / {} sup, validation {}, test {}, negatives {}/{}/{}",
            s.supervised,
            pair_mode_name(s.mode),
            s.total,
            s.train_message_passing,
            s.train_supervision,
            s.validation,
            s.test,
            s.negatives[0],
            s.negatives[1],
            s.negatives[2],
        )?;
    }
    writeln!(w, "artifacts:")?;
    for a in view.written {
        writeln!(w, "  {}: {} ({})", a.stem, a.path.display(), a.fingerprint)?;
    }
    writeln!(
        w,
        "integrity:      {} checks, {} failed",
        view.report.checks(),
        view.report.failures().count()
    )
}

fn print_json<W: Write>(w: &mut W, view: &SplitView<'_>) -> std::io::Result<()> {
    let artifacts: Vec<serde_json::Value> = view
        .written
        .iter()
        .map(|a| {
            serde_json::json!({
                "stem": a.stem,
                "path": a.path.display().to_string(),
                "fingerprint": a.fingerprint,
            })
        })
        .collect();
    let obj = serde_json::json!({
        "nodes": view.nodes,
        "edges": view.edges,
        "config": view.config,
        "relations": view.summaries,
        "artifacts": artifacts,
        "checks": view.report.checks(),
        "failures": view.report.failures().count(),
    });
    writeln!(w, "{obj}")
}
