//! Implementation of `hetsplit check <dir>`.
//!
//! Reloads `full_dataset`, `train`, `validation` and `test` from a split
//! directory (any encoding), reruns the integrity report with the split
//! configuration persisted in the splits, and re-splits the full graph with
//! that configuration to report whether the stored splits are reproducible.
//!
//! Exit codes: 0 = all checks pass, 1 = integrity failure or inconsistent
//! splits, 2 = missing or undecodable artifact.
use std::io::Write;
use std::path::Path;

use hetsplit_core::{
    Artifact, FULL_DATASET_STEM, HeteroGraph, IntegrityReport, SplitConfig, SplitGraph, SplitKind,
    check_splits, decode_artifact, resolve_reverse, split,
};

use crate::cmd::stdout_error;
use crate::error::CliError;
use crate::format::{self, FormatterConfig};
use crate::io::{find_artifact, read_input};
use crate::{OutputFormat, PathOrStdin};

/// Runs the `check` command.
///
/// # Errors
///
/// - exit 2: an artifact is missing, unreadable, or of the wrong kind.
/// - exit 1: the splits disagree on their configuration, the integrity
///   report has failures, or a fresh split differs from the stored one.
pub fn run(
    dir: &Path,
    format: OutputFormat,
    max_file_size: u64,
    fmt_config: &FormatterConfig,
) -> Result<(), CliError> {
    let full = load_graph(dir, max_file_size)?;
    let train = load_split(dir, SplitKind::Train, max_file_size)?;
    let val = load_split(dir, SplitKind::Validation, max_file_size)?;
    let test = load_split(dir, SplitKind::Test, max_file_size)?;

    let config = train.config;
    if val.config != config || test.config != config {
        return Err(CliError::Pipeline {
            stage: "check",
            detail: "splits were produced with different configurations".to_owned(),
        });
    }

    let pairing = resolve_reverse(full.relation_triplets());
    let report = check_splits(&full, [&train, &val, &test], &pairing);

    let reproducible = match split(&full, &pairing, &config) {
        Ok(again) => again.train == train && again.val == val && again.test == test,
        Err(e) => {
            tracing::warn!("re-splitting with the stored configuration failed: {e}");
            false
        }
    };
    if !reproducible {
        tracing::warn!(seed = config.seed, "stored splits differ from a fresh split");
    }

    {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        match format {
            OutputFormat::Human => print_human(&mut out, dir, &config, &report, reproducible),
            OutputFormat::Json => print_json(&mut out, dir, &config, &report, reproducible),
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

    if !report.is_ok() {
        return Err(CliError::IntegrityFailed {
            failures: report.failures().count(),
        });
    }
    if !reproducible {
        return Err(CliError::NotReproducible { seed: config.seed });
    }
    Ok(())
}

fn load(dir: &Path, stem: &str, max_file_size: u64) -> Result<Artifact, CliError> {
    let path = find_artifact(dir, stem)?;
    let bytes = read_input(&PathOrStdin::Path(path.clone()), max_file_size)?;
    decode_artifact(&bytes, max_file_size).map_err(|e| CliError::Decode {
        path,
        detail: e.to_string(),
    })
}

fn load_graph(dir: &Path, max_file_size: u64) -> Result<HeteroGraph, CliError> {
    let artifact = load(dir, FULL_DATASET_STEM, max_file_size)?;
    let stem = artifact.stem();
    artifact.into_graph().ok_or_else(|| CliError::Decode {
        path: dir.join(FULL_DATASET_STEM),
        detail: format!("expected the full graph, found a {stem} split"),
    })
}

fn load_split(dir: &Path, kind: SplitKind, max_file_size: u64) -> Result<SplitGraph, CliError> {
    let artifact = load(dir, kind.as_str(), max_file_size)?;
    let stem = artifact.stem();
    match artifact.into_split() {
        Some(s) if s.kind == kind => Ok(s),
        Some(_) | None => Err(CliError::Decode {
            path: dir.join(kind.as_str()),
            detail: format!("expected the {kind} split, found {stem}"),
        }),
    }
}

fn print_human<W: Write>(
    w: &mut W,
    dir: &Path,
    config: &SplitConfig,
    report: &IntegrityReport,
    reproducible: bool,
) -> std::io::Result<()> {
    writeln!(w, "directory:      {}", dir.display())?;
    writeln!(w, "seed:           {}", config.seed)?;
    writeln!(w, "checks:         {}", report.checks())?;
    writeln!(w, "failures:       {}", report.failures().count())?;
    writeln!(
        w,
        "reproducible:   {}",
        if reproducible { "yes" } else { "no" }
    )
}

fn print_json<W: Write>(
    w: &mut W,
    dir: &Path,
    config: &SplitConfig,
    report: &IntegrityReport,
    reproducible: bool,
) -> std::io::Result<()> {
    let obj = serde_json::json!({
        "directory": dir.display().to_string(),
        "config": config,
        "checks": report.checks(),
        "failures": report.failures().count(),
        "reproducible": reproducible,
    });
    writeln!(w, "{obj}")
}
