/// Integrity-report formatting: human-readable and JSON (NDJSON) modes.
///
/// Both modes write one line per [`CheckOutcome`] followed by a summary line:
///
/// - **Human mode** (default): `[FAIL] proportion  validation (gene, gda, disease): ...`,
///   color-coded when stderr is a TTY and colors are not disabled.
/// - **JSON mode**: each outcome is a single-line JSON object.
///
/// Passing checks are printed only in verbose mode; failures always are. The
/// summary is suppressed in quiet mode.
use std::io::{IsTerminal as _, Write};

use hetsplit_core::{CheckKind, CheckOutcome, IntegrityReport};

// ---------------------------------------------------------------------------
// Color support detection
// ---------------------------------------------------------------------------

/// Returns `true` if ANSI color codes should be emitted to stderr.
///
/// Colors are disabled when `--no-color` was passed, when the `NO_COLOR`
/// environment variable is present, or when stderr is not a TTY.
pub fn colors_enabled(no_color_flag: bool) -> bool {
    if no_color_flag {
        return false;
    }
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    std::io::stderr().is_terminal()
}

const ANSI_RED: &str = "\x1b[31m";
const ANSI_GREEN: &str = "\x1b[32m";
const ANSI_RESET: &str = "\x1b[0m";

// ---------------------------------------------------------------------------
// FormatterConfig
// ---------------------------------------------------------------------------

/// Configuration for the report formatter, derived from CLI flags.
#[derive(Debug, Clone)]
pub struct FormatterConfig {
    /// Whether ANSI colors are enabled.
    pub colors: bool,
    /// Suppress the summary line.
    pub quiet: bool,
    /// Also print passing checks.
    pub verbose: bool,
}

impl FormatterConfig {
    /// Constructs a [`FormatterConfig`] from the raw CLI flags.
    pub fn from_flags(no_color_flag: bool, quiet: bool, verbose: bool) -> Self {
        Self {
            colors: colors_enabled(no_color_flag),
            quiet,
            verbose,
        }
    }
}

/// Output format selection, mirroring the CLI `--format` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatMode {
    /// Human-readable, optionally colored output.
    Human,
    /// Structured NDJSON output.
    Json,
}

impl From<crate::OutputFormat> for FormatMode {
    fn from(f: crate::OutputFormat) -> Self {
        match f {
            crate::OutputFormat::Human => FormatMode::Human,
            crate::OutputFormat::Json => FormatMode::Json,
        }
    }
}

// ---------------------------------------------------------------------------
// Report writing
// ---------------------------------------------------------------------------

/// Writes every relevant outcome of `report` plus a summary line.
///
/// # Errors
///
/// Returns an error only if writing to `writer` fails.
pub fn write_report<W: Write>(
    writer: &mut W,
    report: &IntegrityReport,
    mode: FormatMode,
    config: &FormatterConfig,
) -> std::io::Result<()> {
    for outcome in &report.outcomes {
        if outcome.result.is_ok() && !config.verbose {
            continue;
        }
        match mode {
            FormatMode::Human => write_outcome_human(writer, outcome, config)?,
            FormatMode::Json => write_outcome_json(writer, outcome)?,
        }
    }

    if config.quiet {
        return Ok(());
    }
    let failed = report.failures().count();
    let passed = report.checks() - failed;
    match mode {
        FormatMode::Human => writeln!(
            writer,
            "{passed} {} passed, {failed} failed",
            pluralize(passed, "check", "checks"),
        ),
        FormatMode::Json => writeln!(
            writer,
            "{}",
            serde_json::json!({ "summary": { "passed": passed, "failed": failed } })
        ),
    }
}

fn write_outcome_human<W: Write>(
    writer: &mut W,
    outcome: &CheckOutcome,
    config: &FormatterConfig,
) -> std::io::Result<()> {
    let (tag, color, detail) = match &outcome.result {
        Ok(()) => ("[PASS]", ANSI_GREEN, String::new()),
        Err(e) => ("[FAIL]", ANSI_RED, format!(": {e}")),
    };
    let check = check_name(outcome.check);
    let split = outcome.split;
    let relation = &outcome.relation;
    if config.colors {
        writeln!(
            writer,
            "{color}{tag}{ANSI_RESET} {check}  {split} {relation}{detail}"
        )
    } else {
        writeln!(writer, "{tag} {check}  {split} {relation}{detail}")
    }
}

fn write_outcome_json<W: Write>(writer: &mut W, outcome: &CheckOutcome) -> std::io::Result<()> {
    let line = serde_json::json!({
        "check": check_name(outcome.check),
        "split": outcome.split.as_str(),
        "relation": outcome.relation.to_string(),
        "passed": outcome.result.is_ok(),
        "message": outcome.result.as_ref().err().map(ToString::to_string),
    });
    writeln!(writer, "{line}")
}

fn check_name(check: CheckKind) -> &'static str {
    match check {
        CheckKind::SymmetricCounts => "symmetric_counts",
        CheckKind::Proportion => "proportion",
    }
}

fn pluralize<'a>(count: usize, singular: &'a str, plural: &'a str) -> &'a str {
    if count == 1 { singular } else { plural }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
