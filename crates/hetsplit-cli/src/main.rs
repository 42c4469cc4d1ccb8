mod cli;
mod cmd;
mod error;
mod format;
mod io;

use clap::Parser;
use tracing_subscriber::EnvFilter;

pub use cli::{Cli, Command, OutputFormat, PathOrStdin};

use crate::error::CliError;
use crate::format::FormatterConfig;

/// Installs the stderr log subscriber.
///
/// `RUST_LOG` wins when set; otherwise `--verbose` selects `debug`,
/// `--quiet` selects `error`, and the default is `info`.
fn init_tracing(verbose: bool, quiet: bool, colors: bool) {
    let level = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(colors)
        .init();
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let fmt_config = FormatterConfig::from_flags(cli.no_color, cli.quiet, cli.verbose);

    match &cli.command {
        Command::Split {
            nodes,
            edges,
            out,
            nodes_sheet,
            edges_sheet,
            encoding,
            compress,
            split,
            columns,
        } => {
            let request = cmd::split::SplitRequest {
                nodes,
                edges,
                out,
                nodes_sheet: nodes_sheet.as_deref(),
                edges_sheet: edges_sheet.as_deref(),
                encoding: (*encoding).into(),
                compress: *compress,
                config: split.into(),
                columns: columns.into(),
            };
            cmd::split::run(&request, cli.format, cli.max_file_size, &fmt_config)
        }
        Command::Inspect { file } => cmd::inspect::run(file, cli.format, cli.max_file_size),
        Command::Check { dir } => {
            cmd::check::run(dir, cli.format, cli.max_file_size, &fmt_config)
        }
        Command::Version => cmd::version::run(cli.format),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet, format::colors_enabled(cli.no_color));

    if let Err(e) = run(&cli) {
        #[allow(clippy::print_stderr)]
        {
            eprintln!("{}", e.message());
        }
        std::process::exit(e.exit_code());
    }
}
