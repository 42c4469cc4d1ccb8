#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(clippy::wildcard_enum_match_arm)]

use clap::CommandFactory;

use super::*;

/// The root help output must contain all top-level subcommand names.
#[test]
fn test_root_help_lists_all_subcommands() {
    let mut cmd = Cli::command();
    let help = format!("{}", cmd.render_help());

    for name in &["split", "inspect", "check", "version"] {
        assert!(
            help.contains(name),
            "root help should mention subcommand '{name}'"
        );
    }
}

/// The root help output must describe every global flag.
#[test]
fn test_root_help_lists_global_flags() {
    let mut cmd = Cli::command();
    let help = format!("{}", cmd.render_help());

    let expected_flags = [
        "--format",
        "--quiet",
        "--verbose",
        "--max-file-size",
        "--no-color",
        "--help",
        "--version",
    ];
    for flag in &expected_flags {
        assert!(
            help.contains(flag),
            "root help should mention flag '{flag}'"
        );
    }
}

/// `hetsplit split --help` must mention the split knobs and column overrides.
#[test]
fn test_split_help() {
    let mut cmd = Cli::command();
    let sub = cmd
        .find_subcommand_mut("split")
        .expect("split subcommand should exist");
    let help = format!("{}", sub.render_help());
    for flag in &[
        "--nodes",
        "--edges",
        "--out",
        "--p-val",
        "--p-test",
        "--disjoint-train-ratio",
        "--negative-ratio",
        "--seed",
        "--encoding",
        "--compress",
        "--node-id-column",
        "--relation-column",
    ] {
        assert!(help.contains(flag), "split help should mention {flag}");
    }
}

#[test]
fn test_split_defaults_match_split_config_default() {
    let cli = Cli::try_parse_from([
        "hetsplit", "split", "--nodes", "n.csv", "--edges", "e.csv", "--out", "out",
    ])
    .expect("should parse split");
    match cli.command {
        Command::Split {
            split,
            columns,
            encoding,
            compress,
            nodes_sheet,
            ..
        } => {
            assert_eq!(SplitConfig::from(&split), SplitConfig::default());
            assert_eq!(TableColumns::from(&columns), TableColumns::default());
            assert!(matches!(encoding, TargetEncoding::Json));
            assert!(!compress);
            assert!(nodes_sheet.is_none());
        }
        _ => panic!("expected Split subcommand"),
    }
}

#[test]
fn test_split_overrides() {
    let cli = Cli::try_parse_from([
        "hetsplit",
        "split",
        "--nodes",
        "n.xlsx",
        "--nodes-sheet",
        "Nodes",
        "--edges",
        "e.csv",
        "--out",
        "out",
        "--p-val",
        "0.2",
        "--disjoint-train-ratio",
        "0",
        "--seed",
        "42",
        "--encoding",
        "cbor",
        "--compress",
        "--relation-column",
        "display_relation",
    ])
    .expect("should parse split overrides");
    match cli.command {
        Command::Split {
            split,
            columns,
            encoding,
            compress,
            nodes_sheet,
            ..
        } => {
            let config = SplitConfig::from(&split);
            assert!((config.p_val - 0.2).abs() < f64::EPSILON);
            assert!(!config.is_disjoint());
            assert_eq!(config.seed, 42);
            assert_eq!(columns.relation_column, "display_relation");
            assert!(matches!(encoding, TargetEncoding::Cbor));
            assert_eq!(Encoding::from(encoding), Encoding::Cbor);
            assert!(compress);
            assert_eq!(nodes_sheet.as_deref(), Some("Nodes"));
        }
        _ => panic!("expected Split subcommand"),
    }
}

#[test]
fn test_split_requires_tables_and_out() {
    let result = Cli::try_parse_from(["hetsplit", "split", "--nodes", "n.csv"]);
    assert!(result.is_err(), "missing --edges/--out should be rejected");
}

#[test]
fn test_inspect_stdin_sentinel() {
    let cli = Cli::try_parse_from(["hetsplit", "inspect", "-"]).expect("should parse inspect -");
    match cli.command {
        Command::Inspect { file } => assert!(matches!(file, PathOrStdin::Stdin)),
        _ => panic!("expected Inspect subcommand"),
    }
}

#[test]
fn test_check_takes_directory() {
    let cli = Cli::try_parse_from(["hetsplit", "check", "splits/"]).expect("should parse check");
    match cli.command {
        Command::Check { dir } => assert_eq!(dir, PathBuf::from("splits/")),
        _ => panic!("expected Check subcommand"),
    }
}

#[test]
fn test_quiet_conflicts_with_verbose() {
    let result = Cli::try_parse_from(["hetsplit", "-q", "-v", "version"]);
    assert!(result.is_err(), "--quiet and --verbose must conflict");
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
        "hetsplit",
        "inspect",
        "train.json",
        "--format",
        "json",
        "--max-file-size",
        "1024",
    ])
    .expect("global flags should be accepted after the subcommand");
    assert!(matches!(cli.format, OutputFormat::Json));
    assert_eq!(cli.max_file_size, 1024);
}
