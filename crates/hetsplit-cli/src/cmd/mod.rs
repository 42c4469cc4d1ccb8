/// Command module for the `hetsplit` CLI.
///
/// Each submodule implements one subcommand. The `run` function in each
/// module takes the parsed arguments and returns `Ok(())` on success or
/// a [`crate::error::CliError`] on failure.
pub mod check;
pub mod inspect;
pub mod split;
pub mod version;

use hetsplit_core::PairMode;

use crate::error::CliError;

/// Maps a stdout write failure to [`CliError::IoError`].
pub(crate) fn stdout_error(e: &std::io::Error) -> CliError {
    CliError::IoError {
        source: "stdout".to_owned(),
        detail: e.to_string(),
    }
}

/// Short lowercase name for a [`PairMode`].
pub(crate) fn pair_mode_name(mode: PairMode) -> &'static str {
    match mode {
        PairMode::SelfMirrored => "self-mirrored",
        PairMode::Mirrored => "mirrored",
        PairMode::Directed => "directed",
        PairMode::Empty => "empty",
    }
}
