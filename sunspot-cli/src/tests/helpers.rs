//! Argument builders shared by the CLI tests.

use super::*;
use crate::venues::VenuesArgs;

/// Arguments covering a small box in central Berlin.
pub(super) fn berlin_args() -> VenuesArgs {
    VenuesArgs {
        south: Some(52.52),
        west: Some(13.40),
        north: Some(52.53),
        east: Some(13.41),
        ..VenuesArgs::default()
    }
}

/// Parse `flags` as a `sunspot venues` invocation.
pub(super) fn parse_venues(flags: &[&str]) -> Result<VenuesArgs, CliError> {
    let mut argv = vec!["sunspot", "venues"];
    argv.extend_from_slice(flags);
    let cli = Cli::try_parse_from(argv)?;
    match cli.command {
        Command::Venues(args) => Ok(args),
    }
}
