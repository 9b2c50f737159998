//! Command-line interface for one-off sunlight analyses.
//!
//! `sunspot venues` fetches the venues inside a bounding box, classifies
//! their sunlight exposure and prints the result as JSON. Options merge from
//! CLI flags, `SUNSPOT_*` environment variables and configuration files.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod venues;

pub use error::CliError;
pub use venues::MAX_BBOX_SPAN_DEGREES;

pub(crate) const ARG_SOUTH: &str = "south";
pub(crate) const ARG_WEST: &str = "west";
pub(crate) const ARG_NORTH: &str = "north";
pub(crate) const ARG_EAST: &str = "east";
pub(crate) const ARG_DATETIME: &str = "datetime";
pub(crate) const ARG_DATABASE: &str = "database";
pub(crate) const ARG_ENDPOINT: &str = "endpoint";
pub(crate) const ARG_ATTEMPT_TIMEOUT: &str = "attempt-timeout-secs";
pub(crate) const ARG_SEARCH_RADIUS: &str = "search-radius-m";
pub(crate) const ARG_BEARING_TOLERANCE: &str = "bearing-tolerance-deg";
pub(crate) const ENV_SOUTH: &str = "SUNSPOT_CMDS_VENUES_SOUTH";
pub(crate) const ENV_WEST: &str = "SUNSPOT_CMDS_VENUES_WEST";
pub(crate) const ENV_NORTH: &str = "SUNSPOT_CMDS_VENUES_NORTH";
pub(crate) const ENV_EAST: &str = "SUNSPOT_CMDS_VENUES_EAST";

/// Run the Sunspot CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns [`CliError`] when arguments are invalid or the analysis fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Venues(args) => venues::run_venues(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "sunspot",
    about = "Find outdoor venues currently in the sun",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Classify the venues inside a bounding box.
    Venues(venues::VenuesArgs),
}

#[cfg(test)]
mod tests;
