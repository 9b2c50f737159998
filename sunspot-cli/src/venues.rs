//! `venues` command implementation for the Sunspot CLI.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use sunspot_core::shadow::ShadowAnalyzer;
use sunspot_core::{AnalysisResult, BoundingBox, VenueStore};
use sunspot_data::{OverpassClient, OverpassClientConfig, OverpassExecutor, SqliteVenueStore};
use sunspot_service::VenueService;

use crate::{
    ARG_ATTEMPT_TIMEOUT, ARG_BEARING_TOLERANCE, ARG_DATABASE, ARG_DATETIME, ARG_EAST,
    ARG_ENDPOINT, ARG_NORTH, ARG_SEARCH_RADIUS, ARG_SOUTH, ARG_WEST, CliError, ENV_EAST,
    ENV_NORTH, ENV_SOUTH, ENV_WEST,
};

/// Largest latitude or longitude span accepted per request, in degrees.
pub const MAX_BBOX_SPAN_DEGREES: f64 = 0.05;

/// Cache file used when `--database` is not given.
pub(crate) const DEFAULT_DATABASE: &str = "sunspot.db";

/// CLI arguments for the `venues` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "venues",
    long_about = "Fetch the bars, cafes, pubs, restaurants and beer gardens \
                 inside a bounding box from OpenStreetMap, classify each as \
                 sunny, partially sunny or shaded, and print the result as \
                 JSON. Venues are cached in SQLite and served from there \
                 when every Overpass mirror is unavailable.",
    about = "Classify the venues inside a bounding box"
)]
#[ortho_config(prefix = "SUNSPOT")]
pub(crate) struct VenuesArgs {
    /// Southern edge latitude.
    #[arg(long = ARG_SOUTH, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) south: Option<f64>,
    /// Western edge longitude.
    #[arg(long = ARG_WEST, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) west: Option<f64>,
    /// Northern edge latitude.
    #[arg(long = ARG_NORTH, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) north: Option<f64>,
    /// Eastern edge longitude.
    #[arg(long = ARG_EAST, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) east: Option<f64>,
    /// Instant to analyse, RFC 3339 (defaults to now).
    #[arg(long = ARG_DATETIME, value_name = "rfc3339")]
    #[serde(default)]
    pub(crate) datetime: Option<String>,
    /// SQLite venue cache (defaults to `sunspot.db`).
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<PathBuf>,
    /// Overpass mirror URL; repeat to list several.
    #[arg(long = ARG_ENDPOINT, value_name = "url")]
    #[serde(default)]
    pub(crate) endpoint: Option<Vec<String>>,
    /// Per-attempt upstream timeout.
    #[arg(long = ARG_ATTEMPT_TIMEOUT, value_name = "seconds")]
    #[serde(default)]
    pub(crate) attempt_timeout_secs: Option<u64>,
    /// Buildings further away are ignored (defaults to 100).
    #[arg(long = ARG_SEARCH_RADIUS, value_name = "metres")]
    #[serde(default)]
    pub(crate) search_radius_m: Option<f64>,
    /// Widest angle between shadow and venue bearing (defaults to 45).
    #[arg(long = ARG_BEARING_TOLERANCE, value_name = "degrees")]
    #[serde(default)]
    pub(crate) bearing_tolerance_deg: Option<f64>,
}

impl VenuesArgs {
    pub(crate) fn into_config(self) -> Result<VenuesConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        VenuesConfig::try_from(merged)
    }
}

/// Resolved `venues` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct VenuesConfig {
    pub(crate) bbox: BoundingBox,
    /// `None` means "now", resolved when the command runs.
    pub(crate) timestamp: Option<DateTime<Utc>>,
    pub(crate) database: PathBuf,
    pub(crate) client: OverpassClientConfig,
    pub(crate) analyzer: ShadowAnalyzer,
}

impl VenuesConfig {
    fn require(value: Option<f64>, field: &'static str, env: &'static str) -> Result<f64, CliError> {
        value.ok_or(CliError::MissingArgument { field, env })
    }

    fn positive(value: f64, field: &'static str) -> Result<f64, CliError> {
        if value.is_finite() && value > 0.0 {
            Ok(value)
        } else {
            Err(CliError::InvalidShadowSetting { field, value })
        }
    }

    fn analyzer(args: &VenuesArgs) -> Result<ShadowAnalyzer, CliError> {
        let mut analyzer = ShadowAnalyzer::default();
        if let Some(metres) = args.search_radius_m {
            analyzer = analyzer.with_search_radius(Self::positive(metres, ARG_SEARCH_RADIUS)?);
        }
        if let Some(degrees) = args.bearing_tolerance_deg {
            analyzer =
                analyzer.with_bearing_tolerance(Self::positive(degrees, ARG_BEARING_TOLERANCE)?);
        }
        Ok(analyzer)
    }

    fn parse_datetime(value: String) -> Result<DateTime<Utc>, CliError> {
        match DateTime::parse_from_rfc3339(&value) {
            Ok(parsed) => Ok(parsed.with_timezone(&Utc)),
            Err(source) => Err(CliError::InvalidDatetime { value, source }),
        }
    }
}

impl TryFrom<VenuesArgs> for VenuesConfig {
    type Error = CliError;

    fn try_from(args: VenuesArgs) -> Result<Self, Self::Error> {
        let south = Self::require(args.south, ARG_SOUTH, ENV_SOUTH)?;
        let west = Self::require(args.west, ARG_WEST, ENV_WEST)?;
        let north = Self::require(args.north, ARG_NORTH, ENV_NORTH)?;
        let east = Self::require(args.east, ARG_EAST, ENV_EAST)?;
        let bbox = BoundingBox::new(south, west, north, east)?;
        bbox.ensure_max_span(MAX_BBOX_SPAN_DEGREES)?;
        let analyzer = Self::analyzer(&args)?;

        let timestamp = args.datetime.map(Self::parse_datetime).transpose()?;
        let database = args
            .database
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE));

        let mut client = OverpassClientConfig::default();
        if let Some(endpoints) = args.endpoint {
            client = client.with_endpoints(endpoints);
        }
        if let Some(secs) = args.attempt_timeout_secs {
            client = client.with_attempt_timeout(Duration::from_secs(secs));
        }
        client.validate()?;

        Ok(Self {
            bbox,
            timestamp,
            database,
            client,
            analyzer,
        })
    }
}

pub(crate) fn run_venues(args: VenuesArgs) -> Result<(), CliError> {
    let config = args.into_config()?;
    let client = OverpassClient::from_config(config.client.clone())?;
    let store = SqliteVenueStore::open(&config.database).map_err(|source| CliError::OpenStore {
        path: config.database.clone(),
        source,
    })?;
    let mut stdout = std::io::stdout().lock();
    run_venues_with(&config, client, Arc::new(store), &mut stdout)
}

/// Run one analysis with explicit collaborators and write it to `writer`.
///
/// Background cache writes are drained before returning so the process can
/// exit without losing them.
pub(crate) fn run_venues_with<E, S>(
    config: &VenuesConfig,
    executor: E,
    store: Arc<S>,
    writer: &mut dyn Write,
) -> Result<(), CliError>
where
    E: OverpassExecutor,
    S: VenueStore + ?Sized + 'static,
{
    let result = execute_venues(config, executor, store)?;
    write_result(writer, &result)
}

fn execute_venues<E, S>(
    config: &VenuesConfig,
    executor: E,
    store: Arc<S>,
) -> Result<AnalysisResult, CliError>
where
    E: OverpassExecutor,
    S: VenueStore + ?Sized + 'static,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;
    let timestamp = config.timestamp.unwrap_or_else(Utc::now);
    let service = VenueService::new(executor, store).with_analyzer(config.analyzer);
    log::debug!("analysing {:?} at {timestamp}", config.bbox);
    let outcome = runtime.block_on(async {
        let outcome = service.analyze(&config.bbox, timestamp).await;
        service.drain_background_writes().await;
        outcome
    });
    Ok(outcome?)
}

fn write_result(writer: &mut dyn Write, result: &AnalysisResult) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(result).map_err(CliError::SerialiseResult)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}
