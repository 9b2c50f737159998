//! Error types emitted by the Sunspot CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>`.

use std::path::PathBuf;
use std::sync::Arc;

use sunspot_core::{BoundingBoxError, StoreError};
use sunspot_data::{ClientBuildError, ConfigError};
use sunspot_service::ServiceError;
use thiserror::Error;

/// Errors emitted by the Sunspot CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// The bounding box edges are invalid or span too much.
    #[error("invalid bounding box: {0}")]
    InvalidBoundingBox(#[from] BoundingBoxError),
    /// `--datetime` is not an RFC 3339 timestamp.
    #[error("invalid datetime {value:?}: {source}")]
    InvalidDatetime {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    /// A shadow analysis setting is not a positive finite number.
    #[error("invalid --{field} {value}: expected a positive number")]
    InvalidShadowSetting { field: &'static str, value: f64 },
    /// The merged Overpass settings were rejected.
    #[error("invalid Overpass settings: {0}")]
    InvalidClientConfig(#[from] ConfigError),
    /// Building the HTTP client failed.
    #[error("failed to build Overpass client: {0}")]
    BuildClient(#[from] ClientBuildError),
    /// Opening the SQLite venue cache failed.
    #[error("failed to open venue cache at {path:?}: {source}")]
    OpenStore {
        path: PathBuf,
        #[source]
        source: StoreError,
    },
    /// Starting the async runtime failed.
    #[error("failed to start runtime: {0}")]
    Runtime(#[source] std::io::Error),
    /// Neither live data nor the cache could answer.
    #[error("analysis failed: {0}")]
    Analyze(#[from] ServiceError),
    /// Serialising the analysis result failed.
    #[error("failed to serialise analysis result: {0}")]
    SerialiseResult(#[source] serde_json::Error),
    /// Writing the analysis result failed.
    #[error("failed to write analysis result: {0}")]
    WriteOutput(#[source] std::io::Error),
}
