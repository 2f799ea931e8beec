//! Error types for telemetry configuration and exporter supervision.
//!
//! Resolution never fails "empty": callers always get a usable config
//! alongside any of these errors.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by config resolution, persistence and the exporter.
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("Telemetry config not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to read telemetry config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid telemetry config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write telemetry config {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to encode telemetry config: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("No usable global config directory")]
    NoGlobalConfigDir,

    #[error("Failed to encode exporter config: {0}")]
    ExporterEncode(#[source] serde_yaml::Error),

    #[error("Failed to write exporter config {}: {source}", path.display())]
    ExporterConfig {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to spawn exporter {}: {source}", program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl TelemetryError {
    /// Returns true if the config file simply did not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
