//! Process-level sink setup.
//!
//! Installs the tracing subscriber that [`TracingSink`](super::TracingSink)
//! writes through. JSON output is what the telemetry exporter ships.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;
use tracing_subscriber::fmt::{self, writer::BoxMakeWriter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use super::level::SeverityLevel;

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per line. This is what the exporter ships, so node
    /// log files should use it.
    #[default]
    Json,
    /// Multi-line human-readable output for operators at a terminal.
    Pretty,
}

/// Where and how [`TracingSink`](super::TracingSink) records end up.
///
/// A [`Logger`](super::Logger) gates records by its own severity threshold
/// before they reach tracing; `level` is a second, coarser filter applied
/// by the subscriber. Use [`LogConfig::for_level`] to keep the two in step.
///
/// When `output_path` is set the file is opened in append mode, so several
/// node runs share one file and the exporter's `*.log` glob picks it up.
/// Both formats honour it.
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub format: LogFormat,
    /// Filter directive (e.g. "info", "node_telemetry=debug"). `RUST_LOG`
    /// takes precedence when set.
    pub level: String,
    /// Append to this file instead of stderr.
    pub output_path: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Json,
            level: "info".to_string(),
            output_path: None,
        }
    }
}

impl LogConfig {
    /// Config whose filter lets through everything `level` permits.
    pub fn for_level(level: SeverityLevel) -> Self {
        Self {
            level: filter_directive(level).to_string(),
            ..Self::default()
        }
    }
}

/// Tracing filter directive equivalent to a severity threshold.
///
/// Tracing has no levels above `ERROR`, so Panic and Fatal collapse into it.
pub fn filter_directive(level: SeverityLevel) -> &'static str {
    match level {
        SeverityLevel::Panic | SeverityLevel::Fatal | SeverityLevel::Error => "error",
        SeverityLevel::Warn => "warn",
        SeverityLevel::Info => "info",
        SeverityLevel::Debug => "debug",
    }
}

#[derive(Debug, Error)]
pub enum LogError {
    #[error("Invalid log filter: {0}")]
    InvalidFilter(String),
    #[error("Failed to open log file: {0}")]
    FileOpen(String),
    #[error("Subscriber already initialized")]
    AlreadyInitialized,
}

/// Install the global tracing subscriber. Call once at startup.
pub fn init_logging(config: &LogConfig) -> Result<(), LogError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level)
            .map_err(|e| LogError::InvalidFilter(e.to_string()))?,
    };
    let writer = open_writer(config.output_path.as_deref())?;

    let registry = tracing_subscriber::registry().with(filter);
    let installed = match config.format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(writer))
            .try_init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().pretty().with_writer(writer))
            .try_init(),
    };
    installed.map_err(|_| LogError::AlreadyInitialized)
}

fn open_writer(path: Option<&Path>) -> Result<BoxMakeWriter, LogError> {
    let Some(path) = path else {
        return Ok(BoxMakeWriter::new(std::io::stderr));
    };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| LogError::FileOpen(format!("{}: {}", path.display(), e)))?;
    Ok(BoxMakeWriter::new(Mutex::new(file)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_level_maps_severe_levels_to_error() {
        assert_eq!(LogConfig::for_level(SeverityLevel::Fatal).level, "error");
        assert_eq!(LogConfig::for_level(SeverityLevel::Warn).level, "warn");
        assert_eq!(LogConfig::for_level(SeverityLevel::Debug).level, "debug");
    }

    #[test]
    fn test_open_writer_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("no-such-dir").join("node.log");
        let err = open_writer(Some(&missing)).err().unwrap();
        assert!(matches!(&err, LogError::FileOpen(msg) if msg.contains("node.log")));
    }

    #[test]
    fn test_open_writer_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("node.log");
        std::fs::write(&path, "earlier\n").unwrap();
        assert!(open_writer(Some(&path)).is_ok());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "earlier\n");
    }

    #[test]
    fn test_default_is_json_info() {
        let cfg = LogConfig::default();
        assert_eq!(cfg.format, LogFormat::Json);
        assert_eq!(cfg.level, "info");
        assert!(cfg.output_path.is_none());
    }
}
