//! Node logging and telemetry.
//!
//! - [`logging`]: severity-gated [`Logger`] whose derived instances share
//!   levels and the telemetry switch, plus `Event`/`Metrics` emission.
//! - [`telemetry`]: telemetry config resolution with data-dir/global/default
//!   fallback, the process-wide resolved state, and supervision of the
//!   external exporter that ships log files.
//!
//! # Startup
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use node_telemetry::logging::{Logger, TracingSink};
//! use node_telemetry::telemetry::{Category, ConfigResolver, Event};
//!
//! let data_dir = Path::new("/var/lib/node");
//! let resolution = ConfigResolver::new().ensure_created(Some(data_dir), "mainnet-v1.0");
//!
//! let log = Logger::new(Arc::new(TracingSink));
//! log.enable_telemetry(resolution.config.enable);
//! log.event(Category::APPLICATION_STATE, Event::STARTUP);
//! ```

pub mod cli;
pub mod error;
pub mod logging;
pub mod telemetry;

pub use error::TelemetryError;
pub use logging::{Logger, SeverityLevel};
pub use telemetry::{ConfigResolver, ExporterSupervisor, TelemetryConfig, TelemetryState};
