//! Telemetry configuration and exporter supervision.
//!
//! Startup resolves a [`TelemetryConfig`] with [`ConfigResolver`], which
//! publishes it to the process-wide [`TelemetryState`] every logger reads.
//! Operator tooling may then keep the external shipper alive with
//! [`ExporterSupervisor`].

mod config;
pub mod exporter;
mod locations;
mod resolver;
pub mod spec;
mod state;

pub use config::{new_guid, sanitize_name, TelemetryConfig, TELEMETRY_CONFIG_FILENAME};
pub use exporter::{ExporterSupervisor, EXPORTER_CONFIG_FILENAME, EXPORTER_HOME_DIR};
pub use locations::{build_channel, chain_id, ConfigLocations, DEFAULT_CHANNEL, GLOBAL_DIR_ENV};
pub use resolver::{ConfigResolver, Resolution};
pub use spec::{Category, Event, MetricDetails};
pub use state::TelemetryState;
