//! Process-wide resolved telemetry config.
//!
//! Empty at start, initialized by config resolution and read by every
//! logger for session, instance and chain identifiers. Re-initialization
//! swaps the snapshot atomically.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;

use super::config::TelemetryConfig;

static GLOBAL_STATE: OnceLock<Arc<TelemetryState>> = OnceLock::new();

/// Read-mostly holder of the most recently resolved config.
#[derive(Debug, Default)]
pub struct TelemetryState {
    resolved: RwLock<Option<Arc<TelemetryConfig>>>,
    initialized: AtomicBool,
}

impl TelemetryState {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// The state shared by the whole process.
    pub fn global() -> Arc<Self> {
        GLOBAL_STATE.get_or_init(Self::new).clone()
    }

    /// Publish `cfg` as the resolved config.
    pub fn initialize(&self, cfg: TelemetryConfig) {
        *self.resolved.write() = Some(Arc::new(cfg));
        if !self.initialized.swap(true, Ordering::AcqRel) {
            tracing::debug!("telemetry state initialized");
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    pub fn snapshot(&self) -> Option<Arc<TelemetryConfig>> {
        self.resolved.read().clone()
    }

    fn read_with(&self, f: impl FnOnce(&TelemetryConfig) -> String) -> String {
        self.resolved.read().as_deref().map(f).unwrap_or_default()
    }

    pub fn session_guid(&self) -> String {
        self.read_with(|c| c.session_guid.clone())
    }

    pub fn chain_id(&self) -> String {
        self.read_with(|c| c.chain_id.clone())
    }

    pub fn host_name(&self) -> String {
        self.read_with(TelemetryConfig::host_name)
    }

    pub fn instance_name(&self) -> String {
        self.read_with(TelemetryConfig::instance_name)
    }
}
