//! Where telemetry configs live and how the chain identifier is formed.
//!
//! | Variable | Default | Description |
//! |---|---|---|
//! | `NODE_TELEMETRY_GLOBAL_DIR` | `$HOME/.node-telemetry` | Global config directory |
//! | `NODE_BUILD_CHANNEL` (build time) | `dev` | Release channel in the chain ID |

use std::path::{Path, PathBuf};

use crate::error::TelemetryError;

/// Environment override for the global config directory.
pub const GLOBAL_DIR_ENV: &str = "NODE_TELEMETRY_GLOBAL_DIR";

/// Channel used in the chain ID when the build carries none.
pub const DEFAULT_CHANNEL: &str = "dev";

const GLOBAL_DIR_NAME: &str = ".node-telemetry";

/// Candidate locations for the telemetry config outside the data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLocations {
    global_root: Option<PathBuf>,
}

impl ConfigLocations {
    /// Global root from `NODE_TELEMETRY_GLOBAL_DIR`, else the user's home.
    pub fn from_env() -> Self {
        let global_root = std::env::var_os(GLOBAL_DIR_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|home| home.join(GLOBAL_DIR_NAME)));
        Self { global_root }
    }

    pub fn with_global_root(root: impl Into<PathBuf>) -> Self {
        Self {
            global_root: Some(root.into()),
        }
    }

    /// No global directory is available; global lookups fail.
    pub fn without_global_root() -> Self {
        Self { global_root: None }
    }

    pub fn global_root(&self) -> Option<&Path> {
        self.global_root.as_deref()
    }

    /// Path of `filename` in the global directory. Touches nothing on disk.
    pub fn global_config_path(&self, filename: &str) -> Result<PathBuf, TelemetryError> {
        self.global_root
            .as_deref()
            .map(|root| root.join(filename))
            .ok_or(TelemetryError::NoGlobalConfigDir)
    }

    /// Like [`ConfigLocations::global_config_path`], but creates the global
    /// directory so the file can be written.
    pub fn prepare_global_config_path(&self, filename: &str) -> Result<PathBuf, TelemetryError> {
        let path = self.global_config_path(filename)?;
        if let Some(root) = path.parent() {
            std::fs::create_dir_all(root).map_err(|e| TelemetryError::Write {
                path: root.to_path_buf(),
                source: e,
            })?;
        }
        Ok(path)
    }
}

impl Default for ConfigLocations {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Release channel baked in at build time, if any.
pub fn build_channel() -> Option<&'static str> {
    option_env!("NODE_BUILD_CHANNEL").filter(|c| !c.is_empty())
}

/// `<channel>-<genesisID>`, with `dev` standing in for a missing channel.
pub fn chain_id(channel: Option<&str>, genesis_id: &str) -> String {
    let channel = channel.filter(|c| !c.is_empty()).unwrap_or(DEFAULT_CHANNEL);
    format!("{}-{}", channel, genesis_id)
}
