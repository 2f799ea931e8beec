//! Locating, loading and creating the telemetry config.
//!
//! Two entry points share one skeleton: look in the data directory, fall
//! back to the global directory, then fall back to a fresh default.
//! [`ConfigResolver::read_or_default`] never touches the disk beyond
//! reading; [`ConfigResolver::ensure_created`] persists a fresh config
//! when no usable one exists and always publishes the result to the
//! process-wide [`TelemetryState`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::config::{TelemetryConfig, TELEMETRY_CONFIG_FILENAME};
use super::locations::{build_channel, chain_id, ConfigLocations};
use super::state::TelemetryState;
use crate::error::TelemetryError;

/// Outcome of a resolution. `config` is always usable, even with an error.
#[derive(Debug)]
pub struct Resolution {
    pub config: TelemetryConfig,
    /// A fresh config was synthesized (and, unless `error` says otherwise,
    /// persisted). Always false for read-only resolution.
    pub created: bool,
    pub error: Option<TelemetryError>,
}

impl Resolution {
    /// Drop the degraded config when there was an error.
    pub fn into_result(self) -> Result<TelemetryConfig, TelemetryError> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.config),
        }
    }
}

/// Resolves telemetry configs against a set of candidate locations.
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    locations: ConfigLocations,
    channel: Option<String>,
    state: Arc<TelemetryState>,
}

impl Default for ConfigResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigResolver {
    /// Resolver over the environment's locations, the build channel and
    /// the process-wide telemetry state.
    pub fn new() -> Self {
        Self::with_locations(ConfigLocations::from_env())
    }

    pub fn with_locations(locations: ConfigLocations) -> Self {
        Self {
            locations,
            channel: build_channel().map(str::to_string),
            state: TelemetryState::global(),
        }
    }

    /// Override the release channel used for the chain ID.
    pub fn with_channel(mut self, channel: Option<String>) -> Self {
        self.channel = channel;
        self
    }

    /// Publish created configs to `state` instead of the global one.
    pub fn with_state(mut self, state: Arc<TelemetryState>) -> Self {
        self.state = state;
        self
    }

    pub fn telemetry_state(&self) -> &Arc<TelemetryState> {
        &self.state
    }

    pub fn locations(&self) -> &ConfigLocations {
        &self.locations
    }

    /// Load the config from the data directory or the global directory,
    /// or fall back to a default. Never writes.
    ///
    /// A missing file is not an error. Any other failure is reported
    /// alongside the default config.
    pub fn read_or_default(&self, data_dir: Option<&Path>, genesis_id: &str) -> Resolution {
        let mut loaded = match data_config_path(data_dir) {
            Some(path) => TelemetryConfig::load(&path),
            None => Err(TelemetryError::NotFound {
                path: PathBuf::from(TELEMETRY_CONFIG_FILENAME),
            }),
        };

        if matches!(&loaded, Err(e) if e.is_not_found()) {
            loaded = self
                .locations
                .global_config_path(TELEMETRY_CONFIG_FILENAME)
                .and_then(|path| TelemetryConfig::load(&path));
        }

        let (mut config, error) = match loaded {
            Ok(config) => (config, None),
            Err(e) if e.is_not_found() => (TelemetryConfig::create(), None),
            Err(e) => {
                tracing::debug!(error = %e, "telemetry config unusable, using defaults");
                (TelemetryConfig::create(), Some(e))
            }
        };

        config.chain_id = chain_id(self.channel.as_deref(), genesis_id);
        Resolution {
            config,
            created: false,
            error,
        }
    }

    /// Load the config, creating and persisting a fresh one when none is
    /// usable, and publish the result to the telemetry state.
    ///
    /// A config that exists but cannot be read or parsed is overwritten.
    pub fn ensure_created(&self, data_dir: Option<&Path>, genesis_id: &str) -> Resolution {
        let mut settled = None;
        if let Some(path) = data_config_path(data_dir) {
            match TelemetryConfig::load(&path) {
                Err(e) if e.is_not_found() => {}
                loaded => settled = Some((path, loaded)),
            }
        }

        let (path, loaded) = match settled {
            Some(settled) => settled,
            None => match self
                .locations
                .prepare_global_config_path(TELEMETRY_CONFIG_FILENAME)
            {
                Ok(path) => {
                    let loaded = TelemetryConfig::load(&path);
                    (path, loaded)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "no location for telemetry config, not persisting");
                    let mut config = TelemetryConfig::create();
                    config.chain_id = chain_id(self.channel.as_deref(), genesis_id);
                    self.state.initialize(config.clone());
                    return Resolution {
                        config,
                        created: true,
                        error: Some(e),
                    };
                }
            },
        };

        let (mut config, created, error) = match loaded {
            Ok(config) => (config, false, None),
            Err(e) => {
                if !e.is_not_found() {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "replacing unusable telemetry config"
                    );
                }
                let mut config = TelemetryConfig::create();
                config.file_path = Some(path.clone());
                let error = config.save(&path).err();
                if error.is_none() {
                    tracing::info!(path = %path.display(), "created telemetry config");
                }
                (config, true, error)
            }
        };

        config.chain_id = chain_id(self.channel.as_deref(), genesis_id);
        self.state.initialize(config.clone());
        Resolution {
            config,
            created,
            error,
        }
    }

    /// [`ConfigResolver::ensure_created`] without the created flag.
    pub fn ensure_config(
        &self,
        data_dir: Option<&Path>,
        genesis_id: &str,
    ) -> (TelemetryConfig, Option<TelemetryError>) {
        let resolution = self.ensure_created(data_dir, genesis_id);
        (resolution.config, resolution.error)
    }
}

fn data_config_path(data_dir: Option<&Path>) -> Option<PathBuf> {
    data_dir
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(|dir| dir.join(TELEMETRY_CONFIG_FILENAME))
}
