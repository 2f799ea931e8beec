//! Persisted telemetry configuration record.
//!
//! Stored as JSON with the node's historical PascalCase keys. `ChainID`,
//! `SessionGUID` and the on-disk location are runtime-only.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::TelemetryError;
use crate::logging::SeverityLevel;

/// File name of the telemetry config inside a data or global directory.
pub const TELEMETRY_CONFIG_FILENAME: &str = "logging.config";

const DEFAULT_LOG_HISTORY_DEPTH: u32 = 100;
const INSTANCE_NAME_LEN: usize = 16;

/// Telemetry settings for one node installation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    #[serde(rename = "Enable")]
    pub enable: bool,
    /// Destination of shipped telemetry.
    #[serde(rename = "URI")]
    pub uri: String,
    /// Operator-chosen node name, sanitized on load.
    #[serde(rename = "Name")]
    pub name: String,
    /// Installation identifier; stable across runs.
    #[serde(rename = "GUID")]
    pub guid: String,
    #[serde(rename = "MinLogLevel")]
    pub min_log_level: SeverityLevel,
    #[serde(rename = "ReportHistoryLevel")]
    pub report_history_level: SeverityLevel,
    #[serde(rename = "LogHistoryDepth")]
    pub log_history_depth: u32,
    /// Where this config was loaded from or will be saved to.
    #[serde(skip)]
    pub file_path: Option<PathBuf>,
    /// `<channel>-<genesisID>`, computed at resolution time.
    #[serde(skip)]
    pub chain_id: String,
    /// Identifier of the current process run.
    #[serde(skip)]
    pub session_guid: String,
    #[serde(rename = "UserName")]
    pub user_name: String,
    #[serde(rename = "Password")]
    pub password: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enable: false,
            uri: String::new(),
            name: String::new(),
            guid: String::new(),
            min_log_level: SeverityLevel::Warn,
            report_history_level: SeverityLevel::Warn,
            log_history_depth: DEFAULT_LOG_HISTORY_DEPTH,
            file_path: None,
            chain_id: String::new(),
            session_guid: String::new(),
            user_name: String::new(),
            password: String::new(),
        }
    }
}

impl TelemetryConfig {
    /// Fresh disabled config with a new installation GUID and session GUID.
    pub fn create() -> Self {
        Self {
            guid: new_guid(),
            session_guid: new_guid(),
            ..Self::default()
        }
    }

    /// Load a config from `path`.
    ///
    /// Keys missing from the file keep their defaults; the session GUID is
    /// always freshly generated.
    pub fn load(path: &Path) -> Result<Self, TelemetryError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                TelemetryError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                TelemetryError::Read {
                    path: path.to_path_buf(),
                    source: e,
                }
            }
        })?;
        Self::from_json(&content, path)
    }

    fn from_json(content: &str, path: &Path) -> Result<Self, TelemetryError> {
        let mut cfg: TelemetryConfig =
            serde_json::from_str(content).map_err(|e| TelemetryError::Parse {
                path: path.to_path_buf(),
                source: e,
            })?;
        if cfg.guid.is_empty() {
            cfg.guid = new_guid();
        }
        cfg.session_guid = new_guid();
        cfg.file_path = Some(path.to_path_buf());
        if !cfg.name.is_empty() {
            cfg.name = sanitize_name(&cfg.name);
        }
        Ok(cfg)
    }

    /// Persist the config to `path` as pretty JSON, replacing any existing file.
    pub fn save(&self, path: &Path) -> Result<(), TelemetryError> {
        let json = serde_json::to_string_pretty(self).map_err(TelemetryError::Serialize)?;
        std::fs::write(path, json).map_err(|e| TelemetryError::Write {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Host label reported with telemetry: `Name:GUID` when enabled and
    /// named, otherwise the bare GUID.
    pub fn host_name(&self) -> String {
        if self.enable && !self.name.is_empty() {
            format!("{}:{}", self.name, self.guid)
        } else {
            self.guid.clone()
        }
    }

    /// Short stable label distinguishing node instances that share a GUID
    /// but run from different directories.
    pub fn instance_name(&self) -> String {
        let dir = self
            .file_path
            .as_deref()
            .and_then(Path::parent)
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut hasher = Sha256::new();
        hasher.update(self.guid.as_bytes());
        hasher.update(dir.as_bytes());
        let digest = hex::encode(hasher.finalize());
        digest[..INSTANCE_NAME_LEN].to_string()
    }
}

/// Random v4 UUID in hyphenated form.
pub fn new_guid() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Restrict a user-supplied name to characters safe in host labels.
///
/// `:` separates the name from the GUID, so it is replaced along with
/// whitespace and other punctuation.
pub fn sanitize_name(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '-'
            }
        })
        .collect()
}
