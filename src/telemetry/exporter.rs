//! Supervision of the external telemetry exporter process.
//!
//! At most one exporter runs per supervisor. The process slot is guarded
//! by one async mutex shared by callers and the exit watcher, so
//! concurrent `ensure_running` calls spawn once and the watcher only
//! clears the slot for the process it was started with.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tokio::process::{Child, Command};
use tokio::sync::{oneshot, Mutex};

use super::config::TelemetryConfig;
use crate::error::TelemetryError;

/// Exporter config file written into the data directory.
pub const EXPORTER_CONFIG_FILENAME: &str = "telemetry.yml";

/// Exporter home directory (state and shipped artifacts) inside the data directory.
pub const EXPORTER_HOME_DIR: &str = "telem";

/// Whether the child inherits our standard streams.
const REDIRECT_OUTPUT: bool = cfg!(feature = "redirect-exporter-output");

struct RunningExporter {
    generation: u64,
    pid: Option<u32>,
    kill: Option<oneshot::Sender<()>>,
}

type Slot = Arc<Mutex<Option<RunningExporter>>>;

/// Keeps one exporter process alive for a node's data directory.
pub struct ExporterSupervisor {
    executable: PathBuf,
    data_dir: PathBuf,
    config: TelemetryConfig,
    slot: Slot,
    spawns: AtomicU64,
}

impl ExporterSupervisor {
    pub fn new(
        executable: impl Into<PathBuf>,
        data_dir: impl Into<PathBuf>,
        config: TelemetryConfig,
    ) -> Self {
        Self {
            executable: executable.into(),
            data_dir: data_dir.into(),
            config,
            slot: Arc::new(Mutex::new(None)),
            spawns: AtomicU64::new(0),
        }
    }

    pub fn config_path(&self) -> PathBuf {
        self.data_dir.join(EXPORTER_CONFIG_FILENAME)
    }

    pub fn home_dir(&self) -> PathBuf {
        self.data_dir.join(EXPORTER_HOME_DIR)
    }

    /// Start the exporter unless one is already running.
    ///
    /// Rewrites the exporter config before every launch. Spawn failures
    /// are returned and not retried; the slot stays empty so a later call
    /// can try again. An exporter that died is noticed here, lazily.
    pub async fn ensure_running(&self) -> Result<(), TelemetryError> {
        let mut slot = self.slot.lock().await;
        if slot.is_some() {
            return Ok(());
        }

        let config_path = self.config_path();
        write_exporter_config(&config_path, &self.data_dir, &self.config).await?;

        let home = self.home_dir();
        match tokio::fs::create_dir(&home).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
            Err(e) => {
                tracing::warn!(path = %home.display(), error = %e, "cannot create exporter home");
            }
        }

        let child = self.spawn(&config_path, &home)?;
        let generation = self.spawns.fetch_add(1, Ordering::AcqRel) + 1;
        let pid = child.id();
        let (kill_tx, kill_rx) = oneshot::channel();
        *slot = Some(RunningExporter {
            generation,
            pid,
            kill: Some(kill_tx),
        });
        tracing::info!(pid = ?pid, exe = %self.executable.display(), "exporter started");

        tokio::spawn(watch_exporter(child, kill_rx, self.slot.clone(), generation));
        Ok(())
    }

    fn spawn(&self, config_path: &Path, home: &Path) -> Result<Child, TelemetryError> {
        let mut cmd = Command::new(&self.executable);
        cmd.arg("-c").arg(config_path).arg("--path.home").arg(home);
        // Reaped by the watcher; killed if the runtime goes away first.
        cmd.kill_on_drop(true);
        if let Some(dir) = executable_dir() {
            cmd.current_dir(dir);
        }
        if !REDIRECT_OUTPUT {
            cmd.stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null());
        }
        cmd.spawn().map_err(|e| TelemetryError::Spawn {
            program: self.executable.clone(),
            source: e,
        })
    }

    pub async fn is_running(&self) -> bool {
        self.slot.lock().await.is_some()
    }

    /// PID of the running exporter, if any.
    pub async fn pid(&self) -> Option<u32> {
        self.slot.lock().await.as_ref().and_then(|r| r.pid)
    }

    /// Number of processes launched by this supervisor.
    pub fn spawn_count(&self) -> u64 {
        self.spawns.load(Ordering::Acquire)
    }

    /// Kill the running exporter and clear the slot. Returns false when
    /// nothing was running.
    pub async fn stop(&self) -> bool {
        let Some(mut running) = self.slot.lock().await.take() else {
            return false;
        };
        if let Some(kill) = running.kill.take() {
            let _ = kill.send(());
        }
        tracing::info!(pid = ?running.pid, "exporter stop requested");
        true
    }
}

async fn watch_exporter(
    mut child: Child,
    kill: oneshot::Receiver<()>,
    slot: Slot,
    generation: u64,
) {
    let status = tokio::select! {
        status = child.wait() => status,
        _ = kill => {
            if let Err(e) = child.kill().await {
                tracing::warn!(error = %e, "failed to kill exporter");
            }
            child.wait().await
        }
    };
    log_exit(status);

    let mut slot = slot.lock().await;
    if slot.as_ref().map(|r| r.generation) == Some(generation) {
        *slot = None;
    }
}

fn log_exit(status: std::io::Result<ExitStatus>) {
    match status {
        Ok(status) if status.success() => tracing::info!("exporter exited"),
        Ok(status) => tracing::warn!(%status, "exporter exited"),
        Err(e) => tracing::warn!(error = %e, "failed to wait for exporter"),
    }
}

fn executable_dir() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
}

/// Write the exporter's own config, replacing any previous one.
pub async fn write_exporter_config(
    path: &Path,
    data_dir: &Path,
    config: &TelemetryConfig,
) -> Result<(), TelemetryError> {
    let contents = render_exporter_config(data_dir, config)?;
    tokio::fs::write(path, contents)
        .await
        .map_err(|e| TelemetryError::ExporterConfig {
            path: path.to_path_buf(),
            source: e,
        })
}

#[derive(Debug, Serialize)]
struct ExporterDocument {
    #[serde(rename = "filebeat.inputs")]
    inputs: Vec<LogInput>,
    #[serde(rename = "output.elasticsearch")]
    output: ElasticsearchOutput,
    processors: Vec<BTreeMap<&'static str, Option<()>>>,
}

#[derive(Debug, Serialize)]
struct LogInput {
    #[serde(rename = "type")]
    kind: &'static str,
    enabled: bool,
    paths: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ElasticsearchOutput {
    protocol: &'static str,
    hosts: Vec<String>,
    username: String,
    password: String,
}

const PROCESSORS: [&str; 3] = ["add_host_metadata", "add_cloud_metadata", "add_log_history"];

/// Exporter config: ship `*.log` from the data directory to the telemetry
/// URI over https, enriched with host, cloud and log-history metadata.
pub fn render_exporter_config(
    data_dir: &Path,
    config: &TelemetryConfig,
) -> Result<String, TelemetryError> {
    let document = ExporterDocument {
        inputs: vec![LogInput {
            kind: "log",
            enabled: true,
            paths: vec![data_dir.join("*.log").display().to_string()],
        }],
        output: ElasticsearchOutput {
            protocol: "https",
            hosts: vec![config.uri.clone()],
            username: config.user_name.clone(),
            password: config.password.clone(),
        },
        processors: PROCESSORS
            .iter()
            .map(|name| BTreeMap::from([(*name, None)]))
            .collect(),
    };
    serde_yaml::to_string(&document).map_err(TelemetryError::ExporterEncode)
}
