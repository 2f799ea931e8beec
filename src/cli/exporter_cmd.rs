//! `exporter run`: keep the telemetry exporter alive until Ctrl-C.

use std::path::PathBuf;
use std::time::Duration;

use super::CommonArgs;
use crate::telemetry::{ConfigResolver, ExporterSupervisor};

/// How often a dead exporter is noticed and relaunched.
pub const CHECK_INTERVAL: Duration = Duration::from_secs(5);

/// Returns 0 after a clean Ctrl-C, 1 if the exporter never started,
/// 2 on usage errors.
pub async fn run(args: &CommonArgs, executable: Option<PathBuf>) -> i32 {
    let Some(executable) = executable else {
        eprintln!("exporter run requires --exe PATH");
        return 2;
    };
    let Some(data_dir) = args.data_dir.clone() else {
        eprintln!("exporter run requires --datadir PATH (or NODE_DATA_DIR)");
        return 2;
    };

    let resolution = ConfigResolver::new().ensure_created(Some(&data_dir), &args.genesis_id);
    if let Some(e) = &resolution.error {
        tracing::warn!(error = %e, "continuing with unpersisted telemetry config");
    }
    if !resolution.config.enable {
        eprintln!("Telemetry is disabled in {}; not starting exporter.", data_dir.display());
        return 0;
    }

    let supervisor = ExporterSupervisor::new(executable, data_dir, resolution.config);
    if let Err(e) = supervisor.ensure_running().await {
        eprintln!("Failed to start exporter: {}", e);
        return 1;
    }

    let mut ticker = tokio::time::interval(CHECK_INTERVAL);
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = ticker.tick() => {
                if let Err(e) = supervisor.ensure_running().await {
                    tracing::warn!(error = %e, "exporter relaunch failed");
                }
            }
        }
    }

    supervisor.stop().await;
    0
}
