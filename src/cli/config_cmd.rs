//! Config CLI subcommands: show, ensure.

use super::CommonArgs;
use crate::telemetry::{ConfigResolver, TelemetryConfig};

/// Print the config read-only resolution yields. Never writes.
///
/// Returns 0 if the config resolved cleanly, 1 if a default was
/// substituted because of an error.
pub fn run_show(args: &CommonArgs) -> i32 {
    let resolution = ConfigResolver::new().read_or_default(args.data_dir.as_deref(), &args.genesis_id);
    print_config(&resolution.config);
    match resolution.error {
        Some(e) => {
            eprintln!("WARNING: {}", e);
            1
        }
        None => 0,
    }
}

/// Load the config, creating and persisting it if needed.
///
/// Returns 0 on success, 1 if the config could not be persisted.
pub fn run_ensure(args: &CommonArgs) -> i32 {
    let resolution = ConfigResolver::new().ensure_created(args.data_dir.as_deref(), &args.genesis_id);
    println!("created={}", resolution.created);
    print_config(&resolution.config);
    match resolution.error {
        Some(e) => {
            eprintln!("ERROR: {}", e);
            1
        }
        None => 0,
    }
}

fn print_config(cfg: &TelemetryConfig) {
    for (key, value) in config_lines(cfg) {
        println!("{}={}", key, value);
    }
}

/// Displayable key/value view. The password is masked.
fn config_lines(cfg: &TelemetryConfig) -> Vec<(&'static str, String)> {
    let path = cfg
        .file_path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    let password = if cfg.password.is_empty() { "" } else { "********" };
    vec![
        ("path", path),
        ("enable", cfg.enable.to_string()),
        ("uri", cfg.uri.clone()),
        ("name", cfg.name.clone()),
        ("guid", cfg.guid.clone()),
        ("session", cfg.session_guid.clone()),
        ("chain_id", cfg.chain_id.clone()),
        ("min_log_level", cfg.min_log_level.to_string()),
        ("report_history_level", cfg.report_history_level.to_string()),
        ("log_history_depth", cfg.log_history_depth.to_string()),
        ("user_name", cfg.user_name.clone()),
        ("password", password.to_string()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_lines_mask_password() {
        let mut cfg = TelemetryConfig::create();
        cfg.password = "hunter2".into();
        cfg.chain_id = "dev-g".into();
        let lines = config_lines(&cfg);
        assert!(lines.iter().any(|(k, v)| *k == "password" && v == "********"));
        assert!(lines.iter().any(|(k, v)| *k == "chain_id" && v == "dev-g"));
        assert!(!lines.iter().any(|(_, v)| v == "hunter2"));
    }

    #[test]
    fn test_config_lines_empty_password() {
        let cfg = TelemetryConfig::create();
        let lines = config_lines(&cfg);
        assert!(lines.iter().any(|(k, v)| *k == "password" && v.is_empty()));
    }
}
