//! Telemetry config persistence and resolution tests.

use std::path::Path;

use node_telemetry::telemetry::{
    ConfigLocations, ConfigResolver, TelemetryConfig, TelemetryState, TELEMETRY_CONFIG_FILENAME,
};
use node_telemetry::{SeverityLevel, TelemetryError};

fn resolver(global: &Path) -> ConfigResolver {
    ConfigResolver::with_locations(ConfigLocations::with_global_root(global))
        .with_channel(None)
        .with_state(TelemetryState::new())
}

// =============================================================================
// TelemetryConfig load/save
// =============================================================================

#[test]
fn save_then_load_keeps_persisted_fields() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(TELEMETRY_CONFIG_FILENAME);

    let mut cfg = TelemetryConfig::create();
    cfg.enable = true;
    cfg.uri = "https://telemetry.example.net".into();
    cfg.name = "relay-1".into();
    cfg.min_log_level = SeverityLevel::Info;
    cfg.report_history_level = SeverityLevel::Error;
    cfg.log_history_depth = 250;
    cfg.user_name = "shipper".into();
    cfg.password = "pw".into();
    cfg.chain_id = "dev-x".into();
    cfg.save(&path).unwrap();

    let loaded = TelemetryConfig::load(&path).unwrap();
    assert_eq!(loaded.enable, cfg.enable);
    assert_eq!(loaded.uri, cfg.uri);
    assert_eq!(loaded.name, cfg.name);
    assert_eq!(loaded.guid, cfg.guid);
    assert_eq!(loaded.min_log_level, cfg.min_log_level);
    assert_eq!(loaded.report_history_level, cfg.report_history_level);
    assert_eq!(loaded.log_history_depth, cfg.log_history_depth);
    assert_eq!(loaded.user_name, cfg.user_name);
    assert_eq!(loaded.password, cfg.password);
    assert_eq!(loaded.file_path.as_deref(), Some(path.as_path()));
    // Runtime-only fields are not carried through the file.
    assert_eq!(loaded.chain_id, "");
    assert_ne!(loaded.session_guid, cfg.session_guid);
}

#[test]
fn load_missing_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let err = TelemetryConfig::load(&dir.path().join("absent.config")).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn load_reads_pascal_case_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(TELEMETRY_CONFIG_FILENAME);
    std::fs::write(
        &path,
        r#"{
  "Enable": true,
  "URI": "",
  "Name": "my node",
  "GUID": "5d0d35a6-6a0c-4a7f-9a6e-3f7c1a2d4e5f",
  "MinLogLevel": 4,
  "ReportHistoryLevel": 4,
  "LogHistoryDepth": 100,
  "UserName": "",
  "Password": ""
}"#,
    )
    .unwrap();
    let cfg = TelemetryConfig::load(&path).unwrap();
    assert!(cfg.enable);
    assert_eq!(cfg.guid, "5d0d35a6-6a0c-4a7f-9a6e-3f7c1a2d4e5f");
    assert_eq!(cfg.name, "my-node");
    assert_eq!(cfg.min_log_level, SeverityLevel::Info);
}

// =============================================================================
// Read-only resolution
// =============================================================================

#[test]
fn read_with_nothing_on_disk_returns_default() {
    let data = tempfile::tempdir().unwrap();
    let global = tempfile::tempdir().unwrap();
    let r = resolver(global.path()).read_or_default(Some(data.path()), "testgenesis");
    assert!(r.error.is_none());
    assert!(!r.created);
    assert!(!r.config.enable);
    assert!(!r.config.session_guid.is_empty());
    assert!(!r.config.guid.is_empty());
    assert_eq!(r.config.chain_id, "dev-testgenesis");
    // Nothing was written anywhere.
    assert!(!data.path().join(TELEMETRY_CONFIG_FILENAME).exists());
    assert!(!global.path().join(TELEMETRY_CONFIG_FILENAME).exists());
}

#[test]
fn read_defaults_have_fresh_sessions() {
    let global = tempfile::tempdir().unwrap();
    let resolver = resolver(global.path());
    let a = resolver.read_or_default(None, "g").config;
    let b = resolver.read_or_default(None, "g").config;
    assert_ne!(a.session_guid, b.session_guid);
}

#[test]
fn read_uses_channel() {
    let global = tempfile::tempdir().unwrap();
    let r = resolver(global.path())
        .with_channel(Some("stable".into()))
        .read_or_default(None, "mainnet-v1.0");
    assert_eq!(r.config.chain_id, "stable-mainnet-v1.0");
}

#[test]
fn read_with_nonexistent_global_root_creates_nothing() {
    let data = tempfile::tempdir().unwrap();
    let tmp = tempfile::tempdir().unwrap();
    let global = tmp.path().join("not-yet");
    let r = resolver(&global).read_or_default(Some(data.path()), "g");
    assert!(r.error.is_none());
    assert!(!global.exists());
    assert_eq!(std::fs::read_dir(data.path()).unwrap().count(), 0);
}

#[test]
fn read_without_global_dir_reports_error() {
    let resolver = ConfigResolver::with_locations(ConfigLocations::without_global_root())
        .with_channel(None)
        .with_state(TelemetryState::new());
    let r = resolver.read_or_default(None, "g");
    assert!(matches!(r.error, Some(TelemetryError::NoGlobalConfigDir)));
    assert!(!r.config.guid.is_empty());
    assert_eq!(r.config.chain_id, "dev-g");
}

// =============================================================================
// Create-and-persist resolution
// =============================================================================

#[test]
fn ensure_creates_once_then_loads() {
    let data = tempfile::tempdir().unwrap();
    let global = tempfile::tempdir().unwrap();
    let resolver = resolver(global.path());

    let first = resolver.ensure_created(Some(data.path()), "testgenesis");
    assert!(first.created);
    assert!(first.error.is_none());
    assert_eq!(first.config.chain_id, "dev-testgenesis");

    // Absent from the data dir, so the global location receives the file.
    let global_path = global.path().join(TELEMETRY_CONFIG_FILENAME);
    assert!(global_path.is_file());
    assert!(!data.path().join(TELEMETRY_CONFIG_FILENAME).exists());
    assert_eq!(first.config.file_path.as_deref(), Some(global_path.as_path()));
    let on_disk = std::fs::read_to_string(&global_path).unwrap();

    let second = resolver.ensure_created(Some(data.path()), "testgenesis");
    assert!(!second.created);
    assert!(second.error.is_none());
    assert_eq!(second.config.guid, first.config.guid);
    assert_eq!(second.config.chain_id, first.config.chain_id);
    assert_ne!(second.config.session_guid, first.config.session_guid);
    assert_eq!(std::fs::read_to_string(&global_path).unwrap(), on_disk);

    let third = resolver.ensure_created(Some(data.path()), "othergenesis");
    assert!(!third.created);
    assert_eq!(third.config.guid, first.config.guid);
    assert_eq!(third.config.chain_id, "dev-othergenesis");
}

#[test]
fn ensure_prefers_existing_data_dir_config() {
    let data = tempfile::tempdir().unwrap();
    let global = tempfile::tempdir().unwrap();
    let path = data.path().join(TELEMETRY_CONFIG_FILENAME);
    let existing = TelemetryConfig::create();
    existing.save(&path).unwrap();

    let r = resolver(global.path()).ensure_created(Some(data.path()), "g");
    assert!(!r.created);
    assert_eq!(r.config.guid, existing.guid);
    assert!(!global.path().join(TELEMETRY_CONFIG_FILENAME).exists());
}

#[test]
fn ensure_publishes_state() {
    let global = tempfile::tempdir().unwrap();
    let resolver = resolver(global.path());
    let r = resolver.ensure_created(None, "testgenesis");
    let state = resolver.telemetry_state();
    assert!(state.is_initialized());
    assert_eq!(state.session_guid(), r.config.session_guid);
    assert_eq!(state.chain_id(), "dev-testgenesis");
}

#[test]
fn ensure_reports_save_failure_with_usable_config() {
    let global = tempfile::tempdir().unwrap();
    // A directory where the config file should be makes the save fail.
    std::fs::create_dir(global.path().join(TELEMETRY_CONFIG_FILENAME)).unwrap();

    let resolver = resolver(global.path());
    let r = resolver.ensure_created(None, "g");
    assert!(r.created);
    assert!(r.error.is_some());
    assert!(!r.config.guid.is_empty());
    assert!(resolver.telemetry_state().is_initialized());
}
