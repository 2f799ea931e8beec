//! Sink setup and macro tests.

use std::path::PathBuf;

use node_telemetry::logging::{
    filter_directive, CallSite, LogConfig, LogError, LogFormat, Logger, MemorySink, SeverityLevel,
};
use node_telemetry::telemetry::TelemetryState;
use node_telemetry::{debugf, errorf, infof, warnf};
use serde_json::json;

// =============================================================================
// LogConfig
// =============================================================================

#[test]
fn log_config_with_output_path() {
    let config = LogConfig {
        format: LogFormat::Json,
        level: "debug".to_string(),
        output_path: Some(PathBuf::from("/tmp/node.log")),
    };
    assert_eq!(config.format, LogFormat::Json);
    assert_eq!(config.output_path, Some(PathBuf::from("/tmp/node.log")));
}

#[test]
fn filter_directive_covers_every_level() {
    for level in SeverityLevel::ALL {
        let directive = filter_directive(level);
        assert!(["error", "warn", "info", "debug"].contains(&directive));
    }
    assert_eq!(filter_directive(SeverityLevel::Panic), "error");
    assert_eq!(filter_directive(SeverityLevel::Info), "info");
}

#[test]
fn log_error_display() {
    let err = LogError::InvalidFilter("bad".to_string());
    assert_eq!(err.to_string(), "Invalid log filter: bad");
    assert_eq!(
        LogError::AlreadyInitialized.to_string(),
        "Subscriber already initialized"
    );
}

// =============================================================================
// Formatted macros
// =============================================================================

fn logger() -> (Logger, std::sync::Arc<MemorySink>) {
    let sink = MemorySink::new();
    (
        Logger::with_telemetry_state(sink.clone(), TelemetryState::new()),
        sink,
    )
}

#[test]
fn formatted_macros_record_function_name() {
    let (log, sink) = logger();
    infof!(log, "round {} committed", 7);
    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].message, "round 7 committed");
    assert_eq!(records[0].field("file"), Some(&json!("logging_test.rs")));
    let function = records[0].field("function").and_then(|v| v.as_str());
    assert!(function.is_some_and(|f| f.ends_with("formatted_macros_record_function_name")));
}

#[test]
fn formatted_macros_respect_threshold() {
    let (log, sink) = logger();
    debugf!(log, "hidden {}", 1);
    assert!(sink.is_empty());
    warnf!(log, "shown {}", 2);
    errorf!(log, "failed {}", 3);
    let messages: Vec<_> = sink.records().into_iter().map(|r| r.message).collect();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[0], "shown 2");
    assert_eq!(messages[2], "failed 3");
}

#[test]
fn call_site_strips_directories() {
    let site = CallSite::new("src/ledger/blocks.rs", 42, None);
    assert_eq!(site.file, "blocks.rs");
    assert_eq!(site.line, 42);
}
