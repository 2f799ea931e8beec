//! Log sink capability and the stock sinks.
//!
//! A sink receives fully-gated records: level checks have already happened
//! in the logger by the time `log` is called.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;

use super::level::SeverityLevel;

/// Named structured fields attached to a record.
///
/// Merged left to right when loggers are derived; later keys win.
pub type Fields = BTreeMap<String, Value>;

/// Destination for log and telemetry records. Fire-and-forget.
pub trait LogSink: Send + Sync {
    fn log(&self, level: SeverityLevel, message: &str, fields: &Fields);
}

impl<S: LogSink + ?Sized> LogSink for Arc<S> {
    fn log(&self, level: SeverityLevel, message: &str, fields: &Fields) {
        (**self).log(level, message, fields)
    }
}

/// Forwards records to the `tracing` subscriber installed by `init_logging`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&self, level: SeverityLevel, message: &str, fields: &Fields) {
        let rendered = serde_json::to_string(fields).unwrap_or_default();
        match level {
            SeverityLevel::Panic | SeverityLevel::Fatal | SeverityLevel::Error => {
                tracing::error!(fields = %rendered, severity = %level, "{}", message)
            }
            SeverityLevel::Warn => tracing::warn!(fields = %rendered, "{}", message),
            SeverityLevel::Info => tracing::info!(fields = %rendered, "{}", message),
            SeverityLevel::Debug => tracing::debug!(fields = %rendered, "{}", message),
        }
    }
}

/// One record captured by [`MemorySink`].
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub level: SeverityLevel,
    pub message: String,
    pub fields: Fields,
}

impl LogRecord {
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

/// Thread-safe sink that keeps every record in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<LogRecord>>,
}

impl MemorySink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Copy of everything captured so far.
    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Drain captured records.
    pub fn take(&self) -> Vec<LogRecord> {
        std::mem::take(&mut *self.records.lock())
    }
}

impl LogSink for MemorySink {
    fn log(&self, level: SeverityLevel, message: &str, fields: &Fields) {
        self.records.lock().push(LogRecord {
            level,
            message: message.to_string(),
            fields: fields.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_memory_sink_records_in_order() {
        let sink = MemorySink::new();
        let mut fields = Fields::new();
        fields.insert("peer".into(), json!("10.0.0.1"));

        sink.log(SeverityLevel::Info, "first", &Fields::new());
        sink.log(SeverityLevel::Warn, "second", &fields);

        let records = sink.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].message, "first");
        assert_eq!(records[1].level, SeverityLevel::Warn);
        assert_eq!(records[1].field("peer"), Some(&json!("10.0.0.1")));
    }

    #[test]
    fn test_memory_sink_take_drains() {
        let sink = MemorySink::new();
        sink.log(SeverityLevel::Debug, "x", &Fields::new());
        assert_eq!(sink.take().len(), 1);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_tracing_sink_without_subscriber() {
        // No subscriber installed; must not panic.
        TracingSink.log(SeverityLevel::Error, "boom", &Fields::new());
    }
}
