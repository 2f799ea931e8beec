//! Telemetry emission on [`Logger`].
//!
//! Gated only by the shared telemetry-enabled flag. The telemetry level is
//! not consulted and the logging threshold does not apply.

use serde_json::Value;

use super::level::SeverityLevel;
use super::logger::Logger;
use crate::telemetry::spec::{build_message, Category, Event, MetricDetails};

impl Logger {
    /// Emit a telemetry event with no details.
    pub fn event(&self, category: Category, identifier: Event) {
        self.event_with_details(category, identifier, None)
    }

    /// Emit `/<category>/<identifier>`, attaching `details` when present.
    pub fn event_with_details(&self, category: Category, identifier: Event, details: Option<Value>) {
        if !self.telemetry_enabled() {
            return;
        }
        let message = build_message(&[category.as_str(), identifier.as_str()]);
        self.emit_telemetry(&message, None, details);
    }

    /// Emit `/<category>/<metric identifier>` with the metric payload.
    ///
    /// Nothing is emitted without a metric.
    pub fn metrics(
        &self,
        category: Category,
        metrics: Option<&dyn MetricDetails>,
        details: Option<Value>,
    ) {
        if !self.telemetry_enabled() {
            return;
        }
        let Some(metrics) = metrics else {
            return;
        };
        let message = build_message(&[category.as_str(), metrics.identifier()]);
        self.emit_telemetry(&message, Some(metrics.to_value()), details);
    }

    fn emit_telemetry(&self, message: &str, metrics: Option<Value>, details: Option<Value>) {
        let mut fields = self.context().clone();
        if let Some(metrics) = metrics {
            fields.insert("metrics".into(), metrics);
        }
        if let Some(details) = details {
            fields.insert("details".into(), details);
        }

        let state = self.telemetry_state();
        fields.insert("telemetry".into(), Value::Bool(self.telemetry_enabled()));
        fields.insert("session".into(), Value::String(state.session_guid()));
        fields.insert("instanceName".into(), Value::String(state.instance_name()));
        fields.insert("chainID".into(), Value::String(state.chain_id()));

        self.sink().log(SeverityLevel::Info, message, &fields);
    }
}
