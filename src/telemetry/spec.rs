//! Telemetry vocabulary: categories, event identifiers and metric payloads.

use std::borrow::Cow;
use std::fmt;

use serde_json::Value;

/// Top-level grouping of a telemetry record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Category(Cow<'static, str>);

/// Identifier of a discrete telemetry event within a category.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Event(Cow<'static, str>);

impl Category {
    pub const APPLICATION_STATE: Category = Category::from_static("ApplicationState");
    pub const NETWORK: Category = Category::from_static("Network");
    pub const AGREEMENT: Category = Category::from_static("Agreement");
    pub const ACCOUNTS: Category = Category::from_static("Accounts");

    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Event {
    pub const STARTUP: Event = Event::from_static("Startup");
    pub const SHUTDOWN: Event = Event::from_static("Shutdown");
    pub const HEART_BEAT: Event = Event::from_static("HeartBeat");
    pub const ERROR_OUTPUT: Event = Event::from_static("ErrorOutput");
    pub const HTTP_REQUEST: Event = Event::from_static("HTTPRequest");

    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A structured metric payload that names itself.
pub trait MetricDetails: Send + Sync {
    /// Identifier used as the last path segment of the telemetry message.
    fn identifier(&self) -> &str;

    /// The payload attached to the record under `metrics`.
    fn to_value(&self) -> Value;
}

/// Build a telemetry message path: `/<segment>/<segment>...`.
pub fn build_message(segments: &[&str]) -> String {
    format!("/{}", segments.join("/"))
}
