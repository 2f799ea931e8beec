//! Severity-gated logger with shared runtime state.
//!
//! Deriving a logger with [`Logger::with`] or [`Logger::with_fields`] copies
//! the context fields but never the [`LoggerState`]: every logger derived
//! from one root reads and mutates the same levels and telemetry flag.

use std::backtrace::Backtrace;
use std::collections::HashMap;
use std::fmt;
use std::panic::Location;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
use serde_json::Value;

use super::level::{permitted, SeverityLevel};
use super::sink::{Fields, LogSink, TracingSink};
use crate::telemetry::TelemetryState;

/// Prefix of the record carrying the stack trace for severe levels.
pub const STACK_PREFIX: &str = "[Stack]";

static BASE_LOGGER: OnceLock<Logger> = OnceLock::new();

/// Mutable levels and telemetry switch shared by a root logger and every
/// logger derived from it.
#[derive(Debug)]
pub struct LoggerState {
    telemetry_enabled: AtomicBool,
    logging_level: AtomicU8,
    telemetry_level: AtomicU8,
}

impl LoggerState {
    fn new(logging_level: SeverityLevel) -> Self {
        Self {
            telemetry_enabled: AtomicBool::new(false),
            logging_level: AtomicU8::new(logging_level.into()),
            telemetry_level: AtomicU8::new(SeverityLevel::Info.into()),
        }
    }

    pub fn telemetry_enabled(&self) -> bool {
        self.telemetry_enabled.load(Ordering::Acquire)
    }

    pub fn logging_level(&self) -> SeverityLevel {
        load_level(&self.logging_level)
    }

    pub fn telemetry_level(&self) -> SeverityLevel {
        load_level(&self.telemetry_level)
    }
}

fn load_level(slot: &AtomicU8) -> SeverityLevel {
    // Only valid ranks are ever stored.
    SeverityLevel::from_u8(slot.load(Ordering::Acquire)).unwrap_or(SeverityLevel::Info)
}

/// Source location of a log call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite {
    pub file: &'static str,
    pub line: u32,
    pub function: Option<&'static str>,
    path: &'static str,
}

impl CallSite {
    pub fn new(path: &'static str, line: u32, function: Option<&'static str>) -> Self {
        let file = path.rsplit(['/', '\\']).next().unwrap_or(path);
        Self {
            file,
            line,
            function,
            path,
        }
    }

    /// Location of the caller of the enclosing `#[track_caller]` function.
    ///
    /// The function name is left unset and resolved from the stack the
    /// first time this site logs.
    #[track_caller]
    pub fn caller() -> Self {
        let loc = Location::caller();
        Self::new(loc.file(), loc.line(), None)
    }

    fn attach(&self, fields: &mut Fields, function: Option<&str>) {
        fields.insert("file".into(), Value::from(self.file));
        fields.insert("line".into(), Value::from(self.line));
        let known: Option<&str> = self.function;
        if let Some(function) = known.or(function) {
            fields.insert("function".into(), Value::from(function));
        }
    }
}

type FunctionNames = RwLock<HashMap<(&'static str, u32), Option<Arc<str>>>>;

/// Resolved function names per call site. Sites are static, so each one
/// pays for a stack capture at most once.
static FUNCTION_NAMES: OnceLock<FunctionNames> = OnceLock::new();

fn cached_function(site: &CallSite) -> Option<Option<Arc<str>>> {
    FUNCTION_NAMES
        .get_or_init(Default::default)
        .read()
        .get(&(site.path, site.line))
        .cloned()
}

fn remember_function(site: &CallSite, stack: &str) -> Option<Arc<str>> {
    let name: Option<Arc<str>> = function_at(stack, site.path, site.line).map(Arc::from);
    FUNCTION_NAMES
        .get_or_init(Default::default)
        .write()
        .insert((site.path, site.line), name.clone());
    name
}

/// Name of the frame executing `path:line` in a rendered backtrace.
///
/// Frames render as `N: symbol` followed by one or more `at file:line:col`
/// lines; inlined frames repeat the pair.
pub(crate) fn function_at(stack: &str, path: &str, line: u32) -> Option<String> {
    let path = path.replace('\\', "/");
    let mut symbol: Option<&str> = None;
    for entry in stack.lines().map(str::trim) {
        if let Some(location) = entry.strip_prefix("at ") {
            let mut parts = location.rsplitn(3, ':');
            let (_col, at_line, file) = (parts.next(), parts.next(), parts.next());
            let matches = at_line.and_then(|l| l.parse::<u32>().ok()) == Some(line)
                && file.is_some_and(|f| f.replace('\\', "/").ends_with(&path));
            if matches {
                return symbol.map(strip_symbol_hash);
            }
        } else if let Some((index, name)) = entry.split_once(": ") {
            if index.chars().all(|c| c.is_ascii_digit()) {
                symbol = Some(name);
            }
        }
    }
    None
}

fn strip_symbol_hash(symbol: &str) -> String {
    match symbol.rsplit_once("::h") {
        Some((name, hash)) if hash.len() == 16 && hash.chars().all(|c| c.is_ascii_hexdigit()) => {
            name.to_string()
        }
        _ => symbol.to_string(),
    }
}

/// Leveled logger over a [`LogSink`].
///
/// Cloning is cheap; clones and derived loggers share state.
#[derive(Clone)]
pub struct Logger {
    sink: Arc<dyn LogSink>,
    context: Arc<Fields>,
    state: Arc<LoggerState>,
    telemetry: Arc<TelemetryState>,
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("context", &self.context)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl Logger {
    /// Root logger reading identifiers from the process-wide telemetry state.
    ///
    /// Logging level starts at Info, telemetry disabled.
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self::with_telemetry_state(sink, TelemetryState::global())
    }

    /// Root logger bound to an explicit telemetry state.
    pub fn with_telemetry_state(sink: Arc<dyn LogSink>, telemetry: Arc<TelemetryState>) -> Self {
        Self {
            sink,
            context: Arc::new(Fields::new()),
            state: Arc::new(LoggerState::new(SeverityLevel::Info)),
            telemetry,
        }
    }

    /// Derived logger with one more context field. Shares state.
    pub fn with(&self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut context = (*self.context).clone();
        context.insert(key.into(), value.into());
        self.derive(context)
    }

    /// Derived logger with `fields` merged over the current context. Shares state.
    pub fn with_fields(&self, fields: Fields) -> Self {
        let mut context = (*self.context).clone();
        context.extend(fields);
        self.derive(context)
    }

    fn derive(&self, context: Fields) -> Self {
        Self {
            sink: self.sink.clone(),
            context: Arc::new(context),
            state: self.state.clone(),
            telemetry: self.telemetry.clone(),
        }
    }

    pub fn context(&self) -> &Fields {
        &self.context
    }

    pub fn state(&self) -> &Arc<LoggerState> {
        &self.state
    }

    pub(crate) fn sink(&self) -> &Arc<dyn LogSink> {
        &self.sink
    }

    pub(crate) fn telemetry_state(&self) -> &Arc<TelemetryState> {
        &self.telemetry
    }

    /// Set the logging threshold for this logger's whole family.
    pub fn set_level(&self, level: SeverityLevel) {
        self.state.logging_level.store(level.into(), Ordering::Release);
    }

    pub fn level(&self) -> SeverityLevel {
        self.state.logging_level()
    }

    pub fn is_level_enabled(&self, level: SeverityLevel) -> bool {
        permitted(self.state.logging_level(), level)
    }

    /// Stored for configuration only; telemetry emission is gated by
    /// [`Logger::enable_telemetry`] alone.
    pub fn set_telemetry_level(&self, level: SeverityLevel) {
        self.state.telemetry_level.store(level.into(), Ordering::Release);
    }

    pub fn telemetry_level(&self) -> SeverityLevel {
        self.state.telemetry_level()
    }

    pub fn enable_telemetry(&self, enabled: bool) {
        self.state.telemetry_enabled.store(enabled, Ordering::Release);
    }

    pub fn telemetry_enabled(&self) -> bool {
        self.state.telemetry_enabled()
    }

    pub fn telemetry_session(&self) -> String {
        self.telemetry.session_guid()
    }

    pub fn telemetry_host_name(&self) -> String {
        self.telemetry.host_name()
    }

    pub fn instance_name(&self) -> String {
        self.telemetry.instance_name()
    }

    pub fn chain_id(&self) -> String {
        self.telemetry.chain_id()
    }

    /// Gate, decorate and forward one record.
    ///
    /// The message is only rendered once the level is known to pass.
    /// Error and more severe levels emit a stack trace record first; Fatal
    /// exits the process and Panic panics after logging.
    pub fn log_at(&self, level: SeverityLevel, site: CallSite, args: fmt::Arguments<'_>) {
        if !permitted(self.state.logging_level(), level) {
            return;
        }

        let cached = match site.function {
            Some(_) => Some(None),
            None => cached_function(&site),
        };
        let stack = (level.captures_stack() || cached.is_none())
            .then(|| Backtrace::force_capture().to_string());
        let function = match (cached, &stack) {
            (Some(name), _) => name,
            (None, Some(stack)) => remember_function(&site, stack),
            (None, None) => None,
        };

        let mut fields = (*self.context).clone();
        site.attach(&mut fields, function.as_deref());

        if let Some(stack) = stack.filter(|_| level.captures_stack()) {
            let record = format!("{} {}", STACK_PREFIX, stack);
            self.sink.log(SeverityLevel::Error, &record, &fields);
        }

        let message = args.to_string();
        self.sink.log(level, &message, &fields);

        match level {
            SeverityLevel::Fatal => std::process::exit(1),
            SeverityLevel::Panic => panic!("{}", message),
            _ => {}
        }
    }

    #[track_caller]
    pub fn debug(&self, msg: impl fmt::Display) {
        self.log_at(SeverityLevel::Debug, CallSite::caller(), format_args!("{}", msg));
    }

    #[track_caller]
    pub fn info(&self, msg: impl fmt::Display) {
        self.log_at(SeverityLevel::Info, CallSite::caller(), format_args!("{}", msg));
    }

    #[track_caller]
    pub fn warn(&self, msg: impl fmt::Display) {
        self.log_at(SeverityLevel::Warn, CallSite::caller(), format_args!("{}", msg));
    }

    #[track_caller]
    pub fn error(&self, msg: impl fmt::Display) {
        self.log_at(SeverityLevel::Error, CallSite::caller(), format_args!("{}", msg));
    }

    /// Logs, then exits the process with status 1.
    #[track_caller]
    pub fn fatal(&self, msg: impl fmt::Display) {
        self.log_at(SeverityLevel::Fatal, CallSite::caller(), format_args!("{}", msg));
    }

    /// Logs, then panics with the message.
    #[track_caller]
    pub fn panic(&self, msg: impl fmt::Display) {
        self.log_at(SeverityLevel::Panic, CallSite::caller(), format_args!("{}", msg));
    }
}

/// The process-wide default logger: tracing sink, Warn and above.
pub fn base() -> Logger {
    BASE_LOGGER
        .get_or_init(|| {
            let logger = Logger::new(Arc::new(TracingSink));
            logger.set_level(SeverityLevel::Warn);
            logger
        })
        .clone()
}
