//! Leveled logging for the node.
//!
//! A root [`Logger`] owns one shared [`LoggerState`]; loggers derived from it
//! add context fields but see the same levels and telemetry switch.
//! Records go to a [`LogSink`], by default the tracing subscriber installed
//! with [`init_logging`].

mod init;
mod level;
mod logger;
mod macros;
mod sink;
mod telemetry;

pub use init::{filter_directive, init_logging, LogConfig, LogError, LogFormat};
pub use level::{permitted, SeverityLevel};
pub use logger::{base, CallSite, Logger, LoggerState, STACK_PREFIX};
pub use sink::{Fields, LogRecord, LogSink, MemorySink, TracingSink};
