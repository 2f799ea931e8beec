//! Formatted per-severity logging macros.
//!
//! Unlike the plain `Logger` methods these also record the calling
//! function's path.
//!
//! ```
//! use std::sync::Arc;
//! use node_telemetry::logging::{Logger, TracingSink};
//! use node_telemetry::infof;
//!
//! let log = Logger::new(Arc::new(TracingSink));
//! infof!(log, "catchup finished at round {}", 1200);
//! ```

/// Path of the enclosing function, e.g. `my_crate::ledger::apply`.
#[macro_export]
macro_rules! function_name {
    () => {{
        fn f() {}
        fn type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let name = type_name_of(f);
        name.strip_suffix("::f").unwrap_or(name)
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __log_at {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log_at(
            $level,
            $crate::logging::CallSite::new(file!(), line!(), Some($crate::function_name!())),
            format_args!($($arg)+),
        )
    };
}

#[macro_export]
macro_rules! debugf {
    ($logger:expr, $($arg:tt)+) => {
        $crate::__log_at!($logger, $crate::logging::SeverityLevel::Debug, $($arg)+)
    };
}

#[macro_export]
macro_rules! infof {
    ($logger:expr, $($arg:tt)+) => {
        $crate::__log_at!($logger, $crate::logging::SeverityLevel::Info, $($arg)+)
    };
}

#[macro_export]
macro_rules! warnf {
    ($logger:expr, $($arg:tt)+) => {
        $crate::__log_at!($logger, $crate::logging::SeverityLevel::Warn, $($arg)+)
    };
}

#[macro_export]
macro_rules! errorf {
    ($logger:expr, $($arg:tt)+) => {
        $crate::__log_at!($logger, $crate::logging::SeverityLevel::Error, $($arg)+)
    };
}

/// Logs, then exits the process with status 1.
#[macro_export]
macro_rules! fatalf {
    ($logger:expr, $($arg:tt)+) => {
        $crate::__log_at!($logger, $crate::logging::SeverityLevel::Fatal, $($arg)+)
    };
}

/// Logs, then panics.
#[macro_export]
macro_rules! panicf {
    ($logger:expr, $($arg:tt)+) => {
        $crate::__log_at!($logger, $crate::logging::SeverityLevel::Panic, $($arg)+)
    };
}
