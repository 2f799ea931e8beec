//! Severity levels and the gate deciding which calls reach the sink.
//!
//! Levels are ordered from most severe to most verbose. A threshold names
//! the most verbose level currently allowed through.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Ordered log severity, `Panic < Fatal < Error < Warn < Info < Debug`.
///
/// Serialized as its numeric rank so persisted configs stay compact.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum SeverityLevel {
    /// Logs, then panics.
    Panic = 0,
    /// Logs, then exits the process with status 1.
    Fatal = 1,
    /// Errors that should definitely be noted.
    Error = 2,
    /// Non-critical entries that deserve eyes.
    Warn = 3,
    /// General operational entries.
    #[default]
    Info = 4,
    /// Very verbose, usually only enabled when debugging.
    Debug = 5,
}

/// Whether a call at `level` passes a gate configured with `threshold`.
#[inline]
pub fn permitted(threshold: SeverityLevel, level: SeverityLevel) -> bool {
    threshold >= level
}

impl SeverityLevel {
    pub const ALL: [SeverityLevel; 6] = [
        Self::Panic,
        Self::Fatal,
        Self::Error,
        Self::Warn,
        Self::Info,
        Self::Debug,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Panic => "panic",
            Self::Fatal => "fatal",
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        }
    }

    /// Rank-to-level conversion; `None` outside `0..=5`.
    pub fn from_u8(rank: u8) -> Option<Self> {
        Self::ALL.get(rank as usize).copied()
    }

    /// Error and anything more severe gets a stack trace before the message.
    pub fn captures_stack(&self) -> bool {
        *self <= Self::Error
    }
}

impl fmt::Display for SeverityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<SeverityLevel> for u8 {
    fn from(level: SeverityLevel) -> Self {
        level as u8
    }
}

impl TryFrom<u8> for SeverityLevel {
    type Error = String;

    fn try_from(rank: u8) -> Result<Self, String> {
        Self::from_u8(rank).ok_or_else(|| format!("invalid severity level: {}", rank))
    }
}

impl FromStr for SeverityLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "panic" => Ok(Self::Panic),
            "fatal" => Ok(Self::Fatal),
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            other => Err(format!("unknown severity level: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_most_severe_first() {
        assert!(SeverityLevel::Panic < SeverityLevel::Fatal);
        assert!(SeverityLevel::Fatal < SeverityLevel::Error);
        assert!(SeverityLevel::Error < SeverityLevel::Warn);
        assert!(SeverityLevel::Warn < SeverityLevel::Info);
        assert!(SeverityLevel::Info < SeverityLevel::Debug);
    }

    #[test]
    fn test_permitted_matches_ordering() {
        for threshold in SeverityLevel::ALL {
            for level in SeverityLevel::ALL {
                assert_eq!(
                    permitted(threshold, level),
                    (threshold as u8) >= (level as u8),
                    "threshold={} level={}",
                    threshold,
                    level
                );
            }
        }
    }

    #[test]
    fn test_severe_levels_always_pass() {
        for threshold in SeverityLevel::ALL {
            assert!(permitted(threshold, SeverityLevel::Panic));
        }
        assert!(permitted(SeverityLevel::Debug, SeverityLevel::Debug));
        assert!(!permitted(SeverityLevel::Info, SeverityLevel::Debug));
    }

    #[test]
    fn test_serde_uses_rank() {
        let json = serde_json::to_string(&SeverityLevel::Warn).unwrap();
        assert_eq!(json, "3");
        let level: SeverityLevel = serde_json::from_str("5").unwrap();
        assert_eq!(level, SeverityLevel::Debug);
        assert!(serde_json::from_str::<SeverityLevel>("9").is_err());
    }

    #[test]
    fn test_default_is_info() {
        assert_eq!(SeverityLevel::default(), SeverityLevel::Info);
    }

    #[test]
    fn test_try_from_rank() {
        for level in SeverityLevel::ALL {
            assert_eq!(SeverityLevel::try_from(level as u8), Ok(level));
        }
        assert!(SeverityLevel::try_from(6).is_err());
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("WARNING".parse::<SeverityLevel>(), Ok(SeverityLevel::Warn));
        assert_eq!("debug".parse::<SeverityLevel>(), Ok(SeverityLevel::Debug));
        assert!("loud".parse::<SeverityLevel>().is_err());
    }

    #[test]
    fn test_captures_stack() {
        assert!(SeverityLevel::Panic.captures_stack());
        assert!(SeverityLevel::Error.captures_stack());
        assert!(!SeverityLevel::Warn.captures_stack());
    }
}
