//! Log level definitions
//!
//! Ranks form a closed, totally ordered scale. `All` and `Off` only make
//! sense as thresholds; the six levels in between are the ones a log call
//! can carry.

use super::error::LoggerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[derive(Default)]
#[serde(rename_all = "UPPERCASE")]
#[repr(u8)]
pub enum LogLevel {
    #[default]
    All = 0,
    Trace = 1,
    Debug = 2,
    Info = 3,
    Warn = 4,
    Error = 5,
    Fatal = 6,
    Off = 7,
}

impl LogLevel {
    /// Every level that can be used as a call rank, in ascending order
    pub const SEVERITIES: [LogLevel; 6] = [
        LogLevel::Trace,
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
        LogLevel::Fatal,
    ];

    /// Every rank on the scale, in ascending order
    pub const ALL_RANKS: [LogLevel; 8] = [
        LogLevel::All,
        LogLevel::Trace,
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
        LogLevel::Fatal,
        LogLevel::Off,
    ];

    #[inline]
    pub const fn rank(self) -> u8 {
        self as u8
    }

    pub fn to_str(&self) -> &'static str {
        match self {
            LogLevel::All => "ALL",
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Fatal => "FATAL",
            LogLevel::Off => "OFF",
        }
    }

    /// Lowercase label used by line-oriented plugins (`info`, `warn`, ...)
    pub fn label(&self) -> &'static str {
        match self {
            LogLevel::All => "all",
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Fatal => "fatal",
            LogLevel::Off => "off",
        }
    }

    /// Whether this level may be carried by a log call
    #[inline]
    pub fn is_severity(&self) -> bool {
        !matches!(self, LogLevel::All | LogLevel::Off)
    }

    /// Whether a call at this level gets past `threshold`
    #[inline]
    pub fn passes(&self, threshold: LogLevel) -> bool {
        self.rank() >= threshold.rank()
    }

    #[cfg(feature = "console")]
    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            LogLevel::Trace => BrightBlack,
            LogLevel::Debug => Blue,
            LogLevel::Info => Green,
            LogLevel::Warn => Yellow,
            LogLevel::Error => Red,
            LogLevel::Fatal => BrightRed,
            LogLevel::All | LogLevel::Off => White,
        }
    }

    fn invalid_rank(value: impl fmt::Display) -> LoggerError {
        let ranks: Vec<String> = Self::ALL_RANKS
            .iter()
            .map(|level| level.rank().to_string())
            .collect();
        LoggerError::config(
            "Logger",
            format!(
                "level '{}' must be one of the following values [{}]",
                value,
                ranks.join(",")
            ),
        )
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl TryFrom<u8> for LogLevel {
    type Error = LoggerError;

    fn try_from(rank: u8) -> Result<Self, LoggerError> {
        Self::ALL_RANKS
            .get(usize::from(rank))
            .copied()
            .ok_or_else(|| Self::invalid_rank(rank))
    }
}

impl From<LogLevel> for u8 {
    fn from(level: LogLevel) -> Self {
        level.rank()
    }
}

impl FromStr for LogLevel {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(rank) = trimmed.parse::<u8>() {
            return LogLevel::try_from(rank);
        }
        match trimmed.to_uppercase().as_str() {
            "ALL" => Ok(LogLevel::All),
            "TRACE" => Ok(LogLevel::Trace),
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            "FATAL" => Ok(LogLevel::Fatal),
            "OFF" => Ok(LogLevel::Off),
            _ => Err(Self::invalid_rank(s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranks_match_scale() {
        for (expected, level) in LogLevel::ALL_RANKS.iter().enumerate() {
            assert_eq!(level.rank() as usize, expected);
        }
        assert!(LogLevel::All < LogLevel::Trace);
        assert!(LogLevel::Fatal < LogLevel::Off);
    }

    #[test]
    fn test_try_from_rejects_out_of_range() {
        assert_eq!(LogLevel::try_from(5).unwrap(), LogLevel::Error);
        let err = LogLevel::try_from(8).unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("[0,1,2,3,4,5,6,7]"));
    }

    #[test]
    fn test_parse_names_and_ranks() {
        assert_eq!("warning".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!("Off".parse::<LogLevel>().unwrap(), LogLevel::Off);
        assert_eq!("2".parse::<LogLevel>().unwrap(), LogLevel::Debug);
        assert!("verbose".parse::<LogLevel>().is_err());
        assert!("42".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_passes_threshold() {
        assert!(LogLevel::Error.passes(LogLevel::Error));
        assert!(!LogLevel::Warn.passes(LogLevel::Error));
        for level in LogLevel::SEVERITIES {
            assert!(level.passes(LogLevel::All));
            assert!(!level.passes(LogLevel::Off));
        }
    }

    #[test]
    fn test_severity_membership() {
        assert!(!LogLevel::All.is_severity());
        assert!(!LogLevel::Off.is_severity());
        assert!(LogLevel::SEVERITIES.iter().all(LogLevel::is_severity));
    }

    #[test]
    fn test_serde_uses_uppercase_names() {
        let json = serde_json::to_string(&LogLevel::Fatal).unwrap();
        assert_eq!(json, "\"FATAL\"");
        let level: LogLevel = serde_json::from_str("\"TRACE\"").unwrap();
        assert_eq!(level, LogLevel::Trace);
    }
}
