//! Log record structure

use super::log_level::LogLevel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Write};

/// Wall-clock instant attached to every dispatched call
pub type Timestamp = DateTime<Utc>;

/// One logical log event.
///
/// Built fresh for each call that passes the threshold and handed to
/// plugins by value; the dispatcher never keeps it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    pub level: LogLevel,
    pub message: String,
    pub timestamp: Timestamp,
}

impl LogRecord {
    pub fn new(level: LogLevel, message: impl Into<String>, timestamp: Timestamp) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp,
        }
    }

    /// Build a record stamped with the current time
    pub fn now(level: LogLevel, message: impl Into<String>) -> Self {
        Self::new(level, message, Utc::now())
    }
}

/// Join message fragments with a single space, preserving order
pub fn join_fragments<I>(fragments: I) -> String
where
    I: IntoIterator,
    I::Item: Display,
{
    let mut message = String::new();
    for (idx, fragment) in fragments.into_iter().enumerate() {
        if idx > 0 {
            message.push(' ');
        }
        // Writing into a String cannot fail
        let _ = write!(message, "{}", fragment);
    }
    message
}
