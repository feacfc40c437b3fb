//! Timestamp formatting utilities
//!
//! Plugins render the call's instant with one of these formats. The default
//! matches the `toISOString`-style output most log shippers expect.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Standardized timestamp format options
///
/// # Examples
///
/// ```
/// use plugin_logger::core::TimestampFormat;
/// use chrono::Utc;
///
/// let format = TimestampFormat::Iso8601;
/// let timestamp = format.format(&Utc::now());
/// // Output: "2025-01-08T10:30:45.123Z"
/// assert!(timestamp.ends_with('Z'));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// ISO 8601 with milliseconds: `2025-01-08T10:30:45.123Z`
    #[default]
    Iso8601,

    /// ISO 8601 with microseconds: `2025-01-08T10:30:45.123456Z`
    Iso8601Micros,

    /// RFC 3339 format: `2025-01-08T10:30:45.123456+00:00`
    Rfc3339,

    /// Unix timestamp in milliseconds: `1736332245123`
    UnixMillis,

    /// Custom strftime format
    ///
    /// ```
    /// use plugin_logger::core::TimestampFormat;
    ///
    /// let format = TimestampFormat::Custom("%d/%b/%Y:%H:%M:%S %z".to_string());
    /// ```
    Custom(String),
}

impl TimestampFormat {
    /// Format a `DateTime<Utc>` according to this format
    #[must_use]
    pub fn format(&self, datetime: &DateTime<Utc>) -> String {
        match self {
            TimestampFormat::Iso8601 => datetime.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
            TimestampFormat::Iso8601Micros => datetime.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string(),
            TimestampFormat::Rfc3339 => datetime.to_rfc3339(),
            TimestampFormat::UnixMillis => datetime.timestamp_millis().to_string(),
            TimestampFormat::Custom(format_str) => datetime.format(format_str).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_datetime() -> DateTime<Utc> {
        // 2025-01-08 10:30:45.123456 UTC
        Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45)
            .single()
            .expect("valid datetime")
            + chrono::Duration::microseconds(123456)
    }

    #[test]
    fn test_iso8601_format() {
        let result = TimestampFormat::Iso8601.format(&fixed_datetime());
        assert_eq!(result, "2025-01-08T10:30:45.123Z");
    }

    #[test]
    fn test_iso8601_micros_format() {
        let result = TimestampFormat::Iso8601Micros.format(&fixed_datetime());
        assert_eq!(result, "2025-01-08T10:30:45.123456Z");
    }

    #[test]
    fn test_rfc3339_format() {
        let result = TimestampFormat::Rfc3339.format(&fixed_datetime());
        assert!(result.starts_with("2025-01-08T10:30:45"));
        assert!(result.contains("+00:00"));
    }

    #[test]
    fn test_unix_millis_format() {
        let result = TimestampFormat::UnixMillis.format(&fixed_datetime());
        assert_eq!(result, "1736332245123");
    }

    #[test]
    fn test_custom_format() {
        let format = TimestampFormat::Custom("%Y/%m/%d %H:%M".to_string());
        assert_eq!(format.format(&fixed_datetime()), "2025/01/08 10:30");
    }

    #[test]
    fn test_deserialization() {
        let format: TimestampFormat =
            serde_json::from_str("\"Iso8601\"").expect("deserialize Iso8601");
        assert_eq!(format, TimestampFormat::Iso8601);

        let format: TimestampFormat =
            serde_json::from_str(r#"{"Custom":"%Y-%m-%d"}"#).expect("deserialize Custom");
        assert_eq!(format, TimestampFormat::Custom("%Y-%m-%d".to_string()));
    }
}
