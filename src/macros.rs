//! Logging macros taking message fragments as separate arguments.
//!
//! Each argument only needs to implement `Display`; the fragments are
//! joined with a single space exactly as the logger methods do.
//!
//! # Examples
//!
//! ```
//! use plugin_logger::prelude::*;
//! use plugin_logger::info;
//!
//! let logger = Logger::new();
//!
//! info!(logger, "Server started");
//!
//! let port = 8080;
//! info!(logger, "Server listening on port", port);
//! ```

/// Dispatch fragments at an explicit level.
///
/// # Examples
///
/// ```
/// # use plugin_logger::prelude::*;
/// # let logger = Logger::new();
/// use plugin_logger::emit;
/// emit!(logger, LogLevel::Error, "Error code:", 500);
/// ```
#[macro_export]
macro_rules! emit {
    ($logger:expr, $level:expr, $($arg:expr),+ $(,)?) => {
        $logger.emit($level, [$(&$arg as &dyn ::std::fmt::Display),+])
    };
}

/// Legacy unleveled call, routed to each plugin's `log` method.
///
/// # Examples
///
/// ```
/// # use plugin_logger::prelude::*;
/// # let logger = Logger::new();
/// use plugin_logger::log;
/// log!(logger, "Hello", "World");
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $($arg:expr),+ $(,)?) => {
        $logger.log([$(&$arg as &dyn ::std::fmt::Display),+])
    };
}

/// Log a trace-level message.
///
/// # Examples
///
/// ```
/// # use plugin_logger::prelude::*;
/// # let logger = Logger::new();
/// use plugin_logger::trace;
/// trace!(logger, "Entering function:", "calculate()");
/// ```
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:expr),+ $(,)?) => {
        $logger.trace([$(&$arg as &dyn ::std::fmt::Display),+])
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:expr),+ $(,)?) => {
        $logger.debug([$(&$arg as &dyn ::std::fmt::Display),+])
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:expr),+ $(,)?) => {
        $logger.info([$(&$arg as &dyn ::std::fmt::Display),+])
    };
}

/// Log a warning-level message.
///
/// # Examples
///
/// ```
/// # use plugin_logger::prelude::*;
/// # let logger = Logger::new();
/// use plugin_logger::warn;
/// warn!(logger, "Retry attempt", 3, "of", 5);
/// ```
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:expr),+ $(,)?) => {
        $logger.warn([$(&$arg as &dyn ::std::fmt::Display),+])
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:expr),+ $(,)?) => {
        $logger.error([$(&$arg as &dyn ::std::fmt::Display),+])
    };
}

/// Log a fatal-level message.
///
/// # Examples
///
/// ```
/// # use plugin_logger::prelude::*;
/// # let logger = Logger::new();
/// use plugin_logger::fatal;
/// fatal!(logger, "Unable to recover from error:", "disk full");
/// ```
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:expr),+ $(,)?) => {
        $logger.fatal([$(&$arg as &dyn ::std::fmt::Display),+])
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{
        Completion, LogLevel, Logger, LoggerError, Plugin, Timestamp,
    };
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Default)]
    struct Messages(Mutex<Vec<(LogLevel, String)>>);

    impl Plugin for Messages {
        fn name(&self) -> &str {
            "messages"
        }

        fn emit(&self, level: LogLevel, message: &str, _timestamp: Timestamp) -> Completion {
            self.0.lock().push((level, message.to_string()));
            Completion::delivered()
        }

        fn handle_error(&self, _error: &LoggerError) {}
    }

    fn logger_with_sink() -> (Logger, Arc<Messages>) {
        let sink = Arc::new(Messages::default());
        let mut logger = Logger::new();
        logger.add_plugin(sink.clone());
        (logger, sink)
    }

    #[test]
    fn test_severity_macros_join_fragments() {
        let (logger, sink) = logger_with_sink();
        trace!(logger, "t", 1);
        debug!(logger, "d", 2.5);
        info!(logger, "Hello", "World");
        warn!(logger, "w", 'c');
        error!(logger, "e", String::from("owned"));
        fatal!(logger, "f");

        assert_eq!(
            *sink.0.lock(),
            vec![
                (LogLevel::Trace, "t 1".to_string()),
                (LogLevel::Debug, "d 2.5".to_string()),
                (LogLevel::Info, "Hello World".to_string()),
                (LogLevel::Warn, "w c".to_string()),
                (LogLevel::Error, "e owned".to_string()),
                (LogLevel::Fatal, "f".to_string()),
            ]
        );
    }

    #[test]
    fn test_emit_and_log_macros() {
        let (logger, sink) = logger_with_sink();
        emit!(logger, LogLevel::Warn, "code", 500);
        log!(logger, "legacy", "call",);

        assert_eq!(
            *sink.0.lock(),
            vec![
                (LogLevel::Warn, "code 500".to_string()),
                (LogLevel::Info, "legacy call".to_string()),
            ]
        );
    }
}
