//! Plugin capability: the sink side of the dispatcher

use super::{
    completion::Completion, error::LoggerError, log_level::LogLevel, log_record::Timestamp,
};
use std::sync::Arc;

/// A log sink.
///
/// The logger calls exactly one severity method per registered plugin for
/// each call that passes its threshold. Every severity method forwards to
/// [`Plugin::emit`] unless the plugin overrides it.
///
/// Implementations own their failures: anything that goes wrong inside the
/// sink must be routed to [`Plugin::handle_error`] and must not panic back
/// into the logger.
///
/// # Example
///
/// ```
/// use plugin_logger::prelude::*;
///
/// struct Stdout;
///
/// impl Plugin for Stdout {
///     fn name(&self) -> &str {
///         "stdout"
///     }
///
///     fn emit(&self, level: LogLevel, message: &str, timestamp: Timestamp) -> Completion {
///         println!("{} {} {}", timestamp, level, message);
///         Completion::delivered()
///     }
///
///     fn handle_error(&self, error: &LoggerError) {
///         eprintln!("stdout plugin failed: {}", error);
///     }
/// }
/// ```
pub trait Plugin: Send + Sync {
    /// Name used in diagnostics
    fn name(&self) -> &str;

    /// Record one event at `level`
    fn emit(&self, level: LogLevel, message: &str, timestamp: Timestamp) -> Completion;

    /// Handle a failure of this plugin's own I/O; must not panic
    fn handle_error(&self, error: &LoggerError);

    fn trace(&self, message: &str, timestamp: Timestamp) -> Completion {
        self.emit(LogLevel::Trace, message, timestamp)
    }

    fn debug(&self, message: &str, timestamp: Timestamp) -> Completion {
        self.emit(LogLevel::Debug, message, timestamp)
    }

    fn info(&self, message: &str, timestamp: Timestamp) -> Completion {
        self.emit(LogLevel::Info, message, timestamp)
    }

    fn warn(&self, message: &str, timestamp: Timestamp) -> Completion {
        self.emit(LogLevel::Warn, message, timestamp)
    }

    fn error(&self, message: &str, timestamp: Timestamp) -> Completion {
        self.emit(LogLevel::Error, message, timestamp)
    }

    fn fatal(&self, message: &str, timestamp: Timestamp) -> Completion {
        self.emit(LogLevel::Fatal, message, timestamp)
    }

    /// Legacy unleveled entry point; treated as `info` unless overridden
    fn log(&self, message: &str, timestamp: Timestamp) -> Completion {
        self.info(message, timestamp)
    }
}

/// Shared plugin handle as stored by the logger
pub type PluginHandle = Arc<dyn Plugin>;

/// Invoke the method of `plugin` that matches `level`.
///
/// `All` and `Off` have no method and resolve to a failed completion.
pub(crate) fn invoke(
    plugin: &dyn Plugin,
    level: LogLevel,
    message: &str,
    timestamp: Timestamp,
) -> Completion {
    match level {
        LogLevel::Trace => plugin.trace(message, timestamp),
        LogLevel::Debug => plugin.debug(message, timestamp),
        LogLevel::Info => plugin.info(message, timestamp),
        LogLevel::Warn => plugin.warn(message, timestamp),
        LogLevel::Error => plugin.error(message, timestamp),
        LogLevel::Fatal => plugin.fatal(message, timestamp),
        LogLevel::All | LogLevel::Off => Completion::failed(),
    }
}
