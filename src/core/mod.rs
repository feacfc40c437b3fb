//! Core logger types and traits

pub mod completion;
pub mod error;
pub mod fallback;
pub mod log_level;
pub mod log_record;
pub mod logger;
pub mod metrics;
pub mod plugin;
pub mod stack_trace;
pub mod timestamp;

pub use completion::{Completer, Completion, Dispatch, Outcome};
pub use error::{LoggerError, Result};
pub use fallback::{default_reporter, ErrorReporter, MemoryReporter, StderrReporter};
pub use log_level::LogLevel;
pub use log_record::{join_fragments, LogRecord, Timestamp};
pub use logger::{Logger, LoggerBuilder, LoggerConfig, DEFAULT_SHUTDOWN_TIMEOUT};
pub use metrics::LoggerMetrics;
pub use plugin::{Plugin, PluginHandle};
pub use stack_trace::with_stack_trace;
pub use timestamp::TimestampFormat;
