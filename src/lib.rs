//! # Plugin Logger
//!
//! A leveled logging facade. One [`Logger`] owns an ordered list of plugins
//! and fans every call out to all of them.
//!
//! ## Features
//!
//! - **Leveled dispatch**: `ALL < TRACE < DEBUG < INFO < WARN < ERROR < FATAL < OFF`
//! - **One event per call**: a single timestamp and message shared by every plugin
//! - **Isolated plugins**: a failing sink never stops the others or the caller
//! - **Bundled plugins**: console, file and Elasticsearch REST sinks
//!
//! ```
//! use plugin_logger::prelude::*;
//!
//! let logger = Logger::builder()
//!     .min_level(LogLevel::Info)
//!     .plugin(ConsolePlugin::new())
//!     .build()
//!     .expect("valid configuration");
//!
//! logger.info(["Hello", "World"]);
//! logger.debug(["filtered out"]);
//! ```

pub mod core;
pub mod macros;
pub mod plugins;

pub mod prelude {
    #[cfg(feature = "console")]
    pub use crate::plugins::{ConsolePlugin, ConsolePluginOptions};
    #[cfg(feature = "elasticsearch")]
    pub use crate::plugins::{ElasticSearchOptions, ElasticSearchPlugin};
    #[cfg(feature = "file")]
    pub use crate::plugins::{FilePlugin, FilePluginOptions};
    pub use crate::core::{
        Completion, Dispatch, ErrorReporter, LogLevel, LogRecord, Logger, LoggerBuilder,
        LoggerConfig, LoggerError, LoggerMetrics, MemoryReporter, Outcome, Plugin, PluginHandle,
        Result, StderrReporter, Timestamp, TimestampFormat,
    };
}

#[cfg(feature = "console")]
pub use plugins::ConsolePlugin;
#[cfg(feature = "elasticsearch")]
pub use plugins::ElasticSearchPlugin;
#[cfg(feature = "file")]
pub use plugins::FilePlugin;
pub use core::{
    Completion, Dispatch, ErrorReporter, LogLevel, LogRecord, Logger, LoggerBuilder, LoggerConfig,
    LoggerError, LoggerMetrics, MemoryReporter, Outcome, Plugin, PluginHandle, Result,
    StderrReporter, Timestamp, TimestampFormat, DEFAULT_SHUTDOWN_TIMEOUT,
};
