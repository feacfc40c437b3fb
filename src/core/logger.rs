//! Main logger implementation

use super::{
    completion::{Completion, Dispatch},
    error::{LoggerError, Result},
    fallback::{default_reporter, ErrorReporter},
    log_level::LogLevel,
    log_record::{join_fragments, Timestamp},
    metrics::LoggerMetrics,
    plugin::{self, Plugin, PluginHandle},
};
use chrono::Utc;
use std::env::VarError;
use std::fmt::{self, Display};
use std::sync::Arc;
use std::time::Duration;

/// Default shutdown timeout for plugin background workers (5 seconds)
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Selects which plugin method a dispatch lands on
type Route = fn(&dyn Plugin, LogLevel, &str, Timestamp) -> Completion;

fn route_legacy(plugin: &dyn Plugin, _level: LogLevel, message: &str, ts: Timestamp) -> Completion {
    plugin.log(message, ts)
}

/// Construction options recognised by [`Logger::with_config`]
#[derive(Default)]
pub struct LoggerConfig {
    /// Initial plugins, in invocation order
    pub plugins: Vec<PluginHandle>,
    /// Minimum rank on the `ALL=0 .. OFF=7` scale; `None` accepts everything
    pub level: Option<u8>,
}

impl LoggerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_plugin(mut self, plugin: PluginHandle) -> Self {
        self.plugins.push(plugin);
        self
    }

    #[must_use]
    pub fn with_level(mut self, rank: u8) -> Self {
        self.level = Some(rank);
        self
    }
}

/// Leveled dispatcher fanning every call out to its plugins.
///
/// Each call that passes the threshold gets one timestamp and one message
/// (fragments joined by a single space); every plugin sees the same pair,
/// in registration order. Plugin calls are fire-and-forget: the returned
/// [`Dispatch`] holds their completion handles but the logger never waits
/// on them, so a returned call does not mean a record has been stored.
/// Writes issued by successive calls may also land out of order in sinks
/// that do not serialize their own I/O.
///
/// A panicking plugin is isolated: the remaining plugins still run and the
/// panic is reported to the fallback channel. There is no per-call record
/// of which plugins succeeded beyond the completion handles themselves.
pub struct Logger {
    plugins: Vec<PluginHandle>,
    min_level: LogLevel,
    fallback: Arc<dyn ErrorReporter>,
    metrics: Arc<LoggerMetrics>,
}

impl Logger {
    /// A logger with no plugins that accepts every level
    #[must_use]
    pub fn new() -> Self {
        Self {
            plugins: Vec::new(),
            min_level: LogLevel::All,
            fallback: default_reporter(),
            metrics: Arc::new(LoggerMetrics::new()),
        }
    }

    /// Build a logger from `config`, validating the level rank
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::InvalidConfiguration`] if `config.level` is not
    /// one of the ranks `0..=7`.
    pub fn with_config(config: LoggerConfig) -> Result<Self> {
        let min_level = match config.level {
            Some(rank) => LogLevel::try_from(rank)?,
            None => LogLevel::All,
        };

        Ok(Self {
            plugins: config.plugins,
            min_level,
            fallback: default_reporter(),
            metrics: Arc::new(LoggerMetrics::new()),
        })
    }

    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use plugin_logger::prelude::*;
    ///
    /// let logger = Logger::builder()
    ///     .min_level(LogLevel::Warn)
    ///     .build()
    ///     .expect("valid configuration");
    /// assert_eq!(logger.min_level(), LogLevel::Warn);
    /// ```
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// Append a plugin; it is invoked after every plugin added before it.
    ///
    /// The same handle may be added more than once and is then invoked once
    /// per registration.
    pub fn add_plugin(&mut self, plugin: PluginHandle) -> &mut Self {
        self.plugins.push(plugin);
        self
    }

    pub fn min_level(&self) -> LogLevel {
        self.min_level
    }

    pub fn plugins(&self) -> &[PluginHandle] {
        &self.plugins
    }

    pub fn plugin_count(&self) -> usize {
        self.plugins.len()
    }

    /// Whether a call at `level` would reach the plugins
    #[inline]
    pub fn enabled(&self, level: LogLevel) -> bool {
        level.is_severity() && level.passes(self.min_level)
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    fn dispatch<I>(&self, level: LogLevel, fragments: I, route: Route) -> Dispatch
    where
        I: IntoIterator,
        I::Item: Display,
    {
        if !level.passes(self.min_level) {
            return Dispatch::empty();
        }

        let timestamp = Utc::now();
        let message = join_fragments(fragments);

        let mut dispatch = Dispatch::with_capacity(self.plugins.len());
        for plugin in &self.plugins {
            dispatch.push(self.invoke_isolated(plugin.as_ref(), level, &message, timestamp, route));
        }
        self.metrics.record_dispatch(self.plugins.len());
        dispatch
    }

    /// Run one plugin call, containing any panic it raises
    fn invoke_isolated(
        &self,
        plugin: &dyn Plugin,
        level: LogLevel,
        message: &str,
        timestamp: Timestamp,
        route: Route,
    ) -> Completion {
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            route(plugin, level, message, timestamp)
        }));

        match result {
            Ok(completion) => completion,
            Err(panic_info) => {
                let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic_info.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic".to_string()
                };
                self.metrics.record_panic();
                self.fallback.report(
                    plugin.name(),
                    &LoggerError::plugin_panicked(plugin.name(), panic_msg),
                );
                Completion::failed()
            }
        }
    }

    /// Dispatch at an arbitrary level.
    ///
    /// `All` and `Off` are thresholds, not call ranks; passing them is a
    /// no-op.
    pub fn emit<I>(&self, level: LogLevel, fragments: I) -> Dispatch
    where
        I: IntoIterator,
        I::Item: Display,
    {
        if !level.is_severity() {
            return Dispatch::empty();
        }
        self.dispatch(level, fragments, plugin::invoke)
    }

    #[inline]
    pub fn trace<I>(&self, fragments: I) -> Dispatch
    where
        I: IntoIterator,
        I::Item: Display,
    {
        self.dispatch(LogLevel::Trace, fragments, plugin::invoke)
    }

    #[inline]
    pub fn debug<I>(&self, fragments: I) -> Dispatch
    where
        I: IntoIterator,
        I::Item: Display,
    {
        self.dispatch(LogLevel::Debug, fragments, plugin::invoke)
    }

    #[inline]
    pub fn info<I>(&self, fragments: I) -> Dispatch
    where
        I: IntoIterator,
        I::Item: Display,
    {
        self.dispatch(LogLevel::Info, fragments, plugin::invoke)
    }

    #[inline]
    pub fn warn<I>(&self, fragments: I) -> Dispatch
    where
        I: IntoIterator,
        I::Item: Display,
    {
        self.dispatch(LogLevel::Warn, fragments, plugin::invoke)
    }

    #[inline]
    pub fn error<I>(&self, fragments: I) -> Dispatch
    where
        I: IntoIterator,
        I::Item: Display,
    {
        self.dispatch(LogLevel::Error, fragments, plugin::invoke)
    }

    #[inline]
    pub fn fatal<I>(&self, fragments: I) -> Dispatch
    where
        I: IntoIterator,
        I::Item: Display,
    {
        self.dispatch(LogLevel::Fatal, fragments, plugin::invoke)
    }

    /// Legacy unleveled call, routed to [`Plugin::log`].
    ///
    /// Filtered as if it were `info`.
    pub fn log<I>(&self, fragments: I) -> Dispatch
    where
        I: IntoIterator,
        I::Item: Display,
    {
        self.dispatch(LogLevel::Info, fragments, route_legacy)
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.plugins.iter().map(|p| p.name()).collect();
        f.debug_struct("Logger")
            .field("min_level", &self.min_level)
            .field("plugins", &names)
            .finish()
    }
}

#[derive(Debug, Clone)]
enum LevelSpec {
    Level(LogLevel),
    Rank(u8),
    Name(String),
    /// The environment variable was set but is not valid Unicode
    Unreadable { key: String, raw: String },
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use plugin_logger::prelude::*;
/// use std::sync::Arc;
///
/// let reporter = MemoryReporter::shared();
/// let logger = Logger::builder()
///     .level_rank(4)
///     .plugin(ConsolePlugin::new())
///     .fallback(reporter.clone())
///     .build()
///     .expect("valid configuration");
///
/// assert_eq!(logger.min_level(), LogLevel::Warn);
/// assert_eq!(logger.plugin_count(), 1);
/// ```
pub struct LoggerBuilder {
    level: Option<LevelSpec>,
    plugins: Vec<PluginHandle>,
    fallback: Option<Arc<dyn ErrorReporter>>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            level: None,
            plugins: Vec::new(),
            fallback: None,
        }
    }

    /// Set minimum log level
    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.level = Some(LevelSpec::Level(level));
        self
    }

    /// Set minimum log level by numeric rank; validated in [`build`](Self::build)
    #[must_use = "builder methods return a new value"]
    pub fn level_rank(mut self, rank: u8) -> Self {
        self.level = Some(LevelSpec::Rank(rank));
        self
    }

    /// Set minimum log level by name (`"warn"`) or rank (`"4"`)
    #[must_use = "builder methods return a new value"]
    pub fn level_name(mut self, name: impl Into<String>) -> Self {
        self.level = Some(LevelSpec::Name(name.into()));
        self
    }

    /// Read the minimum level from an environment variable, if it is set
    ///
    /// A set but unparsable value, including one that is not valid Unicode,
    /// makes [`build`](Self::build) fail.
    #[must_use = "builder methods return a new value"]
    pub fn level_from_env(mut self, key: &str) -> Self {
        match std::env::var(key) {
            Ok(value) => self.level = Some(LevelSpec::Name(value)),
            Err(VarError::NotUnicode(raw)) => {
                self.level = Some(LevelSpec::Unreadable {
                    key: key.to_string(),
                    raw: raw.to_string_lossy().into_owned(),
                });
            }
            Err(VarError::NotPresent) => {}
        }
        self
    }

    /// Add a plugin
    #[must_use = "builder methods return a new value"]
    pub fn plugin<P: Plugin + 'static>(mut self, plugin: P) -> Self {
        self.plugins.push(Arc::new(plugin));
        self
    }

    /// Add an already shared plugin handle
    #[must_use = "builder methods return a new value"]
    pub fn plugin_handle(mut self, plugin: PluginHandle) -> Self {
        self.plugins.push(plugin);
        self
    }

    /// Where isolated plugin panics are reported (stderr by default)
    #[must_use = "builder methods return a new value"]
    pub fn fallback(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.fallback = Some(reporter);
        self
    }

    /// Build the Logger
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::InvalidConfiguration`] for an unknown level.
    pub fn build(self) -> Result<Logger> {
        let level = match self.level {
            None => None,
            Some(LevelSpec::Level(level)) => Some(level.rank()),
            Some(LevelSpec::Rank(rank)) => Some(rank),
            Some(LevelSpec::Name(name)) => Some(name.parse::<LogLevel>()?.rank()),
            Some(LevelSpec::Unreadable { key, raw }) => {
                return Err(LoggerError::config(
                    "Logger",
                    format!("environment variable {} is not valid unicode: '{}'", key, raw),
                ));
            }
        };

        let mut logger = Logger::with_config(LoggerConfig {
            plugins: self.plugins,
            level,
        })?;
        if let Some(fallback) = self.fallback {
            logger.fallback = fallback;
        }
        Ok(logger)
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
