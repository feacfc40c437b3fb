//! Console plugin implementation

use crate::core::{
    default_reporter, Completion, ErrorReporter, LogLevel, LoggerError, Plugin, Result,
    Timestamp, TimestampFormat,
};
use colored::{Color, Colorize};
use parking_lot::Mutex;
use serde::Deserialize;
use std::io::Write;
use std::str::FromStr;
use std::sync::Arc;

type SharedWriter = Mutex<Box<dyn Write + Send>>;

/// Options for [`ConsolePlugin`]
///
/// Colours are given by name (`"green"`, `"bright red"`, ...); unset
/// colours fall back to the level defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConsolePluginOptions {
    pub use_colors: bool,
    pub timestamp_format: TimestampFormat,
    pub trace_color: Option<String>,
    pub debug_color: Option<String>,
    pub info_color: Option<String>,
    pub warn_color: Option<String>,
    pub error_color: Option<String>,
    pub fatal_color: Option<String>,
    pub log_color: Option<String>,
}

impl Default for ConsolePluginOptions {
    fn default() -> Self {
        Self {
            use_colors: true,
            timestamp_format: TimestampFormat::default(),
            trace_color: None,
            debug_color: None,
            info_color: None,
            warn_color: None,
            error_color: None,
            fatal_color: None,
            log_color: None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Palette {
    trace: Color,
    debug: Color,
    info: Color,
    warn: Color,
    error: Color,
    fatal: Color,
    log: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            trace: LogLevel::Trace.color_code(),
            debug: LogLevel::Debug.color_code(),
            info: LogLevel::Info.color_code(),
            warn: LogLevel::Warn.color_code(),
            error: LogLevel::Error.color_code(),
            fatal: LogLevel::Fatal.color_code(),
            log: Color::Magenta,
        }
    }
}

impl Palette {
    fn from_options(options: &ConsolePluginOptions) -> Result<Self> {
        fn pick(name: &Option<String>, default: Color) -> Result<Color> {
            match name {
                Some(name) => Color::from_str(name).map_err(|_| {
                    LoggerError::config("ConsolePlugin", format!("unknown color '{}'", name))
                }),
                None => Ok(default),
            }
        }

        let defaults = Self::default();
        Ok(Self {
            trace: pick(&options.trace_color, defaults.trace)?,
            debug: pick(&options.debug_color, defaults.debug)?,
            info: pick(&options.info_color, defaults.info)?,
            warn: pick(&options.warn_color, defaults.warn)?,
            error: pick(&options.error_color, defaults.error)?,
            fatal: pick(&options.fatal_color, defaults.fatal)?,
            log: pick(&options.log_color, defaults.log)?,
        })
    }

    fn for_level(&self, level: LogLevel) -> Color {
        match level {
            LogLevel::Trace => self.trace,
            LogLevel::Debug => self.debug,
            LogLevel::Info => self.info,
            LogLevel::Warn => self.warn,
            LogLevel::Error => self.error,
            LogLevel::Fatal => self.fatal,
            LogLevel::All | LogLevel::Off => Color::White,
        }
    }
}

/// Prints each record as `<timestamp> <label:> <message>`.
///
/// Trace, debug, info and legacy `log` lines go to stdout; warn, error and
/// fatal go to stderr.
pub struct ConsolePlugin {
    use_colors: bool,
    timestamp_format: TimestampFormat,
    palette: Palette,
    out: SharedWriter,
    err: SharedWriter,
    reporter: Arc<dyn ErrorReporter>,
}

impl ConsolePlugin {
    pub fn new() -> Self {
        Self::with_colors(true)
    }

    pub fn with_colors(use_colors: bool) -> Self {
        let options = ConsolePluginOptions {
            use_colors,
            ..ConsolePluginOptions::default()
        };
        Self::assemble(options, Palette::default())
    }

    /// Create a console plugin from options, validating colour names
    ///
    /// # Example
    ///
    /// ```
    /// use plugin_logger::plugins::{ConsolePlugin, ConsolePluginOptions};
    ///
    /// let options: ConsolePluginOptions =
    ///     serde_json::from_str(r#"{"info_color": "cyan"}"#).unwrap();
    /// let plugin = ConsolePlugin::with_options(options).unwrap();
    /// ```
    pub fn with_options(options: ConsolePluginOptions) -> Result<Self> {
        let palette = Palette::from_options(&options)?;
        Ok(Self::assemble(options, palette))
    }

    fn assemble(options: ConsolePluginOptions, palette: Palette) -> Self {
        Self {
            use_colors: options.use_colors,
            timestamp_format: options.timestamp_format,
            palette,
            out: Mutex::new(Box::new(std::io::stdout())),
            err: Mutex::new(Box::new(std::io::stderr())),
            reporter: default_reporter(),
        }
    }

    /// Redirect output, e.g. into in-memory buffers
    #[must_use]
    pub fn with_writers(
        mut self,
        out: impl Write + Send + 'static,
        err: impl Write + Send + 'static,
    ) -> Self {
        self.out = Mutex::new(Box::new(out));
        self.err = Mutex::new(Box::new(err));
        self
    }

    /// Inject the channel that receives this plugin's failures
    #[must_use]
    pub fn with_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    fn format_line(&self, label: &str, color: Color, message: &str, timestamp: Timestamp) -> String {
        let label = format!("{}:", label);
        let label = if self.use_colors {
            label.color(color).to_string()
        } else {
            label
        };
        format!("{} {} {}", self.timestamp_format.format(&timestamp), label, message)
    }

    fn print(&self, to_stderr: bool, line: &str) -> Completion {
        let writer = if to_stderr { &self.err } else { &self.out };
        let mut writer = writer.lock();
        let result = writeln!(writer, "{}", line).and_then(|()| writer.flush());
        drop(writer);

        match result {
            Ok(()) => Completion::delivered(),
            Err(e) => {
                let stream = if to_stderr { "stderr" } else { "stdout" };
                self.handle_error(&LoggerError::io_operation(
                    "writing to console",
                    format!("{} rejected the line: {}", stream, e),
                    e,
                ));
                Completion::failed()
            }
        }
    }
}

impl Default for ConsolePlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for ConsolePlugin {
    fn name(&self) -> &str {
        "console"
    }

    fn emit(&self, level: LogLevel, message: &str, timestamp: Timestamp) -> Completion {
        let line = self.format_line(level.label(), self.palette.for_level(level), message, timestamp);
        let to_stderr = matches!(level, LogLevel::Warn | LogLevel::Error | LogLevel::Fatal);
        self.print(to_stderr, &line)
    }

    fn handle_error(&self, error: &LoggerError) {
        self.reporter.report(self.name(), error);
    }

    fn log(&self, message: &str, timestamp: Timestamp) -> Completion {
        let line = self.format_line("log", self.palette.log, message, timestamp);
        self.print(false, &line)
    }
}
