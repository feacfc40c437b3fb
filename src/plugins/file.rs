//! File plugin implementation
//!
//! Appends one line per record. Appends happen on the plugin's worker
//! thread, so a log call returns before the line is on disk; wait on the
//! returned completion when that matters.

use super::worker::Worker;
use crate::core::{
    default_reporter, Completer, Completion, ErrorReporter, LogLevel, LoggerError, Outcome,
    Plugin, Result, Timestamp, TimestampFormat,
};
use chrono::Local;
use fs2::FileExt;
use serde::Deserialize;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

#[cfg(windows)]
const LINE_ENDING: &str = "\r\n";
#[cfg(not(windows))]
const LINE_ENDING: &str = "\n";

/// Options for [`FilePlugin`]
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FilePluginOptions {
    /// Directory holding the log files
    pub path: PathBuf,
    /// File name without extension
    pub filename: String,
    /// Start a new file per local calendar day (`<filename>_YYYY-MM-DD`)
    pub daily: bool,
    pub file_extension: String,
    pub timestamp_format: TimestampFormat,
}

impl Default for FilePluginOptions {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./logs"),
            filename: "log".to_string(),
            daily: false,
            file_extension: "txt".to_string(),
            timestamp_format: TimestampFormat::default(),
        }
    }
}

/// Drop `.` segments and repeated separators; an empty result becomes `.`
pub fn normalize_dir(path: &Path) -> PathBuf {
    let normalized: PathBuf = path
        .components()
        .filter(|component| !matches!(component, Component::CurDir))
        .collect();
    if normalized.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        normalized
    }
}

struct FileJob {
    label: &'static str,
    message: String,
    timestamp: Timestamp,
    completer: Completer,
}

/// State shared between the plugin and its worker
struct FileSink {
    dir: PathBuf,
    filename: String,
    daily: bool,
    extension: String,
    timestamp_format: TimestampFormat,
    reporter: Arc<dyn ErrorReporter>,
}

impl FileSink {
    fn file_path(&self, timestamp: &Timestamp) -> PathBuf {
        let stem = if self.daily {
            let day = timestamp.with_timezone(&Local).format("%Y-%m-%d");
            format!("{}_{}", self.filename, day)
        } else {
            self.filename.clone()
        };
        self.dir.join(format!("{}.{}", stem, self.extension))
    }

    fn format_line(&self, label: &str, message: &str, timestamp: &Timestamp) -> String {
        format!(
            "{} {}: {}{}",
            self.timestamp_format.format(timestamp),
            label,
            message,
            LINE_ENDING
        )
    }

    fn append(&self, job: &FileJob) -> Result<()> {
        let path = self.file_path(&job.timestamp);
        let line = self.format_line(job.label, &job.message, &job.timestamp);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                LoggerError::io_operation("opening log file", path.display().to_string(), e)
            })?;

        FileExt::lock_exclusive(&file).map_err(|e| {
            LoggerError::io_operation("locking log file", path.display().to_string(), e)
        })?;
        let written = file.write_all(line.as_bytes());
        let _ = FileExt::unlock(&file);

        written.map_err(|e| {
            LoggerError::io_operation("appending to log file", path.display().to_string(), e)
        })
    }

    fn run(&self, job: FileJob) {
        let outcome = match self.append(&job) {
            Ok(()) => Outcome::Delivered,
            Err(e) => {
                self.handle_error(&e);
                Outcome::Failed
            }
        };
        job.completer.complete(outcome);
    }

    fn handle_error(&self, error: &LoggerError) {
        self.reporter.report("file", error);
    }
}

/// Appends `<timestamp> <level>: <message>` lines to a file.
///
/// # Example
///
/// ```no_run
/// use plugin_logger::plugins::{FilePlugin, FilePluginOptions};
/// use plugin_logger::prelude::*;
///
/// let plugin = FilePlugin::new(FilePluginOptions {
///     filename: "app".to_string(),
///     daily: true,
///     ..FilePluginOptions::default()
/// })?;
///
/// let logger = Logger::builder().plugin(plugin).build()?;
/// for completion in logger.info(["service", "started"]) {
///     completion.wait();
/// }
/// # Ok::<(), LoggerError>(())
/// ```
pub struct FilePlugin {
    sink: Arc<FileSink>,
    worker: Worker<FileJob>,
}

impl FilePlugin {
    /// Create the plugin, creating its directory if needed
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the worker
    /// thread cannot be spawned.
    pub fn new(options: FilePluginOptions) -> Result<Self> {
        Self::with_reporter(options, default_reporter())
    }

    /// Like [`FilePlugin::new`] with an injected failure channel
    pub fn with_reporter(
        options: FilePluginOptions,
        reporter: Arc<dyn ErrorReporter>,
    ) -> Result<Self> {
        if options.filename.trim().is_empty() {
            return Err(LoggerError::config("FilePlugin", "filename must not be empty"));
        }

        let dir = normalize_dir(&options.path);
        fs::create_dir_all(&dir).map_err(|e| {
            LoggerError::io_operation("creating log directory", dir.display().to_string(), e)
        })?;

        let extension = options.file_extension.trim_start_matches('.').to_string();
        let extension = if extension.is_empty() {
            FilePluginOptions::default().file_extension
        } else {
            extension
        };

        let sink = Arc::new(FileSink {
            dir,
            filename: options.filename,
            daily: options.daily,
            extension,
            timestamp_format: options.timestamp_format,
            reporter,
        });

        let worker_sink = Arc::clone(&sink);
        let worker = Worker::spawn("file", move |job: FileJob| worker_sink.run(job))?;

        Ok(Self { sink, worker })
    }

    /// Directory the plugin writes into, after normalisation
    pub fn dir(&self) -> &Path {
        &self.sink.dir
    }

    /// File a record stamped `timestamp` goes to
    pub fn file_path(&self, timestamp: &Timestamp) -> PathBuf {
        self.sink.file_path(timestamp)
    }

    fn enqueue(&self, label: &'static str, message: &str, timestamp: Timestamp) -> Completion {
        let (completer, completion) = Completion::channel();
        let job = FileJob {
            label,
            message: message.to_string(),
            timestamp,
            completer,
        };

        match self.worker.submit(job) {
            Ok(()) => completion,
            Err(job) => {
                self.handle_error(&LoggerError::worker_stopped(self.name()));
                job.completer.complete(Outcome::Failed);
                completion
            }
        }
    }
}

impl Plugin for FilePlugin {
    fn name(&self) -> &str {
        "file"
    }

    fn emit(&self, level: LogLevel, message: &str, timestamp: Timestamp) -> Completion {
        self.enqueue(level.label(), message, timestamp)
    }

    fn handle_error(&self, error: &LoggerError) {
        self.sink.handle_error(error);
    }

    fn log(&self, message: &str, timestamp: Timestamp) -> Completion {
        self.enqueue("log", message, timestamp)
    }
}
