//! Fallback channel for failures inside the logging pipeline
//!
//! Plugins never let their own I/O failures escape. They hand them to an
//! [`ErrorReporter`] injected at construction time, which by default prints
//! to stderr.

use super::error::LoggerError;
use parking_lot::Mutex;
use std::sync::Arc;

pub trait ErrorReporter: Send + Sync {
    /// Report a failure raised by `source` (a plugin name or `"logger"`)
    fn report(&self, source: &str, error: &LoggerError);
}

/// Prints failures to stderr
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrReporter;

impl ErrorReporter for StderrReporter {
    fn report(&self, source: &str, error: &LoggerError) {
        eprintln!(
            "[LOGGER ERROR] There has been an error in the logger. Using the {} plugin: {}",
            source, error
        );
    }
}

/// Keeps failures in memory so tests can assert on them
#[derive(Debug, Default)]
pub struct MemoryReporter {
    entries: Mutex<Vec<String>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience constructor returning a shared handle
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Reported failures as `source: error` lines, oldest first
    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl ErrorReporter for MemoryReporter {
    fn report(&self, source: &str, error: &LoggerError) {
        self.entries.lock().push(format!("{}: {}", source, error));
    }
}

/// The reporter used when none is injected
pub fn default_reporter() -> Arc<dyn ErrorReporter> {
    Arc::new(StderrReporter)
}
