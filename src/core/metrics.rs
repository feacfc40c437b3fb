//! Logger metrics for observability
//!
//! Counters describing what the dispatcher did. They say nothing about
//! whether a given sink actually stored a record; that is visible only
//! through the completion handles.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for logger observability
///
/// # Example
///
/// ```
/// use plugin_logger::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
///
/// metrics.record_dispatch(2);
/// metrics.record_panic();
///
/// assert_eq!(metrics.calls_dispatched(), 1);
/// assert_eq!(metrics.plugin_invocations(), 2);
/// assert_eq!(metrics.plugin_panics(), 1);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Calls that passed the threshold
    calls_dispatched: AtomicU64,

    /// Plugin methods invoked across all calls
    plugin_invocations: AtomicU64,

    /// Plugin invocations that panicked and were isolated
    plugin_panics: AtomicU64,
}

impl LoggerMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            calls_dispatched: AtomicU64::new(0),
            plugin_invocations: AtomicU64::new(0),
            plugin_panics: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn calls_dispatched(&self) -> u64 {
        self.calls_dispatched.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn plugin_invocations(&self) -> u64 {
        self.plugin_invocations.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn plugin_panics(&self) -> u64 {
        self.plugin_panics.load(Ordering::Relaxed)
    }

    /// Record one dispatched call that reached `plugins` plugins
    #[inline]
    pub fn record_dispatch(&self, plugins: usize) {
        self.calls_dispatched.fetch_add(1, Ordering::Relaxed);
        self.plugin_invocations
            .fetch_add(plugins as u64, Ordering::Relaxed);
    }

    /// Record an isolated plugin panic, returning the previous count
    #[inline]
    pub fn record_panic(&self) -> u64 {
        self.plugin_panics.fetch_add(1, Ordering::Relaxed)
    }

    /// Reset all counters to zero
    pub fn reset(&self) {
        self.calls_dispatched.store(0, Ordering::Relaxed);
        self.plugin_invocations.store(0, Ordering::Relaxed);
        self.plugin_panics.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}
