//! Basic logger usage example
//!
//! Demonstrates console logging, level thresholds and a custom plugin.
//!
//! Run with: cargo run --example basic_usage

use plugin_logger::prelude::*;
use plugin_logger::{info, warn};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Counts the records it receives
#[derive(Default)]
struct Counting {
    seen: AtomicUsize,
}

impl Plugin for Counting {
    fn name(&self) -> &str {
        "counting"
    }

    fn emit(&self, _level: LogLevel, _message: &str, _timestamp: Timestamp) -> Completion {
        self.seen.fetch_add(1, Ordering::Relaxed);
        Completion::delivered()
    }

    fn handle_error(&self, error: &LoggerError) {
        eprintln!("counting plugin failed: {}", error);
    }
}

fn main() -> Result<()> {
    println!("=== Plugin Logger - Basic Usage Example ===\n");

    let counter = Arc::new(Counting::default());

    // Accept everything from TRACE upwards
    let logger = Logger::builder()
        .min_level(LogLevel::Trace)
        .plugin(ConsolePlugin::new())
        .plugin_handle(counter.clone())
        .build()?;

    println!("1. Logging at different levels:");
    logger.trace(["This", "is", "a", "trace", "message"]);
    logger.debug(["This is a debug message"]);
    logger.info(["This is an info message"]);
    logger.warn(["This is a warning message"]);
    logger.error(["This is an error message"]);
    logger.fatal(["This is a fatal message"]);
    logger.log(["This is a legacy log call"]);

    println!("\n2. Mixing fragment types with the macros:");
    let port = 8080;
    info!(logger, "Server listening on port", port);
    warn!(logger, "Retry attempt", 3, "of", 5);

    println!("\n3. A logger with a WARN threshold:");
    let quiet = Logger::builder()
        .level_name("warn")
        .plugin(ConsolePlugin::with_colors(false))
        .build()?;
    quiet.debug(["Debug message (hidden)"]);
    quiet.info(["Info message (hidden)"]);
    quiet.warn(["Warning message (visible)"]);

    println!(
        "\nThe counting plugin saw {} records ({} dispatched calls)",
        counter.seen.load(Ordering::Relaxed),
        logger.metrics().calls_dispatched()
    );
    println!("\n=== Example completed successfully! ===");

    Ok(())
}
