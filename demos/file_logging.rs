//! File logging example
//!
//! Demonstrates logging to both console and a daily log file, waiting on
//! the completion handles before exiting.
//!
//! Run with: cargo run --example file_logging

use plugin_logger::prelude::*;

fn main() -> Result<()> {
    println!("=== Plugin Logger - File Logging Example ===\n");

    let file = FilePlugin::new(FilePluginOptions {
        path: "./logs".into(),
        filename: "application".to_string(),
        daily: true,
        ..FilePluginOptions::default()
    })?;
    let target = file.file_path(&chrono::Utc::now());

    let logger = Logger::builder()
        .min_level(LogLevel::Debug)
        .plugin(ConsolePlugin::new())
        .plugin(file)
        .build()?;

    println!("1. Logging to both console and file:");

    let mut pending = Vec::new();
    pending.extend(logger.info(["Application", "started"]));
    pending.extend(logger.debug(["Loading configuration..."]));
    pending.extend(logger.warn(["Using default settings for some options"]));
    pending.extend(logger.error(["Failed to load optional plugin"]));

    println!("\n2. Performing some operations:");
    for i in 1..=5 {
        pending.extend(logger.info([format!("Processing item {}/5", i)]));
        if i == 3 {
            pending.extend(logger.warn(["Item 3 took longer than expected"]));
        }
    }

    // File writes happen in the background; wait for them before exiting
    let failed = pending
        .into_iter()
        .map(Completion::wait)
        .filter(|outcome| !outcome.is_delivered())
        .count();

    println!("\n=== Example completed ({} failed writes) ===", failed);
    println!("Check '{}' for the full log output", target.display());

    Ok(())
}
