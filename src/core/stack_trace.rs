//! Stack trace capture for trace-level records

use std::backtrace::Backtrace;

/// Append the current call stack to `message`.
///
/// Capture is forced regardless of `RUST_BACKTRACE`; symbol quality depends
/// on the build's debug info.
pub fn with_stack_trace(message: &str) -> String {
    let backtrace = Backtrace::force_capture();
    format!("{}\n{}", message, backtrace)
}
