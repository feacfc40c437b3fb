//! Bundled plugins
//!
//! Each plugin is behind a Cargo feature of the same name. The console
//! plugin writes synchronously; the file and Elasticsearch plugins hand
//! their I/O to a background worker and return pending completions.

#[cfg(any(feature = "file", feature = "elasticsearch"))]
pub(crate) mod worker;

#[cfg(feature = "console")]
pub mod console;
#[cfg(feature = "elasticsearch")]
pub mod elasticsearch;
#[cfg(feature = "file")]
pub mod file;

pub use crate::core::Plugin;

#[cfg(feature = "console")]
pub use console::{ConsolePlugin, ConsolePluginOptions};
#[cfg(feature = "elasticsearch")]
pub use elasticsearch::{ElasticSearchOptions, ElasticSearchPlugin};
#[cfg(feature = "file")]
pub use file::{FilePlugin, FilePluginOptions};
