//! Error types for the logger system

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// HTTP transport error
    #[cfg(feature = "elasticsearch")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The search index answered with a non-success status
    #[error("Index rejected document with status {status}: {body}")]
    IndexRejected { status: u16, body: String },

    /// A plugin panicked while handling a log call
    #[error("Plugin '{plugin}' panicked: {message}")]
    PluginPanicked { plugin: String, message: String },

    /// A plugin's background worker is no longer accepting jobs
    #[error("Background worker for '{plugin}' has stopped")]
    WorkerStopped { plugin: String },

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an index rejection error
    pub fn index_rejected(status: u16, body: impl Into<String>) -> Self {
        LoggerError::IndexRejected {
            status,
            body: body.into(),
        }
    }

    pub fn plugin_panicked(plugin: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::PluginPanicked {
            plugin: plugin.into(),
            message: message.into(),
        }
    }

    pub fn worker_stopped(plugin: impl Into<String>) -> Self {
        LoggerError::WorkerStopped {
            plugin: plugin.into(),
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }

    /// Whether this error was raised while validating configuration
    pub fn is_config(&self) -> bool {
        matches!(self, LoggerError::InvalidConfiguration { .. })
    }
}
