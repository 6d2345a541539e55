//! Error type definitions

use thiserror::Error;

/// Result type alias for the capture middleware
pub type Result<T> = std::result::Result<T, CaptureError>;

/// Main error type for the capture middleware
#[derive(Error, Debug)]
pub enum CaptureError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP client errors
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The collector answered with a non-success status
    #[error("Collector returned status {status}: {body}")]
    Collector {
        /// HTTP status code
        status: u16,
        /// Response body as returned by the collector
        body: String,
    },

    /// A user supplied callback panicked
    #[error("Callback error: {0}")]
    Callback(String),

    /// Delivery did not finish within the configured deadline
    #[error("Delivery timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// The sink could not be constructed and drops everything it receives
    #[error("Delivery disabled: {0}")]
    Disabled(String),
}
