//! Helper functions for creating and inspecting errors

use super::types::CaptureError;

impl CaptureError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn callback<S: Into<String>>(message: S) -> Self {
        Self::Callback(message.into())
    }

    pub fn disabled<S: Into<String>>(message: S) -> Self {
        Self::Disabled(message.into())
    }

    /// Whether a later attempt with the same payload could succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            CaptureError::HttpClient(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            CaptureError::Collector { status, .. } => *status == 429 || *status >= 500,
            CaptureError::Timeout(_) => true,
            _ => false,
        }
    }

    /// Configuration
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            CaptureError::Config(_) | CaptureError::Yaml(_) | CaptureError::Disabled(_)
        )
    }
}
