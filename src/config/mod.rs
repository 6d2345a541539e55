//! Configuration for the capture middleware
//!
//! Options are split in two: [`CaptureSettings`] holds the plain, serialisable
//! switches, while [`Hooks`] carries the typed enrichment callbacks for one
//! request shape.

mod hooks;
mod validation;

pub use hooks::{Hooks, MaskHook, MetadataHook, SkipHook, StringHook};
pub use validation::Validate;

use crate::utils::error::{CaptureError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use tracing::{debug, info};

/// Default collector endpoint
pub const DEFAULT_BASE_URI: &str = "https://api.moesif.net";
/// Default delivery deadline in seconds
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 2;

/// Plain capture options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureSettings {
    /// Collector application id (`MOESIF_APPLICATION_ID`)
    pub application_id: Option<String>,
    /// Collector base URI
    pub base_uri: String,
    /// Verbose logging of capture decisions
    pub debug: bool,
    /// Capture request and response bodies of inbound traffic
    pub log_body: bool,
    /// Capture request and response bodies of outbound traffic
    pub log_body_outgoing: bool,
    /// API version stamped on every inbound request record
    pub api_version: Option<String>,
    /// Accept outbound exchanges through `Capture::capture_outgoing`
    pub capture_outgoing_requests: bool,
    /// Upper bound in seconds on one delivery, awaited inside the invocation
    pub timeout_seconds: u64,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            application_id: None,
            base_uri: DEFAULT_BASE_URI.to_string(),
            debug: false,
            log_body: true,
            log_body_outgoing: true,
            api_version: None,
            capture_outgoing_requests: false,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

impl CaptureSettings {
    /// Load settings from the process environment
    ///
    /// A `.env` file in the working directory is honoured when present.
    pub fn from_env() -> Result<Self> {
        debug!("Loading capture settings from environment variables");
        let _ = dotenvy::dotenv();

        let mut settings = Self::default();

        if let Ok(app_id) = env::var("MOESIF_APPLICATION_ID") {
            settings.application_id = Some(app_id).filter(|id| !id.is_empty());
        }
        if let Ok(base_uri) = env::var("MOESIF_BASE_URI") {
            settings.base_uri = base_uri;
        }
        if let Ok(value) = env::var("MOESIF_DEBUG") {
            settings.debug = parse_flag("MOESIF_DEBUG", &value)?;
        }
        if let Ok(value) = env::var("MOESIF_LOG_BODY") {
            settings.log_body = parse_flag("MOESIF_LOG_BODY", &value)?;
        }
        if let Ok(value) = env::var("MOESIF_LOG_BODY_OUTGOING") {
            settings.log_body_outgoing = parse_flag("MOESIF_LOG_BODY_OUTGOING", &value)?;
        }
        if let Ok(api_version) = env::var("MOESIF_API_VERSION") {
            settings.api_version = Some(api_version).filter(|v| !v.is_empty());
        }
        if let Ok(value) = env::var("MOESIF_CAPTURE_OUTGOING_REQUESTS") {
            settings.capture_outgoing_requests =
                parse_flag("MOESIF_CAPTURE_OUTGOING_REQUESTS", &value)?;
        }
        if let Ok(value) = env::var("MOESIF_TIMEOUT_SECONDS") {
            settings.timeout_seconds = value.trim().parse().map_err(|e| {
                CaptureError::config(format!("Invalid MOESIF_TIMEOUT_SECONDS: {}", e))
            })?;
        }

        settings.check()?;
        Ok(settings)
    }

    /// Load settings from a YAML file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading capture settings from: {:?}", path);

        let content = tokio::fs::read_to_string(path).await?;

        let settings: Self = serde_yaml::from_str(&content)?;
        settings.check()?;

        debug!("Capture settings loaded successfully");
        Ok(settings)
    }

    fn check(&self) -> Result<()> {
        self.validate().map_err(CaptureError::Config)
    }
}

fn parse_flag(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(CaptureError::config(format!(
            "Invalid {}: expected a boolean, got '{}'",
            name, other
        ))),
    }
}
