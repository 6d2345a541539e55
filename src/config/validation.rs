//! Settings validation

use super::CaptureSettings;
use url::Url;

/// Validation trait for configuration structures
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

impl Validate for CaptureSettings {
    fn validate(&self) -> Result<(), String> {
        let url = Url::parse(&self.base_uri)
            .map_err(|e| format!("base_uri has invalid URL format: {}", e))?;

        match url.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(format!(
                    "base_uri must use http:// or https:// scheme, got: {}",
                    scheme
                ));
            }
        }

        if url.host_str().is_none() {
            return Err("base_uri must have a valid host".to_string());
        }

        if self.timeout_seconds == 0 {
            return Err("timeout_seconds must be greater than 0".to_string());
        }

        if let Some(app_id) = &self.application_id {
            if app_id.trim().is_empty() {
                return Err("application_id must not be blank".to_string());
            }
        }

        Ok(())
    }
}
