//! HTTP client for the Moesif collector API

use super::sinks::{EventSink, ProfileSink};
use crate::config::{CaptureSettings, Validate};
use crate::core::models::{CompanyProfile, Event, UserProfile};
use crate::utils::error::{CaptureError, Result};
use crate::utils::net::client_with_timeout;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

const APPLICATION_ID_HEADER: &str = "X-Moesif-Application-Id";

/// Collector client shipping events and profiles over HTTPS
#[derive(Debug, Clone)]
pub struct CollectorClient {
    client: Arc<Client>,
    base_uri: String,
    application_id: String,
}

impl CollectorClient {
    /// Build a client from settings
    ///
    /// Fails when no application id is configured or the settings are invalid.
    pub fn new(settings: &CaptureSettings) -> Result<Self> {
        settings.validate().map_err(CaptureError::Config)?;

        let application_id = settings
            .application_id
            .clone()
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| CaptureError::config("Missing Moesif application id"))?;

        Ok(Self {
            client: client_with_timeout(Duration::from_secs(settings.timeout_seconds)),
            base_uri: settings.base_uri.trim_end_matches('/').to_string(),
            application_id,
        })
    }

    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    async fn post<T: Serialize + ?Sized>(&self, path: &str, payload: &T) -> Result<()> {
        let url = format!("{}{}", self.base_uri, path);

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .header(APPLICATION_ID_HEADER, &self.application_id)
            .json(payload)
            .send()
            .await?;

        let status = response.status().as_u16();
        if (200..300).contains(&status) {
            debug!(%url, status, "Collector accepted payload");
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(CaptureError::Collector { status, body })
        }
    }
}

#[async_trait]
impl EventSink for CollectorClient {
    async fn submit(&self, event: &Event) -> Result<()> {
        self.post("/v1/events", event).await
    }
}

#[async_trait]
impl ProfileSink for CollectorClient {
    async fn upsert_user(&self, user: &UserProfile) -> Result<()> {
        self.post("/v1/users", user).await
    }

    async fn upsert_users(&self, users: &[UserProfile]) -> Result<()> {
        self.post("/v1/users/batch", users).await
    }

    async fn upsert_company(&self, company: &CompanyProfile) -> Result<()> {
        self.post("/v1/companies", company).await
    }

    async fn upsert_companies(&self, companies: &[CompanyProfile]) -> Result<()> {
        self.post("/v1/companies/batch", companies).await
    }
}
