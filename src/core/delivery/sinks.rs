//! Delivery collaborator interfaces

use super::collector::CollectorClient;
use crate::config::CaptureSettings;
use crate::core::models::{CompanyProfile, Event, UserProfile};
use crate::utils::error::{CaptureError, Result};
use async_trait::async_trait;
use once_cell::sync::OnceCell;
use std::fmt;
use std::sync::Arc;
use tracing::{error, info};

/// Receives finished events
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn submit(&self, event: &Event) -> Result<()>;
}

/// Receives user and company profile upserts
#[async_trait]
pub trait ProfileSink: Send + Sync {
    async fn upsert_user(&self, user: &UserProfile) -> Result<()>;
    async fn upsert_users(&self, users: &[UserProfile]) -> Result<()>;
    async fn upsert_company(&self, company: &CompanyProfile) -> Result<()>;
    async fn upsert_companies(&self, companies: &[CompanyProfile]) -> Result<()>;
}

/// Sink left in place when the collector client could not be built
///
/// Every call fails with [`CaptureError::Disabled`]; construction is not retried.
#[derive(Debug, Clone)]
pub struct DisabledSink {
    reason: String,
}

impl DisabledSink {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    fn refuse(&self) -> Result<()> {
        Err(CaptureError::disabled(self.reason.clone()))
    }
}

#[async_trait]
impl EventSink for DisabledSink {
    async fn submit(&self, _event: &Event) -> Result<()> {
        self.refuse()
    }
}

#[async_trait]
impl ProfileSink for DisabledSink {
    async fn upsert_user(&self, _user: &UserProfile) -> Result<()> {
        self.refuse()
    }

    async fn upsert_users(&self, _users: &[UserProfile]) -> Result<()> {
        self.refuse()
    }

    async fn upsert_company(&self, _company: &CompanyProfile) -> Result<()> {
        self.refuse()
    }

    async fn upsert_companies(&self, _companies: &[CompanyProfile]) -> Result<()> {
        self.refuse()
    }
}

/// Event and profile sinks used by one capture instance
#[derive(Clone)]
pub struct Sinks {
    pub events: Arc<dyn EventSink>,
    pub profiles: Arc<dyn ProfileSink>,
}

impl Sinks {
    /// Use one object for both roles
    pub fn new<T>(sink: Arc<T>) -> Self
    where
        T: EventSink + ProfileSink + 'static,
    {
        Self {
            events: sink.clone(),
            profiles: sink,
        }
    }

    /// Build the collector client, degrading to a [`DisabledSink`] on failure
    pub fn from_settings(settings: &CaptureSettings) -> Self {
        match CollectorClient::new(settings) {
            Ok(client) => {
                info!(base_uri = %settings.base_uri, "Collector client initialized");
                Self::new(Arc::new(client))
            }
            Err(e) => {
                error!("Failed to initialize collector client, capture is disabled: {}", e);
                Self::new(Arc::new(DisabledSink::new(e.to_string())))
            }
        }
    }
}

impl fmt::Debug for Sinks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sinks").finish_non_exhaustive()
    }
}

static GLOBAL_SINKS: OnceCell<Sinks> = OnceCell::new();

/// Process-wide sinks, built from the settings of the first caller
///
/// Concurrent first calls block until one of them finished construction.
/// Later calls get the same sinks whatever settings they pass.
pub fn global_sinks(settings: &CaptureSettings) -> Sinks {
    GLOBAL_SINKS
        .get_or_init(|| Sinks::from_settings(settings))
        .clone()
}
