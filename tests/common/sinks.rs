//! In-memory delivery collaborator

use async_trait::async_trait;
use moesif_lambda::{
    CaptureError, CompanyProfile, Event, EventSink, ProfileSink, Result, Sinks, UserProfile,
};
use parking_lot::Mutex;
use std::sync::Arc;

/// Records every call; optionally fails all of them
#[derive(Default)]
pub struct RecordingSink {
    pub events: Mutex<Vec<Event>>,
    pub users: Mutex<Vec<UserProfile>>,
    pub companies: Mutex<Vec<CompanyProfile>>,
    pub fail: bool,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            ..Default::default()
        })
    }

    pub fn sinks(self: &Arc<Self>) -> Sinks {
        Sinks::new(self.clone())
    }

    pub fn event_count(&self) -> usize {
        self.events.lock().len()
    }

    pub fn last_event(&self) -> Option<Event> {
        self.events.lock().last().cloned()
    }

    fn check(&self) -> Result<()> {
        if self.fail {
            Err(CaptureError::Collector {
                status: 500,
                body: "collector unavailable".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl EventSink for RecordingSink {
    async fn submit(&self, event: &Event) -> Result<()> {
        self.check()?;
        self.events.lock().push(event.clone());
        Ok(())
    }
}

#[async_trait]
impl ProfileSink for RecordingSink {
    async fn upsert_user(&self, user: &UserProfile) -> Result<()> {
        self.check()?;
        self.users.lock().push(user.clone());
        Ok(())
    }

    async fn upsert_users(&self, users: &[UserProfile]) -> Result<()> {
        self.check()?;
        self.users.lock().extend_from_slice(users);
        Ok(())
    }

    async fn upsert_company(&self, company: &CompanyProfile) -> Result<()> {
        self.check()?;
        self.companies.lock().push(company.clone());
        Ok(())
    }

    async fn upsert_companies(&self, companies: &[CompanyProfile]) -> Result<()> {
        self.check()?;
        self.companies.lock().extend_from_slice(companies);
        Ok(())
    }
}
