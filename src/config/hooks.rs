//! Typed enrichment callbacks
//!
//! Each capability is independently optional. The callbacks receive the raw
//! request and response of one request shape, so a V1 proxy handler and a V2
//! HTTP handler each get their own `Hooks` instance.

use crate::core::models::Event;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Callback producing an identifier from the raw exchange
pub type StringHook<Req, Resp> = Arc<dyn Fn(&Req, &Resp) -> String + Send + Sync>;
/// Callback producing event metadata from the raw exchange
pub type MetadataHook<Req, Resp> = Arc<dyn Fn(&Req, &Resp) -> Map<String, Value> + Send + Sync>;
/// Predicate deciding whether the exchange is dropped
pub type SkipHook<Req, Resp> = Arc<dyn Fn(&Req, &Resp) -> bool + Send + Sync>;
/// Transform applied to the finished event before delivery
pub type MaskHook = Arc<dyn Fn(Event) -> Event + Send + Sync>;

/// Optional callbacks for one request shape
pub struct Hooks<Req, Resp> {
    pub identify_user: Option<StringHook<Req, Resp>>,
    pub identify_company: Option<StringHook<Req, Resp>>,
    pub get_session_token: Option<StringHook<Req, Resp>>,
    pub get_metadata: Option<MetadataHook<Req, Resp>>,
    pub should_skip: Option<SkipHook<Req, Resp>>,
    pub mask_event_model: Option<MaskHook>,
}

impl<Req, Resp> Hooks<Req, Resp> {
    /// Create an empty set of hooks
    pub fn new() -> Self {
        Self {
            identify_user: None,
            identify_company: None,
            get_session_token: None,
            get_metadata: None,
            should_skip: None,
            mask_event_model: None,
        }
    }

    pub fn identify_user<F>(mut self, f: F) -> Self
    where
        F: Fn(&Req, &Resp) -> String + Send + Sync + 'static,
    {
        self.identify_user = Some(Arc::new(f));
        self
    }

    pub fn identify_company<F>(mut self, f: F) -> Self
    where
        F: Fn(&Req, &Resp) -> String + Send + Sync + 'static,
    {
        self.identify_company = Some(Arc::new(f));
        self
    }

    pub fn get_session_token<F>(mut self, f: F) -> Self
    where
        F: Fn(&Req, &Resp) -> String + Send + Sync + 'static,
    {
        self.get_session_token = Some(Arc::new(f));
        self
    }

    pub fn get_metadata<F>(mut self, f: F) -> Self
    where
        F: Fn(&Req, &Resp) -> Map<String, Value> + Send + Sync + 'static,
    {
        self.get_metadata = Some(Arc::new(f));
        self
    }

    pub fn should_skip<F>(mut self, f: F) -> Self
    where
        F: Fn(&Req, &Resp) -> bool + Send + Sync + 'static,
    {
        self.should_skip = Some(Arc::new(f));
        self
    }

    pub fn mask_event_model<F>(mut self, f: F) -> Self
    where
        F: Fn(Event) -> Event + Send + Sync + 'static,
    {
        self.mask_event_model = Some(Arc::new(f));
        self
    }
}

impl<Req, Resp> Default for Hooks<Req, Resp> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Req, Resp> Clone for Hooks<Req, Resp> {
    fn clone(&self) -> Self {
        Self {
            identify_user: self.identify_user.clone(),
            identify_company: self.identify_company.clone(),
            get_session_token: self.get_session_token.clone(),
            get_metadata: self.get_metadata.clone(),
            should_skip: self.should_skip.clone(),
            mask_event_model: self.mask_event_model.clone(),
        }
    }
}

impl<Req, Resp> fmt::Debug for Hooks<Req, Resp> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("identify_user", &self.identify_user.is_some())
            .field("identify_company", &self.identify_company.is_some())
            .field("get_session_token", &self.get_session_token.is_some())
            .field("get_metadata", &self.get_metadata.is_some())
            .field("should_skip", &self.should_skip.is_some())
            .field("mask_event_model", &self.mask_event_model.is_some())
            .finish()
    }
}
