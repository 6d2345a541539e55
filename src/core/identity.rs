//! Identity and metadata extraction
//!
//! User id falls back to the authorizer identity when no callback is set.
//! Company id, session token and metadata only come from callbacks.
//! A panicking callback loses its field and nothing else.

use super::lambda::LambdaRequest;
use crate::config::Hooks;
use crate::utils::error::{CaptureError, Result};
use serde_json::{Map, Value};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use tracing::warn;

/// Enrichment fields resolved for one exchange
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Identity {
    pub user_id: Option<String>,
    pub company_id: Option<String>,
    pub session_token: Option<String>,
    pub metadata: Option<Map<String, Value>>,
}

/// Resolve every enrichment field for `request`/`response`
pub fn resolve_identity<Req, Resp>(hooks: &Hooks<Req, Resp>, request: &Req, response: &Resp) -> Identity
where
    Req: LambdaRequest,
{
    Identity {
        user_id: resolve_user_id(hooks, request, response),
        company_id: hooks
            .identify_company
            .as_ref()
            .and_then(|f| guarded("identify_company", || f(request, response)).ok()),
        session_token: hooks
            .get_session_token
            .as_ref()
            .and_then(|f| guarded("get_session_token", || f(request, response)).ok()),
        metadata: hooks
            .get_metadata
            .as_ref()
            .and_then(|f| guarded("get_metadata", || f(request, response)).ok()),
    }
}

/// User id from the callback, or the platform identity when none is set
///
/// An empty string returned by the callback is kept: it is the caller's
/// answer, not an absent one.
pub fn resolve_user_id<Req, Resp>(hooks: &Hooks<Req, Resp>, request: &Req, response: &Resp) -> Option<String>
where
    Req: LambdaRequest,
{
    match &hooks.identify_user {
        Some(f) => guarded("identify_user", || f(request, response)).ok(),
        None => request.platform_user_id().map(str::to_string),
    }
}

/// Run a user callback, turning a panic into [`CaptureError::Callback`]
pub(crate) fn guarded<T>(name: &str, f: impl FnOnce() -> T) -> Result<T> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
        let reason = panic_message(payload.as_ref());
        warn!(callback = name, %reason, "Capture callback panicked, dropping its result");
        CaptureError::callback(format!("{} panicked: {}", name, reason))
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
