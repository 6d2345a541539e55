//! Header redaction usable as a `mask_event_model` hook

use super::headers::HeaderMap;
use super::models::Event;
use std::collections::BTreeSet;
use std::sync::LazyLock;

/// Header names always redacted, compared lowercase
static SENSITIVE_HEADERS: LazyLock<BTreeSet<&'static str>> = LazyLock::new(|| {
    [
        "authorization",
        "proxy-authorization",
        "cookie",
        "set-cookie",
        "x-api-key",
        "x-amz-security-token",
    ]
    .into_iter()
    .collect()
});

/// Fragments that mark a header name as sensitive
const SENSITIVE_FRAGMENTS: &[&str] = &["token", "secret", "password"];

pub const REDACTED: &str = "[REDACTED]";

/// Which headers to redact
#[derive(Debug, Clone, Default)]
pub struct RedactionConfig {
    /// Extra header names to redact (case-insensitive)
    pub additional_headers: BTreeSet<String>,
    /// Header names to leave alone even if they look sensitive
    pub exclude_headers: BTreeSet<String>,
}

impl RedactionConfig {
    pub fn with_header(mut self, name: impl Into<String>) -> Self {
        self.additional_headers.insert(name.into().to_lowercase());
        self
    }

    pub fn without_header(mut self, name: impl Into<String>) -> Self {
        self.exclude_headers.insert(name.into().to_lowercase());
        self
    }

    /// Whether `name` should have its value replaced
    pub fn is_sensitive(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        if self.exclude_headers.contains(&lower) {
            return false;
        }

        SENSITIVE_HEADERS.contains(lower.as_str())
            || self.additional_headers.contains(&lower)
            || SENSITIVE_FRAGMENTS.iter().any(|f| lower.contains(f))
    }

    /// Redact both header maps of `event`
    pub fn apply(&self, mut event: Event) -> Event {
        self.redact_headers(&mut event.request.headers);
        self.redact_headers(&mut event.response.headers);
        event
    }

    fn redact_headers(&self, headers: &mut HeaderMap) {
        for (name, value) in headers.iter_mut() {
            if self.is_sensitive(name) {
                *value = REDACTED.to_string();
            }
        }
    }
}

/// Redact sensitive request and response headers with the default list
pub fn redact_sensitive_headers(event: Event) -> Event {
    RedactionConfig::default().apply(event)
}
