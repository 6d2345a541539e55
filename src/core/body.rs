//! Body classification
//!
//! Decides how a captured body is represented in the event. The platform's
//! `isBase64Encoded` flag is only a hint: the content is checked against it
//! and the two signals are reconciled with a fixed table.
//!
//! | hint  | content                    | value            | encoding   |
//! |-------|----------------------------|------------------|------------|
//! | any   | empty / capture disabled   | `null`           | `""`       |
//! | true  | matches base64 alphabet    | raw string       | `"base64"` |
//! | true  | not base64, valid JSON     | parsed JSON      | `""`       |
//! | true  | not base64, not JSON       | base64(raw)      | `"base64"` |
//! | false | valid JSON                 | parsed JSON      | `"json"`   |
//! | false | not JSON                   | base64(raw)      | `"base64"` |

use super::models::TransferEncoding;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::debug;

static BASE64_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9+/]+={0,2}$").expect("Invalid base64 regex"));

/// Whether `s` consists solely of base64 alphabet characters with optional padding
pub fn is_base64_string(s: &str) -> bool {
    BASE64_PATTERN.is_match(s)
}

/// A body after classification
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedBody {
    pub value: Value,
    pub encoding: TransferEncoding,
}

impl ClassifiedBody {
    fn empty() -> Self {
        Self {
            value: Value::Null,
            encoding: TransferEncoding::Unset,
        }
    }

    fn encoded(raw: &str) -> Self {
        Self {
            value: Value::String(STANDARD.encode(raw.as_bytes())),
            encoding: TransferEncoding::Base64,
        }
    }
}

/// Body classifier bound to one body-capture switch
#[derive(Debug, Clone, Copy)]
pub struct BodyClassifier {
    enabled: bool,
    debug: bool,
}

impl BodyClassifier {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            debug: false,
        }
    }

    /// Emit a debug line whenever a body falls back to base64
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Classify `raw` given the platform's base64 hint
    pub fn classify(&self, raw: &str, base64_hint: bool) -> ClassifiedBody {
        if !self.enabled || raw.is_empty() {
            return ClassifiedBody::empty();
        }

        if base64_hint {
            if is_base64_string(raw) {
                return ClassifiedBody {
                    value: Value::String(raw.to_string()),
                    encoding: TransferEncoding::Base64,
                };
            }

            // Flagged as base64 but the content disagrees. A JSON document
            // keeps its parsed value with no encoding recorded.
            return match serde_json::from_str::<Value>(raw) {
                Ok(value) => ClassifiedBody {
                    value,
                    encoding: TransferEncoding::Unset,
                },
                Err(_) => self.fallback(raw),
            };
        }

        match serde_json::from_str::<Value>(raw) {
            Ok(value) => ClassifiedBody {
                value,
                encoding: TransferEncoding::Json,
            },
            Err(_) => self.fallback(raw),
        }
    }

    fn fallback(&self, raw: &str) -> ClassifiedBody {
        if self.debug {
            debug!(len = raw.len(), "Body is not JSON, capturing it as base64");
        }
        ClassifiedBody::encoded(raw)
    }
}

impl Default for BodyClassifier {
    fn default() -> Self {
        Self::new(true)
    }
}
