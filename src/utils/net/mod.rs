//! Network utilities
//!
//! This module provides the shared HTTP client used by the collector client.

pub mod http;

pub use http::client_with_timeout;
