//! Error handling for the capture middleware
//!
//! This module defines the crate-wide error type and result alias.

mod helpers;
mod types;

pub use types::{CaptureError, Result};
