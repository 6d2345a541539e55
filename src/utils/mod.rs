//! Utility modules
//!
//! - **error**: Crate error type and helpers
//! - **logging**: Tracing subscriber setup
//! - **net**: Shared HTTP clients

pub mod error;
pub mod logging;
pub mod net;

pub use error::{CaptureError, Result};
pub use logging::{LogFormat, init_logging};
