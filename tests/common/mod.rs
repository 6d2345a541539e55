//! Common test utilities for moesif-lambda-rs
//!
//! - Request and response fixtures for both payload formats
//! - A recording sink standing in for the collector

pub mod sinks;

pub use fixtures::{HttpFixtures, ProxyFixtures, fixed_timing};
pub use sinks::RecordingSink;
