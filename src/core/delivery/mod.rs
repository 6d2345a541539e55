//! Event delivery
//!
//! The gate decides whether and in which form a finished event reaches the
//! sink. Sinks are the collaborators that actually ship events and profiles.

mod collector;
mod gate;
mod sinks;

pub use collector::CollectorClient;
pub use gate::{DeliveryGate, DeliveryOutcome};
pub use sinks::{DisabledSink, EventSink, ProfileSink, Sinks, global_sinks};
