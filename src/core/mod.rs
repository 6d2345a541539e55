//! Core capture pipeline
//!
//! Normalization of raw Lambda exchanges into events and their delivery.

pub mod assembler;
pub mod body;
pub mod capture;
pub mod client_ip;
pub mod delivery;
pub mod headers;
pub mod identity;
pub mod lambda;
pub mod masking;
pub mod models;
pub mod uri;

pub use assembler::{EventAssembler, ExchangeTiming, OutgoingExchange, OutgoingRequest, OutgoingResponse};
pub use capture::{Capture, HttpCapture, ProxyCapture};
pub use delivery::{DeliveryOutcome, EventSink, ProfileSink, Sinks};
