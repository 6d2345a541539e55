//! Data models shipped to the collector

pub mod event;
pub mod profile;

pub use event::{Direction, Event, EventRequest, EventResponse, TransferEncoding};
pub use profile::{Campaign, CompanyProfile, UserProfile};
