//! # moesif-lambda-rs
//!
//! Request/response capture for AWS Lambda handlers behind API Gateway.
//!
//! Each invocation is turned into a normalized API event (URI, headers, body,
//! client IP, identity and metadata) and shipped to the Moesif collector. The
//! handler's response is returned untouched; capture failures are logged and
//! never reach the caller.
//!
//! ## Features
//!
//! - **Both payload formats**: REST API (1.0) and HTTP API (2.0) events
//! - **Body classification**: JSON, base64 or raw text with a transfer encoding marker
//! - **Typed hooks**: user, company, session token, metadata, skip and mask callbacks
//! - **Outgoing calls**: optional capture of requests made by the handler
//! - **Profiles**: user and company upserts, single and batched
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use moesif_lambda::{
//!     ApiGatewayProxyRequest, ApiGatewayProxyResponse, CaptureSettings, Hooks, ProxyCapture,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = CaptureSettings::from_env()?;
//!     let hooks = Hooks::new()
//!         .identify_company(|req: &ApiGatewayProxyRequest, _| {
//!             req.headers.get("X-Organization-Id").cloned().unwrap_or_default()
//!         })
//!         .mask_event_model(moesif_lambda::core::masking::redact_sensitive_headers);
//!
//!     let capture = Arc::new(ProxyCapture::from_settings(settings, hooks));
//!     let handler = capture.wrap(|_request: ApiGatewayProxyRequest| async {
//!         Ok::<_, std::io::Error>(ApiGatewayProxyResponse {
//!             status_code: 200,
//!             body: r#"{"hello":"world"}"#.to_string(),
//!             ..Default::default()
//!         })
//!     });
//!
//!     let response = handler(ApiGatewayProxyRequest::default()).await?;
//!     println!("status: {}", response.status_code);
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod core;
pub mod utils;

// Re-export main types
pub use config::{CaptureSettings, Hooks, Validate};
pub use utils::error::{CaptureError, Result};
pub use utils::logging::{LogFormat, init_logging};

pub use core::assembler::{ExchangeTiming, OutgoingExchange, OutgoingRequest, OutgoingResponse};
pub use core::capture::{Capture, HttpCapture, ProxyCapture};
pub use core::delivery::{
    CollectorClient, DeliveryOutcome, DisabledSink, EventSink, ProfileSink, Sinks,
};
pub use core::lambda::{
    ApiGatewayProxyRequest, ApiGatewayProxyResponse, ApiGatewayV2HttpRequest,
    ApiGatewayV2HttpResponse, LambdaRequest, LambdaResponse,
};
pub use core::models::{
    Campaign, CompanyProfile, Direction, Event, EventRequest, EventResponse, TransferEncoding,
    UserProfile,
};

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
