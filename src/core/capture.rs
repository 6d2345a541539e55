//! Capture entry point
//!
//! Wraps a Lambda handler: times the exchange, assembles the event, runs it
//! through the delivery gate and hands the handler's result back untouched.

use super::assembler::{EventAssembler, ExchangeTiming, OutgoingExchange};
use super::client_ip::{ClientIpResolver, HeaderIpResolver};
use super::delivery::{DeliveryGate, DeliveryOutcome, ProfileSink, Sinks, global_sinks};
use super::identity::guarded;
use super::lambda::{
    ApiGatewayProxyRequest, ApiGatewayProxyResponse, ApiGatewayV2HttpRequest,
    ApiGatewayV2HttpResponse, LambdaRequest, LambdaResponse,
};
use super::models::{CompanyProfile, Event, UserProfile};
use crate::config::{CaptureSettings, Hooks};
use crate::utils::error::Result;
use chrono::Utc;
use futures::future::{BoxFuture, FutureExt};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

/// Capture for REST API (payload format 1.0) handlers
pub type ProxyCapture = Capture<ApiGatewayProxyRequest, ApiGatewayProxyResponse>;
/// Capture for HTTP API (payload format 2.0) handlers
pub type HttpCapture = Capture<ApiGatewayV2HttpRequest, ApiGatewayV2HttpResponse>;

/// Instruments one handler shape
pub struct Capture<Req, Resp> {
    settings: Arc<CaptureSettings>,
    hooks: Hooks<Req, Resp>,
    assembler: EventAssembler,
    gate: DeliveryGate,
    profiles: Arc<dyn ProfileSink>,
}

impl<Req, Resp> Capture<Req, Resp>
where
    Req: LambdaRequest,
    Resp: LambdaResponse,
{
    /// Create a capture delivering to `sinks`
    pub fn new(settings: CaptureSettings, hooks: Hooks<Req, Resp>, sinks: Sinks) -> Self {
        let settings = Arc::new(settings);
        let gate = DeliveryGate::new(sinks.events, hooks.mask_event_model.clone(), settings.debug)
            .with_deadline(Duration::from_secs(settings.timeout_seconds));

        Self {
            assembler: EventAssembler::new(settings.clone(), Arc::new(HeaderIpResolver)),
            settings,
            hooks,
            gate,
            profiles: sinks.profiles,
        }
    }

    /// Create a capture delivering to the process-wide collector client
    pub fn from_settings(settings: CaptureSettings, hooks: Hooks<Req, Resp>) -> Self {
        let sinks = global_sinks(&settings);
        Self::new(settings, hooks, sinks)
    }

    /// Replace the default forwarding-header IP resolver
    pub fn with_ip_resolver(mut self, resolver: Arc<dyn ClientIpResolver>) -> Self {
        self.assembler = EventAssembler::new(self.settings.clone(), resolver);
        self
    }

    pub fn settings(&self) -> &CaptureSettings {
        &self.settings
    }

    pub fn hooks(&self) -> &Hooks<Req, Resp> {
        &self.hooks
    }

    /// Assemble the event for an inbound exchange without delivering it
    pub fn build_event(&self, request: &Req, response: &Resp, timing: ExchangeTiming) -> Event {
        self.assembler
            .assemble_incoming(&self.hooks, request, response, timing)
    }

    /// Assemble and deliver the event for a completed exchange
    pub async fn record(&self, request: &Req, response: &Resp, timing: ExchangeTiming) -> DeliveryOutcome {
        let skip = self
            .hooks
            .should_skip
            .as_ref()
            .map(|f| guarded("should_skip", || f(request, response)).unwrap_or(false))
            .unwrap_or(false);

        let event = self.build_event(request, response, timing);
        if self.settings.debug {
            if let Err(e) = log_event(&event) {
                debug!("Assembled event could not be serialized: {}", e);
            }
        }

        self.gate.forward(event, skip).await
    }

    /// Run `handler` on `request` and capture the exchange
    ///
    /// The handler's result is returned as is. An error result is recorded
    /// against an empty response, so the event carries status 0.
    pub async fn handle<F, Fut, E>(&self, request: Req, handler: F) -> std::result::Result<Resp, E>
    where
        Req: Clone,
        Resp: Default,
        F: FnOnce(Req) -> Fut,
        Fut: Future<Output = std::result::Result<Resp, E>>,
    {
        let request_time = Utc::now();
        let captured = request.clone();

        match handler(request).await {
            Ok(response) => {
                let timing = ExchangeTiming::new(request_time, Utc::now());
                self.record(&captured, &response, timing).await;
                Ok(response)
            }
            Err(e) => {
                if self.settings.debug {
                    debug!("Handler returned an error, recording an empty response");
                }
                let timing = ExchangeTiming::new(request_time, Utc::now());
                self.record(&captured, &Resp::default(), timing).await;
                Err(e)
            }
        }
    }

    /// Turn `handler` into a reusable instrumented handler
    pub fn wrap<F, Fut, E>(
        self: Arc<Self>,
        handler: F,
    ) -> impl Fn(Req) -> BoxFuture<'static, std::result::Result<Resp, E>> + Send + Sync
    where
        Req: Clone + Send + Sync + 'static,
        Resp: Default + Send + Sync + 'static,
        E: Send + 'static,
        F: Fn(Req) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<Resp, E>> + Send + 'static,
    {
        let handler = Arc::new(handler);
        move |request| {
            let capture = self.clone();
            let handler = handler.clone();
            async move { capture.handle(request, |req| handler(req)).await }.boxed()
        }
    }

    /// Deliver an event for a call made by the instrumented service
    ///
    /// Nothing is sent unless `capture_outgoing_requests` is enabled.
    pub async fn capture_outgoing(&self, exchange: OutgoingExchange) -> DeliveryOutcome {
        if !self.settings.capture_outgoing_requests {
            if self.settings.debug {
                debug!("Outgoing request capture is disabled, skipping");
            }
            return DeliveryOutcome::Skipped;
        }

        let event = self.assembler.assemble_outgoing(exchange);
        self.gate.forward(event, false).await
    }

    pub async fn update_user(&self, user: &UserProfile) -> Result<()> {
        let result = self.profiles.upsert_user(user).await;
        log_profile_result("User updated successfully", &result);
        result
    }

    pub async fn update_users_batch(&self, users: &[UserProfile]) -> Result<()> {
        let result = self.profiles.upsert_users(users).await;
        log_profile_result("Users updated successfully", &result);
        result
    }

    pub async fn update_company(&self, company: &CompanyProfile) -> Result<()> {
        let result = self.profiles.upsert_company(company).await;
        log_profile_result("Company updated successfully", &result);
        result
    }

    pub async fn update_companies_batch(&self, companies: &[CompanyProfile]) -> Result<()> {
        let result = self.profiles.upsert_companies(companies).await;
        log_profile_result("Companies updated successfully", &result);
        result
    }
}

fn log_event(event: &Event) -> Result<()> {
    let json = serde_json::to_string(event)?;
    debug!(event = %json, "Assembled event");
    Ok(())
}

fn log_profile_result(success: &str, result: &Result<()>) {
    match result {
        Ok(()) => info!("{}", success),
        Err(e) => error!("Error while updating profile in Moesif: {}", e),
    }
}

impl<Req, Resp> fmt::Debug for Capture<Req, Resp> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capture")
            .field("settings", &self.settings)
            .field("hooks", &self.hooks)
            .finish_non_exhaustive()
    }
}
