//! Event assembly
//!
//! Single pass, no retained state: request record, response record, identity,
//! then the event itself. Timestamps are supplied by the caller so the same
//! input always yields the same event.

use super::body::BodyClassifier;
use super::client_ip::ClientIpResolver;
use super::headers::{HeaderMap, expand_headers, normalize_headers};
use super::identity::resolve_identity;
use super::lambda::{LambdaRequest, LambdaResponse};
use super::models::{Direction, Event, EventRequest, EventResponse};
use crate::config::{CaptureSettings, Hooks};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::sync::Arc;

/// When the request arrived and when the response was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExchangeTiming {
    pub request_time: DateTime<Utc>,
    pub response_time: DateTime<Utc>,
}

impl ExchangeTiming {
    pub fn new(request_time: DateTime<Utc>, response_time: DateTime<Utc>) -> Self {
        Self {
            request_time,
            response_time,
        }
    }
}

/// Request made by the instrumented service to a third party
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingRequest {
    pub time: DateTime<Utc>,
    pub scheme: String,
    pub host: String,
    /// Path including any query string
    pub path: String,
    pub method: String,
    pub headers: HeaderMap,
    pub body: Option<String>,
}

/// Response received by the instrumented service from a third party
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingResponse {
    pub time: DateTime<Utc>,
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Option<String>,
}

/// A complete outbound exchange with its caller-provided enrichment
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingExchange {
    pub request: OutgoingRequest,
    pub response: OutgoingResponse,
    pub user_id: Option<String>,
    pub company_id: Option<String>,
    pub session_token: Option<String>,
    pub metadata: Option<Map<String, Value>>,
    pub weight: u32,
}

impl OutgoingExchange {
    pub fn new(request: OutgoingRequest, response: OutgoingResponse) -> Self {
        Self {
            request,
            response,
            user_id: None,
            company_id: None,
            session_token: None,
            metadata: None,
            weight: 1,
        }
    }

    /// Full URI of the outbound request
    pub fn uri(&self) -> String {
        let path = &self.request.path;
        let separator = if path.starts_with('/') || path.is_empty() { "" } else { "/" };
        let path = if path.is_empty() { "/" } else { path.as_str() };
        format!(
            "{}://{}{}{}",
            self.request.scheme, self.request.host, separator, path
        )
    }
}

/// Builds events from raw exchanges
#[derive(Clone)]
pub struct EventAssembler {
    settings: Arc<CaptureSettings>,
    ip_resolver: Arc<dyn ClientIpResolver>,
}

impl EventAssembler {
    pub fn new(settings: Arc<CaptureSettings>, ip_resolver: Arc<dyn ClientIpResolver>) -> Self {
        Self {
            settings,
            ip_resolver,
        }
    }

    fn incoming_classifier(&self) -> BodyClassifier {
        BodyClassifier::new(self.settings.log_body).with_debug(self.settings.debug)
    }

    fn outgoing_classifier(&self) -> BodyClassifier {
        BodyClassifier::new(self.settings.log_body_outgoing).with_debug(self.settings.debug)
    }

    /// Request record of an inbound exchange
    pub fn build_request<Req: LambdaRequest>(&self, request: &Req, time: DateTime<Utc>) -> EventRequest {
        let headers = normalize_headers(Some(&request.headers()));
        let ip_address = self
            .ip_resolver
            .resolve(&expand_headers(&headers), request.source_ip());
        let body = self
            .incoming_classifier()
            .classify(request.body(), request.is_base64_encoded());

        EventRequest {
            time,
            uri: request.uri(),
            verb: request.method().to_string(),
            api_version: self.settings.api_version.clone(),
            ip_address,
            headers,
            body: body.value,
            transfer_encoding: body.encoding,
        }
    }

    /// Response record of an inbound exchange
    pub fn build_response<Resp: LambdaResponse>(&self, response: &Resp, time: DateTime<Utc>) -> EventResponse {
        let body = self
            .incoming_classifier()
            .classify(response.body(), response.is_base64_encoded());

        EventResponse {
            time,
            status: response.status_code(),
            ip_address: None,
            headers: normalize_headers(Some(&response.headers())),
            body: body.value,
            transfer_encoding: body.encoding,
        }
    }

    /// Event for a request received by the instrumented handler
    pub fn assemble_incoming<Req, Resp>(
        &self,
        hooks: &Hooks<Req, Resp>,
        request: &Req,
        response: &Resp,
        timing: ExchangeTiming,
    ) -> Event
    where
        Req: LambdaRequest,
        Resp: LambdaResponse,
    {
        let event_request = self.build_request(request, timing.request_time);
        let event_response = self.build_response(response, timing.response_time);
        let identity = resolve_identity(hooks, request, response);

        Event {
            request: event_request,
            response: event_response,
            session_token: identity.session_token,
            tags: None,
            user_id: identity.user_id,
            company_id: identity.company_id,
            metadata: identity.metadata,
            direction: Direction::Incoming,
            weight: 1,
        }
    }

    /// Event for a call made by the instrumented service
    pub fn assemble_outgoing(&self, exchange: OutgoingExchange) -> Event {
        let classifier = self.outgoing_classifier();
        let uri = exchange.uri();
        let OutgoingExchange {
            request,
            response,
            user_id,
            company_id,
            session_token,
            metadata,
            weight,
        } = exchange;

        let request_body = classifier.classify(request.body.as_deref().unwrap_or_default(), false);
        let response_body = classifier.classify(response.body.as_deref().unwrap_or_default(), false);

        Event {
            request: EventRequest {
                time: request.time,
                uri,
                verb: request.method,
                api_version: None,
                ip_address: None,
                headers: normalize_headers(Some(&request.headers)),
                body: request_body.value,
                transfer_encoding: request_body.encoding,
            },
            response: EventResponse {
                time: response.time,
                status: response.status,
                ip_address: None,
                headers: normalize_headers(Some(&response.headers)),
                body: response_body.value,
                transfer_encoding: response_body.encoding,
            },
            session_token,
            tags: None,
            user_id,
            company_id,
            metadata,
            direction: Direction::Outgoing,
            weight,
        }
    }
}
