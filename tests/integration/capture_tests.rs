//! Capture pipeline integration tests
//!
//! Drive `Capture` with realistic Lambda payloads and inspect what reaches
//! the sink.

#[cfg(test)]
mod tests {
    use crate::common::{HttpFixtures, ProxyFixtures, RecordingSink, fixed_timing};
    use chrono::Utc;
    use moesif_lambda::core::masking::{REDACTED, redact_sensitive_headers};
    use moesif_lambda::{
        ApiGatewayProxyRequest, ApiGatewayProxyResponse, CaptureSettings, CompanyProfile,
        DeliveryOutcome, Direction, Hooks, HttpCapture, OutgoingExchange, OutgoingRequest,
        OutgoingResponse, ProxyCapture, TransferEncoding, UserProfile,
    };
    use serde_json::{Map, json};
    use std::collections::BTreeMap;
    use std::sync::Arc;

    type ProxyHooks = Hooks<ApiGatewayProxyRequest, ApiGatewayProxyResponse>;

    fn proxy_capture(settings: CaptureSettings, hooks: ProxyHooks, sink: &Arc<RecordingSink>) -> ProxyCapture {
        ProxyCapture::new(settings, hooks, sink.sinks())
    }

    // ==================== Body classification end to end ====================

    #[tokio::test]
    async fn test_json_body_without_hint() {
        let sink = RecordingSink::new();
        let capture = proxy_capture(CaptureSettings::default(), Hooks::new(), &sink);

        capture
            .record(
                &ProxyFixtures::request(r#"{"foo":"bar"}"#, false),
                &ProxyFixtures::response(200, ""),
                fixed_timing(),
            )
            .await;

        let event = sink.last_event().unwrap();
        assert_eq!(event.request.transfer_encoding, TransferEncoding::Json);
        assert_eq!(event.request.body, json!({"foo": "bar"}));
    }

    #[tokio::test]
    async fn test_base64_body_with_hint() {
        let sink = RecordingSink::new();
        let capture = proxy_capture(CaptureSettings::default(), Hooks::new(), &sink);

        capture
            .record(
                &ProxyFixtures::request("eyJmb28iOiAiYmFyIn0=", true),
                &ProxyFixtures::response(200, ""),
                fixed_timing(),
            )
            .await;

        let event = sink.last_event().unwrap();
        assert_eq!(event.request.transfer_encoding, TransferEncoding::Base64);
        assert_eq!(event.request.body, json!("eyJmb28iOiAiYmFyIn0="));
    }

    #[tokio::test]
    async fn test_contradictory_hint_keeps_json_without_encoding() {
        let sink = RecordingSink::new();
        let capture = proxy_capture(CaptureSettings::default(), Hooks::new(), &sink);

        capture
            .record(
                &ProxyFixtures::request(r#"{"foo":"bar"}"#, true),
                &ProxyFixtures::response(200, ""),
                fixed_timing(),
            )
            .await;

        let event = sink.last_event().unwrap();
        assert_eq!(event.request.transfer_encoding, TransferEncoding::Unset);
        assert_eq!(event.request.body, json!({"foo": "bar"}));

        let wire = serde_json::to_value(&event).unwrap();
        assert_eq!(wire["request"]["transfer_encoding"], json!(""));
    }

    #[tokio::test]
    async fn test_log_body_disabled_omits_bodies() {
        let sink = RecordingSink::new();
        let settings = CaptureSettings {
            log_body: false,
            ..Default::default()
        };
        let capture = proxy_capture(settings, Hooks::new(), &sink);

        capture
            .record(
                &ProxyFixtures::request(r#"{"foo":"bar"}"#, false),
                &ProxyFixtures::response(200, r#"{"ok":true}"#),
                fixed_timing(),
            )
            .await;

        let event = sink.last_event().unwrap();
        assert!(event.request.body.is_null());
        assert!(event.response.body.is_null());
    }

    // ==================== Request normalization ====================

    #[tokio::test]
    async fn test_http_api_uri_reconstruction() {
        let sink = RecordingSink::new();
        let capture = HttpCapture::new(CaptureSettings::default(), Hooks::new(), sink.sinks());

        capture
            .record(&HttpFixtures::request(), &HttpFixtures::response(204, ""), fixed_timing())
            .await;

        let event = sink.last_event().unwrap();
        assert_eq!(
            event.request.uri,
            "http://localhost/path/to/foo?parameter1=value1&parameter1=value2&parameter2=value"
        );
        assert_eq!(event.request.verb, "GET");
        assert_eq!(event.request.ip_address.as_deref(), Some("192.0.2.44"));
        assert_eq!(event.response.status, 204);
        assert_eq!(event.user_id, None);
    }

    #[tokio::test]
    async fn test_proxy_request_normalization() {
        let sink = RecordingSink::new();
        let settings = CaptureSettings {
            api_version: Some("1.2.0".to_string()),
            ..Default::default()
        };
        let capture = proxy_capture(settings, Hooks::new(), &sink);

        capture
            .record(
                &ProxyFixtures::request("", false),
                &ProxyFixtures::response(201, r#"{"id":7}"#),
                fixed_timing(),
            )
            .await;

        let event = sink.last_event().unwrap();
        assert_eq!(event.request.uri, "https://api.example.com/foo/bar/dev?page=2");
        assert_eq!(event.request.verb, "POST");
        assert_eq!(event.request.api_version.as_deref(), Some("1.2.0"));
        assert_eq!(event.request.ip_address.as_deref(), Some("203.0.113.9"));
        assert_eq!(event.request.headers["Accept"], "application/json,text/plain");
        assert_eq!(event.request.time, fixed_timing().request_time);
        assert_eq!(event.response.time, fixed_timing().response_time);
        assert_eq!(event.response.body, json!({"id": 7}));
        assert_eq!(event.user_id.as_deref(), Some("us-east-1:cognito-user"));
        assert_eq!(event.direction, Direction::Incoming);
        assert_eq!(event.weight, 1);
    }

    #[tokio::test]
    async fn test_same_input_same_event() {
        let sink = RecordingSink::new();
        let capture = proxy_capture(CaptureSettings::default(), Hooks::new(), &sink);
        let request = ProxyFixtures::request(r#"{"a":1}"#, false);
        let response = ProxyFixtures::response(200, "plain text");

        let first = capture.build_event(&request, &response, fixed_timing());
        let second = capture.build_event(&request, &response, fixed_timing());
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    // ==================== Hooks and delivery policy ====================

    #[tokio::test]
    async fn test_hooks_enrich_event() {
        let sink = RecordingSink::new();
        let hooks = ProxyHooks::new()
            .identify_user(|req, _| req.headers.get("Host").cloned().unwrap_or_default())
            .identify_company(|_, _| "acme".to_string())
            .get_session_token(|_, _| "sess-1".to_string())
            .get_metadata(|_, resp| {
                let mut map = Map::new();
                map.insert("status".to_string(), json!(resp.status_code));
                map
            });
        let capture = proxy_capture(CaptureSettings::default(), hooks, &sink);

        capture
            .record(
                &ProxyFixtures::request("", false),
                &ProxyFixtures::response(418, ""),
                fixed_timing(),
            )
            .await;

        let event = sink.last_event().unwrap();
        assert_eq!(event.user_id.as_deref(), Some("api.example.com"));
        assert_eq!(event.company_id.as_deref(), Some("acme"));
        assert_eq!(event.session_token.as_deref(), Some("sess-1"));
        assert_eq!(event.metadata.unwrap()["status"], json!(418));
    }

    #[tokio::test]
    async fn test_skip_predicate_means_zero_sink_calls() {
        let sink = RecordingSink::new();
        let hooks = ProxyHooks::new().should_skip(|req, _| req.path.starts_with("/foo"));
        let capture = proxy_capture(CaptureSettings::default(), hooks, &sink);

        let outcome = capture
            .record(
                &ProxyFixtures::request("", false),
                &ProxyFixtures::response(200, ""),
                fixed_timing(),
            )
            .await;

        assert!(matches!(outcome, DeliveryOutcome::Skipped));
        assert_eq!(sink.event_count(), 0);
    }

    #[tokio::test]
    async fn test_redaction_mask() {
        let sink = RecordingSink::new();
        let hooks = ProxyHooks::new().mask_event_model(redact_sensitive_headers);
        let capture = proxy_capture(CaptureSettings::default(), hooks, &sink);

        let mut request = ProxyFixtures::request("", false);
        request
            .headers
            .insert("Authorization".to_string(), "Bearer secret".to_string());

        capture
            .record(&request, &ProxyFixtures::response(200, ""), fixed_timing())
            .await;

        let event = sink.last_event().unwrap();
        assert_eq!(event.request.headers["Authorization"], REDACTED);
        assert_eq!(event.request.headers["Content-Type"], "application/json");
    }

    #[tokio::test]
    async fn test_sink_failure_does_not_affect_handler() {
        let sink = RecordingSink::failing();
        let capture = proxy_capture(CaptureSettings::default(), Hooks::new(), &sink);

        let response = capture
            .handle(ProxyFixtures::request("", false), |_req| async {
                Ok::<_, String>(ProxyFixtures::response(200, "done"))
            })
            .await
            .unwrap();

        assert_eq!(response.body, "done");
        assert_eq!(sink.event_count(), 0);
    }

    // ==================== Handler wrapping ====================

    #[tokio::test]
    async fn test_wrapped_handler_is_reusable() {
        let sink = RecordingSink::new();
        let capture = Arc::new(proxy_capture(CaptureSettings::default(), Hooks::new(), &sink));

        let handler = capture.wrap(|req: ApiGatewayProxyRequest| async move {
            if req.body.is_empty() {
                Err("empty body".to_string())
            } else {
                Ok(ProxyFixtures::response(200, &req.body))
            }
        });

        let first = handler(ProxyFixtures::request(r#"{"n":1}"#, false)).await.unwrap();
        assert_eq!(first.body, r#"{"n":1}"#);
        assert!(handler(ProxyFixtures::request("", false)).await.is_err());
        handler(ProxyFixtures::request(r#"{"n":2}"#, false)).await.unwrap();

        assert_eq!(sink.event_count(), 3);
        assert_eq!(sink.events.lock()[1].response.status, 0);
        let event = sink.last_event().unwrap();
        assert_eq!(event.response.body, json!({"n": 2}));
        assert!(event.request.time <= event.response.time);
    }

    // ==================== Outgoing capture ====================

    fn outgoing_exchange() -> OutgoingExchange {
        let now = Utc::now();
        let mut exchange = OutgoingExchange::new(
            OutgoingRequest {
                time: now,
                scheme: "https".to_string(),
                host: "payments.example.com".to_string(),
                path: "/v1/charges?limit=1".to_string(),
                method: "POST".to_string(),
                headers: BTreeMap::from([("Content-Type".to_string(), "application/json".to_string())]),
                body: Some(r#"{"amount":100}"#.to_string()),
            },
            OutgoingResponse {
                time: now,
                status: 402,
                headers: BTreeMap::new(),
                body: Some("payment required".to_string()),
            },
        );
        exchange.user_id = Some("u-9".to_string());
        exchange
    }

    #[tokio::test]
    async fn test_outgoing_capture_is_opt_in() {
        let sink = RecordingSink::new();
        let capture = proxy_capture(CaptureSettings::default(), Hooks::new(), &sink);

        let outcome = capture.capture_outgoing(outgoing_exchange()).await;
        assert!(matches!(outcome, DeliveryOutcome::Skipped));
        assert_eq!(sink.event_count(), 0);
    }

    #[tokio::test]
    async fn test_outgoing_capture_when_enabled() {
        let sink = RecordingSink::new();
        let settings = CaptureSettings {
            capture_outgoing_requests: true,
            ..Default::default()
        };
        let capture = proxy_capture(settings, Hooks::new(), &sink);

        let outcome = capture.capture_outgoing(outgoing_exchange()).await;
        assert!(outcome.is_sent());

        let event = sink.last_event().unwrap();
        assert_eq!(event.direction, Direction::Outgoing);
        assert_eq!(event.request.uri, "https://payments.example.com/v1/charges?limit=1");
        assert_eq!(event.request.body, json!({"amount": 100}));
        assert_eq!(event.response.status, 402);
        assert_eq!(event.user_id.as_deref(), Some("u-9"));
    }

    // ==================== Profiles ====================

    #[tokio::test]
    async fn test_profile_updates() {
        let sink = RecordingSink::new();
        let capture = proxy_capture(CaptureSettings::default(), Hooks::new(), &sink);

        capture.update_user(&UserProfile::new("u-1")).await.unwrap();
        capture
            .update_companies_batch(&[CompanyProfile::new("c-1"), CompanyProfile::new("c-2")])
            .await
            .unwrap();

        assert_eq!(sink.users.lock().len(), 1);
        assert_eq!(sink.companies.lock().len(), 2);
    }

    #[tokio::test]
    async fn test_profile_failure_is_returned() {
        let sink = RecordingSink::failing();
        let capture = proxy_capture(CaptureSettings::default(), Hooks::new(), &sink);

        let err = capture
            .update_users_batch(&[UserProfile::new("u-1")])
            .await
            .unwrap_err();
        assert!(err.is_retryable());
    }
}
