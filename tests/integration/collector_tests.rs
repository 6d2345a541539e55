//! Collector delivery integration tests
//!
//! Full path from a wrapped handler to the collector HTTP API, served by
//! wiremock.

#[cfg(test)]
mod tests {
    use crate::common::ProxyFixtures;
    use moesif_lambda::{
        CaptureError, CaptureSettings, CollectorClient, DeliveryOutcome, Hooks, ProxyCapture,
        Sinks, UserProfile,
    };
    use serde_json::json;
    use std::sync::Arc;
    use std::time::{Duration, Instant};
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const APP_ID: &str = "test-application-id";

    fn settings(server: &MockServer) -> CaptureSettings {
        CaptureSettings {
            application_id: Some(APP_ID.to_string()),
            base_uri: server.uri(),
            timeout_seconds: 5,
            ..Default::default()
        }
    }

    fn capture(server: &MockServer) -> ProxyCapture {
        let settings = settings(server);
        let client = CollectorClient::new(&settings).unwrap();
        let hooks = Hooks::new().identify_company(|_, _| "acme".to_string());
        ProxyCapture::new(settings, hooks, Sinks::new(Arc::new(client)))
    }

    #[tokio::test]
    async fn test_wrapped_handler_ships_event() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/events"))
            .and(header("X-Moesif-Application-Id", APP_ID))
            .and(body_partial_json(json!({
                "request": {
                    "uri": "https://api.example.com/foo/bar/dev?page=2",
                    "verb": "POST",
                    "body": {"foo": "bar"},
                    "transfer_encoding": "json"
                },
                "response": {"status": 200},
                "company_id": "acme",
                "user_id": "us-east-1:cognito-user",
                "direction": "Incoming"
            })))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let capture = Arc::new(capture(&server));
        let handler = capture.wrap(|_req| async {
            Ok::<_, std::convert::Infallible>(ProxyFixtures::response(200, r#"{"ok":true}"#))
        });

        let response = handler(ProxyFixtures::request(r#"{"foo":"bar"}"#, false))
            .await
            .unwrap();
        assert_eq!(response.status_code, 200);
    }

    #[tokio::test]
    async fn test_collector_rejection_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/events"))
            .respond_with(ResponseTemplate::new(503).set_body_string("try later"))
            .mount(&server)
            .await;

        let capture = capture(&server);
        let outcome = capture
            .record(
                &ProxyFixtures::request("", false),
                &ProxyFixtures::response(200, ""),
                crate::common::fixed_timing(),
            )
            .await;

        match outcome {
            DeliveryOutcome::Failed(err) => {
                assert!(err.is_retryable());
                assert!(matches!(err, CaptureError::Collector { status: 503, .. }));
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_slow_collector_does_not_hold_handler() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/events"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(4)))
            .mount(&server)
            .await;

        let settings = CaptureSettings {
            timeout_seconds: 1,
            ..settings(&server)
        };
        let client = CollectorClient::new(&settings).unwrap();
        let capture = ProxyCapture::new(settings, Hooks::new(), Sinks::new(Arc::new(client)));

        let started = Instant::now();
        let response = capture
            .handle(ProxyFixtures::request("", false), |_req| async {
                Ok::<_, String>(ProxyFixtures::response(200, "done"))
            })
            .await
            .unwrap();

        assert_eq!(response.body, "done");
        assert!(started.elapsed() < Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_user_profile_upsert() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/users"))
            .and(header("X-Moesif-Application-Id", APP_ID))
            .and(body_partial_json(json!({
                "user_id": "u-1",
                "company_id": "acme",
                "metadata": {"plan": "pro"}
            })))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let mut user = UserProfile::new("u-1");
        user.company_id = Some("acme".to_string());
        user.metadata = json!({"plan": "pro"}).as_object().cloned();

        capture(&server).update_user(&user).await.unwrap();
    }
}
