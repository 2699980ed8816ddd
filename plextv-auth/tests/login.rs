//! Integration tests for the caller-side login routine
use plextv_api::{Client, ClientIdentity};
use plextv_auth::{authenticate, poll_pin, AuthError, PollSettings, Settings};
use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> Client {
    Client::new(ClientIdentity::new("client-123", "plextv-test"))
        .unwrap()
        .with_api_base(server.uri())
}

fn fast_poll(timeout_secs: u64) -> PollSettings {
    PollSettings {
        interval_ms: 10,
        timeout_secs,
    }
}

fn pin_response(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "application/json")
}

#[tokio::test]
async fn poll_pin_waits_until_verified() {
    let server = MockServer::start().await;
    // First two checks are still pending
    Mock::given(matchers::method("GET"))
        .and(matchers::path("/api/v2/pins/9"))
        .respond_with(pin_response(r#"{"id":9,"code":"C","authToken":null}"#))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(matchers::method("GET"))
        .and(matchers::path("/api/v2/pins/9"))
        .respond_with(pin_response(r#"{"id":9,"code":"C","authToken":"fresh"}"#))
        .expect(1)
        .mount(&server)
        .await;

    let token = poll_pin(&client(&server), 9, "C", &fast_poll(30))
        .await
        .unwrap();

    assert_eq!(token.expose_secret(), "fresh");
}

#[tokio::test]
async fn poll_pin_times_out() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("GET"))
        .and(matchers::path("/api/v2/pins/9"))
        .respond_with(pin_response(r#"{"id":9,"code":"C"}"#))
        .mount(&server)
        .await;

    let err = poll_pin(&client(&server), 9, "C", &fast_poll(0))
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::Timeout(0)));
}

#[tokio::test]
async fn poll_pin_surfaces_provider_errors() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("GET"))
        .and(matchers::path("/api/v2/pins/9"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = poll_pin(&client(&server), 9, "C", &fast_poll(30))
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::Api(_)));
}

#[tokio::test]
async fn authenticate_reuses_valid_configured_token() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("GET"))
        .and(matchers::path("/api/v2/user"))
        .and(matchers::query_param("X-Plex-Token", "stored"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut settings = Settings::from_file("/nonexistent/plextv-config").unwrap();
    settings.token = Some("stored".to_string());

    let token = authenticate(&client(&server), &settings).await.unwrap();
    assert_eq!(token.expose_secret(), "stored");
}
