//! Integration tests for `UaaClient` against a mock token endpoint

use std::time::Duration;

use cfapi::UaaConfig;
use cfapi::uaa::{UaaClient, UaaError};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn token_response(access: &str, refresh: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "access_token": access,
        "refresh_token": refresh,
        "token_type": "bearer",
        "expires_in": 599,
        "scope": "cloud_controller.read cloud_controller.write",
        "jti": "a6f8e4ad2a3d4b3c8f6f0e0f3c1a2b4d"
    }))
}

// ============================================================================
// Authenticate
// ============================================================================

#[tokio::test]
async fn test_authenticate_sends_password_grant() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(header("Authorization", "Basic Y2Y6"))
        .and(header("Content-Type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("grant_type=password"))
        .and(body_string_contains("scope=&"))
        .and(body_string_contains("username=admin"))
        .and(body_string_contains("password=p%40ss+w0rd"))
        .respond_with(token_response("1234", "5678"))
        .expect(1)
        .mount(&server)
        .await;

    let client = UaaClient::new(server.uri()).unwrap();
    let tokens = client.authenticate("admin", "p@ss w0rd").await.unwrap();

    assert_eq!(tokens.access_token(), "1234");
    assert_eq!(tokens.refresh_token(), "5678");
    assert_eq!(tokens.token_type(), "bearer");
}

#[tokio::test]
async fn test_uaa_error_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string(
            r#"{"error":"invalid_something", "error_description":"something failed here"}"#,
        ))
        .mount(&server)
        .await;

    let client = UaaClient::new(server.uri()).unwrap();
    let err = client.authenticate("3", "4").await.unwrap_err();

    assert!(matches!(err, UaaError::Protocol { ref code, .. } if code == "invalid_something"));
    assert_eq!(
        err.to_string(),
        "UAA Error: something failed here (invalid_something)"
    );
}

#[tokio::test]
async fn test_malformed_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"access_token","refresh_token": "token_type":"bearer"}"#,
        ))
        .mount(&server)
        .await;

    let client = UaaClient::new(server.uri()).unwrap();
    let err = client.authenticate("5", "6").await.unwrap_err();

    assert!(matches!(err, UaaError::Parse(_)));
    assert!(err.to_string().contains("Failed to parse response"));
}

#[tokio::test]
async fn test_response_without_tokens_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("{}"))
        .mount(&server)
        .await;

    let client = UaaClient::new(server.uri()).unwrap();
    let err = client.authenticate("admin", "secret").await.unwrap_err();

    assert!(matches!(err, UaaError::Parse(_)));
    assert!(err.to_string().contains("502"));
}

#[tokio::test]
async fn test_unreachable_uaa() {
    let client = UaaClient::new("http://127.0.0.1:1").unwrap();
    let err = client.refresh_token("anything").await.unwrap_err();

    assert!(matches!(err, UaaError::Connection(_)));
}

// ============================================================================
// Refresh
// ============================================================================

#[tokio::test]
async fn test_refresh_token_sends_refresh_grant() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=9c1b2e6f-refresh"))
        .respond_with(token_response("1232", "5678"))
        .expect(1)
        .mount(&server)
        .await;

    let client = UaaClient::new(server.uri()).unwrap();
    let tokens = client.refresh_token("9c1b2e6f-refresh").await.unwrap();

    assert_eq!(tokens.access_token(), "1232");
    assert_eq!(tokens.refresh_token(), "5678");
    assert_eq!(tokens.token_type(), "bearer");
}

#[tokio::test]
async fn test_refresh_keeps_refresh_token_when_not_rotated() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "new-access",
            "token_type": "bearer"
        })))
        .mount(&server)
        .await;

    let client = UaaClient::new(server.uri()).unwrap();
    let tokens = client.refresh_token("long-lived").await.unwrap();

    assert_eq!(tokens.access_token(), "new-access");
    assert_eq!(tokens.refresh_token(), "long-lived");
}

// ============================================================================
// Configuration
// ============================================================================

#[tokio::test]
async fn test_custom_client_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("Authorization", "Basic YXBwOnNlY3JldA=="))
        .respond_with(token_response("a", "r"))
        .expect(1)
        .mount(&server)
        .await;

    let config = UaaConfig::builder()
        .endpoint(server.uri())
        .client_id("app")
        .client_secret("secret")
        .timeout(Duration::from_secs(5))
        .build();
    let client = UaaClient::from_config(&config).unwrap();

    client.authenticate("admin", "secret").await.unwrap();
}

#[tokio::test]
async fn test_timeout_is_applied() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(token_response("a", "r").set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let config = UaaConfig::builder()
        .endpoint(server.uri())
        .timeout(Duration::from_millis(100))
        .build();
    let client = UaaClient::from_config(&config).unwrap();

    let err = client.authenticate("admin", "secret").await.unwrap_err();
    assert!(matches!(err, UaaError::Connection(_)));
}
