// ABOUTME: Wiremock fixtures imitating Garmin SSO, the OAuth service and the Connect API
// ABOUTME: Builds GarminClient instances pointed at a local mock server

use garmin_workout_api::config::GarminConfig;
use garmin_workout_api::garmin::{GarminClient, RetryConfig};
use garmin_workout_api::models::{GarminTokens, OAuth1Token, OAuth2Token, OAuthConsumer};
use reqwest::StatusCode;
use std::sync::Arc;
use wiremock::matchers::{header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TICKET: &str = "ST-0123456-abcdef-cas";

/// Endpoint configuration for a mock server with a fixed consumer
pub fn mock_config(server: &MockServer) -> GarminConfig {
    GarminConfig {
        domain: "garmin.test".to_owned(),
        sso_base_url: server.uri(),
        api_base_url: server.uri(),
        consumer_url: format!("{}/oauth_consumer.json", server.uri()),
        consumer: Some(OAuthConsumer {
            consumer_key: "consumer-key".to_owned(),
            consumer_secret: "consumer-secret".to_owned(),
        }),
    }
}

/// Client for the mock server with near-instant retry backoff
pub fn mock_client(server: &MockServer) -> GarminClient {
    GarminClient::with_http_client(mock_config(server), reqwest::Client::new()).with_retry_config(
        RetryConfig {
            max_retries: 2,
            initial_backoff_ms: 1,
            retryable_status_codes: vec![StatusCode::TOO_MANY_REQUESTS],
        },
    )
}

/// Shared client for token manager tests
pub fn mock_client_arc(server: &MockServer) -> Arc<GarminClient> {
    Arc::new(mock_client(server))
}

/// Tokens with an `OAuth1` pair and the given access token
pub fn tokens_with_access(access_token: &str) -> GarminTokens {
    GarminTokens {
        oauth1: Some(OAuth1Token {
            oauth_token: "oauth1-token".to_owned(),
            oauth_token_secret: "oauth1-secret".to_owned(),
            mfa_token: None,
        }),
        oauth2: OAuth2Token::from_strings(access_token, "refresh-token"),
    }
}

pub fn signin_form() -> String {
    r#"<html><head><title>GARMIN Authentication Application</title></head>
<body><form method="post"><input type="hidden" name="_csrf" value="csrf-token-123" /></form></body></html>"#
        .to_owned()
}

pub fn success_page() -> String {
    format!(
        r#"<html><head><title>Success</title></head>
<body><script>var response_url = "https://sso.garmin.com/sso/embed?ticket={TICKET}";</script></body></html>"#
    )
}

/// Mount the embed page and the GET sign-in form
pub async fn mount_sso_pages(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/sso/embed"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "GARMIN-SSO=1; Path=/")
                .set_body_string("<html><title>embed</title></html>"),
        )
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/sso/signin"))
        .respond_with(ResponseTemplate::new(200).set_body_string(signin_form()))
        .mount(server)
        .await;
}

/// Mount the credential POST answering with `page`
pub async fn mount_signin_result(server: &MockServer, page: String) {
    Mock::given(method("POST"))
        .and(path("/sso/signin"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page))
        .mount(server)
        .await;
}

/// Mount the `OAuth1` preauthorization
pub async fn mount_preauthorize(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/oauth-service/oauth/preauthorized"))
        .and(header_exists("authorization"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("oauth_token=oauth1-token&oauth_token_secret=oauth1-secret"),
        )
        .mount(server)
        .await;
}

/// Mount the `OAuth2` exchange issuing `access_token`
pub async fn mount_exchange(server: &MockServer, access_token: &str) {
    Mock::given(method("POST"))
        .and(path("/oauth-service/oauth/exchange/user/2.0"))
        .and(header_exists("authorization"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "scope": "CONNECT_READ CONNECT_WRITE",
            "jti": "jti-1",
            "access_token": access_token,
            "token_type": "Bearer",
            "refresh_token": "refreshed-refresh-token",
            "expires_in": 3600,
            "refresh_token_expires_in": 7_776_000
        })))
        .mount(server)
        .await;
}
