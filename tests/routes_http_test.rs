// ABOUTME: HTTP tests for the workout API routes against a mocked Garmin Connect
// ABOUTME: Covers health, token verification, workout creation, error envelopes and request ids
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod helpers;

use axum::Router;
use garmin_workout_api::config::ServerConfig;
use garmin_workout_api::constants::defaults;
use garmin_workout_api::models::{GarminTokens, OAuth2Token};
use garmin_workout_api::server::{build_router, ServerResources};
use garmin_workout_api::tokens::{TokenManager, TokenSource};
use helpers::axum_test::AxumTestRequest;
use helpers::garmin_mock;
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PROFILE_PATH: &str = "/userprofile-service/socialProfile";
const WORKOUT_PATH: &str = "/workout-service/workout";

fn app(server: &MockServer, tokens: Option<GarminTokens>) -> Router {
    let mut config = ServerConfig::default();
    config.garmin = garmin_mock::mock_config(server);
    let manager = TokenManager::new(
        garmin_mock::mock_client_arc(server),
        tokens.map(|tokens| (tokens, TokenSource::Provided)),
    );
    build_router(&Arc::new(ServerResources::new(config, manager)))
}

fn tokens_without_oauth1(access_token: &str) -> GarminTokens {
    GarminTokens {
        oauth1: None,
        oauth2: OAuth2Token::from_strings(access_token, "refresh-token"),
    }
}

async fn mount_profile(server: &MockServer, access_token: &str) {
    Mock::given(method("GET"))
        .and(path(PROFILE_PATH))
        .and(header("authorization", format!("Bearer {access_token}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "displayName": "runner-42",
            "fullName": "Test Runner",
            "userName": "runner42"
        })))
        .mount(server)
        .await;
}

async fn mount_workout_created(server: &MockServer, access_token: &str, workout_id: i64) {
    Mock::given(method("POST"))
        .and(path(WORKOUT_PATH))
        .and(header("authorization", format!("Bearer {access_token}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "workoutId": workout_id,
            "workoutName": "ignored"
        })))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_root_lists_endpoints() {
    let server = MockServer::start().await;
    let response = AxumTestRequest::get("/").send(app(&server, None)).await;

    assert_eq!(response.status(), 200);
    let body: Value = response.json();
    assert_eq!(body["message"], "Garmin Workout API");
    assert!(body["version"].is_string());
    assert!(body["endpoints"]["/create-workout"].is_string());
    assert!(body["endpoints"]["/test-auth"].is_string());
}

#[tokio::test]
async fn test_health() {
    let server = MockServer::start().await;
    let response = AxumTestRequest::get("/health").send(app(&server, None)).await;

    assert_eq!(response.status(), 200);
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_request_id_generated_and_propagated() {
    let server = MockServer::start().await;

    let response = AxumTestRequest::get("/health").send(app(&server, None)).await;
    let generated = response.header("x-request-id").unwrap();
    assert!(generated.starts_with("req_"));

    let response = AxumTestRequest::get("/health")
        .header("x-request-id", "client-supplied-1")
        .send(app(&server, None))
        .await;
    assert_eq!(
        response.header("x-request-id").as_deref(),
        Some("client-supplied-1")
    );
}

#[tokio::test]
async fn test_cors_preflight_allowed() {
    let server = MockServer::start().await;
    let response = AxumTestRequest::options("/create-workout")
        .header("origin", "https://workouts.example.com")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "content-type")
        .send(app(&server, None))
        .await;

    assert_eq!(response.status(), 200);
    assert!(response.header("access-control-allow-origin").is_some());
}

#[tokio::test]
async fn test_auth_without_tokens_is_unavailable() {
    let server = MockServer::start().await;
    let response = AxumTestRequest::get("/test-auth")
        .header("x-request-id", "req-test-auth")
        .send(app(&server, None))
        .await;

    assert_eq!(response.status(), 503);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "AUTH_REQUIRED");
    assert_eq!(body["error"]["request_id"], "req-test-auth");
    assert!(body["error"]["remedy"]
        .as_str()
        .unwrap()
        .contains("garmin-tokens login"));
}

#[tokio::test]
async fn test_auth_success_returns_profile() {
    let server = MockServer::start().await;
    mount_profile(&server, "good-token").await;

    let response = AxumTestRequest::get("/test-auth")
        .send(app(&server, Some(tokens_without_oauth1("good-token"))))
        .await;

    assert_eq!(response.status(), 200);
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Authentication successful");
    assert_eq!(body["profile"]["displayName"], "runner-42");
    assert_eq!(body["tokens"]["source"], "provided");
    assert_eq!(body["tokens"]["has_oauth1"], false);
}

#[tokio::test]
async fn test_auth_rejected_without_oauth1_reports_expired() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PROFILE_PATH))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let response = AxumTestRequest::get("/test-auth")
        .send(app(&server, Some(tokens_without_oauth1("stale"))))
        .await;

    assert_eq!(response.status(), 401);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "AUTH_EXPIRED");
    assert!(body["error"]["remedy"].is_string());
}

#[tokio::test]
async fn test_auth_refreshes_rejected_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PROFILE_PATH))
        .and(header("authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    mount_profile(&server, "fresh").await;
    garmin_mock::mount_exchange(&server, "fresh").await;

    let response = AxumTestRequest::get("/test-auth")
        .send(app(&server, Some(garmin_mock::tokens_with_access("stale"))))
        .await;

    assert_eq!(response.status(), 200);
    let body: Value = response.json();
    assert_eq!(body["profile"]["fullName"], "Test Runner");
    assert!(body["tokens"]["last_refreshed_at"].is_string());
}

#[tokio::test]
async fn test_create_workout_with_managed_tokens() {
    let server = MockServer::start().await;
    mount_workout_created(&server, "good-token", 123_456).await;

    let response = AxumTestRequest::post("/create-workout")
        .json(&json!({
            "workout_text": "10 min warmup, 5x(800m @ 5k pace, 400m easy), 10 min cooldown",
            "workout_name": "Track Night"
        }))
        .send(app(&server, Some(tokens_without_oauth1("good-token"))))
        .await;

    assert_eq!(response.status(), 200);
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Workout created successfully!");
    assert_eq!(body["workout_id"], 123_456);
    assert_eq!(body["workout_name"], "Track Night");
    assert_eq!(body["parsed_workout"]["workoutName"], "Track Night");
    let steps = &body["parsed_workout"]["workoutSegments"][0]["workoutSteps"];
    assert_eq!(steps.as_array().unwrap().len(), 3);
    assert_eq!(steps[1]["numberOfIterations"], 5);
}

#[tokio::test]
async fn test_create_workout_sends_parsed_body_to_garmin() {
    let server = MockServer::start().await;
    mount_workout_created(&server, "good-token", 7).await;

    AxumTestRequest::post("/create-workout")
        .json(&json!({"workout_text": "20 min tempo", "workout_name": "Tempo"}))
        .send(app(&server, Some(tokens_without_oauth1("good-token"))))
        .await;

    let requests = server.received_requests().await.unwrap();
    let upload = requests
        .iter()
        .find(|r| r.url.path() == WORKOUT_PATH)
        .expect("workout upload");
    let sent: Value = serde_json::from_slice(&upload.body).unwrap();
    assert_eq!(sent["workoutName"], "Tempo");
    assert_eq!(sent["workoutSegments"][0]["workoutSteps"][0]["durationValue"], 1200);
}

#[tokio::test]
async fn test_create_workout_with_request_credentials() {
    let server = MockServer::start().await;
    garmin_mock::mount_sso_pages(&server).await;
    garmin_mock::mount_signin_result(&server, garmin_mock::success_page()).await;
    garmin_mock::mount_preauthorize(&server).await;
    garmin_mock::mount_exchange(&server, "login-token").await;
    mount_workout_created(&server, "login-token", 99).await;

    let response = AxumTestRequest::post("/create-workout")
        .json(&json!({
            "workout_text": "30 min easy",
            "garmin_email": "runner@example.com",
            "garmin_password": "hunter2"
        }))
        .send(app(&server, None))
        .await;

    assert_eq!(response.status(), 200);
    let body: Value = response.json();
    assert_eq!(body["workout_id"], 99);
    assert!(body["workout_name"]
        .as_str()
        .unwrap()
        .starts_with("Run Workout "));
}

#[tokio::test]
async fn test_create_workout_two_factor_account() {
    let server = MockServer::start().await;
    garmin_mock::mount_sso_pages(&server).await;
    garmin_mock::mount_signin_result(
        &server,
        "<html><head><title>Enter MFA code for login</title></head></html>".to_owned(),
    )
    .await;

    let response = AxumTestRequest::post("/create-workout")
        .json(&json!({
            "workout_text": "30 min easy",
            "garmin_email": "runner@example.com",
            "garmin_password": "hunter2"
        }))
        .send(app(&server, None))
        .await;

    assert_eq!(response.status(), 401);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "TWO_FACTOR_REQUIRED");
}

#[tokio::test]
async fn test_create_workout_without_tokens_or_credentials() {
    let server = MockServer::start().await;
    let response = AxumTestRequest::post("/create-workout")
        .json(&json!({"workout_text": "30 min easy"}))
        .send(app(&server, None))
        .await;

    assert_eq!(response.status(), 503);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "AUTH_REQUIRED");
}

#[tokio::test]
async fn test_create_workout_rejects_invalid_requests() {
    let server = MockServer::start().await;
    let tokens = || Some(tokens_without_oauth1("good-token"));

    let cases = [
        json!({"workout_text": ""}),
        json!({"workout_text": "   "}),
        json!({"workout_name": "No text"}),
        json!({"workout_text": "30 min easy", "garmin_email": "runner@example.com"}),
        json!({"workout_text": "30 min easy", "garmin_password": "hunter2"}),
    ];
    for payload in cases {
        let response = AxumTestRequest::post("/create-workout")
            .json(&payload)
            .send(app(&server, tokens()))
            .await;
        assert_eq!(response.status(), 400, "payload {payload}");
        let body: Value = response.json();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "INVALID_INPUT");
    }

    let response = AxumTestRequest::post("/create-workout")
        .raw_json("{not json")
        .send(app(&server, tokens()))
        .await;
    assert_eq!(response.status(), 400);

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_workout_reports_garmin_throttling() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(WORKOUT_PATH))
        .respond_with(ResponseTemplate::new(429))
        .expect(2)
        .mount(&server)
        .await;

    let response = AxumTestRequest::post("/create-workout")
        .json(&json!({"workout_text": "30 min easy"}))
        .send(app(&server, Some(tokens_without_oauth1("good-token"))))
        .await;

    assert_eq!(response.status(), 429);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "EXTERNAL_RATE_LIMITED");
    assert_eq!(body["error"]["details"]["attempts"], 2);
}

#[tokio::test]
async fn test_create_workout_reports_garmin_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(WORKOUT_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let response = AxumTestRequest::post("/create-workout")
        .json(&json!({"workout_text": "30 min easy"}))
        .send(app(&server, Some(tokens_without_oauth1("good-token"))))
        .await;

    assert_eq!(response.status(), 502);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "EXTERNAL_SERVICE_ERROR");
    assert_eq!(body["error"]["details"]["garmin_status"], 500);
}

#[tokio::test]
async fn test_create_workout_rejects_oversized_body() {
    let server = MockServer::start().await;
    let workout_text = "a".repeat(defaults::MAX_BODY_BYTES + 1);

    let response = AxumTestRequest::post("/create-workout")
        .json(&json!({ "workout_text": workout_text }))
        .send(app(&server, Some(tokens_without_oauth1("good-token"))))
        .await;

    assert_eq!(response.status(), 413);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "PAYLOAD_TOO_LARGE");
    assert!(server.received_requests().await.unwrap().is_empty());
}
