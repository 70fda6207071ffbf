// ABOUTME: Garmin Connect client: SSO login, OAuth1 preauthorization and OAuth2 exchange
// ABOUTME: Authenticated Connect API calls with 429 backoff and 401 token-expiry mapping
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::errors::GarminError;
use super::oauth1::OAuth1Signer;
use super::sso::{self, truncate};
use crate::config::GarminConfig;
use crate::utils::http_client::{shared_client, sso_client};
use chrono::{Duration as ChronoDuration, Utc};
use garmin_core::constants::garmin;
use garmin_core::models::{GarminTokens, OAuth1Token, OAuth2Token, OAuthConsumer, Workout};
use reqwest::{header, Client, Method, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};
use url::Url;

/// Configuration for retry behavior
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts for a throttled request
    pub max_retries: u32,
    /// Initial backoff delay in milliseconds, doubled per retry
    pub initial_backoff_ms: u64,
    /// HTTP status codes that should trigger retries
    pub retryable_status_codes: Vec<StatusCode>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff_ms: 1000,
            retryable_status_codes: vec![StatusCode::TOO_MANY_REQUESTS],
        }
    }
}

/// Token endpoint response for the `OAuth1` to `OAuth2` exchange
#[derive(Debug, Deserialize)]
struct ExchangeResponse {
    access_token: String,
    refresh_token: String,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    scope: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    refresh_token_expires_in: Option<i64>,
}

impl ExchangeResponse {
    fn into_token(self) -> OAuth2Token {
        let now = Utc::now();
        OAuth2Token {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            token_type: self.token_type.unwrap_or_else(|| "Bearer".to_owned()),
            scope: self.scope,
            expires_at: self.expires_in.map(|s| now + ChronoDuration::seconds(s)),
            refresh_token_expires_at: self
                .refresh_token_expires_in
                .map(|s| now + ChronoDuration::seconds(s)),
        }
    }
}

/// Subset of the social profile used to confirm authentication
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialProfile {
    /// Public display name
    #[serde(default)]
    pub display_name: Option<String>,
    /// Full name
    #[serde(default)]
    pub full_name: Option<String>,
    /// Garmin user name
    #[serde(default)]
    pub user_name: Option<String>,
}

/// Result of a workout upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedWorkout {
    /// Id assigned by Garmin
    pub workout_id: Option<i64>,
    /// Full response body
    pub response: serde_json::Value,
}

/// Garmin Connect client
pub struct GarminClient {
    config: GarminConfig,
    http: Client,
    consumer: OnceCell<OAuthConsumer>,
    retry: RetryConfig,
}

impl GarminClient {
    /// Create a client using the shared HTTP connection pool
    #[must_use]
    pub fn new(config: GarminConfig) -> Self {
        Self::with_http_client(config, shared_client().clone())
    }

    /// Create a client with a specific HTTP client
    #[must_use]
    pub fn with_http_client(config: GarminConfig, http: Client) -> Self {
        let consumer = OnceCell::new_with(config.consumer.clone());
        Self {
            config,
            http,
            consumer,
            retry: RetryConfig::default(),
        }
    }

    /// Override retry behavior
    #[must_use]
    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Endpoint configuration
    #[must_use]
    pub const fn config(&self) -> &GarminConfig {
        &self.config
    }

    /// The `OAuth1` consumer, downloaded once when not configured
    ///
    /// # Errors
    ///
    /// Returns an error if the consumer document cannot be fetched or parsed
    pub async fn consumer(&self) -> Result<&OAuthConsumer, GarminError> {
        self.consumer
            .get_or_try_init(|| async {
                debug!("Fetching Garmin OAuth consumer from {}", self.config.consumer_url);
                let response = self.http.get(&self.config.consumer_url).send().await?;
                let status = response.status();
                if !status.is_success() {
                    let body = response.text().await.unwrap_or_default();
                    return Err(GarminError::Http {
                        status: status.as_u16(),
                        body: truncate(&body),
                    });
                }
                response.json::<OAuthConsumer>().await.map_err(|e| {
                    GarminError::UnexpectedResponse(format!("invalid OAuth consumer: {e}"))
                })
            })
            .await
    }

    /// Log in with email and password and obtain the full token set
    ///
    /// # Errors
    ///
    /// Returns [`GarminError::TwoFactorRequired`] for accounts with two-factor
    /// enabled, [`GarminError::InvalidCredentials`] for rejected credentials,
    /// [`GarminError::ClientSetup`] when no cookie-carrying client can be
    /// built, and transport errors otherwise.
    pub async fn login(&self, email: &str, password: &str) -> Result<GarminTokens, GarminError> {
        let sso = sso_client(garmin::SSO_USER_AGENT).map_err(GarminError::ClientSetup)?;
        let ticket = sso::signin(&sso, &self.config, email, password).await?;
        debug!("Received Garmin SSO ticket");

        let oauth1 = self.preauthorize(&ticket).await?;
        info!("OAuth1 token retrieved");

        let oauth2 = self.exchange(&oauth1).await?;
        info!("OAuth2 tokens retrieved");

        Ok(GarminTokens {
            oauth1: Some(oauth1),
            oauth2,
        })
    }

    fn api_url(&self, path: &str) -> Result<Url, GarminError> {
        let joined = format!(
            "{}/{}",
            self.config.api_base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&joined)
            .map_err(|e| GarminError::UnexpectedResponse(format!("invalid URL {joined}: {e}")))
    }

    /// Trade an SSO ticket for an `OAuth1` token
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response lacks the token pair
    pub async fn preauthorize(&self, ticket: &str) -> Result<OAuth1Token, GarminError> {
        let consumer = self.consumer().await?;
        let mut url = self.api_url(garmin::PREAUTHORIZED_PATH)?;
        url.query_pairs_mut()
            .append_pair("ticket", ticket)
            .append_pair("login-url", &self.config.sso_embed_url())
            .append_pair("accepts-mfa-tokens", "true");

        let authorization = OAuth1Signer::new(consumer).authorization_header("GET", &url, &[]);
        let response = self
            .http
            .get(url)
            .header(header::AUTHORIZATION, authorization)
            .header(header::USER_AGENT, garmin::OAUTH_USER_AGENT)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(status_error(status, &body));
        }
        parse_oauth1_response(&body)
    }

    /// Exchange an `OAuth1` token for a fresh `OAuth2` pair
    ///
    /// This is also how access tokens are refreshed: the `OAuth1` token
    /// outlives many `OAuth2` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`GarminError::TokenExpired`] when the `OAuth1` token is rejected
    pub async fn exchange(&self, oauth1: &OAuth1Token) -> Result<OAuth2Token, GarminError> {
        let consumer = self.consumer().await?;
        let url = self.api_url(garmin::EXCHANGE_PATH)?;

        let form: Vec<(&str, &str)> = oauth1
            .mfa_token
            .as_deref()
            .map(|mfa| vec![("mfa_token", mfa)])
            .unwrap_or_default();

        let authorization =
            OAuth1Signer::with_token(consumer, oauth1).authorization_header("POST", &url, &form);
        let response = self
            .http
            .post(url)
            .header(header::AUTHORIZATION, authorization)
            .header(header::USER_AGENT, garmin::OAUTH_USER_AGENT)
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }

        let exchange: ExchangeResponse = response.json().await.map_err(|e| {
            GarminError::UnexpectedResponse(format!("invalid token exchange response: {e}"))
        })?;
        Ok(exchange.into_token())
    }

    /// Authenticated Connect API call with backoff on throttling
    ///
    /// # Errors
    ///
    /// Returns [`GarminError::TokenExpired`] on 401, [`GarminError::RateLimited`]
    /// when retries are exhausted, and [`GarminError::Http`] for other failures.
    pub async fn api_request(
        &self,
        method: Method,
        path: &str,
        access_token: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<serde_json::Value, GarminError> {
        let url = self.api_url(path)?;
        let mut attempt = 0;

        loop {
            let mut request = self
                .http
                .request(method.clone(), url.clone())
                .bearer_auth(access_token)
                .header(header::USER_AGENT, garmin::API_USER_AGENT);
            if let Some(body) = body {
                request = request.json(body);
            }

            let response = request.send().await?;
            let status = response.status();
            debug!("Garmin {method} {path} returned {status}");

            if self.retry.retryable_status_codes.contains(&status) {
                attempt += 1;
                if attempt >= self.retry.max_retries {
                    warn!(
                        "Garmin API rate limit exceeded - max retries ({}) reached",
                        self.retry.max_retries
                    );
                    return Err(GarminError::RateLimited { attempts: attempt });
                }
                let backoff_ms = self.retry.initial_backoff_ms * 2_u64.pow(attempt - 1);
                warn!(
                    "Garmin API rate limit hit ({}) - retry {attempt}/{} after {backoff_ms}ms backoff",
                    status.as_u16(),
                    self.retry.max_retries
                );
                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                continue;
            }

            let bytes = response.bytes().await?;
            if !status.is_success() {
                return Err(status_error(status, &String::from_utf8_lossy(&bytes)));
            }
            if bytes.is_empty() {
                return Ok(serde_json::Value::Null);
            }
            return serde_json::from_slice(&bytes).map_err(|e| {
                GarminError::UnexpectedResponse(format!("invalid JSON from {path}: {e}"))
            });
        }
    }

    /// GET a Connect API path
    ///
    /// # Errors
    ///
    /// See [`GarminClient::api_request`]
    pub async fn get_json(
        &self,
        path: &str,
        access_token: &str,
    ) -> Result<serde_json::Value, GarminError> {
        self.api_request(Method::GET, path, access_token, None).await
    }

    /// POST JSON to a Connect API path
    ///
    /// # Errors
    ///
    /// See [`GarminClient::api_request`]
    pub async fn post_json(
        &self,
        path: &str,
        access_token: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, GarminError> {
        self.api_request(Method::POST, path, access_token, Some(body))
            .await
    }

    /// Fetch the authenticated user's profile
    ///
    /// # Errors
    ///
    /// See [`GarminClient::api_request`]
    pub async fn social_profile(&self, access_token: &str) -> Result<SocialProfile, GarminError> {
        let value = self
            .get_json(garmin::SOCIAL_PROFILE_PATH, access_token)
            .await?;
        serde_json::from_value(value)
            .map_err(|e| GarminError::UnexpectedResponse(format!("invalid profile: {e}")))
    }

    /// Upload a workout
    ///
    /// # Errors
    ///
    /// See [`GarminClient::api_request`]
    pub async fn create_workout(
        &self,
        workout: &Workout,
        access_token: &str,
    ) -> Result<CreatedWorkout, GarminError> {
        let body = serde_json::to_value(workout)
            .map_err(|e| GarminError::UnexpectedResponse(format!("unserializable workout: {e}")))?;
        let response = self
            .post_json(garmin::WORKOUT_PATH, access_token, &body)
            .await?;
        Ok(CreatedWorkout {
            workout_id: response.get("workoutId").and_then(serde_json::Value::as_i64),
            response,
        })
    }
}

fn status_error(status: StatusCode, body: &str) -> GarminError {
    match status {
        StatusCode::UNAUTHORIZED => GarminError::TokenExpired,
        StatusCode::TOO_MANY_REQUESTS => GarminError::RateLimited { attempts: 1 },
        _ => GarminError::Http {
            status: status.as_u16(),
            body: truncate(body),
        },
    }
}

/// Parse the form-encoded preauthorize response
///
/// # Errors
///
/// Returns an error if either half of the token pair is missing
pub fn parse_oauth1_response(body: &str) -> Result<OAuth1Token, GarminError> {
    let mut token = None;
    let mut secret = None;
    let mut mfa_token = None;

    for (key, value) in url::form_urlencoded::parse(body.trim().as_bytes()) {
        match key.as_ref() {
            "oauth_token" => token = Some(value.into_owned()),
            "oauth_token_secret" => secret = Some(value.into_owned()),
            "mfa_token" => mfa_token = Some(value.into_owned()),
            _ => {}
        }
    }

    match (token, secret) {
        (Some(oauth_token), Some(oauth_token_secret)) => Ok(OAuth1Token {
            oauth_token,
            oauth_token_secret,
            mfa_token,
        }),
        _ => Err(GarminError::UnexpectedResponse(
            "preauthorize response lacks oauth_token/oauth_token_secret".into(),
        )),
    }
}
