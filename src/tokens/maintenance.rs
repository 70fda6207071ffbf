// ABOUTME: Token maintenance behind the garmin-tokens helper
// ABOUTME: Imports browser tokens, refreshes a token file and checks a deployed service's /test-auth
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{env, store, TokenSource};
use crate::garmin::{GarminClient, GarminError};
use crate::logging::AppLogger;
use crate::utils::http_client::shared_client;
use garmin_core::constants::token_env;
use garmin_core::errors::{AppError, AppResult, ErrorCode};
use garmin_core::models::GarminTokens;
use serde_json::Value;
use std::path::Path;
use tracing::debug;

/// Build tokens from values copied out of a browser session
///
/// Follows the same rules as the environment variables: values are trimmed,
/// expiries are read from the JWTs and the `OAuth1` pair is all-or-nothing.
///
/// # Errors
///
/// Returns an error when either `OAuth2` token is blank or only half of the
/// `OAuth1` pair is given.
pub fn import_tokens(
    access_token: &str,
    refresh_token: &str,
    oauth1: Option<(&str, &str)>,
) -> AppResult<GarminTokens> {
    let (oauth1_token, oauth1_token_secret) = oauth1.unzip();
    env::from_lookup(|name| {
        match name {
            token_env::ACCESS_TOKEN => Some(access_token),
            token_env::REFRESH_TOKEN => Some(refresh_token),
            token_env::OAUTH1_TOKEN => oauth1_token,
            token_env::OAUTH1_TOKEN_SECRET => oauth1_token_secret,
            _ => None,
        }
        .map(str::to_owned)
    })?
    .ok_or_else(|| AppError::missing_field(token_env::ACCESS_TOKEN))
}

/// Exchange the `OAuth1` token stored at `path` for fresh `OAuth2` tokens
/// and rewrite the file
///
/// The file is left untouched when the exchange fails.
///
/// # Errors
///
/// Returns an error when the file cannot be read or written, holds no
/// `OAuth1` token, or Garmin rejects the exchange.
pub async fn refresh_file(client: &GarminClient, path: &Path) -> AppResult<GarminTokens> {
    let mut tokens = store::load(path)?;
    let source = TokenSource::File(path.to_path_buf()).to_string();

    let Some(oauth1) = tokens.oauth1.as_ref() else {
        AppLogger::log_token_refresh(&source, false, Some("no OAuth1 token"));
        return Err(GarminError::MissingOAuth1.into());
    };

    match client.exchange(oauth1).await {
        Ok(oauth2) => {
            AppLogger::log_token_refresh(&source, true, None);
            tokens.oauth2 = oauth2;
        }
        Err(e) => {
            AppLogger::log_token_refresh(&source, false, Some(&e.to_string()));
            return Err(e.into());
        }
    }

    store::save(path, &tokens)?;
    Ok(tokens)
}

/// What a deployed service reported from `/test-auth`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthCheck {
    /// HTTP status of the response
    pub status: u16,
    /// The `success` field
    pub success: bool,
    /// Top-level or error message
    pub message: Option<String>,
    /// Suggested fix from the error envelope
    pub remedy: Option<String>,
}

/// `<base_url>/test-auth`
#[must_use]
pub fn test_auth_endpoint(base_url: &str) -> String {
    format!("{}/test-auth", base_url.trim_end_matches('/'))
}

/// Call a deployed service's `/test-auth` and read its answer
///
/// # Errors
///
/// Returns an error when the service cannot be reached or does not answer
/// with JSON.
pub async fn check_service(base_url: &str) -> AppResult<AuthCheck> {
    let endpoint = test_auth_endpoint(base_url);
    debug!("Checking {endpoint}");

    let response = shared_client().get(&endpoint).send().await.map_err(|e| {
        AppError::new(
            ErrorCode::ExternalServiceUnavailable,
            format!("Could not reach {endpoint}: {e}"),
        )
        .with_source(e)
    })?;
    let status = response.status().as_u16();
    let body: Value = response.json().await.map_err(|e| {
        AppError::new(
            ErrorCode::ExternalServiceError,
            format!("{endpoint} did not return JSON (HTTP {status})"),
        )
        .with_source(e)
    })?;

    let error = body.get("error");
    let text = |value: Option<&Value>, key: &str| {
        value
            .and_then(|v| v.get(key))
            .and_then(Value::as_str)
            .map(str::to_owned)
    };

    Ok(AuthCheck {
        status,
        success: body.get("success").and_then(Value::as_bool) == Some(true),
        message: text(error, "message").or_else(|| text(Some(&body), "message")),
        remedy: text(error, "remedy"),
    })
}
