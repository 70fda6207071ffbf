// ABOUTME: Reads Garmin tokens from the four deployment environment variables
// ABOUTME: Renders tokens back into NAME=value lines for pasting into a hosting dashboard
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::jwt;
use garmin_core::constants::token_env;
use garmin_core::errors::{AppError, AppResult};
use garmin_core::models::{GarminTokens, OAuth1Token, OAuth2Token};
use std::env;

/// Read tokens through an arbitrary lookup
///
/// Returns `Ok(None)` when neither `OAuth2` variable is set. Blank values
/// count as unset.
///
/// # Errors
///
/// Returns an error when only one of a required pair is present.
pub fn from_lookup<F>(lookup: F) -> AppResult<Option<GarminTokens>>
where
    F: Fn(&str) -> Option<String>,
{
    let read = |name: &str| lookup(name).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());

    let access = read(token_env::ACCESS_TOKEN);
    let refresh = read(token_env::REFRESH_TOKEN);
    let (access_token, refresh_token) = match (access, refresh) {
        (None, None) => return Ok(None),
        (Some(access), Some(refresh)) => (access, refresh),
        (None, Some(_)) => return Err(AppError::missing_field(token_env::ACCESS_TOKEN)),
        (Some(_), None) => return Err(AppError::missing_field(token_env::REFRESH_TOKEN)),
    };

    let oauth1 = match (
        read(token_env::OAUTH1_TOKEN),
        read(token_env::OAUTH1_TOKEN_SECRET),
    ) {
        (Some(oauth_token), Some(oauth_token_secret)) => Some(OAuth1Token {
            oauth_token,
            oauth_token_secret,
            mfa_token: None,
        }),
        (None, None) => None,
        _ => {
            return Err(AppError::invalid_input(format!(
                "{} and {} must be set together",
                token_env::OAUTH1_TOKEN,
                token_env::OAUTH1_TOKEN_SECRET
            )))
        }
    };

    let mut oauth2 = OAuth2Token::from_strings(access_token, refresh_token);
    oauth2.expires_at = jwt::expiry(&oauth2.access_token);
    oauth2.refresh_token_expires_at = jwt::expiry(&oauth2.refresh_token);

    Ok(Some(GarminTokens { oauth1, oauth2 }))
}

/// Read tokens from the process environment
///
/// # Errors
///
/// See [`from_lookup`]
pub fn from_env() -> AppResult<Option<GarminTokens>> {
    from_lookup(|name| env::var(name).ok())
}

/// `NAME=value` lines in deployment order
#[must_use]
pub fn export_lines(tokens: &GarminTokens) -> Vec<String> {
    tokens
        .env_pairs()
        .into_iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect()
}
