// ABOUTME: OAuth1 and OAuth2 token models issued by Garmin Connect
// ABOUTME: Includes the tokens.json backup layout keyed by deployment variable names
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::token_env;
use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// `OAuth1` consumer credentials used to sign preauthorize and exchange calls
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthConsumer {
    /// Consumer key
    pub consumer_key: String,
    /// Consumer secret
    pub consumer_secret: String,
}

/// Long-lived `OAuth1` token pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuth1Token {
    /// `OAuth1` token
    pub oauth_token: String,
    /// `OAuth1` token secret
    pub oauth_token_secret: String,
    /// MFA token returned alongside the pair when the login used two-factor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mfa_token: Option<String>,
}

/// Short-lived `OAuth2` bearer token with its refresh token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuth2Token {
    /// Bearer access token (~1 hour)
    pub access_token: String,
    /// Refresh token (~30 days)
    pub refresh_token: String,
    /// Token type, normally `Bearer`
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Granted scopes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    /// Access token expiry, unknown for tokens pasted from the environment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    /// Refresh token expiry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token_expires_at: Option<DateTime<Utc>>,
}

fn default_token_type() -> String {
    "Bearer".to_owned()
}

impl OAuth2Token {
    /// Build a token from bare strings with unknown expiry
    #[must_use]
    pub fn from_strings(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            token_type: default_token_type(),
            scope: None,
            expires_at: None,
            refresh_token_expires_at: None,
        }
    }

    /// Whether the access token expires within `skew` of `now`
    ///
    /// Tokens with unknown expiry are never considered expired; a 401 from
    /// Garmin is the only signal for those.
    #[must_use]
    pub fn expires_within(&self, now: DateTime<Utc>, skew: Duration) -> bool {
        self.expires_at.is_some_and(|at| at - skew <= now)
    }

    /// Whether the refresh token is known to be expired
    #[must_use]
    pub fn refresh_expired(&self, now: DateTime<Utc>) -> bool {
        self.refresh_token_expires_at.is_some_and(|at| at <= now)
    }
}

/// The full credential set for one Garmin account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GarminTokens {
    /// `OAuth1` pair, required for refreshing the access token
    pub oauth1: Option<OAuth1Token>,
    /// `OAuth2` pair used for API calls
    pub oauth2: OAuth2Token,
}

impl GarminTokens {
    /// The deployment variables as `(name, value)` pairs, `OAuth1` last
    #[must_use]
    pub fn env_pairs(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = vec![
            (token_env::ACCESS_TOKEN, self.oauth2.access_token.as_str()),
            (token_env::REFRESH_TOKEN, self.oauth2.refresh_token.as_str()),
        ];
        if let Some(oauth1) = &self.oauth1 {
            pairs.push((token_env::OAUTH1_TOKEN, oauth1.oauth_token.as_str()));
            pairs.push((
                token_env::OAUTH1_TOKEN_SECRET,
                oauth1.oauth_token_secret.as_str(),
            ));
        }
        pairs
    }
}

/// Layout of `tokens.json`
///
/// The four token fields are keyed by their environment variable names so the
/// file can be pasted into a deployment dashboard as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenFile {
    /// `OAuth2` access token
    #[serde(rename = "GARMIN_OAUTH_ACCESS_TOKEN")]
    pub access_token: String,
    /// `OAuth2` refresh token
    #[serde(rename = "GARMIN_OAUTH_REFRESH_TOKEN")]
    pub refresh_token: String,
    /// `OAuth1` token
    #[serde(
        rename = "GARMIN_OAUTH1_TOKEN",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub oauth1_token: Option<String>,
    /// `OAuth1` token secret
    #[serde(
        rename = "GARMIN_OAUTH1_TOKEN_SECRET",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub oauth1_token_secret: Option<String>,
    /// Access token expiry when known
    #[serde(
        rename = "GARMIN_OAUTH_EXPIRES_AT",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub expires_at: Option<DateTime<Utc>>,
    /// Refresh token expiry when known
    #[serde(
        rename = "GARMIN_OAUTH_REFRESH_EXPIRES_AT",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub refresh_expires_at: Option<DateTime<Utc>>,
    /// When the file was written
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

impl TokenFile {
    /// Snapshot tokens for writing
    #[must_use]
    pub fn from_tokens(tokens: &GarminTokens, saved_at: DateTime<Utc>) -> Self {
        Self {
            access_token: tokens.oauth2.access_token.clone(),
            refresh_token: tokens.oauth2.refresh_token.clone(),
            oauth1_token: tokens.oauth1.as_ref().map(|t| t.oauth_token.clone()),
            oauth1_token_secret: tokens.oauth1.as_ref().map(|t| t.oauth_token_secret.clone()),
            expires_at: tokens.oauth2.expires_at,
            refresh_expires_at: tokens.oauth2.refresh_token_expires_at,
            saved_at: Some(saved_at),
        }
    }

    /// Convert back into tokens
    ///
    /// Values are trimmed and blank values count as absent, the same as for
    /// the environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error when a required token is blank or only half of the
    /// `OAuth1` pair is present.
    pub fn into_tokens(self) -> AppResult<GarminTokens> {
        let access_token = non_blank(Some(self.access_token))
            .ok_or_else(|| AppError::missing_field(token_env::ACCESS_TOKEN))?;
        let refresh_token = non_blank(Some(self.refresh_token))
            .ok_or_else(|| AppError::missing_field(token_env::REFRESH_TOKEN))?;

        let oauth1 = match (non_blank(self.oauth1_token), non_blank(self.oauth1_token_secret)) {
            (Some(oauth_token), Some(oauth_token_secret)) => Some(OAuth1Token {
                oauth_token,
                oauth_token_secret,
                mfa_token: None,
            }),
            (None, None) => None,
            _ => {
                return Err(AppError::invalid_input(format!(
                    "{} and {} must be provided together",
                    token_env::OAUTH1_TOKEN,
                    token_env::OAUTH1_TOKEN_SECRET
                )))
            }
        };

        Ok(GarminTokens {
            oauth1,
            oauth2: OAuth2Token {
                access_token,
                refresh_token,
                token_type: default_token_type(),
                scope: None,
                expires_at: self.expires_at,
                refresh_token_expires_at: self.refresh_expires_at,
            },
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}
