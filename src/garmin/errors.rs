// ABOUTME: Structured error types for Garmin SSO, OAuth and Connect API operations
// ABOUTME: Each failure carries the human remedy and maps into the unified AppError
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use garmin_core::errors::{AppError, ErrorCode};
use thiserror::Error;

/// Failures talking to Garmin
#[derive(Debug, Error)]
pub enum GarminError {
    /// Garmin rejected the email or password
    #[error("Garmin rejected the email or password (page title: {title})")]
    InvalidCredentials {
        /// Title of the SSO response page
        title: String,
    },

    /// The account has two-factor authentication enabled
    #[error("Garmin requested a two-factor code, which this client cannot supply")]
    TwoFactorRequired,

    /// Garmin locked the account or asked for verification
    #[error("Garmin account is locked or requires verification (page title: {title})")]
    AccountLocked {
        /// Title of the SSO response page
        title: String,
    },

    /// The access token was rejected
    #[error("Garmin rejected the access token (HTTP 401)")]
    TokenExpired,

    /// No `OAuth1` token is available to refresh the access token
    #[error("No OAuth1 token available to refresh the access token")]
    MissingOAuth1,

    /// Garmin throttled the request
    #[error("Garmin rate limit exceeded after {attempts} attempts")]
    RateLimited {
        /// Attempts made before giving up
        attempts: u32,
    },

    /// Any other non-success status
    #[error("Garmin returned HTTP {status}: {body}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Response body, truncated
        body: String,
    },

    /// The request timed out
    #[error("Request to Garmin timed out")]
    Timeout(#[source] reqwest::Error),

    /// Garmin could not be reached
    #[error("Could not reach Garmin: {0}")]
    Network(#[source] reqwest::Error),

    /// The per-login HTTP client could not be built
    #[error("Could not build the Garmin SSO HTTP client: {0}")]
    ClientSetup(#[source] reqwest::Error),

    /// A response did not have the expected shape
    #[error("Unexpected response from Garmin: {0}")]
    UnexpectedResponse(String),
}

impl GarminError {
    /// What the user should do about this failure
    #[must_use]
    pub const fn remedy(&self) -> &'static str {
        match self {
            Self::InvalidCredentials { .. } => {
                "Verify your Garmin Connect email and password"
            }
            Self::TwoFactorRequired => {
                "Temporarily disable two-factor authentication, or copy the tokens from the \
                 local storage of a browser session logged into Garmin Connect and run \
                 `garmin-tokens import`"
            }
            Self::AccountLocked { .. } => {
                "Log into Garmin Connect in a browser to unlock or verify the account"
            }
            Self::TokenExpired | Self::MissingOAuth1 => {
                "Tokens expired: run `garmin-tokens login` and update the GARMIN_OAUTH_* \
                 environment variables"
            }
            Self::RateLimited { .. } => "Wait a few minutes before retrying",
            Self::Http { .. } | Self::UnexpectedResponse(_) => {
                "Retry later; if the problem persists, regenerate the tokens"
            }
            Self::Timeout(_) | Self::Network(_) => "Check your internet connection and retry",
            Self::ClientSetup(_) => "Check the TLS configuration of this machine and retry",
        }
    }

    /// The error code this failure maps to
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::InvalidCredentials { .. } => ErrorCode::AuthInvalid,
            Self::TwoFactorRequired => ErrorCode::TwoFactorRequired,
            Self::AccountLocked { .. } => ErrorCode::AccountLocked,
            Self::TokenExpired | Self::MissingOAuth1 => ErrorCode::AuthExpired,
            Self::RateLimited { .. } => ErrorCode::ExternalRateLimited,
            Self::Http { .. } | Self::UnexpectedResponse(_) => ErrorCode::ExternalServiceError,
            Self::Timeout(_) => ErrorCode::ExternalTimeout,
            Self::Network(_) => ErrorCode::ExternalServiceUnavailable,
            Self::ClientSetup(_) => ErrorCode::InternalError,
        }
    }

    /// Classify a transport error
    #[must_use]
    pub fn from_transport(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout(error)
        } else {
            Self::Network(error)
        }
    }
}

impl From<reqwest::Error> for GarminError {
    fn from(error: reqwest::Error) -> Self {
        Self::from_transport(error)
    }
}

impl From<GarminError> for AppError {
    fn from(error: GarminError) -> Self {
        let code = error.error_code();
        let remedy = error.remedy();
        let message = error.to_string();
        let details = match &error {
            GarminError::RateLimited { attempts } => serde_json::json!({ "attempts": attempts }),
            GarminError::Http { status, .. } => serde_json::json!({ "garmin_status": status }),
            _ => serde_json::Value::Null,
        };
        Self::new(code, message)
            .with_remedy(remedy)
            .with_details(details)
            .with_source(error)
    }
}
