// ABOUTME: Holds the server's Garmin tokens and refreshes the OAuth2 pair from the OAuth1 token
// ABOUTME: Refreshes proactively near expiry and retries a call once after a 401
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{env, store};
use crate::garmin::{GarminClient, GarminError};
use crate::logging::AppLogger;
use chrono::{DateTime, Duration, Utc};
use garmin_core::constants::token_lifetimes::REFRESH_SKEW_SECS;
use garmin_core::errors::{AppError, AppResult};
use garmin_core::models::GarminTokens;
use serde::Serialize;
use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Where the managed tokens came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenSource {
    /// The `GARMIN_OAUTH_*` environment variables
    Environment,
    /// A `tokens.json` file, rewritten after each refresh
    File(PathBuf),
    /// Supplied directly (tests, embedding)
    Provided,
}

impl fmt::Display for TokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Environment => write!(f, "environment"),
            Self::File(path) => write!(f, "file:{}", path.display()),
            Self::Provided => write!(f, "provided"),
        }
    }
}

/// Snapshot of the managed tokens, without secrets
#[derive(Debug, Clone, Serialize)]
pub struct TokenStatus {
    /// Token source
    pub source: String,
    /// Whether an `OAuth1` token is available for refreshing
    pub has_oauth1: bool,
    /// Access token expiry when known
    pub expires_at: Option<DateTime<Utc>>,
    /// Refresh token expiry when known
    pub refresh_token_expires_at: Option<DateTime<Utc>>,
    /// Last successful refresh by this process
    pub last_refreshed_at: Option<DateTime<Utc>>,
}

struct ManagedTokens {
    tokens: GarminTokens,
    source: TokenSource,
    last_refreshed_at: Option<DateTime<Utc>>,
}

/// Server-side token holder
pub struct TokenManager {
    client: Arc<GarminClient>,
    state: RwLock<Option<ManagedTokens>>,
    skew: Duration,
}

impl TokenManager {
    /// Manager with optional initial tokens
    #[must_use]
    pub fn new(client: Arc<GarminClient>, tokens: Option<(GarminTokens, TokenSource)>) -> Self {
        Self {
            client,
            state: RwLock::new(tokens.map(|(tokens, source)| ManagedTokens {
                tokens,
                source,
                last_refreshed_at: None,
            })),
            skew: Duration::seconds(REFRESH_SKEW_SECS),
        }
    }

    /// Load tokens from the environment, falling back to `tokens_file`
    ///
    /// A manager without tokens is still returned so the server can start and
    /// answer `/test-auth` with a configuration error.
    ///
    /// # Errors
    ///
    /// Returns an error when the environment holds a partial token set or the
    /// token file exists but is invalid.
    pub fn from_sources(client: Arc<GarminClient>, tokens_file: Option<&Path>) -> AppResult<Self> {
        if let Some(tokens) = env::from_env()? {
            info!("Using Garmin tokens from environment variables");
            return Ok(Self::new(client, Some((tokens, TokenSource::Environment))));
        }

        if let Some(path) = tokens_file {
            if path.exists() {
                let tokens = store::load(path)?;
                info!("Using Garmin tokens from {}", path.display());
                return Ok(Self::new(
                    client,
                    Some((tokens, TokenSource::File(path.to_path_buf()))),
                ));
            }
            warn!("Token file {} does not exist", path.display());
        }

        warn!("No Garmin tokens configured; only per-request credentials will work");
        Ok(Self::new(client, None))
    }

    /// The Garmin client used for refreshes
    #[must_use]
    pub fn client(&self) -> &GarminClient {
        &self.client
    }

    /// Whether any tokens are loaded
    pub async fn is_configured(&self) -> bool {
        self.state.read().await.is_some()
    }

    /// Current status, `None` when unconfigured
    pub async fn status(&self) -> Option<TokenStatus> {
        self.state.read().await.as_ref().map(|managed| TokenStatus {
            source: managed.source.to_string(),
            has_oauth1: managed.tokens.oauth1.is_some(),
            expires_at: managed.tokens.oauth2.expires_at,
            refresh_token_expires_at: managed.tokens.oauth2.refresh_token_expires_at,
            last_refreshed_at: managed.last_refreshed_at,
        })
    }

    /// A usable access token, refreshed first when it is about to expire
    ///
    /// # Errors
    ///
    /// Returns an auth-required error when no tokens are configured.
    pub async fn access_token(&self) -> AppResult<String> {
        let (token, due) = {
            let guard = self.state.read().await;
            let managed = guard.as_ref().ok_or_else(not_configured)?;
            let oauth2 = &managed.tokens.oauth2;
            (
                oauth2.access_token.clone(),
                managed.tokens.oauth1.is_some() && oauth2.expires_within(Utc::now(), self.skew),
            )
        };

        if !due {
            return Ok(token);
        }

        debug!("Access token expires within {}s, refreshing", self.skew.num_seconds());
        match self.refresh_stale(&token).await {
            Ok(fresh) => Ok(fresh),
            Err(e) => {
                warn!("Proactive token refresh failed, using current token: {e}");
                Ok(token)
            }
        }
    }

    /// Force an `OAuth2` refresh
    ///
    /// # Errors
    ///
    /// Returns an error when unconfigured, when no `OAuth1` token is available,
    /// or when Garmin rejects the exchange.
    pub async fn refresh(&self) -> AppResult<String> {
        let current = self.current_access_token().await?;
        self.refresh_stale(&current).await
    }

    /// Run `call` with an access token, refreshing and retrying once if Garmin
    /// answers 401
    ///
    /// # Errors
    ///
    /// Returns the call's error, or the refresh error when the retry could
    /// not be attempted.
    pub async fn authorized<T, F, Fut>(&self, call: F) -> AppResult<T>
    where
        F: Fn(String) -> Fut,
        Fut: Future<Output = Result<T, GarminError>>,
    {
        let token = self.access_token().await?;
        match call(token.clone()).await {
            Err(GarminError::TokenExpired) => {
                info!("Garmin rejected the access token, refreshing and retrying");
                let fresh = self.refresh_stale(&token).await?;
                call(fresh).await.map_err(AppError::from)
            }
            other => other.map_err(AppError::from),
        }
    }

    async fn current_access_token(&self) -> AppResult<String> {
        self.state
            .read()
            .await
            .as_ref()
            .map(|managed| managed.tokens.oauth2.access_token.clone())
            .ok_or_else(not_configured)
    }

    /// Refresh unless another task already replaced `stale`
    async fn refresh_stale(&self, stale: &str) -> AppResult<String> {
        let mut guard = self.state.write().await;
        let managed = guard.as_mut().ok_or_else(not_configured)?;

        if managed.tokens.oauth2.access_token != stale {
            debug!("Access token already refreshed by another request");
            return Ok(managed.tokens.oauth2.access_token.clone());
        }

        let source = managed.source.to_string();
        let Some(oauth1) = managed.tokens.oauth1.as_ref() else {
            AppLogger::log_token_refresh(&source, false, Some("no OAuth1 token"));
            return Err(GarminError::MissingOAuth1.into());
        };

        let oauth2 = match self.client.exchange(oauth1).await {
            Ok(oauth2) => oauth2,
            Err(e) => {
                AppLogger::log_token_refresh(&source, false, Some(&e.to_string()));
                return Err(e.into());
            }
        };

        managed.tokens.oauth2 = oauth2;
        managed.last_refreshed_at = Some(Utc::now());
        AppLogger::log_token_refresh(&source, true, None);

        if let TokenSource::File(path) = &managed.source {
            if let Err(e) = store::save(path, &managed.tokens) {
                warn!("Refreshed tokens could not be written back: {e}");
            }
        }

        Ok(managed.tokens.oauth2.access_token.clone())
    }
}

fn not_configured() -> AppError {
    AppError::auth_required("No Garmin tokens configured").with_remedy(
        "Run `garmin-tokens login` and set the GARMIN_OAUTH_* environment variables, \
         or pass garmin_email and garmin_password with the request",
    )
}
