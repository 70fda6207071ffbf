// ABOUTME: Shared HTTP client with connection pooling for Garmin API calls
// ABOUTME: Singleton with configurable timeouts plus per-login cookie-store clients
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use garmin_core::constants::defaults;
use reqwest::{Client, ClientBuilder};
use std::sync::OnceLock;
use std::time::Duration;

/// Configured timeout values for the shared client
static CLIENT_TIMEOUTS: OnceLock<(u64, u64)> = OnceLock::new();

/// Global shared HTTP client with configured timeouts
static SHARED_CLIENT: OnceLock<Client> = OnceLock::new();

/// Initialize the shared HTTP client timeout configuration
///
/// Must be called once at startup before the first call to [`shared_client`].
/// If not called, defaults are used (30s timeout, 10s connect timeout).
pub fn initialize_shared_client(timeout_secs: u64, connect_timeout_secs: u64) {
    let _ = CLIENT_TIMEOUTS.set((timeout_secs, connect_timeout_secs));
}

fn configured_timeouts() -> (u64, u64) {
    CLIENT_TIMEOUTS.get().copied().unwrap_or((
        defaults::HTTP_CLIENT_TIMEOUT_SECS,
        defaults::HTTP_CLIENT_CONNECT_TIMEOUT_SECS,
    ))
}

/// Get the shared HTTP client for Connect API calls
pub fn shared_client() -> &'static Client {
    SHARED_CLIENT.get_or_init(|| {
        let (timeout, connect_timeout) = configured_timeouts();
        ClientBuilder::new()
            .timeout(Duration::from_secs(timeout))
            .connect_timeout(Duration::from_secs(connect_timeout))
            .build()
            .unwrap_or_else(|_| Client::new())
    })
}

/// Create a client with its own cookie jar for one SSO login
///
/// SSO sessions are carried in cookies, so every login gets a fresh jar that
/// is dropped with the client once the tokens are issued.
///
/// # Errors
///
/// Returns the builder error when the TLS backend cannot be initialized.
pub fn sso_client(user_agent: &str) -> reqwest::Result<Client> {
    let (timeout, connect_timeout) = configured_timeouts();
    ClientBuilder::new()
        .cookie_store(true)
        .user_agent(user_agent)
        .timeout(Duration::from_secs(timeout))
        .connect_timeout(Duration::from_secs(connect_timeout))
        .build()
}
