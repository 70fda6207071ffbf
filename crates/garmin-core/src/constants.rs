// ABOUTME: Constants for environment variables, Garmin endpoints and token lifetimes
// ABOUTME: Pure data constants organized by domain for the Garmin workout API
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Constants are grouped into logical domains rather than being in a single
//! flat list.

/// Environment variables holding Garmin tokens on the deployment platform
pub mod token_env {
    /// `OAuth2` access token (~1 hour)
    pub const ACCESS_TOKEN: &str = "GARMIN_OAUTH_ACCESS_TOKEN";
    /// `OAuth2` refresh token (~30 days)
    pub const REFRESH_TOKEN: &str = "GARMIN_OAUTH_REFRESH_TOKEN";
    /// `OAuth1` token (long-lived)
    pub const OAUTH1_TOKEN: &str = "GARMIN_OAUTH1_TOKEN";
    /// `OAuth1` token secret, paired with the `OAuth1` token
    pub const OAUTH1_TOKEN_SECRET: &str = "GARMIN_OAUTH1_TOKEN_SECRET";

    /// All four variables in the order they are printed
    pub const ALL: [&str; 4] = [ACCESS_TOKEN, REFRESH_TOKEN, OAUTH1_TOKEN, OAUTH1_TOKEN_SECRET];
}

/// Environment variables read by the server and the token helper
pub mod env_config {
    /// Bind host
    pub const HOST: &str = "HOST";
    /// Bind port (set by most hosting platforms)
    pub const PORT: &str = "PORT";
    /// Garmin domain (`garmin.com` or `garmin.cn`)
    pub const GARMIN_DOMAIN: &str = "GARMIN_DOMAIN";
    /// Optional `tokens.json` used when the token variables are absent
    pub const GARMIN_TOKENS_FILE: &str = "GARMIN_TOKENS_FILE";
    /// Optional `OAuth1` consumer key override
    pub const GARMIN_CONSUMER_KEY: &str = "GARMIN_CONSUMER_KEY";
    /// Optional `OAuth1` consumer secret override
    pub const GARMIN_CONSUMER_SECRET: &str = "GARMIN_CONSUMER_SECRET";
    /// Outbound HTTP request timeout
    pub const HTTP_CLIENT_TIMEOUT_SECS: &str = "HTTP_CLIENT_TIMEOUT_SECS";
    /// Outbound HTTP connect timeout
    pub const HTTP_CLIENT_CONNECT_TIMEOUT_SECS: &str = "HTTP_CLIENT_CONNECT_TIMEOUT_SECS";
    /// Inbound request timeout
    pub const REQUEST_TIMEOUT_SECS: &str = "REQUEST_TIMEOUT_SECS";
    /// Deployment environment
    pub const ENVIRONMENT: &str = "ENVIRONMENT";
    /// Log level
    pub const LOG_LEVEL: &str = "LOG_LEVEL";
    /// Email used by the token helper when not given on the command line
    pub const GARMIN_EMAIL: &str = "GARMIN_EMAIL";
    /// Password used by the token helper when not given on the command line
    pub const GARMIN_PASSWORD: &str = "GARMIN_PASSWORD";
}

/// Garmin Connect hosts, paths and client identities
pub mod garmin {
    /// Default Garmin domain
    pub const DEFAULT_DOMAIN: &str = "garmin.com";
    /// Where the mobile app's `OAuth1` consumer credentials are published
    pub const OAUTH_CONSUMER_URL: &str = "https://thegarth.s3.amazonaws.com/oauth_consumer.json";
    /// User agent for SSO pages
    pub const SSO_USER_AGENT: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 16_5 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Mobile/15E148";
    /// User agent for the `OAuth1` preauthorize and exchange calls
    pub const OAUTH_USER_AGENT: &str = "com.garmin.android.apps.connectmobile";
    /// User agent for Connect API calls
    pub const API_USER_AGENT: &str = "GCM-iOS-5.7.2.1";

    /// SSO embed page
    pub const SSO_EMBED_PATH: &str = "/sso/embed";
    /// SSO sign-in page
    pub const SSO_SIGNIN_PATH: &str = "/sso/signin";
    /// `OAuth1` preauthorization from an SSO ticket
    pub const PREAUTHORIZED_PATH: &str = "/oauth-service/oauth/preauthorized";
    /// `OAuth1` to `OAuth2` exchange
    pub const EXCHANGE_PATH: &str = "/oauth-service/oauth/exchange/user/2.0";
    /// Profile of the authenticated user
    pub const SOCIAL_PROFILE_PATH: &str = "/userprofile-service/socialProfile";
    /// Workout creation
    pub const WORKOUT_PATH: &str = "/workout-service/workout";
}

/// Token lifetimes
pub mod token_lifetimes {
    /// Refresh this many seconds before the access token expires
    pub const REFRESH_SKEW_SECS: i64 = 60;
}

/// Workout defaults
pub mod workout {
    /// Garmin sport type id for running
    pub const RUNNING_SPORT_TYPE_ID: u32 = 1;
    /// Duration used when a step has no recognizable time or distance
    pub const DEFAULT_STEP_SECONDS: u64 = 300;
    /// Prefix for generated workout names
    pub const DEFAULT_NAME_PREFIX: &str = "Run Workout";
}

/// Network defaults
pub mod defaults {
    /// Default bind host
    pub const HOST: &str = "0.0.0.0";
    /// Default HTTP port
    pub const HTTP_PORT: u16 = 8000;
    /// Default outbound request timeout
    pub const HTTP_CLIENT_TIMEOUT_SECS: u64 = 30;
    /// Default outbound connect timeout
    pub const HTTP_CLIENT_CONNECT_TIMEOUT_SECS: u64 = 10;
    /// Default inbound request timeout
    pub const REQUEST_TIMEOUT_SECS: u64 = 60;
    /// Maximum accepted request body
    pub const MAX_BODY_BYTES: usize = 64 * 1024;
    /// Default token file name
    pub const TOKENS_FILE: &str = "tokens.json";
}

/// Service identity
pub mod service_names {
    /// Name used in logs and the root endpoint
    pub const GARMIN_WORKOUT_API: &str = "garmin-workout-api";
    /// Human-readable service title
    pub const SERVICE_TITLE: &str = "Garmin Workout API";
}
