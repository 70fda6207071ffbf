// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Parses host, port, Garmin endpoints and timeouts from environment variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based configuration management for production deployment

use anyhow::{Context, Result};
use garmin_core::constants::{defaults, env_config, garmin};
use garmin_core::models::OAuthConsumer;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use tracing::info;

/// Strongly typed log level configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Errors only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational (default)
    #[default]
    Info,
    /// Debug output
    Debug,
    /// Everything
    Trace,
}

impl LogLevel {
    /// Convert to `tracing::Level`
    #[must_use]
    pub const fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Error => tracing::Level::ERROR,
            Self::Warn => tracing::Level::WARN,
            Self::Info => tracing::Level::INFO,
            Self::Debug => tracing::Level::DEBUG,
            Self::Trace => tracing::Level::TRACE,
        }
    }

    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "error" => Self::Error,
            "warn" => Self::Warn,
            "debug" => Self::Debug,
            "trace" => Self::Trace,
            _ => Self::Info,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warn => write!(f, "warn"),
            Self::Info => write!(f, "info"),
            Self::Debug => write!(f, "debug"),
            Self::Trace => write!(f, "trace"),
        }
    }
}

/// Deployment environment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Test runs
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Garmin endpoints and `OAuth1` consumer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GarminConfig {
    /// Garmin domain (`garmin.com`, `garmin.cn`)
    pub domain: String,
    /// SSO base URL, e.g. `https://sso.garmin.com`
    pub sso_base_url: String,
    /// Connect API base URL, e.g. `https://connectapi.garmin.com`
    pub api_base_url: String,
    /// Where to download the consumer when none is configured
    pub consumer_url: String,
    /// Consumer override
    #[serde(skip_serializing)]
    pub consumer: Option<OAuthConsumer>,
}

impl GarminConfig {
    /// Standard endpoints for a Garmin domain
    #[must_use]
    pub fn for_domain(domain: &str) -> Self {
        Self {
            domain: domain.to_owned(),
            sso_base_url: format!("https://sso.{domain}"),
            api_base_url: format!("https://connectapi.{domain}"),
            consumer_url: garmin::OAUTH_CONSUMER_URL.to_owned(),
            consumer: None,
        }
    }

    /// Read the domain and consumer override from the environment
    #[must_use]
    pub fn from_env() -> Self {
        let domain =
            env::var(env_config::GARMIN_DOMAIN).unwrap_or_else(|_| garmin::DEFAULT_DOMAIN.into());
        let mut config = Self::for_domain(&domain);

        if let (Ok(consumer_key), Ok(consumer_secret)) = (
            env::var(env_config::GARMIN_CONSUMER_KEY),
            env::var(env_config::GARMIN_CONSUMER_SECRET),
        ) {
            config.consumer = Some(OAuthConsumer {
                consumer_key,
                consumer_secret,
            });
        }
        config
    }

    /// Full URL of the SSO embed page, used as `service` and `login-url`
    #[must_use]
    pub fn sso_embed_url(&self) -> String {
        format!("{}{}", self.sso_base_url, garmin::SSO_EMBED_PATH)
    }
}

impl Default for GarminConfig {
    fn default() -> Self {
        Self::for_domain(garmin::DEFAULT_DOMAIN)
    }
}

/// Outbound HTTP client timeouts
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HttpClientConfig {
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Connect timeout in seconds
    pub connect_timeout_secs: u64,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: defaults::HTTP_CLIENT_TIMEOUT_SECS,
            connect_timeout_secs: defaults::HTTP_CLIENT_CONNECT_TIMEOUT_SECS,
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind host
    pub host: String,
    /// HTTP port
    pub http_port: u16,
    /// Log level
    pub log_level: LogLevel,
    /// Deployment environment
    pub environment: Environment,
    /// Allowed CORS origins, `*` for any
    pub cors_origins: Vec<String>,
    /// Inbound request timeout in seconds
    pub request_timeout_secs: u64,
    /// Outbound client timeouts
    pub http_client: HttpClientConfig,
    /// Garmin endpoints
    pub garmin: GarminConfig,
    /// Token file read when the token variables are absent
    pub tokens_file: Option<PathBuf>,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable cannot be parsed
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        Ok(Self {
            host: env_var_or(env_config::HOST, defaults::HOST),
            http_port: env_var_or(env_config::PORT, &defaults::HTTP_PORT.to_string())
                .parse()
                .context("Invalid PORT value")?,
            log_level: LogLevel::from_str_or_default(&env_var_or(env_config::LOG_LEVEL, "info")),
            environment: Environment::from_str_or_default(&env_var_or(
                env_config::ENVIRONMENT,
                "development",
            )),
            cors_origins: parse_origins(&env_var_or("CORS_ORIGINS", "*")),
            request_timeout_secs: env_var_or(
                env_config::REQUEST_TIMEOUT_SECS,
                &defaults::REQUEST_TIMEOUT_SECS.to_string(),
            )
            .parse()
            .context("Invalid REQUEST_TIMEOUT_SECS value")?,
            http_client: HttpClientConfig {
                timeout_secs: env_var_or(
                    env_config::HTTP_CLIENT_TIMEOUT_SECS,
                    &defaults::HTTP_CLIENT_TIMEOUT_SECS.to_string(),
                )
                .parse()
                .context("Invalid HTTP_CLIENT_TIMEOUT_SECS value")?,
                connect_timeout_secs: env_var_or(
                    env_config::HTTP_CLIENT_CONNECT_TIMEOUT_SECS,
                    &defaults::HTTP_CLIENT_CONNECT_TIMEOUT_SECS.to_string(),
                )
                .parse()
                .context("Invalid HTTP_CLIENT_CONNECT_TIMEOUT_SECS value")?,
            },
            garmin: GarminConfig::from_env(),
            tokens_file: env::var(env_config::GARMIN_TOKENS_FILE)
                .ok()
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
        })
    }

    /// Socket address string to bind
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.http_port)
    }

    /// Get a summary of the configuration for logging (no secrets)
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Garmin Workout API Configuration:\n\
             - Bind: {}\n\
             - Environment: {}\n\
             - Log Level: {}\n\
             - Garmin Domain: {}\n\
             - Consumer Override: {}\n\
             - Token File: {}\n\
             - CORS Origins: {}",
            self.bind_address(),
            self.environment,
            self.log_level,
            self.garmin.domain,
            if self.garmin.consumer.is_some() {
                "Enabled"
            } else {
                "Disabled"
            },
            self.tokens_file
                .as_ref()
                .map_or_else(|| "None".to_owned(), |p| p.display().to_string()),
            self.cors_origins.join(", "),
        )
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: defaults::HOST.to_owned(),
            http_port: defaults::HTTP_PORT,
            log_level: LogLevel::Info,
            environment: Environment::Development,
            cors_origins: vec!["*".to_owned()],
            request_timeout_secs: defaults::REQUEST_TIMEOUT_SECS,
            http_client: HttpClientConfig::default(),
            garmin: GarminConfig::default(),
            tokens_file: None,
        }
    }
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Parse comma-separated CORS origins
fn parse_origins(origins_str: &str) -> Vec<String> {
    if origins_str.trim() == "*" {
        vec!["*".to_owned()]
    } else {
        origins_str
            .split(',')
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect()
    }
}
