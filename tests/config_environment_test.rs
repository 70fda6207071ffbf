// ABOUTME: Unit tests for config environment functionality
// ABOUTME: Validates config environment behavior, edge cases, and error handling
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use garmin_workout_api::config::environment::{
    Environment, GarminConfig, LogLevel, ServerConfig,
};
use garmin_workout_api::logging::LoggingConfig;
use serial_test::serial;
use std::env;
use std::path::PathBuf;

const CONFIG_VARS: [&str; 10] = [
    "HOST",
    "PORT",
    "LOG_LEVEL",
    "ENVIRONMENT",
    "CORS_ORIGINS",
    "GARMIN_DOMAIN",
    "GARMIN_CONSUMER_KEY",
    "GARMIN_CONSUMER_SECRET",
    "GARMIN_TOKENS_FILE",
    "REQUEST_TIMEOUT_SECS",
];

fn clear_config_env() {
    for name in CONFIG_VARS {
        env::remove_var(name);
    }
}

// Tests for public configuration types

#[test]
fn test_log_level_parsing() {
    assert_eq!(LogLevel::from_str_or_default("error"), LogLevel::Error);
    assert_eq!(LogLevel::from_str_or_default("WARN"), LogLevel::Warn);
    assert_eq!(LogLevel::from_str_or_default("info"), LogLevel::Info);
    assert_eq!(LogLevel::from_str_or_default("Debug"), LogLevel::Debug);
    assert_eq!(LogLevel::from_str_or_default("trace"), LogLevel::Trace);
    assert_eq!(LogLevel::from_str_or_default("invalid"), LogLevel::Info); // Default fallback
    assert_eq!(LogLevel::Warn.to_tracing_level(), tracing::Level::WARN);
    assert_eq!(LogLevel::Trace.to_tracing_level(), tracing::Level::TRACE);
}

#[test]
fn test_environment_parsing() {
    assert_eq!(
        Environment::from_str_or_default("production"),
        Environment::Production
    );
    assert_eq!(
        Environment::from_str_or_default("PROD"),
        Environment::Production
    );
    assert_eq!(
        Environment::from_str_or_default("test"),
        Environment::Testing
    );
    assert_eq!(
        Environment::from_str_or_default("invalid"),
        Environment::Development
    ); // Default fallback
    assert!(Environment::Production.is_production());
    assert!(!Environment::Development.is_production());
}

#[test]
fn test_garmin_endpoints_for_domain() {
    let config = GarminConfig::for_domain("garmin.cn");
    assert_eq!(config.sso_base_url, "https://sso.garmin.cn");
    assert_eq!(config.api_base_url, "https://connectapi.garmin.cn");
    assert_eq!(config.sso_embed_url(), "https://sso.garmin.cn/sso/embed");
    assert!(config.consumer.is_none());

    let default = GarminConfig::default();
    assert_eq!(default.domain, "garmin.com");
}

#[test]
fn test_defaults() {
    let config = ServerConfig::default();
    assert_eq!(config.bind_address(), "0.0.0.0:8000");
    assert_eq!(config.cors_origins, vec!["*"]);
    assert!(config.tokens_file.is_none());
}

#[test]
#[serial]
fn test_from_env_defaults() {
    clear_config_env();

    let config = ServerConfig::from_env().unwrap();
    assert_eq!(config.host, "0.0.0.0");
    assert_eq!(config.http_port, 8000);
    assert_eq!(config.log_level, LogLevel::Info);
    assert_eq!(config.environment, Environment::Development);
    assert_eq!(config.garmin.domain, "garmin.com");
    assert!(config.garmin.consumer.is_none());
}

#[test]
#[serial]
fn test_from_env_overrides() {
    clear_config_env();
    env::set_var("HOST", "127.0.0.1");
    env::set_var("PORT", "9090");
    env::set_var("LOG_LEVEL", "debug");
    env::set_var("ENVIRONMENT", "production");
    env::set_var("CORS_ORIGINS", "https://a.example, https://b.example,");
    env::set_var("GARMIN_DOMAIN", "garmin.cn");
    env::set_var("GARMIN_TOKENS_FILE", "/data/tokens.json");

    let config = ServerConfig::from_env().unwrap();
    clear_config_env();

    assert_eq!(config.bind_address(), "127.0.0.1:9090");
    assert_eq!(config.log_level, LogLevel::Debug);
    assert!(config.environment.is_production());
    assert_eq!(
        config.cors_origins,
        vec!["https://a.example", "https://b.example"]
    );
    assert_eq!(config.garmin.api_base_url, "https://connectapi.garmin.cn");
    assert_eq!(config.tokens_file, Some(PathBuf::from("/data/tokens.json")));
}

#[test]
#[serial]
fn test_consumer_override_needs_both_parts() {
    clear_config_env();
    env::set_var("GARMIN_CONSUMER_KEY", "key");
    assert!(GarminConfig::from_env().consumer.is_none());

    env::set_var("GARMIN_CONSUMER_SECRET", "secret");
    let consumer = GarminConfig::from_env().consumer.unwrap();
    clear_config_env();

    assert_eq!(consumer.consumer_key, "key");
    assert_eq!(consumer.consumer_secret, "secret");
}

#[test]
#[serial]
fn test_invalid_port_rejected() {
    clear_config_env();
    env::set_var("PORT", "not-a-port");
    let result = ServerConfig::from_env();
    clear_config_env();

    let err = result.unwrap_err();
    assert!(err.to_string().contains("PORT"));
}

#[test]
fn test_summary_hides_consumer_secret() {
    let mut config = ServerConfig::default();
    config.garmin.consumer = Some(garmin_workout_api::models::OAuthConsumer {
        consumer_key: "visible-key".into(),
        consumer_secret: "very-secret".into(),
    });

    let summary = config.summary();
    assert!(summary.contains("Consumer Override: Enabled"));
    assert!(!summary.contains("very-secret"));
}

#[test]
#[serial]
fn test_server_logging_follows_config_unless_rust_log_set() {
    clear_config_env();
    env::remove_var("RUST_LOG");

    let mut config = ServerConfig::default();
    config.log_level = LogLevel::Debug;
    config.environment = Environment::Production;

    let logging = LoggingConfig::for_server(&config);
    assert_eq!(logging.level, "debug");
    assert_eq!(logging.environment, "production");
    assert!(logging.include_location);

    env::set_var("RUST_LOG", "warn,garmin_workout_api=trace");
    let logging = LoggingConfig::for_server(&config);
    env::remove_var("RUST_LOG");
    assert_eq!(logging.level, "warn,garmin_workout_api=trace");
}
