// ABOUTME: Configuration management module for server and Garmin client settings
// ABOUTME: Environment-only configuration: no config files are read at runtime
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration module
//!
//! - **Environment**: Server, HTTP client and Garmin endpoint configuration
//!   read from environment variables

/// Environment and server configuration
pub mod environment;

pub use environment::{Environment, GarminConfig, HttpClientConfig, LogLevel, ServerConfig};
