// ABOUTME: Garmin token sources: environment variables, tokens.json and the refreshing manager
// ABOUTME: Shared by the HTTP server and the garmin-tokens helper
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Environment variable import and export
pub mod env;
/// JWT expiry claim
pub mod jwt;
/// Import, file refresh and deployment checks for the token helper
pub mod maintenance;
/// Refreshing token holder for the server
pub mod manager;
/// `tokens.json` persistence
pub mod store;

pub use manager::{TokenManager, TokenSource, TokenStatus};
