// ABOUTME: Garmin Connect integration: SSO login, OAuth1 signing and the Connect API client
// ABOUTME: Exposes GarminClient and the GarminError taxonomy used by the server and CLI
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Garmin Connect
//!
//! Garmin has no public OAuth application flow for personal use, so tokens are
//! obtained the way the mobile app does it: an SSO login yields a ticket, the
//! ticket is traded for a long-lived `OAuth1` token, and the `OAuth1` token is
//! exchanged for short-lived `OAuth2` bearer tokens whenever needed.

/// Connect API client
pub mod client;
/// Error taxonomy
pub mod errors;
/// `OAuth1` request signing
pub mod oauth1;
/// SSO sign-in flow
pub mod sso;

pub use client::{CreatedWorkout, GarminClient, RetryConfig, SocialProfile};
pub use errors::GarminError;
