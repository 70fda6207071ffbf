// ABOUTME: Main library entry point for the Garmin Workout API
// ABOUTME: Token acquisition, workout text parsing and the HTTP service uploading workouts to Garmin
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Garmin Workout API
//!
//! Turns run workouts written in plain language into structured Garmin
//! Connect workouts.
//!
//! ## Features
//!
//! - **Token helper**: `garmin-tokens` logs into Garmin Connect and prints the
//!   `GARMIN_OAUTH_*` variables a deployment needs
//! - **Workout parser**: `10 min warmup, 5x(800m, 400m easy), 10 min cooldown`
//!   becomes warmup, repeat group and cooldown steps
//! - **HTTP service**: `garmin-workout-server` exposes `/create-workout` and
//!   `/test-auth`, refreshing the access token from the `OAuth1` token
//!
//! ## Example Usage
//!
//! ```rust
//! use garmin_workout_api::workout::WorkoutParser;
//!
//! let workout = WorkoutParser::parse("15 min easy, 20 min tempo", Some("Tuesday"));
//! assert_eq!(workout.workout_name, "Tuesday");
//! assert_eq!(workout.steps().len(), 2);
//! ```

/// Environment configuration
pub mod config;

/// Garmin SSO, `OAuth1` signing and Connect API client
pub mod garmin;

/// Structured logging setup
pub mod logging;

/// HTTP middleware
pub mod middleware;

/// HTTP route handlers
pub mod routes;

/// Server assembly and lifecycle
pub mod server;

/// Token sources, persistence and refresh
pub mod tokens;

/// Shared utilities
pub mod utils;

/// Workout text parsing
pub mod workout;

/// Unified error types
pub use garmin_core::errors;

/// Shared constants
pub use garmin_core::constants;

/// Token and workout models
pub use garmin_core::models;
