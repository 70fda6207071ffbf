// ABOUTME: Route module organization for the Garmin Workout API HTTP endpoints
// ABOUTME: Groups route definitions by domain with thin handlers over the service layer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! HTTP routes
//!
//! Each module exposes a `*Routes` struct whose `routes()` builds an axum
//! router for its domain; [`crate::server::build_router`] merges them.

/// Garmin token verification
pub mod auth;
/// Service description and health checks
pub mod health;
/// Workout creation
pub mod workouts;

pub use auth::{AuthRoutes, TestAuthResponse};
pub use health::HealthRoutes;
pub use workouts::{CreateWorkoutRequest, CreateWorkoutResponse, WorkoutRoutes};
