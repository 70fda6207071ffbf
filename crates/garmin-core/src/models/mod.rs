// ABOUTME: Core data models for Garmin tokens and workouts
// ABOUTME: Re-exports OAuth token types and the Garmin workout wire format
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Data Models
//!
//! - `OAuth1Token`, `OAuth2Token`, `GarminTokens`: credentials issued by Garmin
//! - `TokenFile`: the `tokens.json` backup layout
//! - `Workout` and its steps: the JSON accepted by Garmin's workout service

mod tokens;
mod workout;

pub use tokens::{GarminTokens, OAuth1Token, OAuth2Token, OAuthConsumer, TokenFile};
pub use workout::{
    DurationType, ExecutableStep, Intensity, RepeatStep, SportTypeRef, TargetType, Workout,
    WorkoutSegment, WorkoutStep,
};
