// ABOUTME: Workout text parsing into the Garmin Connect workout format
// ABOUTME: Re-exports the parser and its intermediate step representation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Natural-language parser
pub mod parser;

pub use parser::{build_steps, default_name, ParsedStep, StepDuration, WorkoutParser};
