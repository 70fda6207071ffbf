// ABOUTME: Shared helpers for garmin-tokens output and interactive input
// ABOUTME: Display formatting and stdin prompts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub mod display;
pub mod prompt;
