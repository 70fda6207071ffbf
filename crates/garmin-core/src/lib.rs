// ABOUTME: Core types and constants for the Garmin workout API
// ABOUTME: Foundation crate with error handling, constants, token and workout models
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Garmin Core
//!
//! Foundation crate shared by the workout server and the token helper. The
//! types here are plain data with no network or runtime dependencies.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError` and `ErrorCode`
//! - **constants**: Environment variable names, Garmin hosts and token lifetimes
//! - **models**: OAuth token types and the Garmin workout wire format

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Token and workout data models
pub mod models;
