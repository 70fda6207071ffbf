// ABOUTME: Shared test helpers and utilities for integration tests
// ABOUTME: Exports the axum request helper and Garmin mock server fixtures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(dead_code)]

pub mod axum_test;
pub mod garmin_mock;
