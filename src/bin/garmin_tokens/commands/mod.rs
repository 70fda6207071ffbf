// ABOUTME: Subcommand implementations for garmin-tokens
// ABOUTME: One module per subcommand: login, import, refresh, show, verify
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub mod import;
pub mod login;
pub mod refresh;
pub mod show;
pub mod verify;
