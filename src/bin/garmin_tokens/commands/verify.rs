// ABOUTME: garmin-tokens verify - checks a deployed service's /test-auth endpoint
// ABOUTME: Reports whether the service's Garmin tokens currently work
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use anyhow::{bail, Result};
use garmin_workout_api::tokens::maintenance;

/// GET `<url>/test-auth` and report the `success` field
pub async fn run(url: &str) -> Result<()> {
    println!("Checking {}...", maintenance::test_auth_endpoint(url));
    let check = maintenance::check_service(url).await?;

    if check.success {
        println!("Authentication working (HTTP {})", check.status);
        return Ok(());
    }

    if let Some(message) = check.message.as_deref() {
        println!("Service reported: {message}");
    }
    if let Some(remedy) = check.remedy.as_deref() {
        println!("Suggested fix: {remedy}");
    }
    bail!("Authentication check failed (HTTP {})", check.status)
}
