// ABOUTME: garmin-tokens refresh - exchanges the stored OAuth1 token for fresh OAuth2 tokens
// ABOUTME: Rewrites tokens.json and prints the updated variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::helpers::display::{display_expiries, display_next_steps, display_saved, display_tokens};
use anyhow::{Context, Result};
use garmin_workout_api::garmin::GarminClient;
use garmin_workout_api::tokens::maintenance;
use std::path::Path;

/// Refresh the tokens stored at `input`
pub async fn run(client: &GarminClient, input: &Path) -> Result<()> {
    println!("Exchanging OAuth1 token for fresh OAuth2 tokens...");
    let tokens = match maintenance::refresh_file(client, input).await {
        Ok(tokens) => tokens,
        Err(e) => {
            if let Some(remedy) = e.remedy.as_deref() {
                println!("Suggested fix: {remedy}");
            }
            return Err(e).context("Token refresh failed");
        }
    };

    display_tokens(&tokens);
    display_expiries(&tokens);
    display_saved(input);
    display_next_steps(tokens.env_pairs().len());
    Ok(())
}
