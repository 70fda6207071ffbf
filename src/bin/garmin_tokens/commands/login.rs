// ABOUTME: garmin-tokens login - email/password login producing the deployment variables
// ABOUTME: Prompts for missing credentials, prints the variables and saves tokens.json
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::helpers::display::{
    display_banner, display_login_failure, display_next_steps, display_saved, display_tokens,
};
use crate::helpers::prompt::value_or_prompt;
use anyhow::{Context, Result};
use garmin_workout_api::garmin::GarminClient;
use garmin_workout_api::logging::AppLogger;
use garmin_workout_api::tokens::store;
use std::path::Path;
use zeroize::Zeroize;

/// Log in and print/save the resulting tokens
pub async fn run(
    client: &GarminClient,
    email: Option<String>,
    password: Option<String>,
    output: Option<&Path>,
) -> Result<()> {
    display_banner();

    let email = value_or_prompt(email, "Garmin Connect Email")?;
    let mut password = value_or_prompt(password, "Garmin Connect Password")?;

    println!("\nAuthenticating with Garmin...");
    let result = client.login(&email, &password).await;
    password.zeroize();

    let tokens = match result {
        Ok(tokens) => {
            AppLogger::log_login_event(&email, true, None);
            tokens
        }
        Err(e) => {
            AppLogger::log_login_event(&email, false, Some(&e.to_string()));
            display_login_failure(&e);
            return Err(e).context("Garmin login failed");
        }
    };

    println!("Login successful!");
    println!("OAuth2 tokens retrieved");
    if tokens.oauth1.is_some() {
        println!("OAuth1 tokens retrieved");
    }

    display_tokens(&tokens);

    if let Some(path) = output {
        println!("\nSaving tokens to {} for backup...", path.display());
        store::save(path, &tokens)?;
        display_saved(path);
    }

    display_next_steps(tokens.env_pairs().len());
    Ok(())
}
