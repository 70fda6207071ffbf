// ABOUTME: Output formatting helpers for garmin-tokens
// ABOUTME: Banners, deployment variables, next steps and failure explanations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use garmin_workout_api::garmin::GarminError;
use garmin_workout_api::models::GarminTokens;
use garmin_workout_api::tokens::env::export_lines;
use std::path::Path;

const RULE_WIDTH: usize = 60;

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

/// Opening banner for the login flow
pub fn display_banner() {
    println!("{}", rule());
    println!("Garmin OAuth Token Generator");
    println!("{}", rule());
    println!("\nThis will log into your Garmin account and generate OAuth tokens");
    println!("You'll need to enter your Garmin Connect email and password\n");
}

/// The four variables with instructions
pub fn display_tokens(tokens: &GarminTokens) {
    println!("\n{}", rule());
    println!("SUCCESS! Copy these tokens to your deployment:");
    println!("{}", rule());
    println!("\nOpen your hosting dashboard, then your service's environment variables");
    println!("Add these {} environment variables:\n", tokens.env_pairs().len());

    for line in export_lines(tokens) {
        println!("{line}");
    }

    if tokens.oauth1.is_none() {
        println!("\nNo OAuth1 token: the server cannot refresh the access token on its own.");
    }
    println!("\n{}", rule());
}

/// Expiry lines for tokens whose lifetime is known
pub fn display_expiries(tokens: &GarminTokens) {
    let show = |label: &str, at: Option<DateTime<Utc>>| match at {
        Some(at) if at <= Utc::now() => {
            println!("   {label}: expired {}", at.format("%Y-%m-%d %H:%M UTC"));
        }
        Some(at) => println!("   {label}: expires {}", at.format("%Y-%m-%d %H:%M UTC")),
        None => println!("   {label}: expiry unknown"),
    };
    println!("\nToken lifetimes:");
    show("Access token", tokens.oauth2.expires_at);
    show("Refresh token", tokens.oauth2.refresh_token_expires_at);
}

/// Confirmation after writing the backup file
pub fn display_saved(path: &Path) {
    println!("Tokens saved to {}", path.display());
    println!("\nWARNING: Keep {} private! Don't commit it to git!", path.display());
}

/// What to do with the printed variables
pub fn display_next_steps(count: usize) {
    println!("\nNext steps:");
    println!("1. Copy the {count} environment variables above");
    println!("2. Open your hosting dashboard");
    println!("3. Navigate to your service's variables");
    println!("4. Update each variable with the new values");
    println!("5. Redeploy the service so it picks up the fresh tokens");
}

/// Explain a failed login
pub fn display_login_failure(error: &GarminError) {
    println!("\nAuthentication failed: {error}");
    println!("\nPossible reasons:");
    println!("- Wrong email or password");
    println!("- Two-factor authentication enabled (try disabling temporarily)");
    println!("- Garmin account locked or requires verification");
    println!("\nSuggested fix: {}", error.remedy());
}
