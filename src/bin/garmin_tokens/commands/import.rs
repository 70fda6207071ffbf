// ABOUTME: garmin-tokens import - accepts tokens copied from a browser session
// ABOUTME: The workaround for two-factor accounts, which cannot log in with a password alone
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::helpers::display::{display_expiries, display_next_steps, display_saved, display_tokens};
use anyhow::Result;
use garmin_workout_api::tokens::{maintenance, store};
use std::path::Path;

/// Build tokens from the given values, then print and save them
///
/// In a browser logged into Garmin Connect, the tokens are in the site's
/// local storage (developer tools, Application tab).
pub fn run(
    access_token: &str,
    refresh_token: &str,
    oauth1: Option<(&str, &str)>,
    output: Option<&Path>,
) -> Result<()> {
    let tokens = maintenance::import_tokens(access_token, refresh_token, oauth1)?;

    display_tokens(&tokens);
    display_expiries(&tokens);

    if let Some(path) = output {
        store::save(path, &tokens)?;
        display_saved(path);
    }

    display_next_steps(tokens.env_pairs().len());
    Ok(())
}
