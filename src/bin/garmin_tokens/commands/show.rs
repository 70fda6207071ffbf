// ABOUTME: garmin-tokens show - prints the variables stored in tokens.json
// ABOUTME: Includes known expiries and when the file was written
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::helpers::display::{display_expiries, display_tokens};
use anyhow::Result;
use garmin_workout_api::tokens::store;
use std::path::Path;

/// Print the tokens stored at `input`
pub fn run(input: &Path) -> Result<()> {
    let file = store::load_file(input)?;
    let saved_at = file.saved_at;
    let tokens = file.into_tokens()?;

    display_tokens(&tokens);
    display_expiries(&tokens);
    if let Some(saved_at) = saved_at {
        println!("\nSaved {}", saved_at.format("%Y-%m-%d %H:%M UTC"));
    }
    Ok(())
}
