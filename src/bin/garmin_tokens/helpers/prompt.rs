// ABOUTME: Interactive stdin prompts for the Garmin email and password
// ABOUTME: Trims input and rejects empty answers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use anyhow::{bail, Context, Result};
use std::io::{self, BufRead, Write};

/// Print `label` and read one trimmed, non-empty line
pub fn prompt(label: &str) -> Result<String> {
    print!("{label}: ");
    io::stdout().flush().context("Failed to flush stdout")?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read from stdin")?;

    let value = line.trim().to_owned();
    if value.is_empty() {
        bail!("{label} is required");
    }
    Ok(value)
}

/// Use `value` when given, otherwise prompt
pub fn value_or_prompt(value: Option<String>, label: &str) -> Result<String> {
    match value.map(|v| v.trim().to_owned()).filter(|v| !v.is_empty()) {
        Some(value) => Ok(value),
        None => prompt(label),
    }
}
