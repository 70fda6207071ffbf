// ABOUTME: Loads and saves the tokens.json backup written by the token helper
// ABOUTME: Writes pretty-printed JSON with owner-only permissions on Unix
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::Utc;
use garmin_core::errors::{AppError, AppResult};
use garmin_core::models::{GarminTokens, TokenFile};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Read `tokens.json`
///
/// # Errors
///
/// Returns a storage error if the file cannot be read and a serialization
/// error if it is not a valid token file.
pub fn load(path: &Path) -> AppResult<GarminTokens> {
    let contents = fs::read_to_string(path).map_err(|e| {
        AppError::storage(format!("Cannot read {}: {e}", path.display())).with_source(e)
    })?;
    let file: TokenFile = serde_json::from_str(&contents)?;
    debug!("Loaded tokens from {}", path.display());
    file.into_tokens()
}

/// Read the raw file including its metadata
///
/// # Errors
///
/// See [`load`]
pub fn load_file(path: &Path) -> AppResult<TokenFile> {
    let contents = fs::read_to_string(path).map_err(|e| {
        AppError::storage(format!("Cannot read {}: {e}", path.display())).with_source(e)
    })?;
    Ok(serde_json::from_str(&contents)?)
}

/// Write `tokens.json`, replacing any existing file
///
/// # Errors
///
/// Returns a storage error if the file cannot be written.
pub fn save(path: &Path, tokens: &GarminTokens) -> AppResult<()> {
    let file = TokenFile::from_tokens(tokens, Utc::now());
    let mut json = serde_json::to_string_pretty(&file)?;
    json.push('\n');

    write_private(path, json.as_bytes()).map_err(|e| {
        AppError::storage(format!("Cannot write {}: {e}", path.display())).with_source(e)
    })?;
    debug!("Saved tokens to {}", path.display());
    Ok(())
}

#[cfg(unix)]
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // mode() only applies on creation
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    file.write_all(contents)
}

#[cfg(not(unix))]
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    fs::write(path, contents)
}
