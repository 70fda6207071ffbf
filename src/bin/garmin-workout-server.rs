// ABOUTME: Garmin Workout API server binary
// ABOUTME: Loads environment configuration and tokens, then serves the workout endpoints
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Garmin Workout API Server Binary
//!
//! Reads configuration from the environment (see `ServerConfig::from_env`),
//! loads Garmin tokens from the `GARMIN_OAUTH_*` variables or a token file,
//! and serves `/`, `/health`, `/test-auth` and `/create-workout`.

use anyhow::Result;
use clap::Parser;
use garmin_workout_api::{
    config::ServerConfig,
    logging,
    server::{self, ServerResources},
};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "garmin-workout-server")]
#[command(about = "Garmin Workout API - create Garmin Connect workouts from plain text")]
pub struct Args {
    /// Override bind host
    #[arg(long)]
    host: Option<String>,

    /// Override HTTP port
    #[arg(long)]
    port: Option<u16>,

    /// Token file used when the token variables are absent
    #[arg(long)]
    tokens_file: Option<PathBuf>,
}

fn display_available_endpoints(config: &ServerConfig) {
    let base = format!("http://{}", config.bind_address());
    info!("=== Available API Endpoints ===");
    info!("   Service info:    GET  {base}/");
    info!("   Health check:    GET  {base}/health");
    info!("   Token check:     GET  {base}/test-auth");
    info!("   Create workout:  POST {base}/create-workout");
    info!("=== End of Endpoint List ===");
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut config = ServerConfig::from_env()?;
    logging::init_for_server(&config)?;

    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.http_port = port;
    }
    if args.tokens_file.is_some() {
        config.tokens_file = args.tokens_file;
    }

    info!("{}", config.summary());
    display_available_endpoints(&config);

    let resources = ServerResources::from_config(config)?;
    if let Err(e) = server::run(resources).await {
        error!("Server error: {e:#}");
        return Err(e);
    }
    Ok(())
}
