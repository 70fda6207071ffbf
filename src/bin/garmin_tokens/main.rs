// ABOUTME: garmin-tokens - command-line helper for obtaining and managing Garmin Connect tokens
// ABOUTME: Logs in, imports browser tokens, refreshes, shows and verifies deployment tokens
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//!
//! Usage:
//! ```bash
//! # Log in and print the four GARMIN_OAUTH_* variables
//! garmin-tokens login
//!
//! # Two-factor accounts: import tokens copied from a browser session
//! garmin-tokens import --access-token ... --refresh-token ...
//!
//! # Exchange the OAuth1 token in tokens.json for fresh OAuth2 tokens
//! garmin-tokens refresh
//!
//! # Print the stored variables
//! garmin-tokens show
//!
//! # Check a deployed service
//! garmin-tokens verify --url https://my-service.example.com
//! ```

mod commands;
mod helpers;

use clap::{Parser, Subcommand};
use garmin_workout_api::config::{GarminConfig, LogLevel};
use garmin_workout_api::constants::{defaults, env_config, garmin};
use garmin_workout_api::garmin::GarminClient;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

#[derive(Parser)]
#[command(
    name = "garmin-tokens",
    version,
    about = "Garmin Connect token helper",
    long_about = "Obtain Garmin Connect OAuth tokens for the workout API and manage the tokens.json backup."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Garmin domain (garmin.com or garmin.cn)
    #[arg(long, global = true, env = env_config::GARMIN_DOMAIN, default_value = garmin::DEFAULT_DOMAIN)]
    domain: String,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// Log in with email and password and print the deployment variables
    Login {
        /// Garmin Connect email (prompted when omitted)
        #[arg(long, env = env_config::GARMIN_EMAIL)]
        email: Option<String>,

        /// Garmin Connect password (prompted when omitted)
        #[arg(long, env = env_config::GARMIN_PASSWORD, hide_env_values = true)]
        password: Option<String>,

        /// Where to save the backup
        #[arg(long, short = 'o', default_value = defaults::TOKENS_FILE)]
        output: PathBuf,

        /// Print the variables without writing a file
        #[arg(long)]
        no_save: bool,
    },

    /// Import tokens copied from a logged-in browser session (two-factor accounts)
    Import {
        /// `OAuth2` access token
        #[arg(long)]
        access_token: String,

        /// `OAuth2` refresh token
        #[arg(long)]
        refresh_token: String,

        /// `OAuth1` token
        #[arg(long, requires = "oauth1_token_secret")]
        oauth1_token: Option<String>,

        /// `OAuth1` token secret
        #[arg(long, requires = "oauth1_token")]
        oauth1_token_secret: Option<String>,

        /// Where to save the backup
        #[arg(long, short = 'o', default_value = defaults::TOKENS_FILE)]
        output: PathBuf,

        /// Print the variables without writing a file
        #[arg(long)]
        no_save: bool,
    },

    /// Exchange the stored `OAuth1` token for fresh `OAuth2` tokens
    Refresh {
        /// Token file to read and rewrite
        #[arg(long, short = 'i', default_value = defaults::TOKENS_FILE)]
        input: PathBuf,
    },

    /// Print the stored variables and known expiries
    Show {
        /// Token file to read
        #[arg(long, short = 'i', default_value = defaults::TOKENS_FILE)]
        input: PathBuf,
    },

    /// Call a deployed service's /test-auth endpoint
    Verify {
        /// Base URL of the service
        #[arg(long)]
        url: String,
    },
}

fn init_logging(verbose: bool) -> anyhow::Result<()> {
    let level = if verbose { LogLevel::Debug } else { LogLevel::Warn };
    // Logs go to stderr so stdout carries only the variables and messages
    tracing_subscriber::fmt()
        .with_max_level(level.to_tracing_level())
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {e}"))
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    debug!("Using Garmin domain {}", cli.domain);
    let mut config = GarminConfig::for_domain(&cli.domain);
    config.consumer = GarminConfig::from_env().consumer;
    let client = GarminClient::new(config);

    match cli.command {
        Command::Login {
            email,
            password,
            output,
            no_save,
        } => {
            let output = (!no_save).then_some(output);
            commands::login::run(&client, email, password, output.as_deref()).await
        }
        Command::Import {
            access_token,
            refresh_token,
            oauth1_token,
            oauth1_token_secret,
            output,
            no_save,
        } => {
            let output = (!no_save).then_some(output);
            commands::import::run(
                &access_token,
                &refresh_token,
                oauth1_token.as_deref().zip(oauth1_token_secret.as_deref()),
                output.as_deref(),
            )
        }
        Command::Refresh { input } => commands::refresh::run(&client, &input).await,
        Command::Show { input } => commands::show::run(&input),
        Command::Verify { url } => commands::verify::run(&url).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = init_logging(cli.verbose) {
        eprintln!("Error: {e:#}");
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\nError: {e:#}");
            ExitCode::FAILURE
        }
    }
}
