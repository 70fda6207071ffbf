// ABOUTME: HTTP server assembly: shared resources, router with middleware layers, graceful shutdown
// ABOUTME: Wires the Garmin client and token manager into the workout API routes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Server
//!
//! [`ServerResources`] holds everything handlers share; [`build_router`]
//! applies the middleware stack and [`run`] serves until Ctrl-C or SIGTERM.

use crate::config::ServerConfig;
use crate::garmin::GarminClient;
use crate::middleware::{create_request_span, setup_cors, MakePrefixedRequestId};
use crate::routes::{AuthRoutes, HealthRoutes, WorkoutRoutes};
use crate::tokens::TokenManager;
use crate::utils::http_client::initialize_shared_client;
use anyhow::{Context, Result};
use axum::{body::Body, extract::DefaultBodyLimit, Router};
use garmin_core::constants::defaults;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Shared server resources
#[derive(Clone)]
pub struct ServerResources {
    /// Server configuration
    pub config: Arc<ServerConfig>,
    /// Managed Garmin tokens and the client that refreshes them
    pub tokens: Arc<TokenManager>,
}

impl ServerResources {
    /// Build resources with an explicit token manager
    #[must_use]
    pub fn new(config: ServerConfig, tokens: TokenManager) -> Self {
        Self {
            config: Arc::new(config),
            tokens: Arc::new(tokens),
        }
    }

    /// Build resources from configuration, loading tokens from the
    /// environment or the configured token file
    ///
    /// # Errors
    ///
    /// Returns an error when the configured tokens are malformed.
    pub fn from_config(config: ServerConfig) -> Result<Self> {
        initialize_shared_client(
            config.http_client.timeout_secs,
            config.http_client.connect_timeout_secs,
        );
        let client = Arc::new(GarminClient::new(config.garmin.clone()));
        let tokens = TokenManager::from_sources(client, config.tokens_file.as_deref())
            .context("Failed to load Garmin tokens")?;
        Ok(Self::new(config, tokens))
    }
}

/// The complete application router
pub fn build_router(resources: &Arc<ServerResources>) -> Router {
    let config = &resources.config;

    Router::new()
        .merge(HealthRoutes::routes())
        .merge(AuthRoutes::routes(Arc::clone(resources)))
        .merge(WorkoutRoutes::routes(Arc::clone(resources)))
        .layer(DefaultBodyLimit::max(defaults::MAX_BODY_BYTES))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakePrefixedRequestId))
                .layer(TraceLayer::new_for_http().make_span_with(create_request_span::<Body>))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(setup_cors(config))
                .layer(TimeoutLayer::new(Duration::from_secs(
                    config.request_timeout_secs,
                ))),
        )
}

/// Bind and serve until a shutdown signal arrives
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn run(resources: ServerResources) -> Result<()> {
    let resources = Arc::new(resources);
    let address = resources.config.bind_address();

    if !resources.tokens.is_configured().await {
        warn!("Starting without Garmin tokens; /test-auth will report 503");
    }

    let router = build_router(&resources);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    info!("Garmin Workout API listening on http://{address}");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl-C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}
