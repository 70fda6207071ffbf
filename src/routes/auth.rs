// ABOUTME: Token verification route reporting whether the configured Garmin tokens work
// ABOUTME: Calls the Garmin profile endpoint, refreshing the access token once if rejected
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::garmin::SocialProfile;
use crate::middleware::request_id;
use crate::server::ServerResources;
use crate::tokens::TokenStatus;
use axum::{extract::State, http::HeaderMap, routing::get, Json, Router};
use garmin_core::errors::AppError;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Successful `/test-auth` response
#[derive(Debug, Serialize)]
pub struct TestAuthResponse {
    /// Always true; failures use the error envelope
    pub success: bool,
    /// Human-readable result
    pub message: String,
    /// Profile of the authenticated account
    pub profile: SocialProfile,
    /// Token source and expiry
    pub tokens: Option<TokenStatus>,
}

/// Token verification routes
pub struct AuthRoutes;

impl AuthRoutes {
    /// Create the `/test-auth` route
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/test-auth", get(Self::handle_test_auth))
            .with_state(resources)
    }

    async fn handle_test_auth(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Json<TestAuthResponse>, AppError> {
        let with_request_id = |error: AppError| match request_id(&headers) {
            Some(id) => error.with_request_id(id),
            None => error,
        };

        let client = resources.tokens.client();
        let profile = resources
            .tokens
            .authorized(|token| async move { client.social_profile(&token).await })
            .await
            .map_err(with_request_id)?;

        info!(
            garmin.display_name = profile.display_name.as_deref().unwrap_or(""),
            "Garmin authentication verified"
        );

        Ok(Json(TestAuthResponse {
            success: true,
            message: "Authentication successful".to_owned(),
            profile,
            tokens: resources.tokens.status().await,
        }))
    }
}
