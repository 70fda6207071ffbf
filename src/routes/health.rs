// ABOUTME: Service description and health check route handlers
// ABOUTME: Lists the available endpoints at / and reports liveness at /health
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use garmin_core::constants::service_names;

/// Root and health routes
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create the root and health routes
    pub fn routes() -> axum::Router {
        use axum::{routing::get, Json, Router};

        async fn root_handler() -> Json<serde_json::Value> {
            Json(serde_json::json!({
                "message": service_names::SERVICE_TITLE,
                "version": env!("CARGO_PKG_VERSION"),
                "endpoints": {
                    "/create-workout": "POST - Create a workout from text",
                    "/test-auth": "GET - Verify the configured Garmin tokens",
                    "/health": "GET - Health check"
                }
            }))
        }

        async fn health_handler() -> Json<serde_json::Value> {
            Json(serde_json::json!({
                "status": "healthy",
                "timestamp": chrono::Utc::now().to_rfc3339()
            }))
        }

        Router::new()
            .route("/", get(root_handler))
            .route("/health", get(health_handler))
    }
}
