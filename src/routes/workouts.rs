// ABOUTME: Workout creation route turning workout text into a Garmin Connect workout
// ABOUTME: Uses per-request credentials when given, otherwise the managed server tokens
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::garmin::CreatedWorkout;
use crate::logging::AppLogger;
use crate::middleware::request_id;
use crate::server::ServerResources;
use crate::workout::WorkoutParser;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use garmin_core::constants::defaults;
use garmin_core::errors::{AppError, AppResult, ErrorCode};
use garmin_core::models::Workout;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;
use zeroize::Zeroize;

/// `POST /create-workout` body
#[derive(Deserialize)]
pub struct CreateWorkoutRequest {
    /// Workout description, e.g. `10 min warmup, 5x(800m, 400m easy)`
    pub workout_text: String,
    /// Garmin email for a one-off login
    #[serde(default)]
    pub garmin_email: Option<String>,
    /// Garmin password for a one-off login
    #[serde(default)]
    pub garmin_password: Option<String>,
    /// Workout name override
    #[serde(default)]
    pub workout_name: Option<String>,
}

impl fmt::Debug for CreateWorkoutRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateWorkoutRequest")
            .field("workout_text", &self.workout_text)
            .field("garmin_email", &self.garmin_email)
            .field("garmin_password", &self.garmin_password.as_ref().map(|_| "***"))
            .field("workout_name", &self.workout_name)
            .finish()
    }
}

impl Drop for CreateWorkoutRequest {
    fn drop(&mut self) {
        if let Some(password) = self.garmin_password.as_mut() {
            password.zeroize();
        }
    }
}

/// `POST /create-workout` success body
#[derive(Debug, Serialize)]
pub struct CreateWorkoutResponse {
    /// Always true; failures use the error envelope
    pub success: bool,
    /// Human-readable result
    pub message: String,
    /// Name of the created workout
    pub workout_name: String,
    /// Id assigned by Garmin
    pub workout_id: Option<i64>,
    /// The workout as sent to Garmin
    pub parsed_workout: Workout,
}

/// Workout routes
pub struct WorkoutRoutes;

impl WorkoutRoutes {
    /// Create the `/create-workout` route
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/create-workout", post(Self::handle_create_workout))
            .with_state(resources)
    }

    async fn handle_create_workout(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        payload: Result<Json<CreateWorkoutRequest>, JsonRejection>,
    ) -> Result<Json<CreateWorkoutResponse>, AppError> {
        let result = async {
            let Json(request) = payload.map_err(Self::rejection_error)?;
            Self::create_workout(&resources, &request).await
        }
        .await;

        result.map(Json).map_err(|error| match request_id(&headers) {
            Some(id) => error.with_request_id(id),
            None => error,
        })
    }

    fn rejection_error(rejection: JsonRejection) -> AppError {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::new(
                ErrorCode::PayloadTooLarge,
                format!("Request body exceeds {} bytes", defaults::MAX_BODY_BYTES),
            )
        } else {
            AppError::invalid_input(rejection.body_text())
        }
    }

    async fn create_workout(
        resources: &ServerResources,
        request: &CreateWorkoutRequest,
    ) -> AppResult<CreateWorkoutResponse> {
        if request.workout_text.trim().is_empty() {
            return Err(AppError::invalid_input("workout_text must not be empty"));
        }

        let workout = WorkoutParser::parse(&request.workout_text, request.workout_name.as_deref());
        debug!(
            workout.name = %workout.workout_name,
            workout.steps = workout.steps().len(),
            "Parsed workout text"
        );

        let started = Instant::now();
        let created = match (
            request.garmin_email.as_deref().filter(|e| !e.trim().is_empty()),
            request.garmin_password.as_deref().filter(|p| !p.is_empty()),
        ) {
            (Some(email), Some(password)) => {
                Self::upload_with_login(resources, &workout, email, password).await?
            }
            (None, None) => {
                let client = resources.tokens.client();
                let workout = &workout;
                resources
                    .tokens
                    .authorized(|token| async move { client.create_workout(workout, &token).await })
                    .await?
            }
            _ => {
                return Err(AppError::invalid_input(
                    "garmin_email and garmin_password must be provided together",
                ))
            }
        };

        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        AppLogger::log_workout_created(
            &workout.workout_name,
            created.workout_id,
            workout.steps().len(),
            elapsed_ms,
        );

        Ok(CreateWorkoutResponse {
            success: true,
            message: "Workout created successfully!".to_owned(),
            workout_name: workout.workout_name.clone(),
            workout_id: created.workout_id,
            parsed_workout: workout,
        })
    }

    async fn upload_with_login(
        resources: &ServerResources,
        workout: &Workout,
        email: &str,
        password: &str,
    ) -> AppResult<CreatedWorkout> {
        let client = resources.tokens.client();
        let tokens = match client.login(email, password).await {
            Ok(tokens) => {
                AppLogger::log_login_event(email, true, None);
                tokens
            }
            Err(e) => {
                AppLogger::log_login_event(email, false, Some(&e.to_string()));
                return Err(e.into());
            }
        };

        Ok(client
            .create_workout(workout, &tokens.oauth2.access_token)
            .await?)
    }
}
