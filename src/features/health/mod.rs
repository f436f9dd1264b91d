//! Liveness endpoint used by load balancers and uptime checks.

use axum::{extract::State, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use utoipa::ToSchema;

/// Process-level facts reported by `/health`
pub struct HealthState {
    started_at: Instant,
    environment: String,
}

impl HealthState {
    pub fn new(environment: impl Into<String>) -> Self {
        Self {
            started_at: Instant::now(),
            environment: environment.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponseDto {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    /// Seconds since the server started
    pub uptime: f64,
    pub environment: String,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Server is up", body = HealthResponseDto),
    ),
    tag = "health"
)]
pub async fn health_check(State(state): State<Arc<HealthState>>) -> Json<HealthResponseDto> {
    Json(HealthResponseDto {
        status: "OK".to_string(),
        timestamp: Utc::now(),
        uptime: state.started_at.elapsed().as_secs_f64(),
        environment: state.environment.clone(),
    })
}

pub fn routes(state: Arc<HealthState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .with_state(state)
}
