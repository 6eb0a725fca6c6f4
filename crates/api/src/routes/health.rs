use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;

use crate::ApiState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    /// Timezone all slots are generated and booked in
    pub timezone: String,
    /// Calendar bookings land on
    pub calendar_id: String,
}

#[derive(Serialize)]
struct VersionResponse {
    version: String,
}

/// Liveness probe that also echoes the scheduling identity of this
/// instance, so a misconfigured timezone or calendar shows up in the first
/// request against a deployment.
pub async fn health_check(State(state): State<Arc<ApiState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        timezone: state.scheduling.timezone.name().to_string(),
        calendar_id: state.scheduling.calendar_id.clone(),
    })
}

async fn version() -> Json<VersionResponse> {
    Json(VersionResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/health", get(health_check))
        .route("/version", get(version))
}
