//! Health check endpoint.

use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// `GET /api/health`: liveness check, never touches the database.
pub async fn check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
