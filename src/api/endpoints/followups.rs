//! Follow-up endpoints.
//!
//! - `GET /api/followups`: every follow-up, earliest date first
//! - `GET /api/followups/stats`: dashboard counters
//! - `POST /api/followups`: create
//! - `PUT /api/followups/:followup_id`: partial update
//! - `DELETE /api/followups/:followup_id`: delete
//!
//! Bodies must be JSON objects. Arrays and scalars are rejected before any
//! field mapping happens.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::core::{CreateFollowUp, Tracker, UpdateFollowUp};
use crate::db::{FollowUp, FollowUpStats};
use crate::error::TrackerError;

#[derive(Serialize)]
pub struct DeleteResponse {
    pub message: &'static str,
}

/// `GET /api/followups`
pub async fn list(State(tracker): State<Tracker>) -> Result<Json<Vec<FollowUp>>, TrackerError> {
    Ok(Json(tracker.list().await?))
}

/// `GET /api/followups/stats`
pub async fn stats(State(tracker): State<Tracker>) -> Result<Json<FollowUpStats>, TrackerError> {
    Ok(Json(tracker.stats().await?))
}

/// `POST /api/followups`, answers 201 with the stored record.
pub async fn create(
    State(tracker): State<Tracker>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<FollowUp>), TrackerError> {
    let payload: CreateFollowUp = from_object(payload)?;
    let followup = tracker.create(payload).await?;

    Ok((StatusCode::CREATED, Json(followup)))
}

/// `PUT /api/followups/:followup_id`
pub async fn update(
    State(tracker): State<Tracker>,
    followup_id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<FollowUp>, TrackerError> {
    let Path(followup_id) = followup_id.map_err(unknown_path)?;
    let payload: UpdateFollowUp = from_object(payload)?;

    Ok(Json(tracker.update(followup_id, payload).await?))
}

/// `DELETE /api/followups/:followup_id`
pub async fn delete(
    State(tracker): State<Tracker>,
    followup_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<DeleteResponse>, TrackerError> {
    let Path(followup_id) = followup_id.map_err(unknown_path)?;
    tracker.delete(followup_id).await?;

    Ok(Json(DeleteResponse {
        message: "Follow-up deleted successfully",
    }))
}

// Derived Deserialize also fills structs from arrays by position, so only
// an object gets as far as field mapping.
fn from_object<T: DeserializeOwned>(
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<T, TrackerError> {
    let Json(value) = payload.map_err(|rejection| {
        TrackerError::Validation(format!("Invalid request body: {}", rejection.body_text()))
    })?;

    if !value.is_object() {
        return Err(TrackerError::Validation(
            "Invalid request body: expected a JSON object".to_string(),
        ));
    }

    serde_json::from_value(value)
        .map_err(|e| TrackerError::Validation(format!("Invalid request body: {}", e)))
}

// Non-numeric ids can never match a row
fn unknown_path(_: PathRejection) -> TrackerError {
    TrackerError::NotFound("Not found".to_string())
}
