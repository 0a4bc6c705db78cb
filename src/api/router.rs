//! HTTP router for the follow-up API.
//!
//! Everything lives under `/api/`. CORS is wide open on that prefix, and
//! every request is traced. Unknown paths get a JSON 404.

use axum::http::Uri;
use axum::routing::{get, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::endpoints;
use crate::core::Tracker;
use crate::error::TrackerError;

/// Build the API router.
///
/// Handlers share the `Tracker` through `State`; it is cheap to clone.
pub fn api_router(tracker: Tracker) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
    // The static `/followups/stats` route wins over `/:followup_id`.
    let api = Router::new()
        .route(
            "/followups",
            get(endpoints::followups::list).post(endpoints::followups::create),
        )
        .route("/followups/stats", get(endpoints::followups::stats))
        .route(
            "/followups/:followup_id",
            put(endpoints::followups::update).delete(endpoints::followups::delete),
        )
        .route("/health", get(endpoints::health::check))
        .with_state(tracker)
        .layer(cors);

    Router::new()
        .nest("/api", api)
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
}

async fn not_found(uri: Uri) -> TrackerError {
    tracing::debug!(%uri, "no route");
    TrackerError::NotFound("Not found".to_string())
}
