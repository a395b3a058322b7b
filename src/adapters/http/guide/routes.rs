//! Axum router configuration for the guide endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{analyze, get_profile, health, respond, GuideAppState};

/// Create the versioned API routes.
///
/// # Routes
/// - `POST /analyze` - Analysis only
/// - `POST /respond` - Analysis plus generated guidance text
/// - `GET /profiles/:user_id` - Profile summary
pub fn guide_routes() -> Router<GuideAppState> {
    Router::new()
        .route("/analyze", post(analyze))
        .route("/respond", post(respond))
        .route("/profiles/:user_id", get(get_profile))
}

/// Create the complete router, mounted at `/api/v1` plus `/health`.
///
/// # Example
///
/// ```ignore
/// let app = guide_router(state).layer(TraceLayer::new_for_http());
/// axum::serve(listener, app).await?;
/// ```
pub fn guide_router(state: GuideAppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", guide_routes())
        .with_state(state)
}
