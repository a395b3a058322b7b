//! HTTP handlers for the guide endpoints.
//!
//! Thin translation between JSON and the application handlers.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::application::{
    GenerateGuidanceHandler, GetProfileSummaryError, GetProfileSummaryHandler,
    GetProfileSummaryQuery, ProcessRequestCommand, ProcessRequestError, ProcessRequestHandler,
};
use crate::domain::foundation::{DomainError, UserId, ValidationError};

use super::dto::{AnalyzeRequest, ErrorResponse, HealthResponse};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct GuideAppState {
    pub process_handler: Arc<ProcessRequestHandler>,
    pub guidance_handler: Arc<GenerateGuidanceHandler>,
    pub profile_handler: Arc<GetProfileSummaryHandler>,
}

impl GuideAppState {
    pub fn new(
        process_handler: Arc<ProcessRequestHandler>,
        guidance_handler: Arc<GenerateGuidanceHandler>,
        profile_handler: Arc<GetProfileSummaryHandler>,
    ) -> Self {
        Self {
            process_handler,
            guidance_handler,
            profile_handler,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/v1/analyze - Run the pipeline for one request
pub async fn analyze(
    State(state): State<GuideAppState>,
    body: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Response {
    let cmd = match to_command(body) {
        Ok(cmd) => cmd,
        Err(response) => return response,
    };

    match state.process_handler.handle(cmd).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => handle_process_error(e),
    }
}

/// POST /api/v1/respond - Run the pipeline and generate guidance text
pub async fn respond(
    State(state): State<GuideAppState>,
    body: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Response {
    let cmd = match to_command(body) {
        Ok(cmd) => cmd,
        Err(response) => return response,
    };

    match state.guidance_handler.handle(cmd).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => handle_process_error(e),
    }
}

/// GET /api/v1/profiles/:user_id - Profile aggregates
pub async fn get_profile(
    State(state): State<GuideAppState>,
    Path(user_id): Path<String>,
) -> Response {
    let user_id = match UserId::new(user_id) {
        Ok(id) => id,
        Err(e) => return validation_response(e),
    };

    match state
        .profile_handler
        .handle(GetProfileSummaryQuery { user_id })
        .await
    {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(GetProfileSummaryError::NotFound(id)) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::not_found("Profile", id.as_str())),
        )
            .into_response(),
        Err(e @ GetProfileSummaryError::Store(_)) => {
            tracing::error!(error = %e, "Profile lookup failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::from(DomainError::from(e))),
            )
                .into_response()
        }
    }
}

/// GET /health - Liveness probe
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

// ════════════════════════════════════════════════════════════════════════════
// Request translation and error handling
// ════════════════════════════════════════════════════════════════════════════

fn to_command(
    body: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<ProcessRequestCommand, Response> {
    let Json(req) = body.map_err(|rejection| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request(rejection.body_text())),
        )
            .into_response()
    })?;

    let user_id = UserId::new(req.user_id).map_err(validation_response)?;
    let mut cmd = ProcessRequestCommand::new(user_id, req.query);
    if let Some(context) = req.context {
        cmd = cmd.with_context(context);
    }
    Ok(cmd)
}

fn handle_process_error(error: ProcessRequestError) -> Response {
    match error {
        ProcessRequestError::Validation(e) => validation_response(e),
    }
}

fn validation_response(error: ValidationError) -> Response {
    let domain: DomainError = ProcessRequestError::Validation(error).into();
    (StatusCode::BAD_REQUEST, Json(ErrorResponse::from(domain))).into_response()
}
