//! HTTP request handlers for the audit API.

use std::time::Instant;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::export::generate_auditor_pack;

use super::auth::{bearer_token, Claims};
use super::request::{AuditAction, AuditRequest};
use super::response::{ApiError, ApiErrorResponse, RunResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/audit", post(audit_handler))
        .with_state(state)
}

/// Handler for the POST /api/audit endpoint.
///
/// Authenticates the caller, then dispatches on the request's `action`
/// discriminator. The token's claims decide which organization is
/// audited; the body never names one.
async fn audit_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<AuditRequest>, JsonRejection>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();

    // Authentication runs before the body is even looked at.
    let claims = match authenticate(&state, &headers) {
        Ok(claims) => claims,
        Err(response) => {
            warn!(correlation_id = %correlation_id, "authentication failed");
            return response.into_response();
        }
    };

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonDataError(err) => {
                    let body_text = err.body_text();
                    warn!(
                        correlation_id = %correlation_id,
                        error = %body_text,
                        "JSON data error"
                    );
                    if body_text.contains("missing field") {
                        ApiError::new("VALIDATION_ERROR", body_text)
                    } else {
                        ApiError::malformed_json(body_text)
                    }
                }
                JsonRejection::JsonSyntaxError(err) => {
                    warn!(correlation_id = %correlation_id, error = %err, "JSON syntax error");
                    ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
                }
                JsonRejection::MissingJsonContentType(_) => {
                    ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
                }
                _ => ApiError::malformed_json("Failed to parse request body"),
            };
            return (
                StatusCode::BAD_REQUEST,
                [(header::CONTENT_TYPE, "application/json")],
                Json(error),
            )
                .into_response();
        }
    };

    info!(
        correlation_id = %correlation_id,
        action = ?request.action,
        financial_year = %request.financial_year,
        organization_id = %claims.organization_id,
        "processing audit request"
    );
    let start_time = Instant::now();

    let result = match request.action {
        AuditAction::RunFullAudit => state
            .engine()
            .run_full_audit(
                claims.organization_id,
                &request.financial_year,
                &claims.subject,
            )
            .await
            .map(|outcome| Json(RunResponse::from(outcome)).into_response()),
        AuditAction::PreAuditSimulation => state
            .engine()
            .pre_audit_simulation(
                claims.organization_id,
                &request.financial_year,
                &claims.subject,
            )
            .await
            .map(|outcome| Json(RunResponse::from(outcome)).into_response()),
        AuditAction::GenerateAuditorPack => generate_auditor_pack(
            state.store(),
            claims.organization_id,
            &request.financial_year,
            request.run_id,
            &claims.subject,
            state.config(),
        )
        .await
        .map(|pack| Json(pack).into_response()),
    };

    match result {
        Ok(response) => {
            info!(
                correlation_id = %correlation_id,
                duration_us = start_time.elapsed().as_micros() as u64,
                "audit request completed"
            );
            response
        }
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "audit request failed");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<Claims, ApiErrorResponse> {
    let token = bearer_token(headers).map_err(ApiErrorResponse::from)?;
    state
        .verifier()
        .verify(token)
        .map_err(ApiErrorResponse::from)
}
