//! Response types for the audit API.
//!
//! Defines the success envelope for run actions plus the error body and
//! the status mapping from [`AuditError`].

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::AuditOutcome;
use crate::error::AuditError;
use crate::models::{IfcRating, RunType};

/// Success body for the run actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResponse {
    /// Identifier of the completed run.
    pub run_id: Uuid,
    /// Terminal status, always "completed" on the success path.
    pub status: String,
    /// The kind of execution the run performed.
    pub run_type: RunType,
    /// Weighted compliance score, 0-100.
    pub compliance_score: Decimal,
    /// AI risk index, absent for simulations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_risk_index: Option<Decimal>,
    /// Qualitative controls rating.
    pub ifc_rating: IfcRating,
    /// Number of compliance checks evaluated.
    pub checks_count: usize,
    /// Number of IFC checks evaluated.
    pub ifc_count: usize,
}

impl From<AuditOutcome> for RunResponse {
    fn from(outcome: AuditOutcome) -> Self {
        Self {
            run_id: outcome.run_id,
            status: "completed".to_string(),
            run_type: outcome.run_type,
            compliance_score: outcome.compliance_score,
            ai_risk_index: outcome.ai_risk_index,
            ifc_rating: outcome.ifc_rating,
            checks_count: outcome.checks_count,
            ifc_count: outcome.ifc_count,
        }
    }
}

/// API error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with its HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<AuditError> for ApiErrorResponse {
    fn from(error: AuditError) -> Self {
        match error {
            AuditError::Unauthorized { message } => ApiErrorResponse {
                status: StatusCode::UNAUTHORIZED,
                error: ApiError::new("UNAUTHORIZED", message),
            },
            AuditError::InvalidFiscalYear { label } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "INVALID_FISCAL_YEAR",
                    format!("Invalid fiscal year label: {}", label),
                    "Labels follow the Indian fiscal year form \"2025-26\"",
                ),
            },
            AuditError::InvalidRunState { run_id, status } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "INVALID_RUN_STATE",
                    format!("Run {} is in state '{}'", run_id, status),
                    "The requested operation needs a completed run",
                ),
            },
            AuditError::RunNotFound { run_id } => ApiErrorResponse {
                status: StatusCode::NOT_FOUND,
                error: ApiError::new("RUN_NOT_FOUND", format!("No eligible run found ({})", run_id)),
            },
            AuditError::DelegateUnavailable { status } => ApiErrorResponse {
                status: StatusCode::TOO_MANY_REQUESTS,
                error: ApiError::with_details(
                    "DELEGATE_UNAVAILABLE",
                    "Risk intelligence service is unavailable",
                    format!("Upstream returned HTTP {}", status),
                ),
            },
            AuditError::DelegateBudgetExhausted { status } => ApiErrorResponse {
                status: StatusCode::PAYMENT_REQUIRED,
                error: ApiError::with_details(
                    "DELEGATE_BUDGET_EXHAUSTED",
                    "Risk intelligence budget is exhausted",
                    format!("Upstream returned HTTP {}", status),
                ),
            },
            AuditError::DelegateProtocol { message } => ApiErrorResponse {
                status: StatusCode::BAD_GATEWAY,
                error: ApiError::with_details(
                    "DELEGATE_PROTOCOL",
                    "Risk intelligence service broke the response contract",
                    message,
                ),
            },
            AuditError::DataAccess { entity, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "DATA_ACCESS",
                    format!("Failed to access {}", entity),
                    message,
                ),
            },
            AuditError::ConfigNotFound { path } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            },
            AuditError::ConfigParseError { path, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(!json.contains("details"));
    }

    #[test]
    fn test_unauthorized_maps_to_401() {
        let response: ApiErrorResponse = AuditError::Unauthorized {
            message: "unknown bearer token".to_string(),
        }
        .into();
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert_eq!(response.error.code, "UNAUTHORIZED");
    }

    #[test]
    fn test_delegate_statuses_pass_through() {
        let unavailable: ApiErrorResponse =
            AuditError::DelegateUnavailable { status: 429 }.into();
        assert_eq!(unavailable.status, StatusCode::TOO_MANY_REQUESTS);

        let exhausted: ApiErrorResponse =
            AuditError::DelegateBudgetExhausted { status: 402 }.into();
        assert_eq!(exhausted.status, StatusCode::PAYMENT_REQUIRED);

        let protocol: ApiErrorResponse = AuditError::DelegateProtocol {
            message: "no tool call".to_string(),
        }
        .into();
        assert_eq!(protocol.status, StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_run_not_found_maps_to_404() {
        let response: ApiErrorResponse = AuditError::RunNotFound {
            run_id: Uuid::nil(),
        }
        .into();
        assert_eq!(response.status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_invalid_fiscal_year_maps_to_400() {
        let response: ApiErrorResponse = AuditError::InvalidFiscalYear {
            label: "2025-27".to_string(),
        }
        .into();
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.error.code, "INVALID_FISCAL_YEAR");
    }
}
