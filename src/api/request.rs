//! Request types for the audit API.
//!
//! The single `/api/audit` endpoint multiplexes on an `action`
//! discriminator rather than separate routes, matching the hosted
//! platform's action-based gateway.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Operation requested through `/api/audit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Deterministic checks plus the risk delegate and full scoring.
    RunFullAudit,
    /// Deterministic checks only; no delegate call, no AI material.
    PreAuditSimulation,
    /// Assemble the auditor pack for a completed run.
    GenerateAuditorPack,
}

/// Request body for the `/api/audit` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRequest {
    /// The operation to perform.
    pub action: AuditAction,
    /// Fiscal year label, e.g. "2025-26".
    pub financial_year: String,
    /// Target run for pack generation; ignored by the other actions.
    /// When absent the latest completed run is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_id: Option<Uuid>,
}
