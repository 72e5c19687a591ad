//! Structured outputs of the risk intelligence delegate.
//!
//! Every AI-sourced risk signal carries a human-readable justification in
//! addition to any numeric score. A bare number with no explanation is a
//! contract violation and is rejected at the delegate boundary.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One anomaly detected by the reasoning service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    /// The run this anomaly belongs to. Nil until persisted.
    #[serde(default)]
    pub run_id: Uuid,
    /// Short title of the anomaly.
    pub title: String,
    /// The area of the books the anomaly sits in, e.g. "revenue".
    pub area: String,
    /// The condition that triggered the anomaly.
    pub trigger_condition: String,
    /// Deviation from the expected baseline, in percent.
    pub deviation_pct: Decimal,
    /// Model confidence, 0-1.
    pub confidence: Decimal,
    /// Human-readable justification. Must be non-empty.
    pub justification: String,
    /// Suggested follow-up action.
    pub suggested_action: String,
}

/// A cluster of related risk observations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskTheme {
    /// The run this theme belongs to. Nil until persisted.
    #[serde(default)]
    pub run_id: Uuid,
    /// Theme name, e.g. "manual journal dependence".
    pub theme: String,
    /// Qualitative level: "low", "medium" or "high".
    pub level: String,
    /// Human-readable justification. Must be non-empty.
    pub justification: String,
}

/// A transaction sample the auditor should pull for vouching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditSample {
    /// The run this sample belongs to. Nil until persisted.
    #[serde(default)]
    pub run_id: Uuid,
    /// The population to sample from, e.g. "manual journal entries".
    pub population: String,
    /// How the sample was selected.
    pub selection_basis: String,
    /// Recommended sample size.
    pub sample_size: u32,
}

/// A narrative paragraph for the audit report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Narrative {
    /// The run this narrative belongs to. Nil until persisted.
    #[serde(default)]
    pub run_id: Uuid,
    /// Report section the narrative belongs to.
    pub section: String,
    /// The narrative text.
    pub text: String,
}
