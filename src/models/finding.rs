//! Compliance findings and IFC assessments.
//!
//! A [`Finding`] is the immutable result of one deterministic compliance
//! check; an [`IfcAssessment`] is the same shape scoped to control-design
//! checks. Both are written exactly once per check per run.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Severity of a check result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Informational only.
    Info,
    /// Worth attention but not a certain defect.
    Warning,
    /// A hard statutory or structural violation.
    Critical,
}

/// Outcome status of a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    /// No records triggered the check.
    Pass,
    /// Records triggered the check but the condition is heuristic or
    /// remediable.
    Warning,
    /// Records triggered the check and the condition is a violation.
    Fail,
}

/// Compliance domain a deterministic check belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceModule {
    /// Goods and Services Tax checks.
    Gst,
    /// Tax Deducted at Source checks.
    Tds,
    /// Income-tax statutory checks.
    IncomeTax,
    /// Fixed-asset lifecycle checks.
    FixedAssets,
    /// Ledger and reference integrity checks.
    DataIntegrity,
}

/// The result of one deterministic compliance check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// The run this finding belongs to. Nil until persisted by the
    /// orchestrator.
    pub run_id: Uuid,
    /// Compliance domain of the check.
    pub module: ComplianceModule,
    /// Stable check code, e.g. "G3".
    pub check_code: String,
    /// Human-readable check name.
    pub check_name: String,
    /// Severity of the result.
    pub severity: Severity,
    /// Outcome status.
    pub status: CheckStatus,
    /// Number of records that triggered the check.
    pub affected_count: u64,
    /// Monetary amount across exactly the counted records.
    pub affected_amount: Decimal,
    /// Suggested remediation, if any.
    pub recommendation: Option<String>,
    /// Free-form details payload.
    pub details: serde_json::Value,
    /// References to the underlying records.
    pub record_refs: Vec<String>,
}

impl Finding {
    /// Builds a passing finding for a check that no records triggered.
    pub fn pass(
        module: ComplianceModule,
        check_code: &str,
        check_name: &str,
        details: serde_json::Value,
    ) -> Self {
        Self {
            run_id: Uuid::nil(),
            module,
            check_code: check_code.to_string(),
            check_name: check_name.to_string(),
            severity: Severity::Info,
            status: CheckStatus::Pass,
            affected_count: 0,
            affected_amount: Decimal::ZERO,
            recommendation: None,
            details,
            record_refs: Vec::new(),
        }
    }
}

/// Control-design category an IFC check belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IfcCheckType {
    /// Segregation of duties between preparers and posters.
    SegregationOfDuties,
    /// Maker-checker approval discipline.
    MakerChecker,
    /// Period-end cut-off and concentration controls.
    PeriodControls,
    /// Override and unlock controls.
    OverrideControls,
}

/// The result of one internal-financial-controls check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IfcAssessment {
    /// The run this assessment belongs to. Nil until persisted.
    pub run_id: Uuid,
    /// Control-design category of the check.
    pub check_type: IfcCheckType,
    /// Stable check code, e.g. "C2".
    pub check_code: String,
    /// Human-readable check name.
    pub check_name: String,
    /// Severity of the result.
    pub severity: Severity,
    /// Outcome status.
    pub status: CheckStatus,
    /// Number of records that triggered the check.
    pub affected_count: u64,
    /// Monetary amount across exactly the counted records.
    pub affected_amount: Decimal,
    /// Suggested remediation, if any.
    pub recommendation: Option<String>,
    /// Free-form details payload.
    pub details: serde_json::Value,
}

impl IfcAssessment {
    /// Builds a passing assessment for a control no records triggered.
    pub fn pass(
        check_type: IfcCheckType,
        check_code: &str,
        check_name: &str,
        details: serde_json::Value,
    ) -> Self {
        Self {
            run_id: Uuid::nil(),
            check_type,
            check_code: check_code.to_string(),
            check_name: check_name.to_string(),
            severity: Severity::Info,
            status: CheckStatus::Pass,
            affected_count: 0,
            affected_amount: Decimal::ZERO,
            recommendation: None,
            details,
        }
    }
}
