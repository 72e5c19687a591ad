//! TDS compliance checks.
//!
//! Withholding-tax checks hinge on PAN availability: deduction cannot be
//! reported correctly without the deductee's PAN.

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::config::ScoringConfig;
use crate::models::{CheckStatus, ComplianceModule, Finding, FiscalSnapshot, Severity};

use super::ComplianceCheck;

/// T1: purchase bills whose vendor has no PAN on file.
///
/// Missing reference data is a risk, not a certain defect, so the result
/// is never critical.
pub struct VendorPanCheck;

impl ComplianceCheck for VendorPanCheck {
    fn code(&self) -> &'static str {
        "T1"
    }

    fn name(&self) -> &'static str {
        "Bills from vendors without PAN"
    }

    fn module(&self) -> ComplianceModule {
        ComplianceModule::Tds
    }

    fn evaluate(&self, snapshot: &FiscalSnapshot, _config: &ScoringConfig) -> Finding {
        let flagged: Vec<&crate::models::Bill> = snapshot
            .bills
            .iter()
            .filter(|b| snapshot.vendor(b.vendor_id).is_none_or(|v| v.pan.is_none()))
            .collect();

        if flagged.is_empty() {
            return Finding::pass(
                self.module(),
                self.code(),
                self.name(),
                serde_json::json!({ "bills_checked": snapshot.bills.len() }),
            );
        }

        let affected_amount: Decimal = flagged.iter().map(|b| b.total_amount).sum();

        Finding {
            run_id: Uuid::nil(),
            module: self.module(),
            check_code: self.code().to_string(),
            check_name: self.name().to_string(),
            severity: Severity::Warning,
            status: CheckStatus::Warning,
            affected_count: flagged.len() as u64,
            affected_amount,
            recommendation: Some(
                "Collect PANs for these vendors; TDS on their bills deducts at the higher rate otherwise"
                    .to_string(),
            ),
            details: serde_json::json!({
                "bills_checked": snapshot.bills.len(),
                "flagged": flagged.iter().map(|b| b.bill_number.clone()).collect::<Vec<_>>(),
            }),
            record_refs: flagged.iter().map(|b| b.id.to_string()).collect(),
        }
    }
}

/// T2: payroll rows with TDS deducted but no employee PAN on file.
pub struct PayrollPanCheck;

impl ComplianceCheck for PayrollPanCheck {
    fn code(&self) -> &'static str {
        "T2"
    }

    fn name(&self) -> &'static str {
        "Payroll TDS without employee PAN"
    }

    fn module(&self) -> ComplianceModule {
        ComplianceModule::Tds
    }

    fn evaluate(&self, snapshot: &FiscalSnapshot, _config: &ScoringConfig) -> Finding {
        let flagged: Vec<&crate::models::PayrollRecord> = snapshot
            .payroll
            .iter()
            .filter(|p| p.tds_deducted > Decimal::ZERO && p.employee_pan.is_none())
            .collect();

        if flagged.is_empty() {
            return Finding::pass(
                self.module(),
                self.code(),
                self.name(),
                serde_json::json!({ "payroll_rows_checked": snapshot.payroll.len() }),
            );
        }

        let affected_amount: Decimal = flagged.iter().map(|p| p.tds_deducted).sum();

        Finding {
            run_id: Uuid::nil(),
            module: self.module(),
            check_code: self.code().to_string(),
            check_name: self.name().to_string(),
            severity: Severity::Warning,
            status: CheckStatus::Warning,
            affected_count: flagged.len() as u64,
            affected_amount,
            recommendation: Some(
                "Collect the missing employee PANs before the quarterly TDS return".to_string(),
            ),
            details: serde_json::json!({
                "payroll_rows_checked": snapshot.payroll.len(),
            }),
            record_refs: flagged.iter().map(|p| p.id.to_string()).collect(),
        }
    }
}
