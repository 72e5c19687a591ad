//! Deterministic compliance rule engine.
//!
//! Each check is an independent rule object with a pure
//! `(snapshot, config) -> Finding` evaluation, registered in a fixed
//! catalog. Checks never short-circuit on one another and never error on
//! empty input; a check with nothing to flag reports a pass.

mod data_integrity;
mod fixed_assets;
mod gst;
mod income_tax;
mod tds;

use crate::config::ScoringConfig;
use crate::models::{ComplianceModule, Finding, FiscalSnapshot};

pub use data_integrity::{AccountReferenceCheck, JournalBalanceCheck};
pub use fixed_assets::{DisposalValueCheck, MissingDepreciationCheck};
pub use gst::{
    BillVendorGstinCheck, CustomerGstinFormatCheck, InvoiceArithmeticCheck,
    VendorGstinFormatCheck, GSTIN_PATTERN,
};
pub use income_tax::{CashExpenseCeilingCheck, RoundFigureJournalCheck};
pub use tds::{PayrollPanCheck, VendorPanCheck};

/// One deterministic compliance check.
///
/// Implementations must be pure: the same snapshot and config always
/// produce the same finding, and evaluation has no side effects.
pub trait ComplianceCheck: Send + Sync {
    /// Stable check code, e.g. "G3".
    fn code(&self) -> &'static str;

    /// Human-readable check name.
    fn name(&self) -> &'static str;

    /// Compliance domain of the check.
    fn module(&self) -> ComplianceModule;

    /// Evaluates the check against the snapshot.
    fn evaluate(&self, snapshot: &FiscalSnapshot, config: &ScoringConfig) -> Finding;
}

/// The fixed catalog of compliance checks, in evaluation order.
pub fn compliance_checks() -> Vec<Box<dyn ComplianceCheck>> {
    vec![
        Box::new(VendorGstinFormatCheck),
        Box::new(CustomerGstinFormatCheck),
        Box::new(InvoiceArithmeticCheck),
        Box::new(BillVendorGstinCheck),
        Box::new(VendorPanCheck),
        Box::new(PayrollPanCheck),
        Box::new(CashExpenseCeilingCheck),
        Box::new(RoundFigureJournalCheck),
        Box::new(MissingDepreciationCheck),
        Box::new(DisposalValueCheck),
        Box::new(JournalBalanceCheck),
        Box::new(AccountReferenceCheck),
    ]
}

/// Evaluates every check in the catalog unconditionally.
///
/// The result is ordered by catalog position and is deterministic for a
/// given snapshot.
pub fn run_compliance_checks(snapshot: &FiscalSnapshot, config: &ScoringConfig) -> Vec<Finding> {
    compliance_checks()
        .iter()
        .map(|check| check.evaluate(snapshot, config))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CheckStatus, FiscalYear};
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn empty_snapshot() -> FiscalSnapshot {
        FiscalSnapshot::empty(Uuid::new_v4(), FiscalYear::parse("2025-26").unwrap())
    }

    #[test]
    fn test_catalog_codes_are_unique() {
        let checks = compliance_checks();
        let mut codes: Vec<&str> = checks.iter().map(|c| c.code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), checks.len());
    }

    #[test]
    fn test_empty_snapshot_all_checks_pass() {
        let config = ScoringConfig::default();
        let findings = run_compliance_checks(&empty_snapshot(), &config);

        assert_eq!(findings.len(), compliance_checks().len());
        for finding in &findings {
            assert_eq!(finding.status, CheckStatus::Pass, "check {}", finding.check_code);
            assert_eq!(finding.affected_count, 0);
            assert_eq!(finding.affected_amount, Decimal::ZERO);
        }
    }

    #[test]
    fn test_run_is_deterministic() {
        let config = ScoringConfig::default();
        let snapshot = empty_snapshot();
        let first = run_compliance_checks(&snapshot, &config);
        let second = run_compliance_checks(&snapshot, &config);
        assert_eq!(first, second);
    }

    #[test]
    fn test_findings_preserve_catalog_order() {
        let config = ScoringConfig::default();
        let findings = run_compliance_checks(&empty_snapshot(), &config);
        let codes: Vec<&str> = findings.iter().map(|f| f.check_code.as_str()).collect();
        let expected: Vec<&str> = compliance_checks().iter().map(|c| c.code()).collect();
        assert_eq!(codes, expected);
    }
}
