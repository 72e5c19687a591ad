//! GST compliance checks.
//!
//! Covers registration-number formats, invoice tax arithmetic and bills
//! from unregistered vendors.

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::config::ScoringConfig;
use crate::models::{CheckStatus, ComplianceModule, Finding, FiscalSnapshot, Severity};

use super::ComplianceCheck;

/// Statutory GSTIN format: state code, PAN, entity number, checksum.
pub const GSTIN_PATTERN: &str = r"^[0-9]{2}[A-Z]{5}[0-9]{4}[A-Z][1-9A-Z]Z[0-9A-Z]$";

static GSTIN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    // The pattern is a constant; a failure here is a programming error.
    Regex::new(GSTIN_PATTERN).unwrap()
});

/// Returns true if the value matches the statutory GSTIN format.
pub fn is_valid_gstin(value: &str) -> bool {
    GSTIN_REGEX.is_match(value)
}

/// G1: vendor GSTIN format validation.
///
/// Vendors without a GSTIN are skipped here; unregistered vendors are
/// flagged on their bills by [`BillVendorGstinCheck`].
pub struct VendorGstinFormatCheck;

impl ComplianceCheck for VendorGstinFormatCheck {
    fn code(&self) -> &'static str {
        "G1"
    }

    fn name(&self) -> &'static str {
        "Vendor GSTIN format"
    }

    fn module(&self) -> ComplianceModule {
        ComplianceModule::Gst
    }

    fn evaluate(&self, snapshot: &FiscalSnapshot, _config: &ScoringConfig) -> Finding {
        let mismatches: Vec<&crate::models::Vendor> = snapshot
            .vendors
            .iter()
            .filter(|v| v.gstin.as_deref().is_some_and(|g| !is_valid_gstin(g)))
            .collect();

        if mismatches.is_empty() {
            return Finding::pass(
                self.module(),
                self.code(),
                self.name(),
                serde_json::json!({ "vendors_checked": snapshot.vendors.len() }),
            );
        }

        Finding {
            run_id: Uuid::nil(),
            module: self.module(),
            check_code: self.code().to_string(),
            check_name: self.name().to_string(),
            severity: Severity::Warning,
            status: CheckStatus::Fail,
            affected_count: mismatches.len() as u64,
            affected_amount: Decimal::ZERO,
            recommendation: Some(
                "Correct the malformed GSTINs in the vendor master before filing returns"
                    .to_string(),
            ),
            details: serde_json::json!({
                "vendors_checked": snapshot.vendors.len(),
                "invalid": mismatches.iter().map(|v| v.name.clone()).collect::<Vec<_>>(),
            }),
            record_refs: mismatches.iter().map(|v| v.id.to_string()).collect(),
        }
    }
}

/// G2: customer GSTIN format validation.
pub struct CustomerGstinFormatCheck;

impl ComplianceCheck for CustomerGstinFormatCheck {
    fn code(&self) -> &'static str {
        "G2"
    }

    fn name(&self) -> &'static str {
        "Customer GSTIN format"
    }

    fn module(&self) -> ComplianceModule {
        ComplianceModule::Gst
    }

    fn evaluate(&self, snapshot: &FiscalSnapshot, _config: &ScoringConfig) -> Finding {
        let mismatches: Vec<&crate::models::Customer> = snapshot
            .customers
            .iter()
            .filter(|c| c.gstin.as_deref().is_some_and(|g| !is_valid_gstin(g)))
            .collect();

        if mismatches.is_empty() {
            return Finding::pass(
                self.module(),
                self.code(),
                self.name(),
                serde_json::json!({ "customers_checked": snapshot.customers.len() }),
            );
        }

        Finding {
            run_id: Uuid::nil(),
            module: self.module(),
            check_code: self.code().to_string(),
            check_name: self.name().to_string(),
            severity: Severity::Warning,
            status: CheckStatus::Fail,
            affected_count: mismatches.len() as u64,
            affected_amount: Decimal::ZERO,
            recommendation: Some(
                "Correct the malformed GSTINs in the customer master".to_string(),
            ),
            details: serde_json::json!({
                "customers_checked": snapshot.customers.len(),
                "invalid": mismatches.iter().map(|c| c.name.clone()).collect::<Vec<_>>(),
            }),
            record_refs: mismatches.iter().map(|c| c.id.to_string()).collect(),
        }
    }
}

/// G3: invoice tax arithmetic.
///
/// `amount + tax_amount` must equal `total_amount` within one unit of
/// currency to absorb rounding. Anything outside the tolerance is a hard
/// violation; the affected amount sums the mismatched invoices' totals.
pub struct InvoiceArithmeticCheck;

impl ComplianceCheck for InvoiceArithmeticCheck {
    fn code(&self) -> &'static str {
        "G3"
    }

    fn name(&self) -> &'static str {
        "Invoice tax arithmetic"
    }

    fn module(&self) -> ComplianceModule {
        ComplianceModule::Gst
    }

    fn evaluate(&self, snapshot: &FiscalSnapshot, config: &ScoringConfig) -> Finding {
        let tolerance = config.thresholds.invoice_tolerance;
        let mismatched: Vec<&crate::models::Invoice> = snapshot
            .invoices
            .iter()
            .filter(|i| {
                let expected = i.amount + i.tax_amount;
                (expected - i.total_amount).abs() > tolerance
            })
            .collect();

        if mismatched.is_empty() {
            return Finding::pass(
                self.module(),
                self.code(),
                self.name(),
                serde_json::json!({ "invoices_checked": snapshot.invoices.len() }),
            );
        }

        let affected_amount: Decimal = mismatched.iter().map(|i| i.total_amount).sum();

        Finding {
            run_id: Uuid::nil(),
            module: self.module(),
            check_code: self.code().to_string(),
            check_name: self.name().to_string(),
            severity: Severity::Critical,
            status: CheckStatus::Fail,
            affected_count: mismatched.len() as u64,
            affected_amount,
            recommendation: Some(
                "Reconcile the invoice totals against taxable value plus tax".to_string(),
            ),
            details: serde_json::json!({
                "invoices_checked": snapshot.invoices.len(),
                "tolerance": tolerance.to_string(),
                "mismatched": mismatched
                    .iter()
                    .map(|i| i.invoice_number.clone())
                    .collect::<Vec<_>>(),
            }),
            record_refs: mismatched.iter().map(|i| i.id.to_string()).collect(),
        }
    }
}

/// G4: purchase bills from vendors with no GSTIN on file.
///
/// Missing registration is a risk signal, not a certain defect, so the
/// result is never critical.
pub struct BillVendorGstinCheck;

impl ComplianceCheck for BillVendorGstinCheck {
    fn code(&self) -> &'static str {
        "G4"
    }

    fn name(&self) -> &'static str {
        "Bills from vendors without GSTIN"
    }

    fn module(&self) -> ComplianceModule {
        ComplianceModule::Gst
    }

    fn evaluate(&self, snapshot: &FiscalSnapshot, _config: &ScoringConfig) -> Finding {
        let flagged: Vec<&crate::models::Bill> = snapshot
            .bills
            .iter()
            .filter(|b| {
                snapshot
                    .vendor(b.vendor_id)
                    .is_none_or(|v| v.gstin.is_none())
            })
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
                "Obtain GSTINs for these vendors or confirm they are unregistered".to_string(),
            ),
            details: serde_json::json!({
                "bills_checked": snapshot.bills.len(),
                "flagged": flagged.iter().map(|b| b.bill_number.clone()).collect::<Vec<_>>(),
            }),
            record_refs: flagged.iter().map(|b| b.id.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Bill, Customer, FiscalYear, Invoice, Vendor};
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn snapshot() -> FiscalSnapshot {
        FiscalSnapshot::empty(Uuid::new_v4(), FiscalYear::parse("2025-26").unwrap())
    }

    fn vendor(gstin: Option<&str>) -> Vendor {
        Vendor {
            id: Uuid::new_v4(),
            name: "Acme Supplies".to_string(),
            gstin: gstin.map(str::to_string),
            pan: Some("ABCDE1234F".to_string()),
        }
    }

    fn invoice(amount: &str, tax: &str, total: &str) -> Invoice {
        Invoice {
            id: Uuid::new_v4(),
            invoice_number: "INV-001".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            customer_id: Uuid::new_v4(),
            amount: dec(amount),
            tax_amount: dec(tax),
            total_amount: dec(total),
        }
    }

    #[test]
    fn test_gstin_format() {
        assert!(is_valid_gstin("27AAPFU0939F1ZV"));
        assert!(!is_valid_gstin("27AAPFU0939F1XV")); // Z missing
        assert!(!is_valid_gstin("7AAPFU0939F1ZV")); // short state code
        assert!(!is_valid_gstin("27aapfu0939f1zv")); // lowercase
    }

    #[test]
    fn test_g1_passes_with_valid_and_absent_gstins() {
        let mut snap = snapshot();
        snap.vendors = vec![vendor(Some("27AAPFU0939F1ZV")), vendor(None)];

        let finding = VendorGstinFormatCheck.evaluate(&snap, &ScoringConfig::default());
        assert_eq!(finding.status, CheckStatus::Pass);
        assert_eq!(finding.severity, Severity::Info);
        assert_eq!(finding.affected_count, 0);
    }

    #[test]
    fn test_g1_flags_malformed_gstin() {
        let mut snap = snapshot();
        snap.vendors = vec![vendor(Some("INVALID")), vendor(Some("27AAPFU0939F1ZV"))];

        let finding = VendorGstinFormatCheck.evaluate(&snap, &ScoringConfig::default());
        assert_eq!(finding.status, CheckStatus::Fail);
        assert_eq!(finding.severity, Severity::Warning);
        assert_eq!(finding.affected_count, 1);
        assert_eq!(finding.affected_amount, Decimal::ZERO);
        assert_eq!(finding.record_refs.len(), 1);
    }

    #[test]
    fn test_g2_flags_malformed_customer_gstin() {
        let mut snap = snapshot();
        snap.customers = vec![Customer {
            id: Uuid::new_v4(),
            name: "Globex".to_string(),
            gstin: Some("NOT-A-GSTIN".to_string()),
        }];

        let finding = CustomerGstinFormatCheck.evaluate(&snap, &ScoringConfig::default());
        assert_eq!(finding.status, CheckStatus::Fail);
        assert_eq!(finding.affected_count, 1);
    }

    #[test]
    fn test_g3_accepts_rounding_within_tolerance() {
        let mut snap = snapshot();
        snap.invoices = vec![invoice("1000.00", "180.00", "1180.50")];

        let finding = InvoiceArithmeticCheck.evaluate(&snap, &ScoringConfig::default());
        assert_eq!(finding.status, CheckStatus::Pass);
    }

    #[test]
    fn test_g3_flags_arithmetic_mismatch() {
        let mut snap = snapshot();
        snap.invoices = vec![invoice("1000", "180", "1200")];

        let finding = InvoiceArithmeticCheck.evaluate(&snap, &ScoringConfig::default());
        assert_eq!(finding.status, CheckStatus::Fail);
        assert_eq!(finding.severity, Severity::Critical);
        assert_eq!(finding.affected_count, 1);
        assert_eq!(finding.affected_amount, dec("1200"));
    }

    #[test]
    fn test_g3_affected_amount_sums_mismatched_totals_only() {
        let mut snap = snapshot();
        snap.invoices = vec![
            invoice("1000", "180", "1200"),
            invoice("500", "90", "590"),
            invoice("2000", "360", "2500"),
        ];

        let finding = InvoiceArithmeticCheck.evaluate(&snap, &ScoringConfig::default());
        assert_eq!(finding.affected_count, 2);
        assert_eq!(finding.affected_amount, dec("3700"));
    }

    #[test]
    fn test_g4_flags_bills_from_unregistered_vendors() {
        let mut snap = snapshot();
        let registered = vendor(Some("27AAPFU0939F1ZV"));
        let unregistered = vendor(None);
        let bill = |vendor_id, total: &str| Bill {
            id: Uuid::new_v4(),
            bill_number: "BILL-001".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            vendor_id,
            total_amount: dec(total),
        };
        snap.bills = vec![
            bill(registered.id, "1000"),
            bill(unregistered.id, "750.50"),
        ];
        snap.vendors = vec![registered, unregistered];

        let finding = BillVendorGstinCheck.evaluate(&snap, &ScoringConfig::default());
        assert_eq!(finding.status, CheckStatus::Warning);
        assert_eq!(finding.severity, Severity::Warning);
        assert_eq!(finding.affected_count, 1);
        assert_eq!(finding.affected_amount, dec("750.50"));
    }

    #[test]
    fn test_g4_flags_bill_with_unknown_vendor() {
        let mut snap = snapshot();
        snap.bills = vec![Bill {
            id: Uuid::new_v4(),
            bill_number: "BILL-002".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            vendor_id: Uuid::new_v4(),
            total_amount: dec("100"),
        }];

        let finding = BillVendorGstinCheck.evaluate(&snap, &ScoringConfig::default());
        assert_eq!(finding.affected_count, 1);
    }
}
