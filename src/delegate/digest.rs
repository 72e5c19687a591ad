//! The bounded statistical digest sent to the reasoning service.
//!
//! The digest carries aggregates only — monthly totals, ratios, tallies
//! and a top-vendor concentration table. Row-level records never leave
//! the engine, which bounds request size and limits what the external
//! service can see.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::ScoringConfig;
use crate::models::{CheckStatus, Finding, FiscalSnapshot, IfcAssessment};

/// Spend concentration for one vendor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorSpend {
    /// Vendor display name.
    pub name: String,
    /// Total billed by the vendor in the window.
    pub total: Decimal,
    /// Share of all vendor spend, 0-1.
    pub share: Decimal,
}

/// Pass/warning/fail tallies for one check catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckTally {
    /// Number of passing checks.
    pub pass: u64,
    /// Number of warning checks.
    pub warning: u64,
    /// Number of failing checks.
    pub fail: u64,
    /// Codes of the non-passing checks.
    pub flagged_codes: Vec<String>,
}

impl CheckTally {
    fn add(&mut self, code: &str, status: CheckStatus) {
        match status {
            CheckStatus::Pass => self.pass += 1,
            CheckStatus::Warning => {
                self.warning += 1;
                self.flagged_codes.push(code.to_string());
            }
            CheckStatus::Fail => {
                self.fail += 1;
                self.flagged_codes.push(code.to_string());
            }
        }
    }
}

/// The condensed statistical summary of one fiscal snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotDigest {
    /// Fiscal year label the digest covers.
    pub fiscal_year: String,
    /// Invoice totals per month, keyed "YYYY-MM".
    pub monthly_revenue: BTreeMap<String, Decimal>,
    /// Bill plus expense totals per month, keyed "YYYY-MM".
    pub monthly_expenses: BTreeMap<String, Decimal>,
    /// Manual share of journal entries per month, keyed "YYYY-MM", 0-1.
    pub manual_entry_ratio: BTreeMap<String, Decimal>,
    /// Top vendors by spend with their concentration share.
    pub top_vendor_spend: Vec<VendorSpend>,
    /// Round-figure journal lines counted by the rule engine.
    pub round_figure_count: u64,
    /// Compliance check tallies.
    pub compliance: CheckTally,
    /// IFC check tallies.
    pub ifc: CheckTally,
}

fn month_key(date: chrono::NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// Builds the digest from a snapshot and the deterministic results.
pub fn build_digest(
    snapshot: &FiscalSnapshot,
    findings: &[Finding],
    assessments: &[IfcAssessment],
    config: &ScoringConfig,
) -> SnapshotDigest {
    let mut monthly_revenue: BTreeMap<String, Decimal> = BTreeMap::new();
    for invoice in &snapshot.invoices {
        *monthly_revenue.entry(month_key(invoice.date)).or_default() += invoice.total_amount;
    }

    let mut monthly_expenses: BTreeMap<String, Decimal> = BTreeMap::new();
    for bill in &snapshot.bills {
        *monthly_expenses.entry(month_key(bill.date)).or_default() += bill.total_amount;
    }
    for expense in &snapshot.expenses {
        *monthly_expenses.entry(month_key(expense.date)).or_default() += expense.amount;
    }

    let mut entries_by_month: BTreeMap<String, (u64, u64)> = BTreeMap::new();
    for entry in &snapshot.journal_entries {
        let slot = entries_by_month.entry(month_key(entry.date)).or_default();
        slot.0 += 1;
        if entry.is_manual {
            slot.1 += 1;
        }
    }
    let manual_entry_ratio = entries_by_month
        .into_iter()
        .map(|(month, (total, manual))| {
            (month, Decimal::from(manual) / Decimal::from(total))
        })
        .collect();

    let mut spend_by_vendor: BTreeMap<String, Decimal> = BTreeMap::new();
    for bill in &snapshot.bills {
        let name = snapshot
            .vendor(bill.vendor_id)
            .map(|v| v.name.clone())
            .unwrap_or_else(|| "(unknown vendor)".to_string());
        *spend_by_vendor.entry(name).or_default() += bill.total_amount;
    }
    let total_spend: Decimal = spend_by_vendor.values().copied().sum();
    let mut top_vendor_spend: Vec<VendorSpend> = spend_by_vendor
        .into_iter()
        .map(|(name, total)| VendorSpend {
            name,
            total,
            share: if total_spend.is_zero() {
                Decimal::ZERO
            } else {
                total / total_spend
            },
        })
        .collect();
    top_vendor_spend.sort_by(|a, b| b.total.cmp(&a.total).then(a.name.cmp(&b.name)));
    top_vendor_spend.truncate(config.thresholds.top_vendor_count);

    let round_figure_count = findings
        .iter()
        .find(|f| f.check_code == "I2")
        .map(|f| f.affected_count)
        .unwrap_or(0);

    let mut compliance = CheckTally::default();
    for finding in findings {
        compliance.add(&finding.check_code, finding.status);
    }
    let mut ifc = CheckTally::default();
    for assessment in assessments {
        ifc.add(&assessment.check_code, assessment.status);
    }

    SnapshotDigest {
        fiscal_year: snapshot.fiscal_year.label.clone(),
        monthly_revenue,
        monthly_expenses,
        manual_entry_ratio,
        top_vendor_spend,
        round_figure_count,
        compliance,
        ifc,
    }
}
