//! Configuration types for scoring constants and check thresholds.
//!
//! The point allocations and risk caps were tuned operationally; they are
//! kept as named, overridable values rather than re-derived.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fixed point allocations per scoring bucket. The five allocations must
/// sum to exactly 100.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModuleAllocations {
    /// Points allocated to GST checks.
    pub gst: Decimal,
    /// Points allocated to TDS checks.
    pub tds: Decimal,
    /// Points allocated to income-tax checks (fixed-asset findings score
    /// in this bucket since depreciation feeds the tax computation).
    pub income_tax: Decimal,
    /// Points allocated to IFC assessments.
    pub ifc: Decimal,
    /// Points allocated to data-integrity checks.
    pub data_integrity: Decimal,
}

impl Default for ModuleAllocations {
    fn default() -> Self {
        Self {
            gst: Decimal::from(25),
            tds: Decimal::from(20),
            income_tax: Decimal::from(20),
            ifc: Decimal::from(20),
            data_integrity: Decimal::from(15),
        }
    }
}

impl ModuleAllocations {
    /// Sum of the five allocations.
    pub fn total(&self) -> Decimal {
        self.gst + self.tds + self.income_tax + self.ifc + self.data_integrity
    }
}

/// Per-component caps on the AI risk breakdown. Each component from the
/// delegate is clamped to its cap before summing; caps sum to 100.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskComponentCaps {
    /// Cap on the revenue-anomaly component.
    pub revenue_anomaly: Decimal,
    /// Cap on the expense-anomaly component.
    pub expense_anomaly: Decimal,
    /// Cap on the vendor-concentration component.
    pub vendor_concentration: Decimal,
    /// Cap on the manual-entry-risk component.
    pub manual_entry_risk: Decimal,
    /// Cap on the compliance-gap component.
    pub compliance_gap: Decimal,
    /// Cap on the control-weakness component.
    pub control_weakness: Decimal,
    /// Cap on the data-quality component.
    pub data_quality: Decimal,
}

impl Default for RiskComponentCaps {
    fn default() -> Self {
        Self {
            revenue_anomaly: Decimal::from(20),
            expense_anomaly: Decimal::from(15),
            vendor_concentration: Decimal::from(15),
            manual_entry_risk: Decimal::from(15),
            compliance_gap: Decimal::from(15),
            control_weakness: Decimal::from(10),
            data_quality: Decimal::from(10),
        }
    }
}

/// Thresholds used by the deterministic checks and IFC assessor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckThresholds {
    /// Rounding tolerance for invoice arithmetic, in currency units.
    pub invoice_tolerance: Decimal,
    /// Statutory ceiling on single cash disbursements (section 40A(3)).
    pub cash_expense_ceiling: Decimal,
    /// Floor above which round-figure journal amounts are counted.
    pub round_figure_floor: Decimal,
    /// A journal amount is round if it is a multiple of this value.
    pub round_figure_multiple: Decimal,
    /// Round-figure occurrences at or above this count raise a warning.
    pub round_figure_count_threshold: u64,
    /// Per-entry debit/credit imbalance at or above this value fails
    /// the balance check.
    pub balance_epsilon: Decimal,
    /// Manual-journal ratio above which a warning is raised.
    pub manual_ratio_warning: Decimal,
    /// Manual-journal ratio above which the check fails.
    pub manual_ratio_critical: Decimal,
    /// Final-month entry share above which a warning is raised.
    pub final_month_warning: Decimal,
    /// Final-month entry share above which the warning becomes critical.
    pub final_month_critical: Decimal,
    /// Override/unlock count above which a warning is raised.
    pub override_warning_count: u64,
    /// Override/unlock count above which the warning becomes critical.
    pub override_critical_count: u64,
    /// Days after the effective date beyond which an entry is backdated.
    pub backdated_entry_days: i64,
    /// Maximum audit-trail entries pulled into a snapshot.
    pub audit_log_window: usize,
    /// Number of top vendors summarized in the delegate digest.
    pub top_vendor_count: usize,
}

impl Default for CheckThresholds {
    fn default() -> Self {
        Self {
            invoice_tolerance: Decimal::ONE,
            cash_expense_ceiling: Decimal::from(10_000),
            round_figure_floor: Decimal::from(10_000),
            round_figure_multiple: Decimal::from(1_000),
            round_figure_count_threshold: 10,
            balance_epsilon: Decimal::new(1, 2),
            manual_ratio_warning: Decimal::new(15, 2),
            manual_ratio_critical: Decimal::new(30, 2),
            final_month_warning: Decimal::new(25, 2),
            final_month_critical: Decimal::new(40, 2),
            override_warning_count: 10,
            override_critical_count: 25,
            backdated_entry_days: 30,
            audit_log_window: 1_000,
            top_vendor_count: 10,
        }
    }
}

/// The full scoring configuration consumed by checks, the IFC assessor,
/// the delegate digest and the score compiler.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Point allocations per scoring bucket.
    pub allocations: ModuleAllocations,
    /// Caps on AI risk-breakdown components.
    pub risk_caps: RiskComponentCaps,
    /// Check thresholds.
    pub thresholds: CheckThresholds,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_allocations_sum_to_100() {
        let allocations = ModuleAllocations::default();
        assert_eq!(allocations.total(), Decimal::from(100));
    }

    #[test]
    fn test_default_risk_caps_sum_to_100() {
        let caps = RiskComponentCaps::default();
        let total = caps.revenue_anomaly
            + caps.expense_anomaly
            + caps.vendor_concentration
            + caps.manual_entry_risk
            + caps.compliance_gap
            + caps.control_weakness
            + caps.data_quality;
        assert_eq!(total, Decimal::from(100));
    }

    #[test]
    fn test_default_thresholds() {
        let thresholds = CheckThresholds::default();
        assert_eq!(thresholds.invoice_tolerance, Decimal::ONE);
        assert_eq!(thresholds.cash_expense_ceiling, Decimal::from(10_000));
        assert_eq!(thresholds.balance_epsilon, Decimal::new(1, 2));
        assert_eq!(thresholds.backdated_entry_days, 30);
    }

    #[test]
    fn test_scoring_config_partial_yaml_uses_defaults() {
        let yaml = "thresholds:\n  round_figure_count_threshold: 5\n";
        let config: ScoringConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.thresholds.round_figure_count_threshold, 5);
        assert_eq!(config.allocations.gst, Decimal::from(25));
    }
}
