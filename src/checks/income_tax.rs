//! Income-tax statutory checks.

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::config::ScoringConfig;
use crate::models::{CheckStatus, ComplianceModule, Finding, FiscalSnapshot, Severity};

use super::ComplianceCheck;

/// I1: cash disbursements above the statutory ceiling.
///
/// Section 40A(3) disallows cash expenses above the ceiling outright, so
/// any occurrence is a hard violation.
pub struct CashExpenseCeilingCheck;

impl ComplianceCheck for CashExpenseCeilingCheck {
    fn code(&self) -> &'static str {
        "I1"
    }

    fn name(&self) -> &'static str {
        "Cash expenses above statutory ceiling"
    }

    fn module(&self) -> ComplianceModule {
        ComplianceModule::IncomeTax
    }

    fn evaluate(&self, snapshot: &FiscalSnapshot, config: &ScoringConfig) -> Finding {
        let ceiling = config.thresholds.cash_expense_ceiling;
        let flagged: Vec<&crate::models::Expense> = snapshot
            .expenses
            .iter()
            .filter(|e| e.payment_mode == crate::models::PaymentMode::Cash && e.amount > ceiling)
            .collect();

        if flagged.is_empty() {
            return Finding::pass(
                self.module(),
                self.code(),
                self.name(),
                serde_json::json!({ "expenses_checked": snapshot.expenses.len() }),
            );
        }

        let affected_amount: Decimal = flagged.iter().map(|e| e.amount).sum();

        Finding {
            run_id: Uuid::nil(),
            module: self.module(),
            check_code: self.code().to_string(),
            check_name: self.name().to_string(),
            severity: Severity::Critical,
            status: CheckStatus::Fail,
            affected_count: flagged.len() as u64,
            affected_amount,
            recommendation: Some(
                "Route payments above the ceiling through banking channels; these expenses face disallowance"
                    .to_string(),
            ),
            details: serde_json::json!({
                "expenses_checked": snapshot.expenses.len(),
                "ceiling": ceiling.to_string(),
            }),
            record_refs: flagged.iter().map(|e| e.id.to_string()).collect(),
        }
    }
}

/// I2: round-figure journal amounts above the floor.
///
/// Round figures are a heuristic signal of estimated or fabricated
/// entries, counted without materiality weighting: pass below the count
/// threshold, warning at or above it, never critical.
pub struct RoundFigureJournalCheck;

impl ComplianceCheck for RoundFigureJournalCheck {
    fn code(&self) -> &'static str {
        "I2"
    }

    fn name(&self) -> &'static str {
        "Round-figure journal amounts"
    }

    fn module(&self) -> ComplianceModule {
        ComplianceModule::IncomeTax
    }

    fn evaluate(&self, snapshot: &FiscalSnapshot, config: &ScoringConfig) -> Finding {
        let floor = config.thresholds.round_figure_floor;
        let multiple = config.thresholds.round_figure_multiple;
        let threshold = config.thresholds.round_figure_count_threshold;

        let mut refs = Vec::new();
        let mut affected_amount = Decimal::ZERO;
        for entry in &snapshot.journal_entries {
            for line in &entry.lines {
                let amount = if line.debit > Decimal::ZERO {
                    line.debit
                } else {
                    line.credit
                };
                if amount >= floor && (amount % multiple).is_zero() {
                    refs.push(entry.id.to_string());
                    affected_amount += amount;
                }
            }
        }
        let count = refs.len() as u64;

        if count < threshold {
            return Finding::pass(
                self.module(),
                self.code(),
                self.name(),
                serde_json::json!({
                    "round_figure_lines": count,
                    "count_threshold": threshold,
                }),
            );
        }

        Finding {
            run_id: Uuid::nil(),
            module: self.module(),
            check_code: self.code().to_string(),
            check_name: self.name().to_string(),
            severity: Severity::Warning,
            status: CheckStatus::Warning,
            affected_count: count,
            affected_amount,
            recommendation: Some(
                "Sample the round-figure entries and vouch them to source documents".to_string(),
            ),
            details: serde_json::json!({
                "round_figure_lines": count,
                "count_threshold": threshold,
                "floor": floor.to_string(),
            }),
            record_refs: refs,
        }
    }
}
