//! Ledger and reference integrity checks.

use std::collections::HashSet;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::config::ScoringConfig;
use crate::models::{CheckStatus, ComplianceModule, Finding, FiscalSnapshot, Severity};

use super::ComplianceCheck;

/// D1: per-entry debit/credit balance.
///
/// An unbalanced ledger invalidates every downstream number, so this
/// check is the correctness gate for the whole snapshot. The affected
/// amount sums the absolute imbalances.
pub struct JournalBalanceCheck;

impl ComplianceCheck for JournalBalanceCheck {
    fn code(&self) -> &'static str {
        "D1"
    }

    fn name(&self) -> &'static str {
        "Journal entry balance"
    }

    fn module(&self) -> ComplianceModule {
        ComplianceModule::DataIntegrity
    }

    fn evaluate(&self, snapshot: &FiscalSnapshot, config: &ScoringConfig) -> Finding {
        let epsilon = config.thresholds.balance_epsilon;

        let mut refs = Vec::new();
        let mut affected_amount = Decimal::ZERO;
        for entry in &snapshot.journal_entries {
            let imbalance = (entry.total_debit() - entry.total_credit()).abs();
            // An imbalance at the epsilon itself already fails.
            if imbalance >= epsilon {
                refs.push(entry.id.to_string());
                affected_amount += imbalance;
            }
        }

        if refs.is_empty() {
            return Finding::pass(
                self.module(),
                self.code(),
                self.name(),
                serde_json::json!({ "entries_checked": snapshot.journal_entries.len() }),
            );
        }

        Finding {
            run_id: Uuid::nil(),
            module: self.module(),
            check_code: self.code().to_string(),
            check_name: self.name().to_string(),
            severity: Severity::Critical,
            status: CheckStatus::Fail,
            affected_count: refs.len() as u64,
            affected_amount,
            recommendation: Some(
                "Repost the unbalanced entries; the trial balance cannot close until they balance"
                    .to_string(),
            ),
            details: serde_json::json!({
                "entries_checked": snapshot.journal_entries.len(),
                "epsilon": epsilon.to_string(),
            }),
            record_refs: refs,
        }
    }
}

/// D2: journal lines referencing accounts absent from the chart.
pub struct AccountReferenceCheck;

impl ComplianceCheck for AccountReferenceCheck {
    fn code(&self) -> &'static str {
        "D2"
    }

    fn name(&self) -> &'static str {
        "Journal lines with unknown accounts"
    }

    fn module(&self) -> ComplianceModule {
        ComplianceModule::DataIntegrity
    }

    fn evaluate(&self, snapshot: &FiscalSnapshot, _config: &ScoringConfig) -> Finding {
        // An empty chart means accounts were not fetched; flagging every
        // line would be noise, not signal.
        if snapshot.accounts.is_empty() {
            return Finding::pass(
                self.module(),
                self.code(),
                self.name(),
                serde_json::json!({ "entries_checked": snapshot.journal_entries.len(), "accounts": 0 }),
            );
        }

        let known: HashSet<&str> = snapshot.accounts.iter().map(|a| a.code.as_str()).collect();

        let mut refs = Vec::new();
        let mut affected_amount = Decimal::ZERO;
        for entry in &snapshot.journal_entries {
            let unknown_lines: Vec<&crate::models::JournalLine> = entry
                .lines
                .iter()
                .filter(|l| !known.contains(l.account_code.as_str()))
                .collect();
            if !unknown_lines.is_empty() {
                refs.push(entry.id.to_string());
                affected_amount += unknown_lines
                    .iter()
                    .map(|l| l.debit + l.credit)
                    .sum::<Decimal>();
            }
        }

        if refs.is_empty() {
            return Finding::pass(
                self.module(),
                self.code(),
                self.name(),
                serde_json::json!({
                    "entries_checked": snapshot.journal_entries.len(),
                    "accounts": snapshot.accounts.len(),
                }),
            );
        }

        Finding {
            run_id: Uuid::nil(),
            module: self.module(),
            check_code: self.code().to_string(),
            check_name: self.name().to_string(),
            severity: Severity::Critical,
            status: CheckStatus::Fail,
            affected_count: refs.len() as u64,
            affected_amount,
            recommendation: Some(
                "Map the orphaned account codes to the chart of accounts".to_string(),
            ),
            details: serde_json::json!({
                "entries_checked": snapshot.journal_entries.len(),
                "accounts": snapshot.accounts.len(),
            }),
            record_refs: refs,
        }
    }
}
