//! The five control-weakness checks.

use chrono::Datelike;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::config::ScoringConfig;
use crate::models::{
    CheckStatus, EntryStatus, FiscalSnapshot, IfcAssessment, IfcCheckType, Severity,
};

use super::IfcCheck;

fn ratio(part: usize, whole: usize) -> Decimal {
    if whole == 0 {
        Decimal::ZERO
    } else {
        Decimal::from(part as u64) / Decimal::from(whole as u64)
    }
}

/// C1: share of manually-entered journal entries.
///
/// Graduated severity: above the warning threshold the control is weak,
/// above the critical threshold it has effectively failed.
pub struct ManualJournalRatioCheck;

impl IfcCheck for ManualJournalRatioCheck {
    fn code(&self) -> &'static str {
        "C1"
    }

    fn name(&self) -> &'static str {
        "Manual journal entry ratio"
    }

    fn check_type(&self) -> IfcCheckType {
        IfcCheckType::SegregationOfDuties
    }

    fn evaluate(&self, snapshot: &FiscalSnapshot, config: &ScoringConfig) -> IfcAssessment {
        let total = snapshot.journal_entries.len();
        let manual = snapshot
            .journal_entries
            .iter()
            .filter(|e| e.is_manual)
            .count();
        let manual_ratio = ratio(manual, total);

        let details = serde_json::json!({
            "total_entries": total,
            "manual_entries": manual,
            "manual_ratio": manual_ratio.to_string(),
        });

        let (status, severity) = if manual_ratio > config.thresholds.manual_ratio_critical {
            (CheckStatus::Fail, Severity::Critical)
        } else if manual_ratio > config.thresholds.manual_ratio_warning {
            (CheckStatus::Warning, Severity::Warning)
        } else {
            return IfcAssessment::pass(self.check_type(), self.code(), self.name(), details);
        };

        IfcAssessment {
            run_id: Uuid::nil(),
            check_type: self.check_type(),
            check_code: self.code().to_string(),
            check_name: self.name().to_string(),
            severity,
            status,
            affected_count: manual as u64,
            affected_amount: Decimal::ZERO,
            recommendation: Some(
                "Automate recurring postings to reduce dependence on manual entries".to_string(),
            ),
            details,
        }
    }
}

/// C2: posted entries with no approver identity.
///
/// A posted entry nobody approved is a maker-checker breach, always
/// critical.
pub struct MissingApproverCheck;

impl IfcCheck for MissingApproverCheck {
    fn code(&self) -> &'static str {
        "C2"
    }

    fn name(&self) -> &'static str {
        "Posted entries without approver"
    }

    fn check_type(&self) -> IfcCheckType {
        IfcCheckType::MakerChecker
    }

    fn evaluate(&self, snapshot: &FiscalSnapshot, _config: &ScoringConfig) -> IfcAssessment {
        let flagged: Vec<&crate::models::JournalEntry> = snapshot
            .journal_entries
            .iter()
            .filter(|e| e.status == EntryStatus::Posted && e.approved_by.is_none())
            .collect();

        if flagged.is_empty() {
            return IfcAssessment::pass(
                self.check_type(),
                self.code(),
                self.name(),
                serde_json::json!({ "entries_checked": snapshot.journal_entries.len() }),
            );
        }

        let affected_amount: Decimal = flagged.iter().map(|e| e.total_debit()).sum();

        IfcAssessment {
            run_id: Uuid::nil(),
            check_type: self.check_type(),
            check_code: self.code().to_string(),
            check_name: self.name().to_string(),
            severity: Severity::Critical,
            status: CheckStatus::Fail,
            affected_count: flagged.len() as u64,
            affected_amount,
            recommendation: Some(
                "Enforce approval before posting; review the unapproved entries retrospectively"
                    .to_string(),
            ),
            details: serde_json::json!({
                "entries_checked": snapshot.journal_entries.len(),
                "unapproved": flagged.iter().map(|e| e.entry_number.clone()).collect::<Vec<_>>(),
            }),
        }
    }
}

/// C3: concentration of entries in the fiscal year's final month.
///
/// Heavy March posting suggests period-end adjustments; the status stays
/// a warning but the severity escalates at the critical share.
pub struct FinalMonthConcentrationCheck;

impl IfcCheck for FinalMonthConcentrationCheck {
    fn code(&self) -> &'static str {
        "C3"
    }

    fn name(&self) -> &'static str {
        "Final-month entry concentration"
    }

    fn check_type(&self) -> IfcCheckType {
        IfcCheckType::PeriodControls
    }

    fn evaluate(&self, snapshot: &FiscalSnapshot, config: &ScoringConfig) -> IfcAssessment {
        let total = snapshot.journal_entries.len();
        let (final_year, final_month) = snapshot.fiscal_year.final_month();
        let in_final_month = snapshot
            .journal_entries
            .iter()
            .filter(|e| e.date.year() == final_year && e.date.month() == final_month)
            .count();
        let share = ratio(in_final_month, total);

        let details = serde_json::json!({
            "total_entries": total,
            "final_month_entries": in_final_month,
            "share": share.to_string(),
        });

        let severity = if share > config.thresholds.final_month_critical {
            Severity::Critical
        } else if share > config.thresholds.final_month_warning {
            Severity::Warning
        } else {
            return IfcAssessment::pass(self.check_type(), self.code(), self.name(), details);
        };

        IfcAssessment {
            run_id: Uuid::nil(),
            check_type: self.check_type(),
            check_code: self.code().to_string(),
            check_name: self.name().to_string(),
            severity,
            status: CheckStatus::Warning,
            affected_count: in_final_month as u64,
            affected_amount: Decimal::ZERO,
            recommendation: Some(
                "Review final-month entries for period-end adjustments posted in bulk".to_string(),
            ),
            details,
        }
    }
}

/// C4: override and unlock actions in the audit trail.
pub struct OverrideActionsCheck;

impl IfcCheck for OverrideActionsCheck {
    fn code(&self) -> &'static str {
        "C4"
    }

    fn name(&self) -> &'static str {
        "Override and unlock actions"
    }

    fn check_type(&self) -> IfcCheckType {
        IfcCheckType::OverrideControls
    }

    fn evaluate(&self, snapshot: &FiscalSnapshot, config: &ScoringConfig) -> IfcAssessment {
        let overrides = snapshot
            .audit_logs
            .iter()
            .filter(|l| {
                let action = l.action.to_lowercase();
                action.contains("override") || action.contains("unlock")
            })
            .count() as u64;

        let details = serde_json::json!({
            "audit_log_entries": snapshot.audit_logs.len(),
            "override_actions": overrides,
        });

        let severity = if overrides > config.thresholds.override_critical_count {
            Severity::Critical
        } else if overrides > config.thresholds.override_warning_count {
            Severity::Warning
        } else {
            return IfcAssessment::pass(self.check_type(), self.code(), self.name(), details);
        };

        IfcAssessment {
            run_id: Uuid::nil(),
            check_type: self.check_type(),
            check_code: self.code().to_string(),
            check_name: self.name().to_string(),
            severity,
            status: CheckStatus::Warning,
            affected_count: overrides,
            affected_amount: Decimal::ZERO,
            recommendation: Some(
                "Investigate who is overriding controls and why; tighten the unlock policy"
                    .to_string(),
            ),
            details,
        }
    }
}

/// C5: entries created long after their effective date.
pub struct BackdatedEntryCheck;

impl IfcCheck for BackdatedEntryCheck {
    fn code(&self) -> &'static str {
        "C5"
    }

    fn name(&self) -> &'static str {
        "Backdated journal entries"
    }

    fn check_type(&self) -> IfcCheckType {
        IfcCheckType::PeriodControls
    }

    fn evaluate(&self, snapshot: &FiscalSnapshot, config: &ScoringConfig) -> IfcAssessment {
        let max_lag = config.thresholds.backdated_entry_days;
        let flagged: Vec<&crate::models::JournalEntry> = snapshot
            .journal_entries
            .iter()
            .filter(|e| (e.created_at.date_naive() - e.date).num_days() > max_lag)
            .collect();

        if flagged.is_empty() {
            return IfcAssessment::pass(
                self.check_type(),
                self.code(),
                self.name(),
                serde_json::json!({ "entries_checked": snapshot.journal_entries.len() }),
            );
        }

        IfcAssessment {
            run_id: Uuid::nil(),
            check_type: self.check_type(),
            check_code: self.code().to_string(),
            check_name: self.name().to_string(),
            severity: Severity::Warning,
            status: CheckStatus::Warning,
            affected_count: flagged.len() as u64,
            affected_amount: Decimal::ZERO,
            recommendation: Some(
                "Close books monthly so entries are captured close to their effective date"
                    .to_string(),
            ),
            details: serde_json::json!({
                "entries_checked": snapshot.journal_entries.len(),
                "max_lag_days": max_lag,
            }),
        }
    }
}
