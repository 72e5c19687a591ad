//! The audit run entity and its lifecycle state machine.
//!
//! A run is created `Running` before any check executes and moves to
//! exactly one of the terminal states `Completed` or `Failed`. Terminal
//! states are never re-entered; the orchestrator is the only mutator.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AuditError, AuditResult};

/// The kind of audit execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunType {
    /// Deterministic checks plus the reasoning delegate and full scoring.
    Full,
    /// Deterministic checks only; the delegate is never invoked.
    Simulation,
}

/// Lifecycle status of an audit run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Checks are executing; child rows may still be inserted.
    Running,
    /// All scores are populated; the run is immutable.
    Completed,
    /// The run aborted; no scores are populated; the run is immutable.
    Failed,
}

impl RunStatus {
    /// Returns true for `Completed` and `Failed`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunStatus::Completed | RunStatus::Failed)
    }

    /// The lowercase wire name of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Running => "running",
            RunStatus::Completed => "completed",
            RunStatus::Failed => "failed",
        }
    }
}

/// Qualitative internal-financial-controls rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IfcRating {
    /// Two or more control checks failed.
    Weak,
    /// One failure, or three or more warnings.
    Moderate,
    /// No failures and fewer than three warnings.
    Strong,
}

/// Scores written onto a run when it completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunScores {
    /// Weighted compliance score, 0-100.
    pub compliance_score: Decimal,
    /// AI risk index, 0-100, absent for simulation runs.
    pub ai_risk_index: Option<Decimal>,
    /// Qualitative controls rating.
    pub ifc_rating: IfcRating,
    /// Per-bucket compliance sub-scores.
    pub score_breakdown: BTreeMap<String, Decimal>,
    /// Per-component AI risk contributions, absent for simulation runs.
    pub risk_breakdown: BTreeMap<String, Decimal>,
}

/// One audit execution instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRun {
    /// Unique run identifier.
    pub id: Uuid,
    /// The organization the run audits.
    pub organization_id: Uuid,
    /// Fiscal year label, e.g. "2025-26".
    pub fiscal_year: String,
    /// Identity of the caller that started the run.
    pub initiated_by: String,
    /// The kind of execution.
    pub run_type: RunType,
    /// Lifecycle status.
    pub status: RunStatus,
    /// When the run was created.
    pub started_at: DateTime<Utc>,
    /// When the run reached a terminal state.
    pub finished_at: Option<DateTime<Utc>>,
    /// Scores, present only once the run is completed.
    pub scores: Option<RunScores>,
}

impl AuditRun {
    /// Creates a new run in the `Running` state.
    pub fn new(
        organization_id: Uuid,
        fiscal_year: &str,
        initiated_by: &str,
        run_type: RunType,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            organization_id,
            fiscal_year: fiscal_year.to_string(),
            initiated_by: initiated_by.to_string(),
            run_type,
            status: RunStatus::Running,
            started_at: Utc::now(),
            finished_at: None,
            scores: None,
        }
    }

    /// Transitions the run to `Completed` with its scores.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRunState` if the run is already terminal.
    pub fn complete(&mut self, scores: RunScores) -> AuditResult<()> {
        self.guard_transition()?;
        self.status = RunStatus::Completed;
        self.finished_at = Some(Utc::now());
        self.scores = Some(scores);
        Ok(())
    }

    /// Transitions the run to `Failed`, clearing any scores.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRunState` if the run is already terminal.
    pub fn fail(&mut self) -> AuditResult<()> {
        self.guard_transition()?;
        self.status = RunStatus::Failed;
        self.finished_at = Some(Utc::now());
        self.scores = None;
        Ok(())
    }

    fn guard_transition(&self) -> AuditResult<()> {
        if self.status.is_terminal() {
            return Err(AuditError::InvalidRunState {
                run_id: self.id,
                status: self.status.as_str().to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn sample_scores() -> RunScores {
        RunScores {
            compliance_score: dec("92.5"),
            ai_risk_index: Some(dec("18.0")),
            ifc_rating: IfcRating::Strong,
            score_breakdown: BTreeMap::new(),
            risk_breakdown: BTreeMap::new(),
        }
    }

    #[test]
    fn test_new_run_is_running_without_scores() {
        let run = AuditRun::new(Uuid::new_v4(), "2025-26", "user_1", RunType::Full);
        assert_eq!(run.status, RunStatus::Running);
        assert!(run.scores.is_none());
        assert!(run.finished_at.is_none());
    }

    #[test]
    fn test_complete_populates_scores_and_finished_at() {
        let mut run = AuditRun::new(Uuid::new_v4(), "2025-26", "user_1", RunType::Full);
        run.complete(sample_scores()).unwrap();
        assert_eq!(run.status, RunStatus::Completed);
        assert!(run.scores.is_some());
        assert!(run.finished_at.is_some());
    }

    #[test]
    fn test_fail_clears_scores() {
        let mut run = AuditRun::new(Uuid::new_v4(), "2025-26", "user_1", RunType::Full);
        run.fail().unwrap();
        assert_eq!(run.status, RunStatus::Failed);
        assert!(run.scores.is_none());
    }

    #[test]
    fn test_completed_run_rejects_fail() {
        let mut run = AuditRun::new(Uuid::new_v4(), "2025-26", "user_1", RunType::Full);
        run.complete(sample_scores()).unwrap();

        let result = run.fail();
        assert!(matches!(
            result,
            Err(AuditError::InvalidRunState { status, .. }) if status == "completed"
        ));
    }

    #[test]
    fn test_failed_run_rejects_complete() {
        let mut run = AuditRun::new(Uuid::new_v4(), "2025-26", "user_1", RunType::Full);
        run.fail().unwrap();

        let result = run.complete(sample_scores());
        assert!(matches!(
            result,
            Err(AuditError::InvalidRunState { status, .. }) if status == "failed"
        ));
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!RunStatus::Running.is_terminal());
        assert!(RunStatus::Completed.is_terminal());
        assert!(RunStatus::Failed.is_terminal());
    }

    #[test]
    fn test_run_type_serialization() {
        assert_eq!(
            serde_json::to_string(&RunType::Simulation).unwrap(),
            "\"simulation\""
        );
    }

    #[test]
    fn test_ifc_rating_serialization() {
        assert_eq!(serde_json::to_string(&IfcRating::Weak).unwrap(), "\"Weak\"");
        assert_eq!(
            serde_json::to_string(&IfcRating::Strong).unwrap(),
            "\"Strong\""
        );
    }
}
