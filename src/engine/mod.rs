//! The audit run orchestrator.
//!
//! Owns the run lifecycle: create `Running`, execute the pipeline,
//! terminate `Completed` or `Failed`. Every child row is stamped with
//! the run id before insertion, so a crashed run leaves an inspectable
//! `Failed` row and its partial evidence rather than dangling state.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::config::ScoringConfig;
use crate::datastore::Datastore;
use crate::delegate::{build_digest, RiskDelegate};
use crate::error::AuditResult;
use crate::ifc::run_ifc_checks;
use crate::models::{AuditRun, FiscalYear, IfcRating, RunType};
use crate::scoring::compile_scores;
use crate::snapshot::gather_snapshot;

/// Summary of one finished audit run.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditOutcome {
    /// Identifier of the completed run.
    pub run_id: Uuid,
    /// The kind of execution the run performed.
    pub run_type: RunType,
    /// Weighted compliance score, 0-100.
    pub compliance_score: Decimal,
    /// AI risk index, absent for simulations.
    pub ai_risk_index: Option<Decimal>,
    /// Qualitative controls rating.
    pub ifc_rating: IfcRating,
    /// Number of compliance checks evaluated.
    pub checks_count: usize,
    /// Number of IFC checks evaluated.
    pub ifc_count: usize,
}

/// Orchestrates audit runs over a datastore and a risk delegate.
pub struct AuditEngine {
    store: Arc<dyn Datastore>,
    delegate: Arc<dyn RiskDelegate>,
    config: ScoringConfig,
}

impl AuditEngine {
    /// Creates an engine over the given collaborators.
    pub fn new(
        store: Arc<dyn Datastore>,
        delegate: Arc<dyn RiskDelegate>,
        config: ScoringConfig,
    ) -> Self {
        Self {
            store,
            delegate,
            config,
        }
    }

    /// Runs a full audit: deterministic checks, the risk delegate, and
    /// complete scoring.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFiscalYear` before any run row exists; any later
    /// failure marks the run `Failed` and is then re-raised.
    #[instrument(skip(self), fields(%org))]
    pub async fn run_full_audit(
        &self,
        org: Uuid,
        fiscal_year: &str,
        initiated_by: &str,
    ) -> AuditResult<AuditOutcome> {
        self.run(org, fiscal_year, initiated_by, RunType::Full).await
    }

    /// Runs a pre-audit simulation: deterministic checks and compliance
    /// scoring only. The delegate is never consulted.
    ///
    /// # Errors
    ///
    /// Same failure contract as [`AuditEngine::run_full_audit`].
    #[instrument(skip(self), fields(%org))]
    pub async fn pre_audit_simulation(
        &self,
        org: Uuid,
        fiscal_year: &str,
        initiated_by: &str,
    ) -> AuditResult<AuditOutcome> {
        self.run(org, fiscal_year, initiated_by, RunType::Simulation)
            .await
    }

    async fn run(
        &self,
        org: Uuid,
        fiscal_year: &str,
        initiated_by: &str,
        run_type: RunType,
    ) -> AuditResult<AuditOutcome> {
        // The label gate runs before any row is written.
        FiscalYear::parse(fiscal_year)?;

        let mut run = AuditRun::new(org, fiscal_year, initiated_by, run_type);
        self.store.insert_run(&run).await?;
        info!(run_id = %run.id, ?run_type, fiscal_year, "audit run started");

        match self.execute(&run).await {
            Ok(outcome) => {
                let mut completed = run.clone();
                completed.complete(outcome.scores)?;
                if let Err(err) = self.store.update_run(&completed).await {
                    // The terminal write itself failed; the row must not
                    // stay running, so fall back to the failure path.
                    error!(run_id = %run.id, error = %err, "failed to persist completed run");
                    self.mark_failed(&mut run).await;
                    return Err(err);
                }
                info!(
                    run_id = %run.id,
                    compliance_score = %outcome.summary.compliance_score,
                    "audit run completed"
                );
                Ok(outcome.summary)
            }
            Err(err) => {
                error!(run_id = %run.id, error = %err, "audit run failed");
                self.mark_failed(&mut run).await;
                Err(err)
            }
        }
    }

    /// Terminates the row even if the store is degraded; the original
    /// error is the one the caller needs, so write failures here are
    /// logged and swallowed.
    async fn mark_failed(&self, run: &mut AuditRun) {
        if run.fail().is_ok() {
            if let Err(err) = self.store.update_run(run).await {
                error!(run_id = %run.id, error = %err, "failed to mark run failed");
            }
        }
    }

    async fn execute(&self, run: &AuditRun) -> AuditResult<ExecutionOutcome> {
        let snapshot = gather_snapshot(
            self.store.as_ref(),
            run.organization_id,
            &run.fiscal_year,
            &self.config,
        )
        .await?;

        let mut findings = crate::checks::run_compliance_checks(&snapshot, &self.config);
        for finding in &mut findings {
            finding.run_id = run.id;
        }
        let mut assessments = run_ifc_checks(&snapshot, &self.config);
        for assessment in &mut assessments {
            assessment.run_id = run.id;
        }
        self.store.insert_findings(&findings).await?;
        self.store.insert_assessments(&assessments).await?;

        let risk = match run.run_type {
            RunType::Simulation => None,
            RunType::Full => {
                let digest = build_digest(&snapshot, &findings, &assessments, &self.config);
                let mut assessment = self.delegate.assess(&digest).await?;
                for anomaly in &mut assessment.anomalies {
                    anomaly.run_id = run.id;
                }
                for theme in &mut assessment.risk_themes {
                    theme.run_id = run.id;
                }
                for sample in &mut assessment.samples {
                    sample.run_id = run.id;
                }
                for narrative in &mut assessment.narratives {
                    narrative.run_id = run.id;
                }
                self.store.insert_anomalies(&assessment.anomalies).await?;
                self.store.insert_themes(&assessment.risk_themes).await?;
                self.store.insert_samples(&assessment.samples).await?;
                self.store.insert_narratives(&assessment.narratives).await?;
                Some(assessment.risk_breakdown)
            }
        };

        let scores = compile_scores(&findings, &assessments, risk.as_ref(), &self.config);
        let summary = AuditOutcome {
            run_id: run.id,
            run_type: run.run_type,
            compliance_score: scores.compliance_score,
            ai_risk_index: scores.ai_risk_index,
            ifc_rating: scores.ifc_rating,
            checks_count: findings.len(),
            ifc_count: assessments.len(),
        };
        Ok(ExecutionOutcome { scores, summary })
    }
}

struct ExecutionOutcome {
    scores: crate::models::RunScores,
    summary: AuditOutcome,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datastore::MemoryStore;
    use crate::delegate::{RiskAssessment, RiskBreakdown, SnapshotDigest, StaticRiskDelegate};
    use crate::error::AuditError;
    use crate::models::RunStatus;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn engine_with(
        store: Arc<MemoryStore>,
        delegate: Arc<StaticRiskDelegate>,
    ) -> AuditEngine {
        AuditEngine::new(store, delegate, ScoringConfig::default())
    }

    #[tokio::test]
    async fn test_full_audit_on_empty_org_scores_clean() {
        let store = Arc::new(MemoryStore::new());
        let delegate = Arc::new(StaticRiskDelegate::default());
        let engine = engine_with(store.clone(), delegate.clone());

        let outcome = engine
            .run_full_audit(Uuid::new_v4(), "2025-26", "auditor_1")
            .await
            .unwrap();

        assert_eq!(outcome.compliance_score, dec("100"));
        assert_eq!(outcome.ifc_rating, IfcRating::Strong);
        assert_eq!(outcome.checks_count, 12);
        assert_eq!(outcome.ifc_count, 5);
        assert_eq!(outcome.ai_risk_index, Some(Decimal::ZERO));
        assert_eq!(delegate.call_count(), 1);

        let run = store.get_run(outcome.run_id).await.unwrap().unwrap();
        assert_eq!(run.status, RunStatus::Completed);
        assert!(run.scores.is_some());
    }

    #[tokio::test]
    async fn test_simulation_never_consults_the_delegate() {
        let store = Arc::new(MemoryStore::new());
        let delegate = Arc::new(StaticRiskDelegate::default());
        let engine = engine_with(store.clone(), delegate.clone());

        let outcome = engine
            .pre_audit_simulation(Uuid::new_v4(), "2025-26", "auditor_1")
            .await
            .unwrap();

        assert_eq!(delegate.call_count(), 0);
        assert!(outcome.ai_risk_index.is_none());

        let run = store.get_run(outcome.run_id).await.unwrap().unwrap();
        assert_eq!(run.status, RunStatus::Completed);
        assert!(run.scores.unwrap().risk_breakdown.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_fiscal_year_creates_no_run() {
        let store = Arc::new(MemoryStore::new());
        let delegate = Arc::new(StaticRiskDelegate::default());
        let engine = engine_with(store.clone(), delegate);
        let org = Uuid::new_v4();

        let result = engine.run_full_audit(org, "2025-27", "auditor_1").await;
        assert!(matches!(
            result,
            Err(AuditError::InvalidFiscalYear { .. })
        ));
        assert!(store
            .latest_completed_run(org, "2025-27")
            .await
            .unwrap()
            .is_none());
    }

    struct FaultyDelegate;

    #[async_trait::async_trait]
    impl RiskDelegate for FaultyDelegate {
        async fn assess(&self, _digest: &SnapshotDigest) -> AuditResult<RiskAssessment> {
            Err(AuditError::DelegateUnavailable { status: 429 })
        }
    }

    #[tokio::test]
    async fn test_delegate_failure_marks_the_run_failed() {
        let store = Arc::new(MemoryStore::new());
        let engine =
            AuditEngine::new(store.clone(), Arc::new(FaultyDelegate), ScoringConfig::default());

        let result = engine
            .run_full_audit(Uuid::new_v4(), "2025-26", "auditor_1")
            .await;
        assert!(matches!(
            result,
            Err(AuditError::DelegateUnavailable { status: 429 })
        ));
    }

    /// Delegates to a [`MemoryStore`] but rejects any write of a
    /// `Completed` run, simulating a store that degrades right at the
    /// terminal transition.
    struct CompletionWriteFailsStore {
        inner: MemoryStore,
        last_run: std::sync::Mutex<Option<Uuid>>,
    }

    impl CompletionWriteFailsStore {
        fn new() -> Self {
            Self {
                inner: MemoryStore::new(),
                last_run: std::sync::Mutex::new(None),
            }
        }
    }

    #[async_trait::async_trait]
    impl crate::datastore::Datastore for CompletionWriteFailsStore {
        async fn accounts(&self, org: Uuid) -> AuditResult<Vec<crate::models::Account>> {
            self.inner.accounts(org).await
        }
        async fn journal_entries(
            &self,
            org: Uuid,
            start: chrono::NaiveDate,
            end: chrono::NaiveDate,
        ) -> AuditResult<Vec<crate::models::JournalEntry>> {
            self.inner.journal_entries(org, start, end).await
        }
        async fn invoices(
            &self,
            org: Uuid,
            start: chrono::NaiveDate,
            end: chrono::NaiveDate,
        ) -> AuditResult<Vec<crate::models::Invoice>> {
            self.inner.invoices(org, start, end).await
        }
        async fn bills(
            &self,
            org: Uuid,
            start: chrono::NaiveDate,
            end: chrono::NaiveDate,
        ) -> AuditResult<Vec<crate::models::Bill>> {
            self.inner.bills(org, start, end).await
        }
        async fn expenses(
            &self,
            org: Uuid,
            start: chrono::NaiveDate,
            end: chrono::NaiveDate,
        ) -> AuditResult<Vec<crate::models::Expense>> {
            self.inner.expenses(org, start, end).await
        }
        async fn vendors(&self, org: Uuid) -> AuditResult<Vec<crate::models::Vendor>> {
            self.inner.vendors(org).await
        }
        async fn customers(&self, org: Uuid) -> AuditResult<Vec<crate::models::Customer>> {
            self.inner.customers(org).await
        }
        async fn audit_logs(
            &self,
            org: Uuid,
            start: chrono::NaiveDate,
            end: chrono::NaiveDate,
            limit: usize,
        ) -> AuditResult<Vec<crate::models::AuditLogEntry>> {
            self.inner.audit_logs(org, start, end, limit).await
        }
        async fn assets(&self, org: Uuid) -> AuditResult<Vec<crate::models::FixedAsset>> {
            self.inner.assets(org).await
        }
        async fn payroll(
            &self,
            org: Uuid,
            start: chrono::NaiveDate,
            end: chrono::NaiveDate,
        ) -> AuditResult<Vec<crate::models::PayrollRecord>> {
            self.inner.payroll(org, start, end).await
        }
        async fn bank_transactions(
            &self,
            org: Uuid,
            start: chrono::NaiveDate,
            end: chrono::NaiveDate,
        ) -> AuditResult<Vec<crate::models::BankTransaction>> {
            self.inner.bank_transactions(org, start, end).await
        }
        async fn insert_run(&self, run: &AuditRun) -> AuditResult<()> {
            *self.last_run.lock().unwrap() = Some(run.id);
            self.inner.insert_run(run).await
        }
        async fn update_run(&self, run: &AuditRun) -> AuditResult<()> {
            if run.status == RunStatus::Completed {
                return Err(AuditError::DataAccess {
                    entity: "audit_runs".to_string(),
                    message: "write timeout".to_string(),
                });
            }
            self.inner.update_run(run).await
        }
        async fn get_run(&self, run_id: Uuid) -> AuditResult<Option<AuditRun>> {
            self.inner.get_run(run_id).await
        }
        async fn latest_completed_run(
            &self,
            org: Uuid,
            fiscal_year: &str,
        ) -> AuditResult<Option<AuditRun>> {
            self.inner.latest_completed_run(org, fiscal_year).await
        }
        async fn insert_findings(&self, findings: &[crate::models::Finding]) -> AuditResult<()> {
            self.inner.insert_findings(findings).await
        }
        async fn insert_assessments(
            &self,
            assessments: &[crate::models::IfcAssessment],
        ) -> AuditResult<()> {
            self.inner.insert_assessments(assessments).await
        }
        async fn insert_anomalies(&self, anomalies: &[crate::models::Anomaly]) -> AuditResult<()> {
            self.inner.insert_anomalies(anomalies).await
        }
        async fn insert_themes(&self, themes: &[crate::models::RiskTheme]) -> AuditResult<()> {
            self.inner.insert_themes(themes).await
        }
        async fn insert_samples(&self, samples: &[crate::models::AuditSample]) -> AuditResult<()> {
            self.inner.insert_samples(samples).await
        }
        async fn insert_narratives(
            &self,
            narratives: &[crate::models::Narrative],
        ) -> AuditResult<()> {
            self.inner.insert_narratives(narratives).await
        }
        async fn findings_for_run(
            &self,
            run_id: Uuid,
        ) -> AuditResult<Vec<crate::models::Finding>> {
            self.inner.findings_for_run(run_id).await
        }
        async fn assessments_for_run(
            &self,
            run_id: Uuid,
        ) -> AuditResult<Vec<crate::models::IfcAssessment>> {
            self.inner.assessments_for_run(run_id).await
        }
        async fn anomalies_for_run(
            &self,
            run_id: Uuid,
        ) -> AuditResult<Vec<crate::models::Anomaly>> {
            self.inner.anomalies_for_run(run_id).await
        }
        async fn themes_for_run(
            &self,
            run_id: Uuid,
        ) -> AuditResult<Vec<crate::models::RiskTheme>> {
            self.inner.themes_for_run(run_id).await
        }
        async fn samples_for_run(
            &self,
            run_id: Uuid,
        ) -> AuditResult<Vec<crate::models::AuditSample>> {
            self.inner.samples_for_run(run_id).await
        }
        async fn narratives_for_run(
            &self,
            run_id: Uuid,
        ) -> AuditResult<Vec<crate::models::Narrative>> {
            self.inner.narratives_for_run(run_id).await
        }
        async fn insert_export_log(&self, log: &crate::datastore::ExportLog) -> AuditResult<()> {
            self.inner.insert_export_log(log).await
        }
    }

    #[tokio::test]
    async fn test_failed_completion_write_never_strands_a_running_row() {
        let store = Arc::new(CompletionWriteFailsStore::new());
        let engine = AuditEngine::new(
            store.clone(),
            Arc::new(StaticRiskDelegate::default()),
            ScoringConfig::default(),
        );

        let result = engine
            .run_full_audit(Uuid::new_v4(), "2025-26", "auditor_1")
            .await;
        assert!(matches!(result, Err(AuditError::DataAccess { .. })));

        let run_id = store.last_run.lock().unwrap().unwrap();
        let run = store.get_run(run_id).await.unwrap().unwrap();
        assert_eq!(run.status, RunStatus::Failed);
        assert!(run.scores.is_none());
        assert!(run.finished_at.is_some());
    }

    #[tokio::test]
    async fn test_full_audit_persists_delegate_material() {
        let assessment = RiskAssessment {
            narratives: vec![crate::models::Narrative {
                run_id: Uuid::nil(),
                section: "executive_summary".to_string(),
                text: "Books are clean.".to_string(),
            }],
            risk_breakdown: RiskBreakdown {
                compliance_gap: dec("8"),
                ..Default::default()
            },
            ..Default::default()
        };
        let store = Arc::new(MemoryStore::new());
        let delegate = Arc::new(StaticRiskDelegate::new(assessment));
        let engine = engine_with(store.clone(), delegate);

        let outcome = engine
            .run_full_audit(Uuid::new_v4(), "2025-26", "auditor_1")
            .await
            .unwrap();

        let narratives = store.narratives_for_run(outcome.run_id).await.unwrap();
        assert_eq!(narratives.len(), 1);
        assert_eq!(narratives[0].run_id, outcome.run_id);
        assert_eq!(outcome.ai_risk_index, Some(dec("8")));
    }
}
