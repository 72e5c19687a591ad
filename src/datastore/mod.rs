//! Storage seam for the audit engine.
//!
//! The engine consumes a relational datastore through typed per-table
//! reads and run-scoped writes; it never designs the schema. The
//! [`Datastore`] trait is the whole contract, and [`MemoryStore`] is an
//! in-process implementation used by tests and embedders.

mod memory;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AuditResult;
use crate::models::{
    Account, Anomaly, AuditLogEntry, AuditRun, AuditSample, BankTransaction, Bill, Customer,
    Expense, Finding, FixedAsset, IfcAssessment, Invoice, JournalEntry, Narrative, PayrollRecord,
    RiskTheme, Vendor,
};

pub use memory::MemoryStore;

/// One record of an auditor-pack generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportLog {
    /// Unique export identifier.
    pub id: Uuid,
    /// The organization the pack was generated for.
    pub organization_id: Uuid,
    /// The run the pack was assembled from.
    pub run_id: Uuid,
    /// Fiscal year label of the pack.
    pub fiscal_year: String,
    /// Who requested the export.
    pub exported_by: String,
    /// When the pack was generated.
    pub exported_at: DateTime<Utc>,
}

/// Typed reads and run-scoped writes against the hosted datastore.
///
/// Transactional reads take the organization and the fiscal-year date
/// window; master-data reads take only the organization. Every write is
/// scoped by run id, so concurrent runs share no mutable state.
#[async_trait]
pub trait Datastore: Send + Sync {
    /// Chart-of-accounts entries for the organization.
    async fn accounts(&self, org: Uuid) -> AuditResult<Vec<Account>>;

    /// Journal entries with lines, filtered to the date window.
    async fn journal_entries(
        &self,
        org: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AuditResult<Vec<JournalEntry>>;

    /// Sales invoices, filtered to the date window.
    async fn invoices(&self, org: Uuid, start: NaiveDate, end: NaiveDate)
        -> AuditResult<Vec<Invoice>>;

    /// Purchase bills, filtered to the date window.
    async fn bills(&self, org: Uuid, start: NaiveDate, end: NaiveDate) -> AuditResult<Vec<Bill>>;

    /// Categorized expenses, filtered to the date window.
    async fn expenses(&self, org: Uuid, start: NaiveDate, end: NaiveDate)
        -> AuditResult<Vec<Expense>>;

    /// Vendor master records.
    async fn vendors(&self, org: Uuid) -> AuditResult<Vec<Vendor>>;

    /// Customer master records.
    async fn customers(&self, org: Uuid) -> AuditResult<Vec<Customer>>;

    /// Most recent audit-trail entries within the window, newest first,
    /// bounded by `limit`.
    async fn audit_logs(
        &self,
        org: Uuid,
        start: NaiveDate,
        end: NaiveDate,
        limit: usize,
    ) -> AuditResult<Vec<AuditLogEntry>>;

    /// Fixed-asset register records.
    async fn assets(&self, org: Uuid) -> AuditResult<Vec<FixedAsset>>;

    /// Payroll records, filtered to the date window.
    async fn payroll(&self, org: Uuid, start: NaiveDate, end: NaiveDate)
        -> AuditResult<Vec<PayrollRecord>>;

    /// Bank transactions, filtered to the date window.
    async fn bank_transactions(
        &self,
        org: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AuditResult<Vec<BankTransaction>>;

    /// Persists a newly created run row.
    async fn insert_run(&self, run: &AuditRun) -> AuditResult<()>;

    /// Persists a run's updated status, timestamps and scores.
    async fn update_run(&self, run: &AuditRun) -> AuditResult<()>;

    /// Fetches a run by identifier.
    async fn get_run(&self, run_id: Uuid) -> AuditResult<Option<AuditRun>>;

    /// The most recently completed run for the organization and fiscal
    /// year, if any.
    async fn latest_completed_run(
        &self,
        org: Uuid,
        fiscal_year: &str,
    ) -> AuditResult<Option<AuditRun>>;

    /// Inserts compliance findings for a run.
    async fn insert_findings(&self, findings: &[Finding]) -> AuditResult<()>;

    /// Inserts IFC assessments for a run.
    async fn insert_assessments(&self, assessments: &[IfcAssessment]) -> AuditResult<()>;

    /// Inserts AI anomalies for a run.
    async fn insert_anomalies(&self, anomalies: &[Anomaly]) -> AuditResult<()>;

    /// Inserts AI risk themes for a run.
    async fn insert_themes(&self, themes: &[RiskTheme]) -> AuditResult<()>;

    /// Inserts AI audit samples for a run.
    async fn insert_samples(&self, samples: &[AuditSample]) -> AuditResult<()>;

    /// Inserts AI narratives for a run.
    async fn insert_narratives(&self, narratives: &[Narrative]) -> AuditResult<()>;

    /// Findings previously persisted for a run.
    async fn findings_for_run(&self, run_id: Uuid) -> AuditResult<Vec<Finding>>;

    /// Assessments previously persisted for a run.
    async fn assessments_for_run(&self, run_id: Uuid) -> AuditResult<Vec<IfcAssessment>>;

    /// Anomalies previously persisted for a run.
    async fn anomalies_for_run(&self, run_id: Uuid) -> AuditResult<Vec<Anomaly>>;

    /// Risk themes previously persisted for a run.
    async fn themes_for_run(&self, run_id: Uuid) -> AuditResult<Vec<RiskTheme>>;

    /// Audit samples previously persisted for a run.
    async fn samples_for_run(&self, run_id: Uuid) -> AuditResult<Vec<AuditSample>>;

    /// Narratives previously persisted for a run.
    async fn narratives_for_run(&self, run_id: Uuid) -> AuditResult<Vec<Narrative>>;

    /// Records one auditor-pack generation.
    async fn insert_export_log(&self, log: &ExportLog) -> AuditResult<()>;
}
