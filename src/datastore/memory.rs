//! In-memory datastore used by tests and embedders.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::{AuditError, AuditResult};
use crate::models::{
    Account, Anomaly, AuditLogEntry, AuditRun, AuditSample, BankTransaction, Bill, Customer,
    Expense, Finding, FixedAsset, IfcAssessment, Invoice, JournalEntry, Narrative, PayrollRecord,
    RiskTheme, RunStatus, Vendor,
};

use super::{Datastore, ExportLog};

#[derive(Debug, Default)]
struct OrgData {
    accounts: Vec<Account>,
    journal_entries: Vec<JournalEntry>,
    invoices: Vec<Invoice>,
    bills: Vec<Bill>,
    expenses: Vec<Expense>,
    vendors: Vec<Vendor>,
    customers: Vec<Customer>,
    audit_logs: Vec<AuditLogEntry>,
    assets: Vec<FixedAsset>,
    payroll: Vec<PayrollRecord>,
    bank_transactions: Vec<BankTransaction>,
}

#[derive(Debug, Default)]
struct Inner {
    orgs: HashMap<Uuid, OrgData>,
    runs: HashMap<Uuid, AuditRun>,
    findings: Vec<Finding>,
    assessments: Vec<IfcAssessment>,
    anomalies: Vec<Anomaly>,
    themes: Vec<RiskTheme>,
    samples: Vec<AuditSample>,
    narratives: Vec<Narrative>,
    export_logs: Vec<ExportLog>,
}

/// A `RwLock<HashMap>`-backed [`Datastore`].
///
/// All reads clone out of the map so no lock is held across an await
/// point. Seed methods populate accounting data for an organization.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_poisoned(entity: &str) -> AuditError {
        AuditError::DataAccess {
            entity: entity.to_string(),
            message: "memory store lock poisoned".to_string(),
        }
    }

    fn read_org<T>(
        &self,
        org: Uuid,
        entity: &str,
        f: impl FnOnce(&OrgData) -> Vec<T>,
    ) -> AuditResult<Vec<T>> {
        let inner = self.inner.read().map_err(|_| Self::lock_poisoned(entity))?;
        Ok(inner.orgs.get(&org).map(f).unwrap_or_default())
    }

    fn with_org(&self, org: Uuid, f: impl FnOnce(&mut OrgData)) {
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        f(inner.orgs.entry(org).or_default());
    }

    /// Seeds chart-of-accounts entries.
    pub fn seed_accounts(&self, org: Uuid, accounts: Vec<Account>) {
        self.with_org(org, |d| d.accounts.extend(accounts));
    }

    /// Seeds journal entries.
    pub fn seed_journal_entries(&self, org: Uuid, entries: Vec<JournalEntry>) {
        self.with_org(org, |d| d.journal_entries.extend(entries));
    }

    /// Seeds sales invoices.
    pub fn seed_invoices(&self, org: Uuid, invoices: Vec<Invoice>) {
        self.with_org(org, |d| d.invoices.extend(invoices));
    }

    /// Seeds purchase bills.
    pub fn seed_bills(&self, org: Uuid, bills: Vec<Bill>) {
        self.with_org(org, |d| d.bills.extend(bills));
    }

    /// Seeds expense records.
    pub fn seed_expenses(&self, org: Uuid, expenses: Vec<Expense>) {
        self.with_org(org, |d| d.expenses.extend(expenses));
    }

    /// Seeds vendor master records.
    pub fn seed_vendors(&self, org: Uuid, vendors: Vec<Vendor>) {
        self.with_org(org, |d| d.vendors.extend(vendors));
    }

    /// Seeds customer master records.
    pub fn seed_customers(&self, org: Uuid, customers: Vec<Customer>) {
        self.with_org(org, |d| d.customers.extend(customers));
    }

    /// Seeds audit-trail entries.
    pub fn seed_audit_logs(&self, org: Uuid, logs: Vec<AuditLogEntry>) {
        self.with_org(org, |d| d.audit_logs.extend(logs));
    }

    /// Seeds fixed-asset records.
    pub fn seed_assets(&self, org: Uuid, assets: Vec<FixedAsset>) {
        self.with_org(org, |d| d.assets.extend(assets));
    }

    /// Seeds payroll records.
    pub fn seed_payroll(&self, org: Uuid, payroll: Vec<PayrollRecord>) {
        self.with_org(org, |d| d.payroll.extend(payroll));
    }

    /// Seeds bank transactions.
    pub fn seed_bank_transactions(&self, org: Uuid, transactions: Vec<BankTransaction>) {
        self.with_org(org, |d| d.bank_transactions.extend(transactions));
    }
}

fn in_window(date: NaiveDate, start: NaiveDate, end: NaiveDate) -> bool {
    date >= start && date <= end
}

#[async_trait]
impl Datastore for MemoryStore {
    async fn accounts(&self, org: Uuid) -> AuditResult<Vec<Account>> {
        self.read_org(org, "accounts", |d| d.accounts.clone())
    }

    async fn journal_entries(
        &self,
        org: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AuditResult<Vec<JournalEntry>> {
        self.read_org(org, "journal_entries", |d| {
            d.journal_entries
                .iter()
                .filter(|e| in_window(e.date, start, end))
                .cloned()
                .collect()
        })
    }

    async fn invoices(
        &self,
        org: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AuditResult<Vec<Invoice>> {
        self.read_org(org, "invoices", |d| {
            d.invoices
                .iter()
                .filter(|i| in_window(i.date, start, end))
                .cloned()
                .collect()
        })
    }

    async fn bills(&self, org: Uuid, start: NaiveDate, end: NaiveDate) -> AuditResult<Vec<Bill>> {
        self.read_org(org, "bills", |d| {
            d.bills
                .iter()
                .filter(|b| in_window(b.date, start, end))
                .cloned()
                .collect()
        })
    }

    async fn expenses(
        &self,
        org: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AuditResult<Vec<Expense>> {
        self.read_org(org, "expenses", |d| {
            d.expenses
                .iter()
                .filter(|e| in_window(e.date, start, end))
                .cloned()
                .collect()
        })
    }

    async fn vendors(&self, org: Uuid) -> AuditResult<Vec<Vendor>> {
        self.read_org(org, "vendors", |d| d.vendors.clone())
    }

    async fn customers(&self, org: Uuid) -> AuditResult<Vec<Customer>> {
        self.read_org(org, "customers", |d| d.customers.clone())
    }

    async fn audit_logs(
        &self,
        org: Uuid,
        start: NaiveDate,
        end: NaiveDate,
        limit: usize,
    ) -> AuditResult<Vec<AuditLogEntry>> {
        self.read_org(org, "audit_logs", |d| {
            let mut logs: Vec<AuditLogEntry> = d
                .audit_logs
                .iter()
                .filter(|l| in_window(l.timestamp.date_naive(), start, end))
                .cloned()
                .collect();
            logs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
            logs.truncate(limit);
            logs
        })
    }

    async fn assets(&self, org: Uuid) -> AuditResult<Vec<FixedAsset>> {
        self.read_org(org, "assets", |d| d.assets.clone())
    }

    async fn payroll(
        &self,
        org: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AuditResult<Vec<PayrollRecord>> {
        self.read_org(org, "payroll", |d| {
            d.payroll
                .iter()
                .filter(|p| in_window(p.date, start, end))
                .cloned()
                .collect()
        })
    }

    async fn bank_transactions(
        &self,
        org: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AuditResult<Vec<BankTransaction>> {
        self.read_org(org, "bank_transactions", |d| {
            d.bank_transactions
                .iter()
                .filter(|t| in_window(t.date, start, end))
                .cloned()
                .collect()
        })
    }

    async fn insert_run(&self, run: &AuditRun) -> AuditResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| Self::lock_poisoned("audit_runs"))?;
        inner.runs.insert(run.id, run.clone());
        Ok(())
    }

    async fn update_run(&self, run: &AuditRun) -> AuditResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| Self::lock_poisoned("audit_runs"))?;
        if !inner.runs.contains_key(&run.id) {
            return Err(AuditError::RunNotFound { run_id: run.id });
        }
        inner.runs.insert(run.id, run.clone());
        Ok(())
    }

    async fn get_run(&self, run_id: Uuid) -> AuditResult<Option<AuditRun>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| Self::lock_poisoned("audit_runs"))?;
        Ok(inner.runs.get(&run_id).cloned())
    }

    async fn latest_completed_run(
        &self,
        org: Uuid,
        fiscal_year: &str,
    ) -> AuditResult<Option<AuditRun>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| Self::lock_poisoned("audit_runs"))?;
        Ok(inner
            .runs
            .values()
            .filter(|r| {
                r.organization_id == org
                    && r.fiscal_year == fiscal_year
                    && r.status == RunStatus::Completed
            })
            .max_by_key(|r| r.started_at)
            .cloned())
    }

    async fn insert_findings(&self, findings: &[Finding]) -> AuditResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| Self::lock_poisoned("findings"))?;
        inner.findings.extend_from_slice(findings);
        Ok(())
    }

    async fn insert_assessments(&self, assessments: &[IfcAssessment]) -> AuditResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| Self::lock_poisoned("assessments"))?;
        inner.assessments.extend_from_slice(assessments);
        Ok(())
    }

    async fn insert_anomalies(&self, anomalies: &[Anomaly]) -> AuditResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| Self::lock_poisoned("anomalies"))?;
        inner.anomalies.extend_from_slice(anomalies);
        Ok(())
    }

    async fn insert_themes(&self, themes: &[RiskTheme]) -> AuditResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| Self::lock_poisoned("risk_themes"))?;
        inner.themes.extend_from_slice(themes);
        Ok(())
    }

    async fn insert_samples(&self, samples: &[AuditSample]) -> AuditResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| Self::lock_poisoned("audit_samples"))?;
        inner.samples.extend_from_slice(samples);
        Ok(())
    }

    async fn insert_narratives(&self, narratives: &[Narrative]) -> AuditResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| Self::lock_poisoned("narratives"))?;
        inner.narratives.extend_from_slice(narratives);
        Ok(())
    }

    async fn findings_for_run(&self, run_id: Uuid) -> AuditResult<Vec<Finding>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| Self::lock_poisoned("findings"))?;
        Ok(inner
            .findings
            .iter()
            .filter(|f| f.run_id == run_id)
            .cloned()
            .collect())
    }

    async fn assessments_for_run(&self, run_id: Uuid) -> AuditResult<Vec<IfcAssessment>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| Self::lock_poisoned("assessments"))?;
        Ok(inner
            .assessments
            .iter()
            .filter(|a| a.run_id == run_id)
            .cloned()
            .collect())
    }

    async fn anomalies_for_run(&self, run_id: Uuid) -> AuditResult<Vec<Anomaly>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| Self::lock_poisoned("anomalies"))?;
        Ok(inner
            .anomalies
            .iter()
            .filter(|a| a.run_id == run_id)
            .cloned()
            .collect())
    }

    async fn themes_for_run(&self, run_id: Uuid) -> AuditResult<Vec<RiskTheme>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| Self::lock_poisoned("risk_themes"))?;
        Ok(inner
            .themes
            .iter()
            .filter(|t| t.run_id == run_id)
            .cloned()
            .collect())
    }

    async fn samples_for_run(&self, run_id: Uuid) -> AuditResult<Vec<AuditSample>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| Self::lock_poisoned("audit_samples"))?;
        Ok(inner
            .samples
            .iter()
            .filter(|s| s.run_id == run_id)
            .cloned()
            .collect())
    }

    async fn narratives_for_run(&self, run_id: Uuid) -> AuditResult<Vec<Narrative>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| Self::lock_poisoned("narratives"))?;
        Ok(inner
            .narratives
            .iter()
            .filter(|n| n.run_id == run_id)
            .cloned()
            .collect())
    }

    async fn insert_export_log(&self, log: &ExportLog) -> AuditResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| Self::lock_poisoned("export_logs"))?;
        inner.export_logs.push(log.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ComplianceModule, RunType};
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_invoice(d: NaiveDate) -> Invoice {
        Invoice {
            id: Uuid::new_v4(),
            invoice_number: "INV-001".to_string(),
            date: d,
            customer_id: Uuid::new_v4(),
            amount: Decimal::from(1000),
            tax_amount: Decimal::from(180),
            total_amount: Decimal::from(1180),
        }
    }

    #[tokio::test]
    async fn test_invoices_filtered_to_window() {
        let store = MemoryStore::new();
        let org = Uuid::new_v4();
        store.seed_invoices(
            org,
            vec![
                sample_invoice(date(2025, 6, 1)),
                sample_invoice(date(2024, 6, 1)),
            ],
        );

        let in_fy = store
            .invoices(org, date(2025, 4, 1), date(2026, 3, 31))
            .await
            .unwrap();
        assert_eq!(in_fy.len(), 1);
        assert_eq!(in_fy[0].date, date(2025, 6, 1));
    }

    #[tokio::test]
    async fn test_unknown_org_reads_empty() {
        let store = MemoryStore::new();
        let vendors = store.vendors(Uuid::new_v4()).await.unwrap();
        assert!(vendors.is_empty());
    }

    #[tokio::test]
    async fn test_audit_logs_bounded_and_newest_first() {
        let store = MemoryStore::new();
        let org = Uuid::new_v4();
        let base = Utc::now();
        let logs: Vec<AuditLogEntry> = (0..5)
            .map(|i| AuditLogEntry {
                id: Uuid::new_v4(),
                timestamp: base - chrono::Duration::hours(i),
                action: "update".to_string(),
                entity: "journal_entry".to_string(),
                performed_by: "user_1".to_string(),
            })
            .collect();
        store.seed_audit_logs(org, logs);

        let window_start = (base - chrono::Duration::days(1)).date_naive();
        let window_end = (base + chrono::Duration::days(1)).date_naive();
        let fetched = store
            .audit_logs(org, window_start, window_end, 3)
            .await
            .unwrap();
        assert_eq!(fetched.len(), 3);
        assert!(fetched[0].timestamp >= fetched[1].timestamp);
    }

    #[tokio::test]
    async fn test_run_roundtrip_and_latest_completed() {
        let store = MemoryStore::new();
        let org = Uuid::new_v4();

        let mut run = AuditRun::new(org, "2025-26", "user_1", RunType::Full);
        store.insert_run(&run).await.unwrap();
        assert_eq!(store.get_run(run.id).await.unwrap().unwrap().id, run.id);

        assert!(store
            .latest_completed_run(org, "2025-26")
            .await
            .unwrap()
            .is_none());

        run.complete(crate::models::RunScores {
            compliance_score: Decimal::from(100),
            ai_risk_index: None,
            ifc_rating: crate::models::IfcRating::Strong,
            score_breakdown: Default::default(),
            risk_breakdown: Default::default(),
        })
        .unwrap();
        store.update_run(&run).await.unwrap();

        let latest = store.latest_completed_run(org, "2025-26").await.unwrap();
        assert_eq!(latest.unwrap().id, run.id);
    }

    #[tokio::test]
    async fn test_update_unknown_run_fails() {
        let store = MemoryStore::new();
        let run = AuditRun::new(Uuid::new_v4(), "2025-26", "user_1", RunType::Full);
        let result = store.update_run(&run).await;
        assert!(matches!(result, Err(AuditError::RunNotFound { .. })));
    }

    #[tokio::test]
    async fn test_findings_scoped_by_run() {
        let store = MemoryStore::new();
        let run_a = Uuid::new_v4();
        let run_b = Uuid::new_v4();

        let mut finding = Finding::pass(
            ComplianceModule::Gst,
            "G1",
            "Vendor GSTIN format",
            serde_json::json!({}),
        );
        finding.run_id = run_a;
        store.insert_findings(&[finding]).await.unwrap();

        assert_eq!(store.findings_for_run(run_a).await.unwrap().len(), 1);
        assert!(store.findings_for_run(run_b).await.unwrap().is_empty());
    }
}
