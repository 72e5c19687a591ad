//! Auditor pack assembly.
//!
//! A pack is a read-only view over a completed run: the fiscal records
//! are re-gathered from the datastore and the findings, assessments and
//! AI material are read back exactly as the run persisted them. Nothing
//! is recomputed, so regenerating a pack for the same run yields the
//! same evidence every time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::config::ScoringConfig;
use crate::datastore::{Datastore, ExportLog};
use crate::error::{AuditError, AuditResult};
use crate::models::{AuditRun, RunStatus};
use crate::snapshot::gather_snapshot;

/// One named section of an auditor pack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackSection {
    /// Ordered section name, e.g. "03_SalesRegister".
    pub name: String,
    /// Section payload.
    pub content: serde_json::Value,
}

/// The assembled evidence pack for one completed run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditorPack {
    /// Unique export identifier.
    pub export_id: Uuid,
    /// The organization the pack covers.
    pub organization_id: Uuid,
    /// The run the pack was assembled from.
    pub run_id: Uuid,
    /// Fiscal year label of the pack.
    pub fiscal_year: String,
    /// When the pack was generated.
    pub generated_at: DateTime<Utc>,
    /// The nine ordered sections.
    pub sections: Vec<PackSection>,
}

impl AuditorPack {
    /// Looks up a section by name.
    pub fn section(&self, name: &str) -> Option<&PackSection> {
        self.sections.iter().find(|s| s.name == name)
    }
}

async fn resolve_run(
    store: &dyn Datastore,
    org: Uuid,
    fiscal_year: &str,
    run_id: Option<Uuid>,
) -> AuditResult<AuditRun> {
    let run = match run_id {
        Some(id) => store
            .get_run(id)
            .await?
            .ok_or(AuditError::RunNotFound { run_id: id })?,
        None => store
            .latest_completed_run(org, fiscal_year)
            .await?
            .ok_or(AuditError::RunNotFound { run_id: Uuid::nil() })?,
    };
    // Another organization's run is reported as absent, not as forbidden.
    if run.organization_id != org {
        return Err(AuditError::RunNotFound { run_id: run.id });
    }
    if run.status != RunStatus::Completed {
        return Err(AuditError::InvalidRunState {
            run_id: run.id,
            status: run.status.as_str().to_string(),
        });
    }
    Ok(run)
}

/// Assembles the auditor pack for a completed run.
///
/// When `run_id` is `None` the most recently completed run for the
/// organization and fiscal year is used. Each generation appends an
/// export-log row.
///
/// # Errors
///
/// Returns `RunNotFound` when no eligible run exists and
/// `InvalidRunState` when the addressed run is not `Completed`.
#[instrument(skip(store, config), fields(%org, fiscal_year))]
pub async fn generate_auditor_pack(
    store: &dyn Datastore,
    org: Uuid,
    fiscal_year: &str,
    run_id: Option<Uuid>,
    exported_by: &str,
    config: &ScoringConfig,
) -> AuditResult<AuditorPack> {
    let run = resolve_run(store, org, fiscal_year, run_id).await?;
    let snapshot = gather_snapshot(store, org, &run.fiscal_year, config).await?;

    let findings = store.findings_for_run(run.id).await?;
    let assessments = store.assessments_for_run(run.id).await?;
    let anomalies = store.anomalies_for_run(run.id).await?;
    let themes = store.themes_for_run(run.id).await?;
    let samples = store.samples_for_run(run.id).await?;
    let narratives = store.narratives_for_run(run.id).await?;

    let sections = vec![
        PackSection {
            name: "01_Financials".to_string(),
            content: json!({
                "fiscal_year": run.fiscal_year,
                "accounts": snapshot.accounts,
                "scores": run.scores,
                "totals": {
                    "invoices": snapshot.invoices.len(),
                    "bills": snapshot.bills.len(),
                    "journal_entries": snapshot.journal_entries.len(),
                    "bank_transactions": snapshot.bank_transactions.len(),
                },
            }),
        },
        PackSection {
            name: "02_JournalEntries".to_string(),
            content: json!(snapshot.journal_entries),
        },
        PackSection {
            name: "03_SalesRegister".to_string(),
            content: json!({
                "invoices": snapshot.invoices,
                "customers": snapshot.customers,
            }),
        },
        PackSection {
            name: "04_PurchaseRegister".to_string(),
            content: json!({
                "bills": snapshot.bills,
                "vendors": snapshot.vendors,
            }),
        },
        PackSection {
            name: "05_ExpenseRegister".to_string(),
            content: json!(snapshot.expenses),
        },
        PackSection {
            name: "06_FixedAssets".to_string(),
            content: json!(snapshot.assets),
        },
        PackSection {
            name: "07_ComplianceFindings".to_string(),
            content: json!(findings),
        },
        PackSection {
            name: "08_IFC_Assessments".to_string(),
            content: json!(assessments),
        },
        PackSection {
            name: "09_AI_RiskInsights".to_string(),
            content: json!({
                "anomalies": anomalies,
                "risk_themes": themes,
                "samples": samples,
                "narratives": narratives,
            }),
        },
    ];

    let pack = AuditorPack {
        export_id: Uuid::new_v4(),
        organization_id: org,
        run_id: run.id,
        fiscal_year: run.fiscal_year.clone(),
        generated_at: Utc::now(),
        sections,
    };

    store
        .insert_export_log(&ExportLog {
            id: pack.export_id,
            organization_id: org,
            run_id: run.id,
            fiscal_year: run.fiscal_year.clone(),
            exported_by: exported_by.to_string(),
            exported_at: pack.generated_at,
        })
        .await?;
    info!(run_id = %run.id, export_id = %pack.export_id, "auditor pack generated");

    Ok(pack)
}
