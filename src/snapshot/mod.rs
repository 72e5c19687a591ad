//! Snapshot gathering.
//!
//! Pulls all accounting entities for one organization and one fiscal-year
//! window into a [`FiscalSnapshot`]. The eleven fetches are independent
//! and issued concurrently; a failed or empty sub-fetch degrades to an
//! empty collection so partial data never blocks the audit.

use tracing::warn;
use uuid::Uuid;

use crate::config::ScoringConfig;
use crate::datastore::Datastore;
use crate::error::AuditResult;
use crate::models::{FiscalSnapshot, FiscalYear};

/// Gathers a point-in-time snapshot for the organization and fiscal year.
///
/// Read-only: nothing is written. Each sub-fetch that fails is logged and
/// replaced with an empty collection; an organization without, say, bank
/// transactions still audits.
///
/// # Errors
///
/// Returns `InvalidFiscalYear` if the label cannot be parsed. Individual
/// fetch failures do not surface here.
pub async fn gather_snapshot(
    store: &dyn Datastore,
    org: Uuid,
    fiscal_year_label: &str,
    config: &ScoringConfig,
) -> AuditResult<FiscalSnapshot> {
    let fy = FiscalYear::parse(fiscal_year_label)?;
    let (start, end) = (fy.start_date, fy.end_date);

    let (
        accounts,
        journal_entries,
        invoices,
        bills,
        expenses,
        vendors,
        customers,
        audit_logs,
        assets,
        payroll,
        bank_transactions,
    ) = tokio::join!(
        store.accounts(org),
        store.journal_entries(org, start, end),
        store.invoices(org, start, end),
        store.bills(org, start, end),
        store.expenses(org, start, end),
        store.vendors(org),
        store.customers(org),
        store.audit_logs(org, start, end, config.thresholds.audit_log_window),
        store.assets(org),
        store.payroll(org, start, end),
        store.bank_transactions(org, start, end),
    );

    Ok(FiscalSnapshot {
        organization_id: org,
        fiscal_year: fy,
        accounts: or_empty("accounts", accounts),
        journal_entries: or_empty("journal_entries", journal_entries),
        invoices: or_empty("invoices", invoices),
        bills: or_empty("bills", bills),
        expenses: or_empty("expenses", expenses),
        vendors: or_empty("vendors", vendors),
        customers: or_empty("customers", customers),
        audit_logs: or_empty("audit_logs", audit_logs),
        assets: or_empty("assets", assets),
        payroll: or_empty("payroll", payroll),
        bank_transactions: or_empty("bank_transactions", bank_transactions),
    })
}

fn or_empty<T>(entity: &str, result: AuditResult<Vec<T>>) -> Vec<T> {
    match result {
        Ok(records) => records,
        Err(err) => {
            warn!(entity = entity, error = %err, "Sub-fetch failed, defaulting to empty");
            Vec::new()
        }
    }
}
