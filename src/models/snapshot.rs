//! The point-in-time fiscal snapshot that all checks evaluate against.

use uuid::Uuid;

use super::fiscal_year::FiscalYear;
use super::records::{
    Account, AuditLogEntry, BankTransaction, Bill, Customer, Expense, FixedAsset, Invoice,
    JournalEntry, PayrollRecord, Vendor,
};

/// An ephemeral, run-scoped aggregate of all accounting data for one
/// organization and one fiscal-year window.
///
/// The snapshot is assembled once per run by the gatherer and then treated
/// as read-only by every check. It is never persisted as its own entity.
#[derive(Debug, Clone)]
pub struct FiscalSnapshot {
    /// The organization the snapshot belongs to.
    pub organization_id: Uuid,
    /// The fiscal year window the transactional data was filtered to.
    pub fiscal_year: FiscalYear,
    /// Chart-of-accounts entries.
    pub accounts: Vec<Account>,
    /// Journal entries with their lines, filtered to the window.
    pub journal_entries: Vec<JournalEntry>,
    /// Sales invoices, filtered to the window.
    pub invoices: Vec<Invoice>,
    /// Purchase bills, filtered to the window.
    pub bills: Vec<Bill>,
    /// Categorized expenses, filtered to the window.
    pub expenses: Vec<Expense>,
    /// Vendor master records (not date-filtered).
    pub vendors: Vec<Vendor>,
    /// Customer master records (not date-filtered).
    pub customers: Vec<Customer>,
    /// Bounded window of audit-trail entries.
    pub audit_logs: Vec<AuditLogEntry>,
    /// Fixed-asset register (not date-filtered).
    pub assets: Vec<FixedAsset>,
    /// Payroll records, filtered to the window.
    pub payroll: Vec<PayrollRecord>,
    /// Bank transactions, filtered to the window.
    pub bank_transactions: Vec<BankTransaction>,
}

impl FiscalSnapshot {
    /// Creates an empty snapshot for the given organization and window.
    pub fn empty(organization_id: Uuid, fiscal_year: FiscalYear) -> Self {
        Self {
            organization_id,
            fiscal_year,
            accounts: Vec::new(),
            journal_entries: Vec::new(),
            invoices: Vec::new(),
            bills: Vec::new(),
            expenses: Vec::new(),
            vendors: Vec::new(),
            customers: Vec::new(),
            audit_logs: Vec::new(),
            assets: Vec::new(),
            payroll: Vec::new(),
            bank_transactions: Vec::new(),
        }
    }

    /// Looks up a vendor master record by id.
    pub fn vendor(&self, id: Uuid) -> Option<&Vendor> {
        self.vendors.iter().find(|v| v.id == id)
    }
}
