//! Accounting record types consumed by the audit engine.
//!
//! These mirror the typed per-table reads exposed by the datastore. The
//! engine only reads them; it never defines or migrates their storage.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A chart-of-accounts entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique account code within the organization.
    pub code: String,
    /// Display name of the account.
    pub name: String,
    /// Account classification (asset, liability, income, expense, equity).
    pub account_type: String,
}

/// Posting status of a journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    /// Saved but not yet posted to the ledger.
    Draft,
    /// Posted to the ledger.
    Posted,
}

/// One line of a journal entry, pre-joined to its parent entry's metadata
/// so checks can operate on lines without a second lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalLine {
    /// The account code this line posts to.
    pub account_code: String,
    /// Debit amount (zero if the line is a credit).
    pub debit: Decimal,
    /// Credit amount (zero if the line is a debit).
    pub credit: Decimal,
}

/// A journal entry with its lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Unique entry identifier.
    pub id: Uuid,
    /// Human-facing entry number.
    pub entry_number: String,
    /// Effective ledger date of the entry.
    pub date: NaiveDate,
    /// Posting status.
    pub status: EntryStatus,
    /// Identity of the approver, if the entry was approved.
    pub approved_by: Option<String>,
    /// True if the entry was keyed in manually rather than system-posted.
    pub is_manual: bool,
    /// When the entry row was created.
    pub created_at: DateTime<Utc>,
    /// The debit/credit lines of the entry.
    pub lines: Vec<JournalLine>,
}

impl JournalEntry {
    /// Sum of all debit amounts across the entry's lines.
    pub fn total_debit(&self) -> Decimal {
        self.lines.iter().map(|l| l.debit).sum()
    }

    /// Sum of all credit amounts across the entry's lines.
    pub fn total_credit(&self) -> Decimal {
        self.lines.iter().map(|l| l.credit).sum()
    }
}

/// A sales invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    /// Unique invoice identifier.
    pub id: Uuid,
    /// Human-facing invoice number.
    pub invoice_number: String,
    /// Invoice date.
    pub date: NaiveDate,
    /// The customer the invoice was raised against.
    pub customer_id: Uuid,
    /// Taxable amount before tax.
    pub amount: Decimal,
    /// Tax charged on the invoice.
    pub tax_amount: Decimal,
    /// Recorded grand total.
    pub total_amount: Decimal,
}

/// A purchase bill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bill {
    /// Unique bill identifier.
    pub id: Uuid,
    /// Human-facing bill number.
    pub bill_number: String,
    /// Bill date.
    pub date: NaiveDate,
    /// The vendor the bill was received from.
    pub vendor_id: Uuid,
    /// Recorded grand total.
    pub total_amount: Decimal,
}

/// Payment mode of an expense record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMode {
    /// Paid in cash.
    Cash,
    /// Paid through a bank instrument.
    Bank,
}

/// A categorized expense record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    /// Unique expense identifier.
    pub id: Uuid,
    /// Expense date.
    pub date: NaiveDate,
    /// Expense category label.
    pub category: String,
    /// Amount paid.
    pub amount: Decimal,
    /// How the expense was paid.
    pub payment_mode: PaymentMode,
}

/// A vendor master record. Master data is not date-filtered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vendor {
    /// Unique vendor identifier.
    pub id: Uuid,
    /// Vendor display name.
    pub name: String,
    /// GST registration number, if registered.
    pub gstin: Option<String>,
    /// Permanent Account Number, if on file.
    pub pan: Option<String>,
}

/// A customer master record. Master data is not date-filtered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Unique customer identifier.
    pub id: Uuid,
    /// Customer display name.
    pub name: String,
    /// GST registration number, if registered.
    pub gstin: Option<String>,
}

/// One audit-trail log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    /// Unique log identifier.
    pub id: Uuid,
    /// When the action happened.
    pub timestamp: DateTime<Utc>,
    /// The action verb, e.g. "update", "override", "unlock".
    pub action: String,
    /// The entity the action touched.
    pub entity: String,
    /// Who performed the action.
    pub performed_by: String,
}

/// Lifecycle status of a fixed asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetStatus {
    /// In service.
    Active,
    /// Sold, scrapped or otherwise disposed.
    Disposed,
}

/// A fixed-asset register record. Master data is not date-filtered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedAsset {
    /// Unique asset identifier.
    pub id: Uuid,
    /// Asset display name.
    pub name: String,
    /// Original cost.
    pub cost: Decimal,
    /// Depreciation rate percentage applied to the asset.
    pub depreciation_rate: Decimal,
    /// Depreciation accumulated to date.
    pub accumulated_depreciation: Decimal,
    /// Lifecycle status.
    pub status: AssetStatus,
    /// Sale/scrap value recorded at disposal.
    pub disposal_value: Option<Decimal>,
}

/// A payroll record for one employee for one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollRecord {
    /// Unique payroll row identifier.
    pub id: Uuid,
    /// Pay date.
    pub date: NaiveDate,
    /// The employee paid.
    pub employee_id: Uuid,
    /// Gross pay for the period.
    pub gross_pay: Decimal,
    /// Withholding tax deducted, if any.
    pub tds_deducted: Decimal,
    /// Employee PAN on file, if any.
    pub employee_pan: Option<String>,
}

/// A bank statement transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankTransaction {
    /// Unique transaction identifier.
    pub id: Uuid,
    /// Value date.
    pub date: NaiveDate,
    /// Narration from the statement.
    pub description: String,
    /// Signed amount (negative for outflows).
    pub amount: Decimal,
}
