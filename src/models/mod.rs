//! Core data models for the audit engine.
//!
//! This module contains all the domain models used throughout the engine.

mod ai;
mod finding;
mod fiscal_year;
mod records;
mod run;
mod snapshot;

pub use ai::{Anomaly, AuditSample, Narrative, RiskTheme};
pub use finding::{
    CheckStatus, ComplianceModule, Finding, IfcAssessment, IfcCheckType, Severity,
};
pub use fiscal_year::FiscalYear;
pub use records::{
    Account, AssetStatus, AuditLogEntry, BankTransaction, Bill, Customer, EntryStatus, Expense,
    FixedAsset, Invoice, JournalEntry, JournalLine, PaymentMode, PayrollRecord, Vendor,
};
pub use run::{AuditRun, IfcRating, RunScores, RunStatus, RunType};
pub use snapshot::FiscalSnapshot;
