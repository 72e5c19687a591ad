//! Error types for the audit engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur during an audit run.

use thiserror::Error;
use uuid::Uuid;

/// The main error type for the audit engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use audit_engine::error::AuditError;
///
/// let error = AuditError::InvalidFiscalYear {
///     label: "2025".to_string(),
/// };
/// assert_eq!(
///     error.to_string(),
///     "Invalid fiscal year label '2025': expected the form YYYY-YY, e.g. 2025-26"
/// );
/// ```
#[derive(Debug, Error)]
pub enum AuditError {
    /// The caller's credential could not be resolved to an organization.
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// A description of what failed to resolve.
        message: String,
    },

    /// A storage read or write failed.
    #[error("Data access failed for '{entity}': {message}")]
    DataAccess {
        /// The entity or table that was being accessed.
        entity: String,
        /// A description of the failure.
        message: String,
    },

    /// The reasoning service rejected the call because of rate limiting.
    /// The operator should retry later.
    #[error("Reasoning service is rate limited (HTTP {status}), retry later")]
    DelegateUnavailable {
        /// The transport status code that signalled the rate limit.
        status: u16,
    },

    /// The reasoning service quota is exhausted. The operator must top up
    /// before further full audits can complete.
    #[error("Reasoning service budget exhausted (HTTP {status}), top up quota")]
    DelegateBudgetExhausted {
        /// The transport status code that signalled quota exhaustion.
        status: u16,
    },

    /// The reasoning service returned a response that does not satisfy the
    /// structured-output contract.
    #[error("Reasoning service protocol error: {message}")]
    DelegateProtocol {
        /// A description of the contract violation.
        message: String,
    },

    /// No audit run exists for the requested identifier.
    #[error("Audit run not found: {run_id}")]
    RunNotFound {
        /// The run identifier that was not found.
        run_id: Uuid,
    },

    /// A run-state transition was attempted from a terminal state.
    #[error("Invalid run state transition: run {run_id} is already {status}")]
    InvalidRunState {
        /// The run identifier.
        run_id: Uuid,
        /// The terminal status the run is already in.
        status: String,
    },

    /// A fiscal year label could not be parsed.
    #[error("Invalid fiscal year label '{label}': expected the form YYYY-YY, e.g. 2025-26")]
    InvalidFiscalYear {
        /// The label that failed to parse.
        label: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },
}

/// A type alias for Results that return AuditError.
pub type AuditResult<T> = Result<T, AuditError>;
