//! Financial compliance audit engine for Indian statutory fiscal years.
//!
//! This crate gathers a fiscal snapshot of an organization's books, runs
//! a deterministic catalog of GST, TDS, income-tax, fixed-asset and
//! data-integrity checks plus internal-financial-controls assessments,
//! delegates interpretive risk analysis to an external reasoning
//! service, and compiles the results into scores, ratings and an
//! auditor evidence pack behind an authenticated HTTP API.

#![warn(missing_docs)]

pub mod api;
pub mod checks;
pub mod config;
pub mod datastore;
pub mod delegate;
pub mod engine;
pub mod error;
pub mod export;
pub mod ifc;
pub mod models;
pub mod scoring;
pub mod snapshot;
