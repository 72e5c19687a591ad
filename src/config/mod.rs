//! Scoring configuration for the audit engine.
//!
//! Module point allocations, AI risk-component caps and check thresholds
//! are named constants with canonical defaults, overridable from YAML.

mod loader;
mod types;

pub use loader::load_scoring_config;
pub use types::{CheckThresholds, ModuleAllocations, RiskComponentCaps, ScoringConfig};
