//! Internal Financial Controls assessor.
//!
//! Control-design checks run against the same snapshot as the compliance
//! rule engine but report [`IfcAssessment`]s. All five checks run
//! unconditionally; none depends on another's outcome, and zero journal
//! entries means every control passes vacuously.

mod controls;

use crate::config::ScoringConfig;
use crate::models::{FiscalSnapshot, IfcAssessment, IfcCheckType};

pub use controls::{
    BackdatedEntryCheck, FinalMonthConcentrationCheck, ManualJournalRatioCheck,
    MissingApproverCheck, OverrideActionsCheck,
};

/// One internal-financial-controls check.
///
/// Same purity contract as the compliance checks: deterministic, no side
/// effects, never errors on empty input.
pub trait IfcCheck: Send + Sync {
    /// Stable check code, e.g. "C2".
    fn code(&self) -> &'static str;

    /// Human-readable check name.
    fn name(&self) -> &'static str;

    /// Control-design category of the check.
    fn check_type(&self) -> IfcCheckType;

    /// Evaluates the check against the snapshot.
    fn evaluate(&self, snapshot: &FiscalSnapshot, config: &ScoringConfig) -> IfcAssessment;
}

/// The fixed catalog of IFC checks, in evaluation order.
pub fn ifc_checks() -> Vec<Box<dyn IfcCheck>> {
    vec![
        Box::new(ManualJournalRatioCheck),
        Box::new(MissingApproverCheck),
        Box::new(FinalMonthConcentrationCheck),
        Box::new(OverrideActionsCheck),
        Box::new(BackdatedEntryCheck),
    ]
}

/// Evaluates every IFC check in the catalog unconditionally.
pub fn run_ifc_checks(snapshot: &FiscalSnapshot, config: &ScoringConfig) -> Vec<IfcAssessment> {
    ifc_checks()
        .iter()
        .map(|check| check.evaluate(snapshot, config))
        .collect()
}
