//! Risk intelligence delegation.
//!
//! The deterministic engine owns every number that affects compliance
//! scoring; the delegate only contributes interpretive material (an
//! anomaly list, risk themes, sampling plans, narratives) plus the risk
//! breakdown behind the advisory AI risk index. The exchange is one
//! digest out, one validated [`RiskAssessment`] back, no retries.

mod digest;
mod http;
mod schema;

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::AuditResult;

pub use digest::{build_digest, CheckTally, SnapshotDigest, VendorSpend};
pub use http::{DelegateConfig, HttpRiskDelegate};
pub use schema::{RiskAssessment, RiskBreakdown};

/// A provider of interpretive risk analysis over a snapshot digest.
#[async_trait::async_trait]
pub trait RiskDelegate: Send + Sync {
    /// Produces a validated assessment for the digest.
    ///
    /// # Errors
    ///
    /// Implementations surface transport exhaustion as
    /// [`AuditError::DelegateUnavailable`], spend limits as
    /// [`AuditError::DelegateBudgetExhausted`], and every schema or
    /// semantic violation as [`AuditError::DelegateProtocol`].
    ///
    /// [`AuditError::DelegateUnavailable`]: crate::error::AuditError::DelegateUnavailable
    /// [`AuditError::DelegateBudgetExhausted`]: crate::error::AuditError::DelegateBudgetExhausted
    /// [`AuditError::DelegateProtocol`]: crate::error::AuditError::DelegateProtocol
    async fn assess(&self, digest: &SnapshotDigest) -> AuditResult<RiskAssessment>;
}

/// A delegate that returns a canned assessment and counts invocations.
///
/// Used by tests that need to observe whether the engine consulted the
/// delegate at all (simulations must not).
#[derive(Default)]
pub struct StaticRiskDelegate {
    assessment: RiskAssessment,
    calls: AtomicUsize,
}

impl StaticRiskDelegate {
    /// Creates a delegate that always answers with `assessment`.
    pub fn new(assessment: RiskAssessment) -> Self {
        Self {
            assessment,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of times [`RiskDelegate::assess`] has been called.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl RiskDelegate for StaticRiskDelegate {
    async fn assess(&self, _digest: &SnapshotDigest) -> AuditResult<RiskAssessment> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let assessment = self.assessment.clone();
        assessment.validate()?;
        Ok(assessment)
    }
}
