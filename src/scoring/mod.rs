//! Score and rating compilation.
//!
//! Every number here is a pure function of the deterministic check
//! results and configuration; the delegate's breakdown only feeds the
//! advisory AI risk index and never touches the compliance score.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::config::{ModuleAllocations, RiskComponentCaps, ScoringConfig};
use crate::delegate::RiskBreakdown;
use crate::models::{
    CheckStatus, ComplianceModule, Finding, IfcAssessment, IfcRating, RunScores,
};

/// Weight of one check outcome in its bucket's pass rate.
fn status_weight(status: CheckStatus) -> Decimal {
    match status {
        CheckStatus::Pass => Decimal::ONE,
        CheckStatus::Warning => Decimal::new(5, 1),
        CheckStatus::Fail => Decimal::ZERO,
    }
}

/// Scoring bucket a compliance module contributes to.
///
/// Fixed-asset findings score inside the income-tax bucket: depreciation
/// and disposal defects are income-tax exposures, and a sixth bucket
/// would dilute the published five-bucket breakdown.
fn bucket_key(module: ComplianceModule) -> &'static str {
    match module {
        ComplianceModule::Gst => "gst",
        ComplianceModule::Tds => "tds",
        ComplianceModule::IncomeTax | ComplianceModule::FixedAssets => "income_tax",
        ComplianceModule::DataIntegrity => "data_integrity",
    }
}

fn bucket_score(allocation: Decimal, statuses: &[CheckStatus]) -> Decimal {
    if statuses.is_empty() {
        // Nothing to check means nothing failed.
        return allocation;
    }
    let earned: Decimal = statuses.iter().copied().map(status_weight).sum();
    allocation * earned / Decimal::from(statuses.len())
}

/// Computes the 0-100 compliance score and its per-bucket breakdown.
pub fn compute_compliance_score(
    findings: &[Finding],
    assessments: &[IfcAssessment],
    allocations: &ModuleAllocations,
) -> (Decimal, BTreeMap<String, Decimal>) {
    let mut statuses: BTreeMap<&'static str, Vec<CheckStatus>> = BTreeMap::new();
    for finding in findings {
        statuses
            .entry(bucket_key(finding.module))
            .or_default()
            .push(finding.status);
    }
    let ifc_statuses: Vec<CheckStatus> = assessments.iter().map(|a| a.status).collect();

    let empty = Vec::new();
    let buckets = [
        ("gst", allocations.gst),
        ("tds", allocations.tds),
        ("income_tax", allocations.income_tax),
        ("ifc", allocations.ifc),
        ("data_integrity", allocations.data_integrity),
    ];

    let mut breakdown = BTreeMap::new();
    let mut total = Decimal::ZERO;
    for (key, allocation) in buckets {
        let bucket_statuses = if key == "ifc" {
            &ifc_statuses
        } else {
            statuses.get(key).unwrap_or(&empty)
        };
        let score = bucket_score(allocation, bucket_statuses);
        total += score;
        breakdown.insert(key.to_string(), score);
    }
    (total, breakdown)
}

/// Compiles the advisory AI risk index from the delegate's breakdown.
///
/// Each component is clamped to its cap, then the total is clamped to
/// 100. The returned map holds the clamped per-component values.
pub fn compute_ai_risk_index(
    breakdown: &RiskBreakdown,
    caps: &RiskComponentCaps,
) -> (Decimal, BTreeMap<String, Decimal>) {
    let capped = [
        ("revenue_anomaly", breakdown.revenue_anomaly, caps.revenue_anomaly),
        ("expense_anomaly", breakdown.expense_anomaly, caps.expense_anomaly),
        (
            "vendor_concentration",
            breakdown.vendor_concentration,
            caps.vendor_concentration,
        ),
        (
            "manual_entry_risk",
            breakdown.manual_entry_risk,
            caps.manual_entry_risk,
        ),
        ("compliance_gap", breakdown.compliance_gap, caps.compliance_gap),
        ("control_weakness", breakdown.control_weakness, caps.control_weakness),
        ("data_quality", breakdown.data_quality, caps.data_quality),
    ];

    let mut map = BTreeMap::new();
    let mut total = Decimal::ZERO;
    for (name, value, cap) in capped {
        let clamped = value.max(Decimal::ZERO).min(cap);
        total += clamped;
        map.insert(name.to_string(), clamped);
    }
    (total.min(Decimal::from(100)), map)
}

/// Derives the IFC rating from the control assessments.
///
/// Zero assessments rate Strong vacuously; the rating reflects observed
/// control failures, not coverage.
pub fn compute_ifc_rating(assessments: &[IfcAssessment]) -> IfcRating {
    let fails = assessments
        .iter()
        .filter(|a| a.status == CheckStatus::Fail)
        .count();
    let warnings = assessments
        .iter()
        .filter(|a| a.status == CheckStatus::Warning)
        .count();

    if fails >= 2 {
        IfcRating::Weak
    } else if fails >= 1 || warnings >= 3 {
        IfcRating::Moderate
    } else {
        IfcRating::Strong
    }
}

/// Compiles the full score block persisted on a completed run.
pub fn compile_scores(
    findings: &[Finding],
    assessments: &[IfcAssessment],
    risk: Option<&RiskBreakdown>,
    config: &ScoringConfig,
) -> RunScores {
    let (compliance_score, score_breakdown) =
        compute_compliance_score(findings, assessments, &config.allocations);
    let ifc_rating = compute_ifc_rating(assessments);
    let (ai_risk_index, risk_breakdown) = match risk {
        Some(breakdown) => {
            let (index, map) = compute_ai_risk_index(breakdown, &config.risk_caps);
            (Some(index), map)
        }
        None => (None, BTreeMap::new()),
    };

    RunScores {
        compliance_score,
        ai_risk_index,
        ifc_rating,
        score_breakdown,
        risk_breakdown,
    }
}
