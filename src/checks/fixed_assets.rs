//! Fixed-asset lifecycle checks.

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::config::ScoringConfig;
use crate::models::{
    AssetStatus, CheckStatus, ComplianceModule, Finding, FiscalSnapshot, Severity,
};

use super::ComplianceCheck;

/// F1: active depreciable assets with zero accumulated depreciation.
///
/// Remediable by re-running the depreciation schedule, so severity stays
/// at warning even though the status is fail.
pub struct MissingDepreciationCheck;

impl ComplianceCheck for MissingDepreciationCheck {
    fn code(&self) -> &'static str {
        "F1"
    }

    fn name(&self) -> &'static str {
        "Active assets without depreciation"
    }

    fn module(&self) -> ComplianceModule {
        ComplianceModule::FixedAssets
    }

    fn evaluate(&self, snapshot: &FiscalSnapshot, _config: &ScoringConfig) -> Finding {
        let flagged: Vec<&crate::models::FixedAsset> = snapshot
            .assets
            .iter()
            .filter(|a| {
                a.status == AssetStatus::Active
                    && a.depreciation_rate > Decimal::ZERO
                    && a.accumulated_depreciation.is_zero()
            })
            .collect();

        if flagged.is_empty() {
            return Finding::pass(
                self.module(),
                self.code(),
                self.name(),
                serde_json::json!({ "assets_checked": snapshot.assets.len() }),
            );
        }

        let affected_amount: Decimal = flagged.iter().map(|a| a.cost).sum();

        Finding {
            run_id: Uuid::nil(),
            module: self.module(),
            check_code: self.code().to_string(),
            check_name: self.name().to_string(),
            severity: Severity::Warning,
            status: CheckStatus::Fail,
            affected_count: flagged.len() as u64,
            affected_amount,
            recommendation: Some(
                "Run the depreciation schedule for these assets before closing the year"
                    .to_string(),
            ),
            details: serde_json::json!({
                "assets_checked": snapshot.assets.len(),
                "flagged": flagged.iter().map(|a| a.name.clone()).collect::<Vec<_>>(),
            }),
            record_refs: flagged.iter().map(|a| a.id.to_string()).collect(),
        }
    }
}

/// F2: disposed assets with no disposal value recorded.
///
/// The disposal value is a required field for gain/loss computation, so
/// its absence is structural.
pub struct DisposalValueCheck;

impl ComplianceCheck for DisposalValueCheck {
    fn code(&self) -> &'static str {
        "F2"
    }

    fn name(&self) -> &'static str {
        "Disposed assets without disposal value"
    }

    fn module(&self) -> ComplianceModule {
        ComplianceModule::FixedAssets
    }

    fn evaluate(&self, snapshot: &FiscalSnapshot, _config: &ScoringConfig) -> Finding {
        let flagged: Vec<&crate::models::FixedAsset> = snapshot
            .assets
            .iter()
            .filter(|a| a.status == AssetStatus::Disposed && a.disposal_value.is_none())
            .collect();

        if flagged.is_empty() {
            return Finding::pass(
                self.module(),
                self.code(),
                self.name(),
                serde_json::json!({ "assets_checked": snapshot.assets.len() }),
            );
        }

        let affected_amount: Decimal = flagged.iter().map(|a| a.cost).sum();

        Finding {
            run_id: Uuid::nil(),
            module: self.module(),
            check_code: self.code().to_string(),
            check_name: self.name().to_string(),
            severity: Severity::Critical,
            status: CheckStatus::Fail,
            affected_count: flagged.len() as u64,
            affected_amount,
            recommendation: Some(
                "Record the sale or scrap value for each disposed asset".to_string(),
            ),
            details: serde_json::json!({
                "assets_checked": snapshot.assets.len(),
                "flagged": flagged.iter().map(|a| a.name.clone()).collect::<Vec<_>>(),
            }),
            record_refs: flagged.iter().map(|a| a.id.to_string()).collect(),
        }
    }
}
