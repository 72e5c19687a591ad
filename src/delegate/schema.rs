//! The strict response contract for the risk intelligence delegate.
//!
//! The delegate must return exactly this shape. Anything missing,
//! malformed, or semantically hollow (empty justifications, negative
//! components) is rejected as a protocol violation rather than patched
//! up, so a drifting remote schema surfaces immediately instead of
//! silently skewing scores.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{AuditError, AuditResult};
use crate::models::{Anomaly, AuditSample, Narrative, RiskTheme};

/// The seven-component risk decomposition returned by the delegate.
///
/// Each component is clamped to its configured cap before the overall
/// index is compiled; the raw values here are the delegate's opinion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskBreakdown {
    /// Unexplained swings in monthly revenue.
    pub revenue_anomaly: Decimal,
    /// Unexplained swings in monthly expenses.
    pub expense_anomaly: Decimal,
    /// Spend concentrated in few vendors.
    pub vendor_concentration: Decimal,
    /// Exposure from manual journal activity.
    pub manual_entry_risk: Decimal,
    /// Exposure from failed compliance checks.
    pub compliance_gap: Decimal,
    /// Exposure from failed control checks.
    pub control_weakness: Decimal,
    /// Exposure from integrity defects in the books.
    pub data_quality: Decimal,
}

impl RiskBreakdown {
    /// Components paired with their field names, in declaration order.
    pub fn components(&self) -> [(&'static str, Decimal); 7] {
        [
            ("revenue_anomaly", self.revenue_anomaly),
            ("expense_anomaly", self.expense_anomaly),
            ("vendor_concentration", self.vendor_concentration),
            ("manual_entry_risk", self.manual_entry_risk),
            ("compliance_gap", self.compliance_gap),
            ("control_weakness", self.control_weakness),
            ("data_quality", self.data_quality),
        ]
    }
}

/// The complete structured assessment a delegate returns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Statistical anomalies the delegate identified.
    pub anomalies: Vec<Anomaly>,
    /// Thematic risk areas with a level and justification.
    pub risk_themes: Vec<RiskTheme>,
    /// Suggested audit sampling plans.
    pub samples: Vec<AuditSample>,
    /// Narrative sections for the auditor pack.
    pub narratives: Vec<Narrative>,
    /// The seven-component risk decomposition.
    pub risk_breakdown: RiskBreakdown,
}

impl RiskAssessment {
    /// Validates the semantic contract on top of the structural one.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::DelegateProtocol`] when a justification is
    /// empty, a confidence falls outside 0-1, or a risk component is
    /// negative.
    pub fn validate(&self) -> AuditResult<()> {
        for anomaly in &self.anomalies {
            if anomaly.justification.trim().is_empty() {
                return Err(AuditError::DelegateProtocol {
                    message: format!("anomaly '{}' has an empty justification", anomaly.title),
                });
            }
            if anomaly.confidence < Decimal::ZERO || anomaly.confidence > Decimal::ONE {
                return Err(AuditError::DelegateProtocol {
                    message: format!(
                        "anomaly '{}' confidence {} outside 0-1",
                        anomaly.title, anomaly.confidence
                    ),
                });
            }
        }
        for theme in &self.risk_themes {
            if theme.justification.trim().is_empty() {
                return Err(AuditError::DelegateProtocol {
                    message: format!("risk theme '{}' has an empty justification", theme.theme),
                });
            }
        }
        for sample in &self.samples {
            if sample.sample_size == 0 {
                return Err(AuditError::DelegateProtocol {
                    message: format!("sample for '{}' has size zero", sample.population),
                });
            }
        }
        for narrative in &self.narratives {
            if narrative.text.trim().is_empty() {
                return Err(AuditError::DelegateProtocol {
                    message: format!("narrative section '{}' is empty", narrative.section),
                });
            }
        }
        for (name, value) in self.risk_breakdown.components() {
            if value < Decimal::ZERO {
                return Err(AuditError::DelegateProtocol {
                    message: format!("risk component {name} is negative ({value})"),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use uuid::Uuid;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn anomaly(justification: &str, confidence: &str) -> Anomaly {
        Anomaly {
            run_id: Uuid::nil(),
            title: "Revenue spike in March".to_string(),
            area: "revenue".to_string(),
            trigger_condition: "monthly total > 2x trailing mean".to_string(),
            deviation_pct: dec("145"),
            confidence: dec(confidence),
            justification: justification.to_string(),
            suggested_action: "Vouch March invoices above 1 lakh".to_string(),
        }
    }

    #[test]
    fn test_empty_assessment_is_valid() {
        assert!(RiskAssessment::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_empty_anomaly_justification() {
        let assessment = RiskAssessment {
            anomalies: vec![anomaly("  ", "0.8")],
            ..Default::default()
        };
        assert!(matches!(
            assessment.validate(),
            Err(AuditError::DelegateProtocol { .. })
        ));
    }

    #[test]
    fn test_rejects_confidence_above_one() {
        let assessment = RiskAssessment {
            anomalies: vec![anomaly("fine", "1.2")],
            ..Default::default()
        };
        assert!(assessment.validate().is_err());
    }

    #[test]
    fn test_rejects_negative_risk_component() {
        let assessment = RiskAssessment {
            risk_breakdown: RiskBreakdown {
                compliance_gap: dec("-3"),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(assessment.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_sample_size() {
        let assessment = RiskAssessment {
            samples: vec![AuditSample {
                run_id: Uuid::nil(),
                population: "cash expenses".to_string(),
                selection_basis: "amount descending".to_string(),
                sample_size: 0,
            }],
            ..Default::default()
        };
        assert!(assessment.validate().is_err());
    }

    #[test]
    fn test_deserializes_full_contract() {
        let json = serde_json::json!({
            "anomalies": [],
            "risk_themes": [],
            "samples": [],
            "narratives": [],
            "risk_breakdown": {
                "revenue_anomaly": "12.5",
                "expense_anomaly": "4",
                "vendor_concentration": "9",
                "manual_entry_risk": "6",
                "compliance_gap": "11",
                "control_weakness": "5",
                "data_quality": "2"
            }
        });
        let assessment: RiskAssessment = serde_json::from_value(json).unwrap();
        assert_eq!(assessment.risk_breakdown.revenue_anomaly, dec("12.5"));
        assert!(assessment.validate().is_ok());
    }
}
