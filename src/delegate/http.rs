//! HTTP-backed risk intelligence delegate.
//!
//! Speaks the chat-completions dialect with a forced tool call so the
//! remote model can only answer in the [`RiskAssessment`] schema. One
//! attempt per audit run; transport and quota failures map onto typed
//! errors and the caller decides what a failed delegation means.

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, instrument};

use crate::error::{AuditError, AuditResult};

use super::digest::SnapshotDigest;
use super::schema::RiskAssessment;
use super::RiskDelegate;

const TOOL_NAME: &str = "submit_risk_assessment";

const SYSTEM_PROMPT: &str = "You are a financial audit risk analyst reviewing aggregate \
statistics for one Indian fiscal year. Identify anomalies, thematic risks, sampling plans \
and narrative commentary, then submit them with the submit_risk_assessment tool. Every \
justification must cite figures from the digest. Do not invent records that are not \
implied by the aggregates.";

/// Connection settings for the HTTP delegate.
#[derive(Debug, Clone, Deserialize)]
pub struct DelegateConfig {
    /// Full URL of the chat-completions endpoint.
    pub endpoint: String,
    /// Bearer token sent with each request.
    pub api_key: String,
    /// Model identifier the provider expects.
    pub model: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    60
}

/// A [`RiskDelegate`] that calls a remote chat-completions API.
pub struct HttpRiskDelegate {
    client: reqwest::Client,
    config: DelegateConfig,
}

impl HttpRiskDelegate {
    /// Creates a delegate with its own connection pool.
    pub fn new(config: DelegateConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();
        Self { client, config }
    }

    fn request_body(&self, digest: &SnapshotDigest) -> AuditResult<serde_json::Value> {
        let digest_json =
            serde_json::to_string(digest).map_err(|e| AuditError::DelegateProtocol {
                message: format!("failed to serialize digest: {e}"),
            })?;
        Ok(json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": digest_json },
            ],
            "tools": [{
                "type": "function",
                "function": {
                    "name": TOOL_NAME,
                    "description": "Submit the structured risk assessment.",
                    "parameters": assessment_parameters(),
                },
            }],
            "tool_choice": {
                "type": "function",
                "function": { "name": TOOL_NAME },
            },
        }))
    }
}

/// JSON Schema for the tool parameters, mirroring [`RiskAssessment`].
fn assessment_parameters() -> serde_json::Value {
    json!({
        "type": "object",
        "required": ["anomalies", "risk_themes", "samples", "narratives", "risk_breakdown"],
        "properties": {
            "anomalies": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["title", "area", "trigger_condition", "deviation_pct",
                                 "confidence", "justification", "suggested_action"],
                    "properties": {
                        "title": { "type": "string" },
                        "area": { "type": "string" },
                        "trigger_condition": { "type": "string" },
                        "deviation_pct": { "type": "string" },
                        "confidence": { "type": "string" },
                        "justification": { "type": "string" },
                        "suggested_action": { "type": "string" }
                    }
                }
            },
            "risk_themes": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["theme", "level", "justification"],
                    "properties": {
                        "theme": { "type": "string" },
                        "level": { "type": "string", "enum": ["low", "medium", "high"] },
                        "justification": { "type": "string" }
                    }
                }
            },
            "samples": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["population", "selection_basis", "sample_size"],
                    "properties": {
                        "population": { "type": "string" },
                        "selection_basis": { "type": "string" },
                        "sample_size": { "type": "integer", "minimum": 1 }
                    }
                }
            },
            "narratives": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["section", "text"],
                    "properties": {
                        "section": { "type": "string" },
                        "text": { "type": "string" }
                    }
                }
            },
            "risk_breakdown": {
                "type": "object",
                "required": ["revenue_anomaly", "expense_anomaly", "vendor_concentration",
                             "manual_entry_risk", "compliance_gap", "control_weakness",
                             "data_quality"],
                "properties": {
                    "revenue_anomaly": { "type": "string" },
                    "expense_anomaly": { "type": "string" },
                    "vendor_concentration": { "type": "string" },
                    "manual_entry_risk": { "type": "string" },
                    "compliance_gap": { "type": "string" },
                    "control_weakness": { "type": "string" },
                    "data_quality": { "type": "string" }
                }
            }
        }
    })
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    #[serde(default)]
    tool_calls: Vec<ToolCall>,
}

#[derive(Debug, Deserialize)]
struct ToolCall {
    function: FunctionCall,
}

#[derive(Debug, Deserialize)]
struct FunctionCall {
    name: String,
    arguments: String,
}

fn parse_assessment(body: &str) -> AuditResult<RiskAssessment> {
    let response: ChatResponse =
        serde_json::from_str(body).map_err(|e| AuditError::DelegateProtocol {
            message: format!("unparseable delegate response: {e}"),
        })?;
    let call = response
        .choices
        .first()
        .and_then(|c| c.message.tool_calls.first())
        .ok_or_else(|| AuditError::DelegateProtocol {
            message: "delegate response contained no tool call".to_string(),
        })?;
    if call.function.name != TOOL_NAME {
        return Err(AuditError::DelegateProtocol {
            message: format!("delegate called unexpected tool '{}'", call.function.name),
        });
    }
    let assessment: RiskAssessment =
        serde_json::from_str(&call.function.arguments).map_err(|e| {
            AuditError::DelegateProtocol {
                message: format!("tool arguments do not match the assessment schema: {e}"),
            }
        })?;
    assessment.validate()?;
    Ok(assessment)
}

#[async_trait::async_trait]
impl RiskDelegate for HttpRiskDelegate {
    #[instrument(skip_all, fields(fiscal_year = %digest.fiscal_year))]
    async fn assess(&self, digest: &SnapshotDigest) -> AuditResult<RiskAssessment> {
        let body = self.request_body(digest)?;
        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AuditError::DelegateUnavailable {
                status: e.status().map(|s| s.as_u16()).unwrap_or(0),
            })?;

        let status = response.status();
        debug!(status = status.as_u16(), "delegate responded");
        match status {
            StatusCode::TOO_MANY_REQUESTS => {
                return Err(AuditError::DelegateUnavailable {
                    status: status.as_u16(),
                });
            }
            StatusCode::PAYMENT_REQUIRED => {
                return Err(AuditError::DelegateBudgetExhausted {
                    status: status.as_u16(),
                });
            }
            s if !s.is_success() => {
                return Err(AuditError::DelegateProtocol {
                    message: format!("delegate returned HTTP {}", s.as_u16()),
                });
            }
            _ => {}
        }

        let text = response
            .text()
            .await
            .map_err(|e| AuditError::DelegateProtocol {
                message: format!("failed to read delegate response body: {e}"),
            })?;
        parse_assessment(&text)
    }
}
