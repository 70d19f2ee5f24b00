use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::domain::LeadId;
use super::quiz::QuizAnswers;
use super::submission::{LeadQuery, SubmissionPayload};

/// Reply to `add-info` and `add-quiz`. Only `_id` matters; a body without it is a rejection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendReceipt {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<LeadId>,
}

impl BackendReceipt {
    pub fn accepted(id: impl Into<String>) -> Self {
        Self {
            id: Some(LeadId(id.into())),
        }
    }

    pub fn rejected() -> Self {
        Self::default()
    }
}

/// Lead record echoed back with the recommendation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedUser {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub retirement_corpus: Option<f64>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub yearly_investment: Option<f64>,
    /// Attributes the funnel does not read, kept so nothing is lost on re-serialization.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(default)]
    pub user: Option<RecommendedUser>,
    #[serde(rename = "recommendedPlan", default)]
    pub recommended_plan: Vec<String>,
}

/// Amounts arrive as numbers or numeric strings; anything unparseable is treated as absent.
fn lenient_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(text)) => text.trim().parse::<f64>().ok(),
        _ => None,
    })
}

/// Lead-capture backend the funnel talks to.
#[async_trait]
pub trait FunnelBackend: Send + Sync {
    async fn add_info(
        &self,
        query: &LeadQuery,
        payload: &SubmissionPayload,
    ) -> Result<BackendReceipt, BackendError>;

    async fn add_quiz(
        &self,
        id: &LeadId,
        answers: &QuizAnswers,
    ) -> Result<BackendReceipt, BackendError>;

    async fn recommendation(&self, id: &LeadId) -> Result<Recommendation, BackendError>;
}

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("backend unreachable: {0}")]
    Transport(String),
    #[error("backend responded with status {status}")]
    Status { status: u16 },
    #[error("backend response could not be decoded: {0}")]
    Decode(String),
}
