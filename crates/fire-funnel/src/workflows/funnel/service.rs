use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use super::backend::{BackendError, BackendReceipt, FunnelBackend};
use super::channel::{resolve_channel, ValidationRule};
use super::domain::{CodeType, ErrorMap, FieldName, FormState, LeadId};
use super::form::LeadForm;
use super::quiz::{QuizAnswers, QuizErrors};
use super::results::ResultView;
use super::validation::effective_rules;

/// Where the visitor goes after a step succeeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepAdvance {
    pub id: LeadId,
    pub next: String,
}

impl StepAdvance {
    pub fn calculator(id: LeadId) -> Self {
        let next = format!("/calculator/{id}");
        Self { id, next }
    }

    pub fn result(id: LeadId) -> Self {
        let next = format!("/result/{id}");
        Self { id, next }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldRule {
    pub field: FieldName,
    #[serde(flatten)]
    pub rule: ValidationRule,
}

/// Resolved form description for a referral.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormLayout {
    pub channel: Option<&'static str>,
    pub fields: Vec<FieldName>,
    pub rules: Vec<FieldRule>,
    pub code_toggle: bool,
    pub default_type: CodeType,
    pub city_options: Vec<&'static str>,
}

/// Orchestrates the three funnel steps against a backend.
pub struct FunnelService<B: ?Sized> {
    backend: Arc<B>,
}

impl<B> FunnelService<B>
where
    B: FunnelBackend + ?Sized + 'static,
{
    pub fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    pub fn form_layout(&self, referral: Option<&str>) -> FormLayout {
        let config = resolve_channel(referral);
        let city_options = if config.includes(FieldName::City) {
            config.city_options().to_vec()
        } else {
            Vec::new()
        };

        FormLayout {
            channel: config.key,
            fields: config.fields.to_vec(),
            rules: effective_rules(&config)
                .into_iter()
                .map(|(field, rule)| FieldRule { field, rule })
                .collect(),
            code_toggle: config.exclusive_codes,
            default_type: CodeType::default(),
            city_options,
        }
    }

    pub fn city_suggestions(&self, referral: Option<&str>, query: &str) -> Vec<&'static str> {
        resolve_channel(referral).city_suggestions(query)
    }

    /// Runs the lead-capture step for a complete set of values.
    pub async fn submit_lead(
        &self,
        referral: Option<&str>,
        selected: CodeType,
        state: FormState,
    ) -> Result<StepAdvance, FunnelError> {
        let mut form = LeadForm::new(referral).with_state(state);
        form.select_code_type(selected);

        let advance = form.submit(self.backend.as_ref()).await?;
        info!(lead = %advance.id, channel = ?referral, "lead accepted");
        Ok(advance)
    }

    pub async fn submit_quiz(
        &self,
        id: &LeadId,
        answers: QuizAnswers,
    ) -> Result<StepAdvance, FunnelError> {
        answers.validate()?;

        match self.backend.add_quiz(id, &answers).await {
            Ok(BackendReceipt { id: Some(next_id) }) => {
                info!(lead = %id, "quiz recorded");
                Ok(StepAdvance::result(next_id))
            }
            Ok(BackendReceipt { id: None }) => {
                warn!(lead = %id, "quiz response carried no identifier");
                Err(FunnelError::MissingIdentifier)
            }
            Err(err) => {
                warn!(lead = %id, error = %err, "quiz submission failed");
                Err(FunnelError::Backend(err))
            }
        }
    }

    pub async fn results(&self, id: &LeadId) -> Result<ResultView, FunnelError> {
        let recommendation = self.backend.recommendation(id).await.map_err(|err| {
            warn!(lead = %id, error = %err, "recommendation fetch failed");
            FunnelError::Backend(err)
        })?;

        ResultView::from_recommendation(recommendation)
            .ok_or_else(|| FunnelError::EmptyResult(id.clone()))
    }
}

/// Error raised by the funnel steps.
#[derive(Debug, thiserror::Error)]
pub enum FunnelError {
    #[error("form has {} invalid field(s)", .0.len())]
    Validation(ErrorMap),
    #[error("quiz answers out of range: {0}")]
    InvalidQuiz(#[from] QuizErrors),
    #[error("a submission is already in flight")]
    InFlight,
    #[error("backend response carried no identifier")]
    MissingIdentifier,
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error("no recommendation found for {0}")]
    EmptyResult(LeadId),
}
