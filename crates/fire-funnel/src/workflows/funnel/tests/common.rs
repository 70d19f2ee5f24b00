use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;

use crate::workflows::funnel::backend::{
    BackendError, BackendReceipt, FunnelBackend, Recommendation, RecommendedUser,
};
use crate::workflows::funnel::domain::{FormState, LeadId};
use crate::workflows::funnel::quiz::QuizAnswers;
use crate::workflows::funnel::submission::{LeadQuery, SubmissionPayload};
use crate::workflows::funnel::{funnel_router, FunnelService};

/// How the fake backend answers `add-info` and `add-quiz`.
#[derive(Debug, Clone)]
pub(super) enum Reply {
    Accept(&'static str),
    MissingId,
    Unavailable,
}

impl Reply {
    fn to_result(&self) -> Result<BackendReceipt, BackendError> {
        match self {
            Reply::Accept(id) => Ok(BackendReceipt::accepted(*id)),
            Reply::MissingId => Ok(BackendReceipt::rejected()),
            Reply::Unavailable => Err(BackendError::Transport("connection refused".to_string())),
        }
    }
}

pub(super) struct RecordingBackend {
    reply: Reply,
    recommendation: Option<Recommendation>,
    info_calls: Arc<Mutex<Vec<(LeadQuery, SubmissionPayload)>>>,
    quiz_calls: Arc<Mutex<Vec<(LeadId, QuizAnswers)>>>,
}

impl RecordingBackend {
    pub(super) fn replying(reply: Reply) -> Self {
        Self {
            reply,
            recommendation: Some(sample_recommendation()),
            info_calls: Arc::default(),
            quiz_calls: Arc::default(),
        }
    }

    pub(super) fn accepting(id: &'static str) -> Self {
        Self::replying(Reply::Accept(id))
    }

    pub(super) fn with_recommendation(mut self, recommendation: Option<Recommendation>) -> Self {
        self.recommendation = recommendation;
        self
    }

    pub(super) fn info_calls(&self) -> Vec<(LeadQuery, SubmissionPayload)> {
        self.info_calls
            .lock()
            .expect("info call mutex poisoned")
            .clone()
    }

    pub(super) fn quiz_calls(&self) -> Vec<(LeadId, QuizAnswers)> {
        self.quiz_calls
            .lock()
            .expect("quiz call mutex poisoned")
            .clone()
    }
}

#[async_trait]
impl FunnelBackend for RecordingBackend {
    async fn add_info(
        &self,
        query: &LeadQuery,
        payload: &SubmissionPayload,
    ) -> Result<BackendReceipt, BackendError> {
        self.info_calls
            .lock()
            .expect("info call mutex poisoned")
            .push((query.clone(), payload.clone()));
        self.reply.to_result()
    }

    async fn add_quiz(
        &self,
        id: &LeadId,
        answers: &QuizAnswers,
    ) -> Result<BackendReceipt, BackendError> {
        self.quiz_calls
            .lock()
            .expect("quiz call mutex poisoned")
            .push((id.clone(), *answers));
        self.reply.to_result()
    }

    async fn recommendation(&self, _id: &LeadId) -> Result<Recommendation, BackendError> {
        match (&self.reply, &self.recommendation) {
            (Reply::Unavailable, _) => Err(BackendError::Status { status: 503 }),
            (_, Some(recommendation)) => Ok(recommendation.clone()),
            (_, None) => Ok(Recommendation::default()),
        }
    }
}

pub(super) fn sample_recommendation() -> Recommendation {
    Recommendation {
        user: Some(RecommendedUser {
            name: "Asha Verma".to_string(),
            channel: Some("kbl".to_string()),
            retirement_corpus: Some(45_000_000.0),
            yearly_investment: Some(360_000.0),
            ..RecommendedUser::default()
        }),
        recommended_plan: vec!["GAIN".to_string(), "HYBRID".to_string()],
    }
}

pub(super) fn default_form() -> FormState {
    FormState {
        name: "Asha Verma".to_string(),
        mobile: "9876543210".to_string(),
        city: "Pune".to_string(),
        consent: true,
        ..FormState::default()
    }
}

pub(super) fn agency_form() -> FormState {
    FormState {
        name: "Ravi Kumar".to_string(),
        mobile: "9123456780".to_string(),
        business_code: "12345678".to_string(),
        employee_code: "99".to_string(),
        consent: true,
        ..FormState::default()
    }
}

pub(super) fn service_with(
    backend: RecordingBackend,
) -> (Arc<FunnelService<RecordingBackend>>, Arc<RecordingBackend>) {
    let backend = Arc::new(backend);
    let service = Arc::new(FunnelService::new(backend.clone()));
    (service, backend)
}

pub(super) fn router_with(service: Arc<FunnelService<RecordingBackend>>) -> axum::Router {
    funnel_router(service)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
