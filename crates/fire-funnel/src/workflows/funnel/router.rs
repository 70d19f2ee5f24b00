use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::backend::FunnelBackend;
use super::domain::{ErrorMap, FieldName, FormState, LeadId};
use super::form::{CONSENT_RETRY_MESSAGE, SUBMISSION_RETRY_MESSAGE};
use super::quiz::QuizAnswers;
use super::service::{FunnelError, FunnelService};
use super::submission::LeadQuery;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ReferralQuery {
    #[serde(rename = "ref", default)]
    pub(crate) referral: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct CitySearchQuery {
    #[serde(default)]
    pub(crate) q: String,
    #[serde(rename = "ref", default)]
    pub(crate) referral: Option<String>,
}

/// Router builder exposing the lead, quiz and results steps over HTTP.
pub fn funnel_router<B>(service: Arc<FunnelService<B>>) -> Router
where
    B: FunnelBackend + ?Sized + 'static,
{
    Router::new()
        .route("/api/v1/funnel/form", get(form_handler::<B>))
        .route("/api/v1/funnel/cities", get(cities_handler::<B>))
        .route("/api/v1/funnel/leads", post(lead_handler::<B>))
        .route("/api/v1/funnel/quiz/:lead_id", post(quiz_handler::<B>))
        .route("/api/v1/funnel/results/:lead_id", get(results_handler::<B>))
        .with_state(service)
}

pub(crate) async fn form_handler<B>(
    State(service): State<Arc<FunnelService<B>>>,
    Query(query): Query<ReferralQuery>,
) -> Response
where
    B: FunnelBackend + ?Sized + 'static,
{
    let layout = service.form_layout(query.referral.as_deref());
    (StatusCode::OK, axum::Json(layout)).into_response()
}

pub(crate) async fn cities_handler<B>(
    State(service): State<Arc<FunnelService<B>>>,
    Query(query): Query<CitySearchQuery>,
) -> Response
where
    B: FunnelBackend + ?Sized + 'static,
{
    let cities = service.city_suggestions(query.referral.as_deref(), &query.q);
    (StatusCode::OK, axum::Json(json!({ "cities": cities }))).into_response()
}

pub(crate) async fn lead_handler<B>(
    State(service): State<Arc<FunnelService<B>>>,
    Query(query): Query<LeadQuery>,
    axum::Json(state): axum::Json<FormState>,
) -> Response
where
    B: FunnelBackend + ?Sized + 'static,
{
    match service
        .submit_lead(query.referral.as_deref(), query.selected_type, state)
        .await
    {
        Ok(advance) => (StatusCode::CREATED, axum::Json(advance)).into_response(),
        Err(FunnelError::MissingIdentifier) => {
            let mut errors = ErrorMap::new();
            errors.insert(FieldName::Consent, CONSENT_RETRY_MESSAGE);
            let payload = json!({ "errors": errors });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(other) => error_response(other),
    }
}

pub(crate) async fn quiz_handler<B>(
    State(service): State<Arc<FunnelService<B>>>,
    Path(lead_id): Path<String>,
    axum::Json(answers): axum::Json<QuizAnswers>,
) -> Response
where
    B: FunnelBackend + ?Sized + 'static,
{
    match service.submit_quiz(&LeadId(lead_id), answers).await {
        Ok(advance) => (StatusCode::CREATED, axum::Json(advance)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn results_handler<B>(
    State(service): State<Arc<FunnelService<B>>>,
    Path(lead_id): Path<String>,
) -> Response
where
    B: FunnelBackend + ?Sized + 'static,
{
    match service.results(&LeadId(lead_id)).await {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: FunnelError) -> Response {
    match err {
        FunnelError::Validation(errors) => {
            let payload = json!({ "errors": errors });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        FunnelError::InvalidQuiz(errors) => {
            let payload = json!({ "errors": errors });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        FunnelError::EmptyResult(id) => {
            let payload = json!({
                "error": "no recommendation available",
                "id": id,
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        FunnelError::InFlight => {
            let payload = json!({ "error": "a submission is already in flight" });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        FunnelError::MissingIdentifier | FunnelError::Backend(_) => {
            let payload = json!({ "error": SUBMISSION_RETRY_MESSAGE });
            (StatusCode::BAD_GATEWAY, axum::Json(payload)).into_response()
        }
    }
}
