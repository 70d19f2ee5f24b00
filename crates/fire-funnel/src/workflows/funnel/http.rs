use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use url::Url;

use super::backend::{BackendError, BackendReceipt, FunnelBackend, Recommendation};
use super::domain::LeadId;
use super::quiz::QuizAnswers;
use super::submission::{LeadQuery, SubmissionPayload};
use crate::config::BackendConfig;

const ADD_INFO_PATH: &str = "/add-info";
const ADD_QUIZ_PATH: &str = "/add-quiz";
const RECOMMENDATION_PATH: &str = "/get-recommendation";

/// `reqwest` client for the lead-capture API.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: String,
    http: reqwest::Client,
}

impl HttpBackend {
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| BackendError::Transport(err.to_string()))?;

        Ok(Self {
            base_url: config.base_url.clone(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, BackendError> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, path))
            .map_err(|err| BackendError::Transport(err.to_string()))?;
        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    async fn request<T, B>(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, &str)],
        body: Option<&B>,
    ) -> Result<T, BackendError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.endpoint(path, params)?;
        debug!(%method, %url, "calling funnel backend");

        let mut request = self.http.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|err| BackendError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|err| BackendError::Transport(err.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|err| BackendError::Decode(err.to_string()))
    }
}

#[async_trait]
impl FunnelBackend for HttpBackend {
    async fn add_info(
        &self,
        query: &LeadQuery,
        payload: &SubmissionPayload,
    ) -> Result<BackendReceipt, BackendError> {
        let mut params = Vec::with_capacity(2);
        if let Some(referral) = query.referral.as_deref() {
            params.push(("ref", referral));
        }
        params.push(("type", query.selected_type.as_str()));

        self.request(Method::POST, ADD_INFO_PATH, &params, Some(payload))
            .await
    }

    async fn add_quiz(
        &self,
        id: &LeadId,
        answers: &QuizAnswers,
    ) -> Result<BackendReceipt, BackendError> {
        self.request(Method::POST, ADD_QUIZ_PATH, &[("id", id.0.as_str())], Some(answers))
            .await
    }

    async fn recommendation(&self, id: &LeadId) -> Result<Recommendation, BackendError> {
        self.request::<_, ()>(
            Method::GET,
            RECOMMENDATION_PATH,
            &[("id", id.0.as_str())],
            None,
        )
        .await
    }
}
