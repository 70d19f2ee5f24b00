use async_trait::async_trait;
use fire_funnel::workflows::funnel::{
    BackendError, BackendReceipt, FunnelBackend, LeadId, LeadQuery, QuizAnswers, Recommendation,
    RecommendedUser, SubmissionPayload,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

const EXPENSE_INFLATION: f64 = 0.06;
const LIFE_EXPECTANCY: u32 = 75;

#[derive(Debug, Clone)]
struct StoredLead {
    payload: SubmissionPayload,
    quiz: Option<QuizAnswers>,
}

/// Stand-in for the lead-capture API used by the CLI demo.
///
/// The corpus figure is a rough illustration: today's expenses inflated to the retirement
/// year, multiplied by the years between retirement and [`LIFE_EXPECTANCY`].
#[derive(Default)]
pub(crate) struct InMemoryFunnelBackend {
    sequence: AtomicU64,
    leads: Arc<Mutex<HashMap<LeadId, StoredLead>>>,
}

impl InMemoryFunnelBackend {
    fn next_lead_id(&self) -> LeadId {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        LeadId(format!("lead-{id:06}"))
    }

    pub(crate) fn lead_count(&self) -> usize {
        self.leads.lock().expect("lead store mutex poisoned").len()
    }
}

#[async_trait]
impl FunnelBackend for InMemoryFunnelBackend {
    async fn add_info(
        &self,
        _query: &LeadQuery,
        payload: &SubmissionPayload,
    ) -> Result<BackendReceipt, BackendError> {
        let id = self.next_lead_id();
        let mut guard = self.leads.lock().expect("lead store mutex poisoned");
        guard.insert(
            id.clone(),
            StoredLead {
                payload: payload.clone(),
                quiz: None,
            },
        );
        Ok(BackendReceipt { id: Some(id) })
    }

    async fn add_quiz(
        &self,
        id: &LeadId,
        answers: &QuizAnswers,
    ) -> Result<BackendReceipt, BackendError> {
        let mut guard = self.leads.lock().expect("lead store mutex poisoned");
        match guard.get_mut(id) {
            Some(lead) => {
                lead.quiz = Some(*answers);
                Ok(BackendReceipt { id: Some(id.clone()) })
            }
            None => Ok(BackendReceipt::rejected()),
        }
    }

    async fn recommendation(&self, id: &LeadId) -> Result<Recommendation, BackendError> {
        let guard = self.leads.lock().expect("lead store mutex poisoned");
        let Some(lead) = guard.get(id) else {
            return Ok(Recommendation::default());
        };

        let answers = lead.quiz.unwrap_or_default();
        let projection = Projection::from_answers(&answers);

        Ok(Recommendation {
            user: Some(RecommendedUser {
                name: lead.payload.name.clone().unwrap_or_default(),
                channel: lead.payload.channel.clone(),
                retirement_corpus: Some(projection.corpus),
                yearly_investment: Some(projection.yearly_investment),
                ..RecommendedUser::default()
            }),
            recommended_plan: projection
                .plans()
                .iter()
                .map(|plan| plan.to_string())
                .collect(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Projection {
    pub(crate) years_to_retirement: u32,
    pub(crate) corpus: f64,
    pub(crate) yearly_investment: f64,
}

impl Projection {
    pub(crate) fn from_answers(answers: &QuizAnswers) -> Self {
        let years_to_retirement = answers.retirement_age.saturating_sub(answers.age);
        let years_in_retirement = LIFE_EXPECTANCY.saturating_sub(answers.retirement_age).max(1);

        let annual_expense = f64::from(answers.monthly_expense) * 12.0;
        let inflated = annual_expense
            * (1.0 + EXPENSE_INFLATION).powi(i32::try_from(years_to_retirement).unwrap_or(i32::MAX));
        let corpus = inflated * f64::from(years_in_retirement);
        let yearly_investment = corpus / f64::from(years_to_retirement.max(1));

        Self {
            years_to_retirement,
            corpus,
            yearly_investment,
        }
    }

    pub(crate) fn plans(&self) -> &'static [&'static str] {
        match self.years_to_retirement {
            0..=9 => &["GAIN"],
            10..=19 => &["MGFP", "HYBRID"],
            _ => &["CENTURY", "GAIN"],
        }
    }
}
