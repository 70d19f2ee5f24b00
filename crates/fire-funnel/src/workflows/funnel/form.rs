use chrono::{DateTime, Utc};
use tracing::warn;

use super::backend::{BackendError, BackendReceipt, FunnelBackend};
use super::channel::{resolve_channel, ChannelConfig};
use super::domain::{CodeType, ErrorMap, FieldName, FormState};
use super::service::{FunnelError, StepAdvance};
use super::submission::{prepare_submission, LeadSubmission};
use super::validation::validate_while_editing;

pub const CONSENT_RETRY_MESSAGE: &str = "Please accept the terms and conditions";
pub const SUBMISSION_RETRY_MESSAGE: &str = "Something went wrong while submitting. Please try again.";

/// One visitor's pass through the lead-capture step.
///
/// Holds the typed values plus the session-only state around them: which agency code
/// is active, the city search text, the error map and the in-flight flag.
#[derive(Debug, Clone)]
pub struct LeadForm {
    referral: Option<String>,
    config: ChannelConfig,
    state: FormState,
    selected_type: CodeType,
    city_search: String,
    errors: ErrorMap,
    form_error: Option<String>,
    loading: bool,
}

impl LeadForm {
    pub fn new(referral: Option<&str>) -> Self {
        Self {
            referral: referral.map(str::to_string),
            config: resolve_channel(referral),
            state: FormState::default(),
            selected_type: CodeType::default(),
            city_search: String::new(),
            errors: ErrorMap::new(),
            form_error: None,
            loading: false,
        }
    }

    pub fn with_state(mut self, state: FormState) -> Self {
        self.state = state;
        self
    }

    pub fn referral(&self) -> Option<&str> {
        self.referral.as_deref()
    }

    pub fn config(&self) -> &ChannelConfig {
        &self.config
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn selected_type(&self) -> CodeType {
        self.selected_type
    }

    pub fn city_search(&self) -> &str {
        &self.city_search
    }

    pub fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    pub fn form_error(&self) -> Option<&str> {
        self.form_error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Stores a text value, clears that field's error and re-checks its length.
    /// The consent checkbox goes through [`LeadForm::set_consent`].
    pub fn set_field(&mut self, field: FieldName, value: impl Into<String>) {
        let Some(slot) = self.state.text_mut(field) else {
            return;
        };
        *slot = value.into();

        self.errors.remove(field);
        if let Some(message) =
            validate_while_editing(field, &self.state, &self.config, self.selected_type)
        {
            self.errors.insert(field, message);
        }
    }

    pub fn set_consent(&mut self, accepted: bool) {
        self.state.consent = accepted;
        self.errors.remove(FieldName::Consent);
    }

    /// Switches the active agency code. Both stored codes survive; only the error of
    /// the code that just went inactive is dropped.
    pub fn select_code_type(&mut self, selected: CodeType) {
        self.selected_type = selected;
        if self.config.exclusive_codes {
            self.errors.remove(selected.other().field());
        }
    }

    /// Updates the city search text and returns the matching options.
    pub fn search_city(&mut self, text: impl Into<String>) -> Vec<&'static str> {
        self.city_search = text.into();
        self.config.city_suggestions(&self.city_search)
    }

    /// Validates everything and, when clean, raises the loading flag and hands back the
    /// request to send. Refused while a previous submission is still outstanding.
    pub fn begin_submit(&mut self, now: DateTime<Utc>) -> Result<LeadSubmission, FunnelError> {
        if self.loading {
            return Err(FunnelError::InFlight);
        }
        self.form_error = None;

        match prepare_submission(
            &self.state,
            &self.config,
            self.referral.as_deref(),
            self.selected_type,
            now,
        ) {
            Ok(submission) => {
                self.errors.clear();
                self.loading = true;
                Ok(submission)
            }
            Err(errors) => {
                self.errors = errors.clone();
                Err(FunnelError::Validation(errors))
            }
        }
    }

    /// Settles an outstanding submission. Values are never touched so the visitor can retry.
    pub fn record_response(
        &mut self,
        outcome: Result<BackendReceipt, BackendError>,
    ) -> Result<StepAdvance, FunnelError> {
        self.loading = false;

        match outcome {
            Ok(BackendReceipt { id: Some(id) }) => Ok(StepAdvance::calculator(id)),
            Ok(BackendReceipt { id: None }) => {
                self.errors.insert(FieldName::Consent, CONSENT_RETRY_MESSAGE);
                Err(FunnelError::MissingIdentifier)
            }
            Err(err) => {
                warn!(error = %err, channel = ?self.referral, "lead submission failed");
                self.form_error = Some(SUBMISSION_RETRY_MESSAGE.to_string());
                Err(FunnelError::Backend(err))
            }
        }
    }

    pub async fn submit<B>(&mut self, backend: &B) -> Result<StepAdvance, FunnelError>
    where
        B: FunnelBackend + ?Sized,
    {
        let submission = self.begin_submit(Utc::now())?;
        let outcome = backend
            .add_info(&submission.query, &submission.payload)
            .await;
        self.record_response(outcome)
    }
}
