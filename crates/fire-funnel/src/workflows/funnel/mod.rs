//! Referral-driven lead funnel: capture form, retirement quiz and plan recommendation.
//!
//! The referral (`ref`) picks a channel configuration that decides which form fields are
//! shown and how they are validated. Persistence and the corpus calculation live behind
//! [`FunnelBackend`].

pub mod backend;
pub mod channel;
pub mod domain;
pub mod form;
pub mod format;
pub mod http;
pub mod quiz;
pub mod results;
pub mod router;
pub mod service;
pub mod submission;
pub mod validation;

#[cfg(test)]
mod tests;

pub use backend::{BackendError, BackendReceipt, FunnelBackend, Recommendation, RecommendedUser};
pub use channel::{known_channels, resolve_channel, ChannelConfig, ValidationRule};
pub use domain::{CodeType, ErrorMap, FieldName, FormState, LeadId};
pub use form::{LeadForm, CONSENT_RETRY_MESSAGE, SUBMISSION_RETRY_MESSAGE};
pub use format::{
    format_abbreviated_currency, format_abbreviated_yearly_amount, format_rupees, with_rupee,
};
pub use http::HttpBackend;
pub use quiz::{QuizAnswers, QuizErrors, QuizField, SliderSpec};
pub use results::{PlanCard, ResultView};
pub use router::funnel_router;
pub use service::{FormLayout, FunnelError, FunnelService, StepAdvance};
pub use submission::{LeadQuery, LeadSubmission, SubmissionPayload};
pub use validation::{validate_field, validate_form};
