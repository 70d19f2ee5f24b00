use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::channel::ChannelConfig;
use super::domain::{CodeType, ErrorMap, FieldName, FormState};
use super::validation::validate_form;

/// Body posted to `add-info`: only the active, non-empty fields plus channel metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consent: Option<bool>,
    pub channel: Option<String>,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_type: Option<CodeType>,
}

/// Query string for `add-info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadQuery {
    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    pub referral: Option<String>,
    #[serde(rename = "type", default)]
    pub selected_type: CodeType,
}

/// Everything needed for one `add-info` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadSubmission {
    pub query: LeadQuery,
    pub payload: SubmissionPayload,
}

/// JavaScript-style ISO-8601 timestamp: UTC, milliseconds, `Z` suffix.
pub fn iso_timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Copies the active fields that hold a value. The unselected agency code is left out
/// no matter what it contains.
pub fn build_payload(
    form: &FormState,
    config: &ChannelConfig,
    referral: Option<&str>,
    selected: CodeType,
    now: DateTime<Utc>,
) -> SubmissionPayload {
    let mut payload = SubmissionPayload {
        name: None,
        mobile: None,
        business_code: None,
        employee_code: None,
        city: None,
        consent: None,
        channel: referral.map(str::to_string),
        timestamp: iso_timestamp(now),
        selected_type: config.exclusive_codes.then_some(selected),
    };

    for field in config.active_fields(selected) {
        let value = form.filled(field).map(str::to_string);
        match field {
            FieldName::Name => payload.name = value,
            FieldName::Mobile => payload.mobile = value,
            FieldName::BusinessCode => payload.business_code = value,
            FieldName::EmployeeCode => payload.employee_code = value,
            FieldName::City => payload.city = value,
            FieldName::Consent => payload.consent = form.consent.then_some(true),
        }
    }

    payload
}

/// Validates the whole form and, when clean, assembles the outbound request.
pub fn prepare_submission(
    form: &FormState,
    config: &ChannelConfig,
    referral: Option<&str>,
    selected: CodeType,
    now: DateTime<Utc>,
) -> Result<LeadSubmission, ErrorMap> {
    let errors = validate_form(form, config, selected);
    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(LeadSubmission {
        query: LeadQuery {
            referral: referral.map(str::to_string),
            selected_type: selected,
        },
        payload: build_payload(form, config, referral, selected, now),
    })
}
