use chrono::Utc;
use serde_json::json;

use super::common::*;
use crate::workflows::funnel::domain::{CodeType, FieldName, FormState};
use crate::workflows::funnel::form::{LeadForm, CONSENT_RETRY_MESSAGE, SUBMISSION_RETRY_MESSAGE};
use crate::workflows::funnel::{BackendReceipt, FunnelError};

#[tokio::test]
async fn short_mobile_fails_validation_without_network_call() {
    let backend = RecordingBackend::accepting("lead-1");
    let mut form = LeadForm::new(Some("pnb")).with_state(FormState {
        name: "Asha".to_string(),
        mobile: "12345".to_string(),
        employee_code: "1234567".to_string(),
        consent: true,
        ..Default::default()
    });

    match form.submit(&backend).await {
        Err(FunnelError::Validation(errors)) => {
            assert_eq!(
                errors.get(FieldName::Mobile),
                Some("Mobile number must be 10 digits")
            );
            assert_eq!(errors.len(), 1);
        }
        other => panic!("expected validation failure, got {other:?}"),
    }

    assert!(backend.info_calls().is_empty());
    assert!(!form.is_loading());
    assert_eq!(form.errors().get(FieldName::Mobile), Some("Mobile number must be 10 digits"));
}

#[tokio::test]
async fn fixing_fields_then_resubmitting_calls_backend_once_with_configured_fields() {
    let backend = RecordingBackend::accepting("lead-42");
    let mut form = LeadForm::new(Some("pnb"));
    form.set_field(FieldName::Name, "Asha");
    form.set_field(FieldName::Mobile, "12345");
    form.set_field(FieldName::EmployeeCode, "1234567");
    form.set_field(FieldName::City, "Pune");
    form.set_consent(true);

    assert!(matches!(
        form.submit(&backend).await,
        Err(FunnelError::Validation(_))
    ));

    form.set_field(FieldName::Mobile, "9876543210");
    assert!(form.errors().is_empty());

    let advance = form.submit(&backend).await.expect("submission accepted");
    assert_eq!(advance.id.0, "lead-42");
    assert_eq!(advance.next, "/calculator/lead-42");

    let calls = backend.info_calls();
    assert_eq!(calls.len(), 1);
    let (query, payload) = &calls[0];
    assert_eq!(query.referral.as_deref(), Some("pnb"));
    assert_eq!(query.selected_type, CodeType::BusinessCode);

    let body = serde_json::to_value(payload).expect("serializes");
    let mut keys: Vec<&str> = body
        .as_object()
        .expect("object payload")
        .keys()
        .map(String::as_str)
        .collect();
    keys.sort_unstable();
    assert_eq!(
        keys,
        vec!["channel", "consent", "employeeCode", "mobile", "name", "timestamp"]
    );
    assert_eq!(body["channel"], json!("pnb"));
    assert_eq!(body["consent"], json!(true));
}

#[test]
fn typing_reports_partial_length_but_not_blank_values() {
    let mut form = LeadForm::new(Some("agency"));
    form.set_field(FieldName::BusinessCode, "1234");
    assert_eq!(
        form.errors().get(FieldName::BusinessCode),
        Some("Business Code must be 8 digits")
    );

    form.set_field(FieldName::BusinessCode, "");
    assert!(form.errors().get(FieldName::BusinessCode).is_none());

    form.set_field(FieldName::BusinessCode, "12345678");
    assert!(form.errors().is_empty());
}

#[test]
fn membership_waits_for_submission() {
    let mut form = LeadForm::new(Some("social_media")).with_state(default_form());
    form.set_field(FieldName::City, "Pune");
    assert!(form.errors().is_empty());

    match form.begin_submit(Utc::now()) {
        Err(FunnelError::Validation(errors)) => {
            assert_eq!(errors.get(FieldName::City), Some("Invalid city selected"));
        }
        other => panic!("expected validation failure, got {other:?}"),
    }
}

#[test]
fn presence_is_reported_before_length() {
    let mut form = LeadForm::new(Some("agency"));
    form.set_field(FieldName::Mobile, "   ");
    form.select_code_type(CodeType::EmployeeCode);

    match form.begin_submit(Utc::now()) {
        Err(FunnelError::Validation(errors)) => {
            assert_eq!(errors.get(FieldName::Name), Some("Name is required"));
            assert_eq!(errors.get(FieldName::Mobile), Some("Mobile is required"));
            assert_eq!(
                errors.get(FieldName::EmployeeCode),
                Some("EmployeeCode is required")
            );
            assert_eq!(errors.get(FieldName::Consent), Some("Consent is required"));
            assert!(!errors.contains(FieldName::BusinessCode));
        }
        other => panic!("expected validation failure, got {other:?}"),
    }
}

#[tokio::test]
async fn agency_toggle_preserves_values_and_excludes_inactive_code() {
    let backend = RecordingBackend::accepting("lead-7");
    let mut form = LeadForm::new(Some("agency")).with_state(agency_form());

    form.select_code_type(CodeType::EmployeeCode);
    form.set_field(FieldName::EmployeeCode, "99");
    assert!(form.errors().contains(FieldName::EmployeeCode));

    form.select_code_type(CodeType::BusinessCode);
    assert_eq!(form.state().employee_code, "99");
    assert_eq!(form.state().business_code, "12345678");
    assert!(!form.errors().contains(FieldName::EmployeeCode));

    form.submit(&backend).await.expect("submission accepted");

    let calls = backend.info_calls();
    let (query, payload) = &calls[0];
    assert_eq!(query.selected_type, CodeType::BusinessCode);
    assert_eq!(payload.business_code.as_deref(), Some("12345678"));
    assert!(payload.employee_code.is_none());
    assert_eq!(payload.selected_type, Some(CodeType::BusinessCode));
}

#[tokio::test]
async fn agency_employee_code_selection_validates_employee_code_only() {
    let backend = RecordingBackend::accepting("lead-8");
    let mut form = LeadForm::new(Some("agency")).with_state(agency_form());
    form.select_code_type(CodeType::EmployeeCode);

    match form.submit(&backend).await {
        Err(FunnelError::Validation(errors)) => {
            assert_eq!(
                errors.get(FieldName::EmployeeCode),
                Some("Employee Code must be 7 digits")
            );
            assert!(!errors.contains(FieldName::BusinessCode));
        }
        other => panic!("expected validation failure, got {other:?}"),
    }
    assert_eq!(form.state().business_code, "12345678");
    assert!(backend.info_calls().is_empty());
}

#[tokio::test]
async fn missing_identifier_sets_consent_error_and_keeps_values() {
    let backend = RecordingBackend::replying(Reply::MissingId);
    let mut form = LeadForm::new(None).with_state(default_form());

    match form.submit(&backend).await {
        Err(FunnelError::MissingIdentifier) => {}
        other => panic!("expected missing identifier, got {other:?}"),
    }

    assert_eq!(form.errors().get(FieldName::Consent), Some(CONSENT_RETRY_MESSAGE));
    assert_eq!(form.state(), &default_form());
    assert!(!form.is_loading());
}

#[tokio::test]
async fn transport_failure_sets_form_error_for_retry() {
    let backend = RecordingBackend::replying(Reply::Unavailable);
    let mut form = LeadForm::new(None).with_state(default_form());

    match form.submit(&backend).await {
        Err(FunnelError::Backend(_)) => {}
        other => panic!("expected backend failure, got {other:?}"),
    }
    assert_eq!(form.form_error(), Some(SUBMISSION_RETRY_MESSAGE));
    assert!(form.errors().is_empty());
    assert!(!form.is_loading());
}

#[test]
fn second_submission_is_refused_while_in_flight() {
    let mut form = LeadForm::new(None).with_state(default_form());

    let submission = form.begin_submit(Utc::now()).expect("first submission starts");
    assert!(form.is_loading());
    assert_eq!(submission.payload.channel, None);

    match form.begin_submit(Utc::now()) {
        Err(FunnelError::InFlight) => {}
        other => panic!("expected in-flight refusal, got {other:?}"),
    }

    let advance = form
        .record_response(Ok(BackendReceipt::accepted("lead-9")))
        .expect("accepted");
    assert_eq!(advance.next, "/calculator/lead-9");
    assert!(!form.is_loading());
    assert!(form.begin_submit(Utc::now()).is_ok());
}

#[test]
fn search_city_tracks_text() {
    let mut form = LeadForm::new(None);
    let suggestions = form.search_city("pu");
    assert_eq!(suggestions, vec!["Pune", "Jaipur", "Kanpur", "Nagpur"]);
    assert_eq!(form.city_search(), "pu");
}
