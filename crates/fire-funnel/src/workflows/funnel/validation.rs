use super::channel::{ChannelConfig, ValidationRule};
use super::domain::{CodeType, ErrorMap, FieldName, FormState};

const MOBILE_RULE: ValidationRule = ValidationRule::ExactLength { length: 10 };

/// Rules a field carries on every channel, ahead of the channel's own table.
fn intrinsic_rule(field: FieldName) -> Option<ValidationRule> {
    match field {
        FieldName::Mobile => Some(MOBILE_RULE),
        _ => None,
    }
}

/// Rules for a field, ordered length before membership.
fn rules_for(field: FieldName, config: &ChannelConfig) -> Vec<ValidationRule> {
    let mut rules: Vec<ValidationRule> = intrinsic_rule(field)
        .into_iter()
        .chain(config.rule_for(field))
        .collect();
    rules.sort_by_key(ValidationRule::precedence);
    rules
}

/// Every rule the channel enforces, intrinsic ones included, in field display order.
pub fn effective_rules(config: &ChannelConfig) -> Vec<(FieldName, ValidationRule)> {
    config
        .fields
        .iter()
        .flat_map(|field| {
            rules_for(*field, config)
                .into_iter()
                .map(move |rule| (*field, rule))
        })
        .collect()
}

pub fn required_message(field: FieldName) -> String {
    format!("{} is required", field.required_label())
}

fn rule_message(field: FieldName, rule: &ValidationRule) -> String {
    match rule {
        ValidationRule::ExactLength { length } => {
            format!("{} must be {} digits", field.display_label(), length)
        }
        ValidationRule::AllowedValues { .. } => match field {
            FieldName::City => "Invalid city selected".to_string(),
            other => format!("Invalid {} selected", other.display_label().to_lowercase()),
        },
    }
}

fn rule_holds(rule: &ValidationRule, value: &str) -> bool {
    match rule {
        ValidationRule::ExactLength { length } => value.chars().count() == *length,
        ValidationRule::AllowedValues { values } => values.contains(&value),
    }
}

/// First failing rule for a non-empty value, restricted to rules accepted by `filter`.
fn first_rule_failure(
    field: FieldName,
    value: &str,
    config: &ChannelConfig,
    filter: impl Fn(&ValidationRule) -> bool,
) -> Option<String> {
    rules_for(field, config)
        .iter()
        .filter(|rule| filter(*rule))
        .find(|rule| !rule_holds(rule, value))
        .map(|rule| rule_message(field, rule))
}

/// Full check of one field: presence, then length, then membership.
///
/// Fields outside the channel's active set (including the unselected agency code) never
/// produce an error.
pub fn validate_field(
    field: FieldName,
    form: &FormState,
    config: &ChannelConfig,
    selected: CodeType,
) -> Option<String> {
    if !config.is_active(field, selected) {
        return None;
    }

    if field == FieldName::Consent {
        return (!form.consent).then(|| required_message(field));
    }

    match form.filled(field) {
        None => Some(required_message(field)),
        Some(value) => first_rule_failure(field, value, config, |_| true),
    }
}

/// Check run on every keystroke. Empty values stay quiet until submission and
/// membership waits for a completed choice; a partial value of the wrong length is
/// reported immediately.
pub fn validate_while_editing(
    field: FieldName,
    form: &FormState,
    config: &ChannelConfig,
    selected: CodeType,
) -> Option<String> {
    if !config.is_active(field, selected) {
        return None;
    }

    let value = form.filled(field)?;
    first_rule_failure(field, value, config, |rule| {
        matches!(rule, ValidationRule::ExactLength { .. })
    })
}

/// Validates every active field independently; one message per failing field.
pub fn validate_form(form: &FormState, config: &ChannelConfig, selected: CodeType) -> ErrorMap {
    config
        .active_fields(selected)
        .filter_map(|field| {
            validate_field(field, form, config, selected).map(|message| (field, message))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::funnel::channel::resolve_channel;

    #[test]
    fn rule_messages_name_the_field() {
        assert_eq!(
            rule_message(
                FieldName::BusinessCode,
                &ValidationRule::ExactLength { length: 8 }
            ),
            "Business Code must be 8 digits"
        );
        assert_eq!(
            rule_message(FieldName::Mobile, &MOBILE_RULE),
            "Mobile number must be 10 digits"
        );
        assert_eq!(
            required_message(FieldName::EmployeeCode),
            "EmployeeCode is required"
        );
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let rule = ValidationRule::ExactLength { length: 3 };
        assert!(rule_holds(&rule, "अबक"));
        assert!(!rule_holds(&rule, "ab"));
    }

    #[test]
    fn mobile_length_applies_on_default_channel() {
        let config = resolve_channel(None);
        let form = FormState {
            mobile: "98765".to_string(),
            ..FormState::default()
        };
        assert_eq!(
            validate_field(FieldName::Mobile, &form, &config, CodeType::default()).as_deref(),
            Some("Mobile number must be 10 digits")
        );
    }
}
