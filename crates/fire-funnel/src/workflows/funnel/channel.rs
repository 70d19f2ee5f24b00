use serde::Serialize;

use super::domain::{CodeType, FieldName};

/// Inline rule attached to a field for a given channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationRule {
    ExactLength { length: usize },
    AllowedValues { values: &'static [&'static str] },
}

impl ValidationRule {
    /// Length rules run before membership rules within one field.
    pub(crate) const fn precedence(&self) -> u8 {
        match self {
            ValidationRule::ExactLength { .. } => 0,
            ValidationRule::AllowedValues { .. } => 1,
        }
    }
}

/// Fields and rules a referral channel collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelConfig {
    pub key: Option<&'static str>,
    pub fields: &'static [FieldName],
    pub validation: &'static [(FieldName, ValidationRule)],
    /// Agency visitors supply exactly one of business code or employee code.
    pub exclusive_codes: bool,
}

pub const AGENCY_CHANNEL: &str = "agency";

pub const DEFAULT_FIELDS: &[FieldName] = &[
    FieldName::Name,
    FieldName::Mobile,
    FieldName::City,
    FieldName::Consent,
];

const AGENCY_FIELDS: &[FieldName] = &[
    FieldName::Name,
    FieldName::Mobile,
    FieldName::BusinessCode,
    FieldName::EmployeeCode,
    FieldName::Consent,
];

const BANK_PARTNER_FIELDS: &[FieldName] = &[
    FieldName::Name,
    FieldName::Mobile,
    FieldName::EmployeeCode,
    FieldName::Consent,
];

const BUSINESS_CODE_RULE: ValidationRule = ValidationRule::ExactLength { length: 8 };
const EMPLOYEE_CODE_RULE: ValidationRule = ValidationRule::ExactLength { length: 7 };

const BANK_PARTNER_RULES: &[(FieldName, ValidationRule)] =
    &[(FieldName::EmployeeCode, EMPLOYEE_CODE_RULE)];

const SOCIAL_MEDIA_CITIES: &[&str] = &["Delhi", "Mumbai", "Bangalore", "Chennai", "Hyderabad"];

/// Suggestions offered when a channel does not restrict the city.
pub const CITY_OPTIONS: &[&str] = &[
    "Delhi",
    "Mumbai",
    "Bangalore",
    "Chennai",
    "Hyderabad",
    "Kolkata",
    "Pune",
    "Ahmedabad",
    "Jaipur",
    "Lucknow",
    "Kanpur",
    "Nagpur",
    "Indore",
    "Thane",
    "Bhopal",
    "Visakhapatnam",
    "Pimpri-Chinchwad",
    "Patna",
    "Vadodara",
    "Ghaziabad",
];

const fn bank_partner(key: &'static str) -> ChannelConfig {
    ChannelConfig {
        key: Some(key),
        fields: BANK_PARTNER_FIELDS,
        validation: BANK_PARTNER_RULES,
        exclusive_codes: false,
    }
}

static CHANNELS: &[ChannelConfig] = &[
    ChannelConfig {
        key: Some(AGENCY_CHANNEL),
        fields: AGENCY_FIELDS,
        validation: &[
            (FieldName::BusinessCode, BUSINESS_CODE_RULE),
            (FieldName::EmployeeCode, EMPLOYEE_CODE_RULE),
        ],
        exclusive_codes: true,
    },
    bank_partner("pnb"),
    bank_partner("jkb"),
    bank_partner("kbl"),
    bank_partner("psf"),
    ChannelConfig {
        key: Some("social_media"),
        fields: DEFAULT_FIELDS,
        validation: &[(
            FieldName::City,
            ValidationRule::AllowedValues {
                values: SOCIAL_MEDIA_CITIES,
            },
        )],
        exclusive_codes: false,
    },
];

const DEFAULT_CHANNEL: ChannelConfig = ChannelConfig {
    key: None,
    fields: DEFAULT_FIELDS,
    validation: &[],
    exclusive_codes: false,
};

/// Looks up the configuration for a referral; unknown or missing referrals get the defaults.
pub fn resolve_channel(channel_id: Option<&str>) -> ChannelConfig {
    channel_id
        .and_then(|id| CHANNELS.iter().find(|config| config.key == Some(id)))
        .copied()
        .unwrap_or(DEFAULT_CHANNEL)
}

/// Identifiers of every channel with a dedicated configuration.
pub fn known_channels() -> impl Iterator<Item = &'static str> {
    CHANNELS.iter().filter_map(|config| config.key)
}

impl ChannelConfig {
    pub fn is_known(&self) -> bool {
        self.key.is_some()
    }

    pub fn includes(&self, field: FieldName) -> bool {
        self.fields.contains(&field)
    }

    pub fn rule_for(&self, field: FieldName) -> Option<ValidationRule> {
        self.validation
            .iter()
            .find(|(rule_field, _)| *rule_field == field)
            .map(|(_, rule)| *rule)
    }

    /// Fields validated and submitted for the given code selection, in display order.
    ///
    /// With `exclusive_codes` the unselected code field is dropped even though it stays
    /// in `fields` and keeps whatever value the visitor typed into it.
    pub fn active_fields(&self, selected: CodeType) -> impl Iterator<Item = FieldName> + '_ {
        let inactive = self.exclusive_codes.then(|| selected.other().field());
        self.fields
            .iter()
            .copied()
            .filter(move |field| Some(*field) != inactive)
    }

    pub fn is_active(&self, field: FieldName, selected: CodeType) -> bool {
        self.active_fields(selected).any(|active| active == field)
    }

    pub fn allowed_cities(&self) -> Option<&'static [&'static str]> {
        match self.rule_for(FieldName::City) {
            Some(ValidationRule::AllowedValues { values }) => Some(values),
            _ => None,
        }
    }

    pub fn city_options(&self) -> &'static [&'static str] {
        self.allowed_cities().unwrap_or(CITY_OPTIONS)
    }

    /// Cities containing `query` (case-insensitive), in table order. A blank query lists all.
    pub fn city_suggestions(&self, query: &str) -> Vec<&'static str> {
        let needle = query.trim().to_lowercase();
        self.city_options()
            .iter()
            .copied()
            .filter(|city| needle.is_empty() || city.to_lowercase().contains(&needle))
            .collect()
    }

    /// Every rule targets a declared field or one of the agency code sub-fields.
    pub fn rules_reference_declared_fields(&self) -> bool {
        self.validation
            .iter()
            .all(|(field, _)| self.includes(*field) || field.is_agency_code())
    }
}
