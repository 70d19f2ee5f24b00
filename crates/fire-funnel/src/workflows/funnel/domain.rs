use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier the backend assigns to a lead; it threads the quiz and results steps together.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeadId(pub String);

impl fmt::Display for LeadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Every input the lead-capture form can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldName {
    Name,
    Mobile,
    BusinessCode,
    EmployeeCode,
    City,
    Consent,
}

impl FieldName {
    pub const ALL: [FieldName; 6] = [
        FieldName::Name,
        FieldName::Mobile,
        FieldName::BusinessCode,
        FieldName::EmployeeCode,
        FieldName::City,
        FieldName::Consent,
    ];

    pub const fn wire_name(self) -> &'static str {
        match self {
            FieldName::Name => "name",
            FieldName::Mobile => "mobile",
            FieldName::BusinessCode => "businessCode",
            FieldName::EmployeeCode => "employeeCode",
            FieldName::City => "city",
            FieldName::Consent => "consent",
        }
    }

    /// Wire name with the first letter upper-cased, as used in "is required" messages.
    pub const fn required_label(self) -> &'static str {
        match self {
            FieldName::Name => "Name",
            FieldName::Mobile => "Mobile",
            FieldName::BusinessCode => "BusinessCode",
            FieldName::EmployeeCode => "EmployeeCode",
            FieldName::City => "City",
            FieldName::Consent => "Consent",
        }
    }

    /// Human label used in rule messages.
    pub const fn display_label(self) -> &'static str {
        match self {
            FieldName::Name => "Name",
            FieldName::Mobile => "Mobile number",
            FieldName::BusinessCode => "Business Code",
            FieldName::EmployeeCode => "Employee Code",
            FieldName::City => "City",
            FieldName::Consent => "Consent",
        }
    }

    pub const fn is_agency_code(self) -> bool {
        matches!(self, FieldName::BusinessCode | FieldName::EmployeeCode)
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Which of the two agency code fields is active. Sent as `selectedType` / `type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CodeType {
    #[default]
    BusinessCode,
    EmployeeCode,
}

impl CodeType {
    pub const fn field(self) -> FieldName {
        match self {
            CodeType::BusinessCode => FieldName::BusinessCode,
            CodeType::EmployeeCode => FieldName::EmployeeCode,
        }
    }

    pub const fn other(self) -> CodeType {
        match self {
            CodeType::BusinessCode => CodeType::EmployeeCode,
            CodeType::EmployeeCode => CodeType::BusinessCode,
        }
    }

    pub const fn as_str(self) -> &'static str {
        self.field().wire_name()
    }
}

/// Values the visitor has typed so far. Never cleared by toggling the agency code type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormState {
    pub name: String,
    pub mobile: String,
    pub business_code: String,
    pub employee_code: String,
    pub city: String,
    pub consent: bool,
}

impl FormState {
    /// Raw text for a field; `None` for the consent checkbox.
    pub fn text(&self, field: FieldName) -> Option<&str> {
        match field {
            FieldName::Name => Some(&self.name),
            FieldName::Mobile => Some(&self.mobile),
            FieldName::BusinessCode => Some(&self.business_code),
            FieldName::EmployeeCode => Some(&self.employee_code),
            FieldName::City => Some(&self.city),
            FieldName::Consent => None,
        }
    }

    /// Trimmed text, `None` when the field is blank or not textual.
    pub fn filled(&self, field: FieldName) -> Option<&str> {
        self.text(field)
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    pub(crate) fn text_mut(&mut self, field: FieldName) -> Option<&mut String> {
        match field {
            FieldName::Name => Some(&mut self.name),
            FieldName::Mobile => Some(&mut self.mobile),
            FieldName::BusinessCode => Some(&mut self.business_code),
            FieldName::EmployeeCode => Some(&mut self.employee_code),
            FieldName::City => Some(&mut self.city),
            FieldName::Consent => None,
        }
    }
}

/// Field-scoped validation messages; at most one per field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorMap(BTreeMap<FieldName, String>);

impl ErrorMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: FieldName, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn remove(&mut self, field: FieldName) -> Option<String> {
        self.0.remove(&field)
    }

    pub fn get(&self, field: FieldName) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: FieldName) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldName, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

impl FromIterator<(FieldName, String)> for ErrorMap {
    fn from_iter<I: IntoIterator<Item = (FieldName, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
