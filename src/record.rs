use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

/// Stored in place of any field the page metadata does not carry.
pub const NOT_FOUND: &str = "Not found";

/// A metadata value that may be text or a number (salary, experience).
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(serde_json::Number),
    NotFound,
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::NotFound => f.write_str(NOT_FOUND),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Text(s) => serializer.serialize_str(s),
            FieldValue::Number(n) => n.serialize(serializer),
            FieldValue::NotFound => serializer.serialize_str(NOT_FOUND),
        }
    }
}

/// Normalized job posting. Every field is always populated; absent
/// source values hold [`NOT_FOUND`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalJobRecord {
    pub role: String,
    pub role_code: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub additional_details: AdditionalDetails,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalDetails {
    pub salary_estimate: FieldValue,
    pub education: String,
    pub years_experience: FieldValue,
}

/// Search category a batch of saved pages was collected under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RoleCategory {
    /// Data scientist
    Ds,
    /// Data analyst
    Da,
    /// Business analyst
    Ba,
}

impl RoleCategory {
    pub fn code(self) -> &'static str {
        match self {
            RoleCategory::Ds => "1",
            RoleCategory::Da => "2",
            RoleCategory::Ba => "3",
        }
    }
}
