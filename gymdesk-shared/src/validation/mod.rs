/// Input validation for member and trainer records
///
/// Form validation runs its checks in a fixed order and stops at the first
/// violation. Email uniqueness needs the store, so it is checked last by the
/// roster service after the synchronous checks pass.
///
/// # Modules
///
/// - [`member`]: enrollment and member-edit forms
/// - [`trainer`]: trainer forms

pub mod member;
pub mod trainer;

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use uuid::Uuid;

pub use member::{MemberForm, ValidatedMember};
pub use trainer::TrainerForm;

/// Which record set an email collided in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Member,
    Trainer,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Member => write!(f, "member"),
            RecordKind::Trainer => write!(f, "trainer"),
        }
    }
}

/// Validation failures, all reported back to the user
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{}", missing_field_message(.0))]
    MissingRequiredField(&'static str),

    #[error("Invalid membership duration")]
    InvalidDuration,

    #[error("Invalid number of PT sessions")]
    InvalidPtSessions,

    #[error("Invalid weight or height values")]
    InvalidHealthMetric(&'static str),

    #[error("A {0} with this email already exists")]
    DuplicateEmail(RecordKind),
}

fn missing_field_message(field: &str) -> &'static str {
    if field.starts_with("emergency_contact") {
        "Emergency contact information is required"
    } else {
        "Please fill in all required fields"
    }
}

impl ValidationError {
    /// Form field the error refers to
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::MissingRequiredField(field) => field,
            ValidationError::InvalidDuration => "duration",
            ValidationError::InvalidPtSessions => "pt_sessions",
            ValidationError::InvalidHealthMetric(field) => field,
            ValidationError::DuplicateEmail(_) => "email",
        }
    }
}

/// A form value that may arrive as a JSON number or as text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    /// True for blank text
    pub fn is_blank(&self) -> bool {
        matches!(self, FieldValue::Text(text) if text.trim().is_empty())
    }

    /// Integer value, if the input is a whole number
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Number(n) if n.is_finite() && n.fract() == 0.0 => Some(*n as i64),
            FieldValue::Number(_) => None,
            FieldValue::Text(text) => text.trim().parse().ok(),
        }
    }

    /// Floating-point value, if the input is numeric
    pub fn as_number(&self) -> Option<f64> {
        let value = match self {
            FieldValue::Number(n) => *n,
            FieldValue::Text(text) => text.trim().parse().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Number(n as f64)
    }
}

impl From<&str> for FieldValue {
    fn from(text: &str) -> Self {
        FieldValue::Text(text.to_string())
    }
}

/// Trims `value`, failing with `MissingRequiredField(field)` when blank
pub(crate) fn required(value: &str, field: &'static str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingRequiredField(field));
    }
    Ok(trimmed.to_string())
}

/// Trims `value`, mapping blank to `None`
pub(crate) fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Deserializes an optional UUID, reading `""` as absent
pub(crate) fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<Uuid>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => Uuid::parse_str(text)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_value_integer() {
        assert_eq!(FieldValue::from(3i64).as_integer(), Some(3));
        assert_eq!(FieldValue::from(" 12 ").as_integer(), Some(12));
        assert_eq!(FieldValue::Number(2.5).as_integer(), None);
        assert_eq!(FieldValue::from("three").as_integer(), None);
    }

    #[test]
    fn test_field_value_number() {
        assert_eq!(FieldValue::from("72.5").as_number(), Some(72.5));
        assert_eq!(FieldValue::from("NaN").as_number(), None);
        assert!(FieldValue::from("  ").is_blank());
        assert!(!FieldValue::Number(0.0).is_blank());
    }

    #[test]
    fn test_field_value_deserializes_number_or_text() {
        let v: FieldValue = serde_json::from_str("6").unwrap();
        assert_eq!(v.as_integer(), Some(6));
        let v: FieldValue = serde_json::from_str("\"6\"").unwrap();
        assert_eq!(v.as_integer(), Some(6));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ValidationError::DuplicateEmail(RecordKind::Member).to_string(),
            "A member with this email already exists"
        );
        assert_eq!(
            ValidationError::DuplicateEmail(RecordKind::Trainer).to_string(),
            "A trainer with this email already exists"
        );
        assert_eq!(
            ValidationError::MissingRequiredField("emergency_contact.phone").to_string(),
            "Emergency contact information is required"
        );
        assert_eq!(
            ValidationError::MissingRequiredField("address").to_string(),
            "Please fill in all required fields"
        );
        assert_eq!(ValidationError::InvalidHealthMetric("height").field(), "height");
    }
}
