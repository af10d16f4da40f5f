/// Member enrollment and edit form
///
/// Checks, in order:
///
/// 1. name, email, phone, address, emergency contact name and phone are non-blank
/// 2. duration is one of 1, 3, 6, 12 months
/// 3. with PT requested, `pt_sessions` is one of 1, 2, 3, 5; without it, trainer
///    and sessions are dropped
/// 4. weight and height, when given, are numbers greater than zero
///
/// # Example
///
/// ```
/// use gymdesk_shared::validation::member::{EmergencyContactForm, MemberForm};
///
/// let form = MemberForm {
///     name: "  Ana Lima ".into(),
///     email: "ana@example.com".into(),
///     phone: "555-0100".into(),
///     address: "1 Main St".into(),
///     duration: Some(3i64.into()),
///     emergency_contact: EmergencyContactForm {
///         name: "Sam".into(),
///         phone: "555-0199".into(),
///     },
///     ..Default::default()
/// };
///
/// let validated = form.validate().unwrap();
/// assert_eq!(validated.details.name, "Ana Lima");
/// ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{blank_as_none, optional, required, FieldValue, ValidationError};
use crate::lifecycle::MembershipDuration;
use crate::models::member::{EmergencyContact, HealthInfo, MemberDetails, PtSessions};

/// Months used when a form omits the duration
pub const DEFAULT_DURATION_MONTHS: i64 = 1;

/// Health group as submitted
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthForm {
    #[serde(default)]
    pub weight: Option<FieldValue>,

    #[serde(default)]
    pub height: Option<FieldValue>,

    #[serde(default)]
    pub health_conditions: Option<String>,
}

/// Emergency contact group as submitted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyContactForm {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub phone: String,
}

/// Raw member fields from the client
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemberForm {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub phone: String,

    #[serde(default)]
    pub address: String,

    /// Membership length in months
    #[serde(default, alias = "membership_duration")]
    pub duration: Option<FieldValue>,

    #[serde(default)]
    pub needs_pt: bool,

    #[serde(default, alias = "trainer", deserialize_with = "blank_as_none")]
    pub trainer_id: Option<Uuid>,

    #[serde(default)]
    pub pt_sessions: Option<FieldValue>,

    #[serde(default)]
    pub health_info: HealthForm,

    #[serde(default)]
    pub emergency_contact: EmergencyContactForm,

    /// Opaque photo reference
    #[serde(default)]
    pub photo_url: Option<String>,
}

/// Member fields that passed the synchronous checks
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedMember {
    pub details: MemberDetails,
    pub duration: MembershipDuration,
    pub photo_url: Option<String>,
}

impl MemberForm {
    /// Runs the synchronous checks
    ///
    /// # Errors
    ///
    /// The first violated rule, as a `ValidationError`
    pub fn validate(&self) -> Result<ValidatedMember, ValidationError> {
        let name = required(&self.name, "name")?;
        let email = required(&self.email, "email")?;
        let phone = required(&self.phone, "phone")?;
        let address = required(&self.address, "address")?;
        let emergency_contact = EmergencyContact {
            name: required(&self.emergency_contact.name, "emergency_contact.name")?,
            phone: required(&self.emergency_contact.phone, "emergency_contact.phone")?,
        };

        let duration = parse_duration(self.duration.as_ref())?;

        let (trainer_id, pt_sessions) = if self.needs_pt {
            let sessions = self
                .pt_sessions
                .as_ref()
                .and_then(FieldValue::as_integer)
                .and_then(|count| PtSessions::try_from(count).ok())
                .ok_or(ValidationError::InvalidPtSessions)?;
            (self.trainer_id, Some(sessions))
        } else {
            (None, None)
        };

        let health_info = HealthInfo {
            weight: positive_metric(self.health_info.weight.as_ref(), "weight")?,
            height: positive_metric(self.health_info.height.as_ref(), "height")?,
            health_conditions: optional(self.health_info.health_conditions.as_deref()),
        };

        Ok(ValidatedMember {
            details: MemberDetails {
                name,
                email,
                phone,
                address,
                needs_pt: self.needs_pt,
                trainer_id,
                pt_sessions,
                health_info,
                emergency_contact,
            },
            duration,
            photo_url: optional(self.photo_url.as_deref()),
        })
    }
}

/// Parses a submitted duration, defaulting to one month when absent
pub fn parse_duration(value: Option<&FieldValue>) -> Result<MembershipDuration, ValidationError> {
    let months = match value {
        None => DEFAULT_DURATION_MONTHS,
        Some(v) if v.is_blank() => DEFAULT_DURATION_MONTHS,
        Some(v) => v.as_integer().ok_or(ValidationError::InvalidDuration)?,
    };
    MembershipDuration::try_from(months).map_err(|_| ValidationError::InvalidDuration)
}

fn positive_metric(
    value: Option<&FieldValue>,
    field: &'static str,
) -> Result<Option<f64>, ValidationError> {
    match value {
        None => Ok(None),
        Some(v) if v.is_blank() => Ok(None),
        Some(v) => match v.as_number() {
            Some(n) if n > 0.0 => Ok(Some(n)),
            _ => Err(ValidationError::InvalidHealthMetric(field)),
        },
    }
}
