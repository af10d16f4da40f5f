/// Trainer form
///
/// Name, email, and phone are required after trimming; specialization is
/// optional.

use serde::{Deserialize, Serialize};

use super::{optional, required, ValidationError};
use crate::models::trainer::TrainerDetails;

/// Raw trainer fields from the client
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainerForm {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub phone: String,

    #[serde(default)]
    pub specialization: Option<String>,
}

impl TrainerForm {
    /// Runs the synchronous checks
    pub fn validate(&self) -> Result<TrainerDetails, ValidationError> {
        Ok(TrainerDetails {
            name: required(&self.name, "name")?,
            email: required(&self.email, "email")?,
            phone: required(&self.phone, "phone")?,
            specialization: optional(self.specialization.as_deref()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trainer_form() {
        let form = TrainerForm {
            name: " Kim ".into(),
            email: "kim@gym.example".into(),
            phone: "555".into(),
            specialization: Some("  ".into()),
        };
        let details = form.validate().unwrap();
        assert_eq!(details.name, "Kim");
        assert_eq!(details.specialization, None);

        let form = TrainerForm {
            email: String::new(),
            ..form
        };
        assert_eq!(form.validate(), Err(ValidationError::MissingRequiredField("email")));
    }
}
