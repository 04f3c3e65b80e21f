//! Patient models.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{now_timestamp, UnknownVariant};

/// Accepted values for [`Gender`], in wire form.
pub const GENDERS: &[&str] = &["Male", "Female", "Other"];

/// Gender as recorded on patients and manager profiles.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

impl FromStr for Gender {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Male" => Ok(Gender::Male),
            "Female" => Ok(Gender::Female),
            "Other" => Ok(Gender::Other),
            _ => Err(UnknownVariant::new("gender", s)),
        }
    }
}

/// A patient registered with the clinic.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    /// Store-generated UUID
    #[serde(rename = "_id")]
    pub id: String,
    /// Given name
    pub first_name: String,
    /// Middle name, "" when not given
    pub middle_name: String,
    /// Family name
    pub last_name: String,
    /// Gender
    pub gender: Gender,
    /// Calendar date of birth, `YYYY-MM-DD`
    pub date_of_birth: String,
    /// Primary phone number
    pub telephone: String,
    /// Secondary phone number, "" when not given
    pub additional_phone: String,
    /// Contact email, lowercased; not unique
    pub email: String,
    /// Free-text notes, "" when not given
    pub comments: String,
    /// Creation timestamp
    pub created_at: String,
    /// Last update timestamp
    pub updated_at: String,
}

/// Validated patient fields, as accepted by create.
#[derive(Debug, Clone, PartialEq)]
pub struct PatientFields {
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub gender: Gender,
    pub date_of_birth: String,
    pub telephone: String,
    pub additional_phone: String,
    pub email: String,
    pub comments: String,
}

impl Patient {
    /// Create a new patient record with a fresh ID and timestamps.
    pub fn new(fields: PatientFields) -> Self {
        let now = now_timestamp();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            first_name: fields.first_name,
            middle_name: fields.middle_name,
            last_name: fields.last_name,
            gender: fields.gender,
            date_of_birth: fields.date_of_birth,
            telephone: fields.telephone,
            additional_phone: fields.additional_phone,
            email: fields.email,
            comments: fields.comments,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_patient() {
        let patient = Patient::new(PatientFields {
            first_name: "Ann".into(),
            middle_name: String::new(),
            last_name: "Lee".into(),
            gender: Gender::Female,
            date_of_birth: "1990-04-12".into(),
            telephone: "555-0100".into(),
            additional_phone: String::new(),
            email: "ann@example.com".into(),
            comments: String::new(),
        });
        assert_eq!(patient.id.len(), 36);
        assert_eq!(patient.created_at, patient.updated_at);

        let json = serde_json::to_value(&patient).unwrap();
        assert_eq!(json["dateOfBirth"], "1990-04-12");
        assert_eq!(json["gender"], "Female");
        assert_eq!(json["comments"], "");
    }
}
