//! Patient registration and lookup. Patients are never updated or removed.

use serde_json::{Map, Value};
use tracing::info;

use super::{is_well_formed_id, ServiceError, ServiceResult};
use crate::db::Database;
use crate::models::{Gender, Patient, PatientFields, GENDERS};
use crate::validation::{self, date_regex, Rule, Validator};

pub fn patient_validator() -> Validator {
    Validator::new("Failed to add patient")
        .rule("firstName", Rule::Required, "First name is required")
        .rule("firstName", Rule::Text, "First name is required")
        .rule("middleName", Rule::Text, "Middle name must be text")
        .rule("lastName", Rule::Required, "Last name is required")
        .rule("lastName", Rule::Text, "Last name is required")
        .rule("gender", Rule::Required, "Gender is required")
        .rule("gender", Rule::OneOf(GENDERS), "Invalid gender")
        .rule("dateOfBirth", Rule::Required, "Date of birth is required")
        .rule(
            "dateOfBirth",
            Rule::Pattern(date_regex()),
            "Invalid date format. Use YYYY-MM-DD.",
        )
        .rule("telephone", Rule::Required, "Telephone is required")
        .rule("telephone", Rule::Text, "Telephone is required")
        .rule("additionalPhone", Rule::Text, "Additional phone must be text")
        .rule("email", Rule::Required, "Email is required")
        .rule("email", Rule::Email, "Invalid email format.")
        .rule("comments", Rule::Text, "Comments must be text")
}

impl PatientFields {
    /// Validate a submitted document and read it into typed fields.
    pub fn from_fields(fields: &Map<String, Value>) -> ServiceResult<Self> {
        patient_validator().validate(fields)?;

        let gender: Gender = validation::text(fields, "gender")
            .parse()
            .map_err(|e: crate::models::UnknownVariant| ServiceError::Internal(e.to_string()))?;

        Ok(Self {
            first_name: validation::text(fields, "firstName"),
            middle_name: validation::text(fields, "middleName"),
            last_name: validation::text(fields, "lastName"),
            gender,
            date_of_birth: validation::text(fields, "dateOfBirth"),
            telephone: validation::text(fields, "telephone"),
            additional_phone: validation::text(fields, "additionalPhone"),
            email: validation::email(fields, "email"),
            comments: validation::text(fields, "comments"),
        })
    }
}

pub struct PatientService<'a> {
    db: &'a Database,
}

impl<'a> PatientService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub fn list(&self) -> ServiceResult<Vec<Patient>> {
        Ok(self.db.list_patients()?)
    }

    pub fn get(&self, id: &str) -> ServiceResult<Patient> {
        if !is_well_formed_id(id) {
            return Err(ServiceError::NotFound("Invalid patient ID".to_string()));
        }
        self.db
            .get_patient(id)?
            .ok_or_else(|| ServiceError::NotFound("Patient not found".to_string()))
    }

    /// Validate and insert. Emails may repeat across patients.
    pub fn create(&self, fields: &Map<String, Value>) -> ServiceResult<Patient> {
        let patient = Patient::new(PatientFields::from_fields(fields)?);
        self.db.insert_patient(&patient)?;
        info!(patient_id = %patient.id, "patient registered");
        Ok(patient)
    }
}
