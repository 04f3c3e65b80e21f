//! The signed-in manager's own profile.

use chrono::SecondsFormat;
use serde_json::{Map, Value};
use tracing::info;

use super::{ServiceError, ServiceResult};
use crate::auth::Identity;
use crate::db::Database;
use crate::models::{Gender, ProfileFields, User, GENDERS};
use crate::validation::{self, Rule, Validator};

pub fn profile_validator() -> Validator {
    Validator::new("Please fill in all required fields")
        .rule("name", Rule::Required, "Name is required")
        .rule("name", Rule::Text, "Name is required")
        .rule("surname", Rule::Required, "Surname is required")
        .rule("surname", Rule::Text, "Surname is required")
        .rule("patronymicName", Rule::Text, "Patronymic name must be text")
        .rule("gender", Rule::Required, "Gender is required")
        .rule("gender", Rule::OneOf(GENDERS), "Invalid gender")
        .rule("dateOfBirth", Rule::Required, "Date of birth is required")
        .rule("dateOfBirth", Rule::Date, "Invalid date of birth")
        .rule("age", Rule::Required, "Age is required")
        .rule("age", Rule::IntegerAtLeast(1), "Age must be a positive integer")
        .rule("residence", Rule::Required, "Residence is required")
        .rule("residence", Rule::Text, "Residence is required")
        .rule("phoneNumber", Rule::Text, "Phone number must be text")
        .rule("additionalPhone", Rule::Text, "Additional phone must be text")
        .rule("profilePicture", Rule::Base64, "Profile picture must be base64")
}

impl ProfileFields {
    pub fn from_fields(fields: &Map<String, Value>) -> ServiceResult<Self> {
        profile_validator().validate(fields)?;

        let gender: Gender = validation::text(fields, "gender")
            .parse()
            .map_err(|e: crate::models::UnknownVariant| ServiceError::Internal(e.to_string()))?;
        let date_of_birth = fields
            .get("dateOfBirth")
            .and_then(validation::timestamp_value)
            .ok_or_else(|| ServiceError::Internal("unreadable dateOfBirth".to_string()))?;
        let age = fields
            .get("age")
            .and_then(validation::integer_value)
            .ok_or_else(|| ServiceError::Internal("unreadable age".to_string()))?;
        let profile_picture = match fields.get("profilePicture") {
            Some(value) if !validation::is_absent(Some(value)) => validation::bytes_value(value),
            _ => None,
        };

        Ok(Self {
            name: validation::text(fields, "name"),
            surname: validation::text(fields, "surname"),
            patronymic_name: validation::text(fields, "patronymicName"),
            gender,
            date_of_birth: date_of_birth.to_rfc3339_opts(SecondsFormat::Micros, true),
            age,
            residence: validation::text(fields, "residence"),
            phone_number: validation::optional_text(fields, "phoneNumber"),
            additional_phone: validation::optional_text(fields, "additionalPhone"),
            profile_picture,
        })
    }
}

pub struct ProfileService<'a> {
    db: &'a Database,
}

impl<'a> ProfileService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// The caller's manager record.
    pub fn get(&self, identity: &Identity) -> ServiceResult<User> {
        self.db
            .get_user(&identity.user_id)?
            .filter(User::is_manager)
            .ok_or_else(manager_not_found)
    }

    /// Overwrite the profile fields and mark the profile completed.
    ///
    /// `age` is stored as submitted and never reconciled with `dateOfBirth`.
    pub fn update(&self, identity: &Identity, fields: &Map<String, Value>) -> ServiceResult<User> {
        let fields = ProfileFields::from_fields(fields)?;

        let mut user = self.get(identity)?;
        user.apply_profile(fields);
        if !self.db.update_user_profile(&user)? {
            return Err(manager_not_found());
        }

        info!(user_id = %user.id, "manager profile updated");
        Ok(user)
    }
}

fn manager_not_found() -> ServiceError {
    ServiceError::NotFound("Manager not found".to_string())
}
