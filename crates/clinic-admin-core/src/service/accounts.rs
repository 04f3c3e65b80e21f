//! Manager sign-in and provisioning.

use chrono::{Datelike, NaiveDate, SecondsFormat, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::{ServiceError, ServiceResult};
use crate::auth::{hash_password, verify_password, TokenSigner};
use crate::db::Database;
use crate::models::{Gender, Role, User};

/// A successful sign-in.
#[derive(Debug, Clone, Serialize)]
pub struct SignIn {
    pub token: String,
    pub user: User,
}

/// Details for a manager account created out of band.
#[derive(Debug, Clone)]
pub struct NewManager {
    pub email: String,
    pub password: String,
    pub name: String,
    pub surname: String,
    pub patronymic_name: String,
    pub gender: Gender,
    pub date_of_birth: NaiveDate,
    pub residence: String,
    pub phone_number: String,
    pub additional_phone: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProvisionOutcome {
    Created(User),
    /// A user with the email exists; nothing was written.
    AlreadyExists,
}

pub struct AccountService<'a> {
    db: &'a Database,
}

impl<'a> AccountService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Exchange manager credentials for a token.
    pub fn sign_in(
        &self,
        signer: &TokenSigner,
        email: &str,
        password: &str,
    ) -> ServiceResult<SignIn> {
        let email = email.trim().to_lowercase();
        let user = match self.db.find_user_by_email(&email)? {
            Some(user) if user.is_manager() && verify_password(password, &user.password_hash) => {
                user
            }
            _ => {
                warn!(email = %email, "manager sign-in rejected");
                return Err(ServiceError::Unauthorized(
                    "Invalid credentials".to_string(),
                ));
            }
        };

        let token = signer.issue(&user.id, user.role)?;
        info!(user_id = %user.id, "manager signed in");
        Ok(SignIn { token, user })
    }

    /// Create a manager with a completed profile unless the email is taken.
    pub fn provision_manager(&self, details: NewManager) -> ServiceResult<ProvisionOutcome> {
        self.provision_manager_on(details, Utc::now().date_naive())
    }

    /// As [`provision_manager`](Self::provision_manager), computing age on `today`.
    pub fn provision_manager_on(
        &self,
        details: NewManager,
        today: NaiveDate,
    ) -> ServiceResult<ProvisionOutcome> {
        let email = details.email.trim().to_lowercase();
        if self.db.find_user_by_email(&email)?.is_some() {
            info!(email = %email, "manager already exists");
            return Ok(ProvisionOutcome::AlreadyExists);
        }

        let mut user = User::new(email, hash_password(&details.password)?, Role::Manager);
        user.name = Some(details.name);
        user.surname = Some(details.surname);
        user.patronymic_name = Some(details.patronymic_name);
        user.gender = Some(details.gender);
        user.date_of_birth = details
            .date_of_birth
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc().to_rfc3339_opts(SecondsFormat::Micros, true));
        user.age = Some(age_on(details.date_of_birth, today));
        user.residence = Some(details.residence);
        user.phone_number = Some(details.phone_number);
        user.additional_phone = Some(details.additional_phone);
        user.profile_completed = true;

        self.db.insert_user(&user)?;
        info!(user_id = %user.id, "manager provisioned");
        Ok(ProvisionOutcome::Created(user))
    }
}

/// Whole years between `birth` and `today`.
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> i64 {
    let mut age = i64::from(today.year() - birth.year());
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age
}
