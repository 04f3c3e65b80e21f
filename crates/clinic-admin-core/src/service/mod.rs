//! Entity operations: validation, uniqueness checks and store access.
//!
//! Each service borrows the [`Database`](crate::db::Database) for the length of
//! one operation and re-reads from it every time; nothing is cached between
//! calls.

mod accounts;
mod doctors;
mod patients;
mod profile;

pub use accounts::*;
pub use doctors::*;
pub use patients::*;
pub use profile::*;

use thiserror::Error;

use crate::auth::AuthError;
use crate::db::DbError;
use crate::validation::ValidationErrors;

/// Outcome of a failed service operation.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(ValidationErrors),

    #[error("{message}")]
    Conflict { field: String, message: String },

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("Store error: {0}")]
    Store(#[from] DbError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Failures the caller cannot fix; reported without detail.
    pub fn is_internal(&self) -> bool {
        matches!(self, ServiceError::Store(_) | ServiceError::Internal(_))
    }
}

impl From<ValidationErrors> for ServiceError {
    fn from(e: ValidationErrors) -> Self {
        ServiceError::Validation(e)
    }
}

impl From<AuthError> for ServiceError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Key | AuthError::Lifetime | AuthError::Hash(_) | AuthError::Json(_) => ServiceError::Internal(e.to_string()),
            _ => ServiceError::Unauthorized("Token is not valid".to_string()),
        }
    }
}

impl<T> From<std::sync::PoisonError<T>> for ServiceError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        ServiceError::Internal(format!("Lock poisoned: {}", e))
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Whether `id` has the shape of a store identifier.
pub(crate) fn is_well_formed_id(id: &str) -> bool {
    uuid::Uuid::parse_str(id).is_ok()
}
