//! Credentials: password digests and signed session tokens.

mod password;
mod token;

pub use password::*;
pub use token::*;

use thiserror::Error;

use crate::models::Role;

/// Authentication errors.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Malformed token")]
    Malformed,

    #[error("Invalid token signature")]
    BadSignature,

    #[error("Token has expired")]
    Expired,

    #[error("Invalid signing key")]
    Key,

    #[error("Token lifetime out of range")]
    Lifetime,

    #[error("Password hashing failed: {0}")]
    Hash(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The authenticated caller resolved from a token.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub user_id: String,
    pub role: Role,
}
