//! Domain models for the clinic admin system.

mod doctor;
mod patient;
mod user;

pub use doctor::*;
pub use patient::*;
pub use user::*;

use chrono::{SecondsFormat, Utc};
use thiserror::Error;

/// A stored or submitted value that does not name a known enum variant.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Unknown {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownVariant {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Current time as fixed-width RFC 3339, so stored timestamps sort as text.
pub(crate) fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}
