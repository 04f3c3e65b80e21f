use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use clinic_admin_core::{FieldError, ServiceError};
use serde::Serialize;
use tracing::error;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// An error response: status plus `{"message", ...}` body.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<FieldError>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<String>,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                message: message.into(),
                errors: None,
                field: None,
            },
        }
    }

    pub fn bad_request(message: &str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: &str) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn not_found(message: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Log `detail` and answer with a generic message.
    pub fn internal(detail: impl std::fmt::Display) -> Self {
        error!(error = %detail, "request failed");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Server error")
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.body.message
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            e if e.is_internal() => Self::internal(e),
            ServiceError::Validation(errors) => Self {
                status: StatusCode::BAD_REQUEST,
                body: ErrorBody {
                    message: errors.message,
                    errors: Some(errors.errors),
                    field: None,
                },
            },
            ServiceError::Conflict { field, message } => Self {
                status: StatusCode::BAD_REQUEST,
                body: ErrorBody {
                    message,
                    errors: None,
                    field: Some(field),
                },
            },
            ServiceError::NotFound(message) => Self::new(StatusCode::NOT_FOUND, message),
            ServiceError::Unauthorized(message) => Self::new(StatusCode::UNAUTHORIZED, message),
            e => Self::internal(e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinic_admin_core::db::{Database, DbError};
    use clinic_admin_core::ValidationErrors;

    #[test]
    fn test_status_mapping() {
        let mut errors = ValidationErrors::new("Validation errors");
        errors.push("email", "Invalid email");
        assert_eq!(
            ApiError::from(ServiceError::Validation(errors)).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(ServiceError::Conflict {
                field: "email".into(),
                message: "taken".into(),
            })
            .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(ServiceError::NotFound("Doctor not found".into())).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(ServiceError::Unauthorized("no".into())).status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_internal_hides_detail() {
        let err = ApiError::from(ServiceError::Internal("disk on fire".into()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "Server error");
    }

    #[test]
    fn test_unique_violation_hides_detail() {
        let db = Database::open_in_memory().unwrap();
        let insert = "INSERT INTO users (id, email, password, role, created_at) \
                      VALUES (?1, 'dup@clinic.com', 'x', 'manager', 'now')";
        db.conn().execute(insert, ["u1"]).unwrap();
        let store: DbError = db.conn().execute(insert, ["u2"]).unwrap_err().into();
        assert!(store.is_constraint_violation());

        let err = ApiError::from(ServiceError::Store(store));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "Server error");
        let body = serde_json::to_value(&err.body).unwrap();
        assert_eq!(body, serde_json::json!({ "message": "Server error" }));
    }

    #[test]
    fn test_body_shapes() {
        let err = ApiError::from(ServiceError::Conflict {
            field: "email".into(),
            message: "Doctor with this email already exists".into(),
        });
        let body = serde_json::to_value(&err.body).unwrap();
        assert_eq!(body["field"], "email");
        assert!(body.get("errors").is_none());

        let body = serde_json::to_value(&ApiError::not_found("x").body).unwrap();
        assert_eq!(body, serde_json::json!({ "message": "x" }));
    }
}
