//! Router, shared state and request plumbing.

mod auth;
mod doctors;
mod error;
mod middleware;
mod patients;
mod profile;

pub use error::{ApiError, ApiResult};

use std::sync::Arc;

use axum::body::Bytes;
use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::Router;
use clinic_admin_core::{ClinicCore, Identity, ServiceResult};
use serde_json::{Map, Value};

use crate::config::CorsOrigins;

pub const TOKEN_HEADER: &str = "x-auth-token";

#[derive(Clone)]
pub struct AppState {
    pub core: ClinicCore,
    pub cors_origins: Arc<CorsOrigins>,
}

impl AppState {
    pub fn new(core: ClinicCore, cors_origins: CorsOrigins) -> Self {
        Self {
            core,
            cors_origins: Arc::new(cors_origins),
        }
    }

    /// Resolve the request credential to an identity.
    ///
    /// The token is read from `x-auth-token`, falling back to
    /// `Authorization: Bearer`.
    pub fn authorize(&self, headers: &HeaderMap) -> ApiResult<Identity> {
        let token = extract_token(headers)
            .ok_or_else(|| ApiError::unauthorized("No token, authorization denied"))?;
        Ok(self.core.authenticate(&token)?)
    }

    /// Run a store operation off the async executor.
    pub async fn run<T, F>(&self, op: F) -> ApiResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&ClinicCore) -> ServiceResult<T> + Send + 'static,
    {
        let core = self.core.clone();
        let result = tokio::task::spawn_blocking(move || op(&core))
            .await
            .map_err(|e| ApiError::internal(format!("Worker task failed: {e}")))?;
        Ok(result?)
    }
}

fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = headers
        .get(TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|t| !t.is_empty())
    {
        return Some(token.to_string());
    }
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// Parse a request body that must be a JSON object.
pub(crate) fn json_object(body: &Bytes) -> ApiResult<Map<String, Value>> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ApiError::bad_request("Request body must be a JSON object")),
        Err(_) => Err(ApiError::bad_request("Request body is not valid JSON")),
    }
}

pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/auth/manager-signin", post(auth::manager_sign_in))
        .route(
            "/doctors",
            get(doctors::list_doctors).post(doctors::create_doctor),
        )
        .route(
            "/doctors/:id",
            get(doctors::get_doctor)
                .put(doctors::update_doctor)
                .delete(doctors::delete_doctor),
        )
        .route(
            "/patients",
            get(patients::list_patients).post(patients::create_patient),
        )
        .route("/patients/:id", get(patients::get_patient))
        .route(
            "/profile",
            get(profile::get_profile).put(profile::update_profile),
        );

    Router::new()
        .nest("/api", api)
        .fallback(route_not_found)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::cors_middleware,
        ))
        .layer(axum::middleware::from_fn(
            middleware::request_tracing_middleware,
        ))
        .with_state(state)
}

async fn route_not_found() -> ApiError {
    ApiError::not_found("Route not found")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_extract_token_prefers_custom_header() {
        let mut headers = HeaderMap::new();
        headers.insert(TOKEN_HEADER, HeaderValue::from_static("abc"));
        headers.insert("authorization", HeaderValue::from_static("Bearer xyz"));
        assert_eq!(extract_token(&headers).as_deref(), Some("abc"));
    }

    #[test]
    fn test_extract_token_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Bearer xyz"));
        assert_eq!(extract_token(&headers).as_deref(), Some("xyz"));

        headers.insert("authorization", HeaderValue::from_static("Basic xyz"));
        assert_eq!(extract_token(&headers), None);
        assert_eq!(extract_token(&HeaderMap::new()), None);
    }

    #[test]
    fn test_json_object() {
        assert!(json_object(&Bytes::from_static(br#"{"a":1}"#)).is_ok());
        assert!(json_object(&Bytes::from_static(b"[1]")).is_err());
        assert!(json_object(&Bytes::from_static(b"nope")).is_err());
        assert!(json_object(&Bytes::new()).is_err());
    }
}
