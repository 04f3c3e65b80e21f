use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use clinic_admin_core::SignIn;

use super::{json_object, ApiError, ApiResult, AppState};

/// `POST /api/auth/manager-signin` with `{email, password}`.
pub(crate) async fn manager_sign_in(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<Json<SignIn>> {
    let fields = json_object(&body)?;
    let credential = |key: &str| {
        fields
            .get(key)
            .and_then(|v| v.as_str())
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string)
    };
    let (Some(email), Some(password)) = (credential("email"), credential("password")) else {
        return Err(ApiError::bad_request("Email and password are required"));
    };

    let signed_in = state
        .run(move |core| core.manager_sign_in(&email, &password))
        .await?;
    Ok(Json(signed_in))
}
