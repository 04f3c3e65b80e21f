//! Patient routes. These need no credential.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use clinic_admin_core::Patient;
use serde_json::{json, Value};

use super::{json_object, ApiResult, AppState};

pub(crate) async fn list_patients(State(state): State<AppState>) -> ApiResult<Json<Vec<Patient>>> {
    Ok(Json(state.run(|core| core.list_patients()).await?))
}

pub(crate) async fn get_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Patient>> {
    Ok(Json(state.run(move |core| core.get_patient(&id)).await?))
}

pub(crate) async fn create_patient(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let fields = json_object(&body)?;
    let patient = state.run(move |core| core.create_patient(&fields)).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Patient added successfully", "patient": patient })),
    ))
}
