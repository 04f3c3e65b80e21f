use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde_json::{json, Value};

use super::{json_object, ApiResult, AppState};

pub(crate) async fn list_doctors(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Value>> {
    state.authorize(&headers)?;
    let doctors = state.run(|core| core.list_doctors()).await?;
    Ok(Json(json!({ "doctors": doctors })))
}

pub(crate) async fn get_doctor(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    state.authorize(&headers)?;
    let doctor = state.run(move |core| core.get_doctor(&id)).await?;
    Ok(Json(json!({ "doctor": doctor })))
}

pub(crate) async fn create_doctor(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<Value>)> {
    state.authorize(&headers)?;
    let fields = json_object(&body)?;
    let doctor = state.run(move |core| core.create_doctor(&fields)).await?;
    Ok((StatusCode::CREATED, Json(json!({ "doctor": doctor }))))
}

pub(crate) async fn update_doctor(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<Value>> {
    state.authorize(&headers)?;
    let fields = json_object(&body)?;
    let doctor = state
        .run(move |core| core.update_doctor(&id, &fields))
        .await?;
    Ok(Json(json!({ "doctor": doctor })))
}

pub(crate) async fn delete_doctor(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    state.authorize(&headers)?;
    state.run(move |core| core.delete_doctor(&id)).await?;
    Ok(Json(json!({ "message": "Doctor deleted successfully" })))
}
