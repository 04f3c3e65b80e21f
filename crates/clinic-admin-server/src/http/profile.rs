use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde_json::{json, Value};

use super::{json_object, ApiResult, AppState};

pub(crate) async fn get_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Value>> {
    let identity = state.authorize(&headers)?;
    let user = state.run(move |core| core.get_profile(&identity)).await?;
    Ok(Json(json!({ "user": user })))
}

pub(crate) async fn update_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<Value>> {
    let identity = state.authorize(&headers)?;
    let fields = json_object(&body)?;
    let user = state
        .run(move |core| core.update_profile(&identity, &fields))
        .await?;
    Ok(Json(json!({ "user": user })))
}
