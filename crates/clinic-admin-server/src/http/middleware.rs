use axum::body::Body;
use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue, Method, Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::Instrument;

use super::AppState;
use crate::config::CorsOrigins;

const ALLOW_METHODS: &str = "GET,POST,PUT,DELETE,OPTIONS";
const ALLOW_HEADERS: &str = "content-type,authorization,x-auth-token";

pub(crate) async fn cors_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let origin = req
        .headers()
        .get("origin")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    if req.method() == Method::OPTIONS {
        let mut resp = StatusCode::NO_CONTENT.into_response();
        if let Some(origin) = origin.as_deref() {
            if allow_origin(resp.headers_mut(), &state.cors_origins, origin) {
                resp.headers_mut().insert(
                    "access-control-allow-methods",
                    HeaderValue::from_static(ALLOW_METHODS),
                );
                resp.headers_mut().insert(
                    "access-control-allow-headers",
                    HeaderValue::from_static(ALLOW_HEADERS),
                );
            }
        }
        return resp;
    }

    let mut resp = next.run(req).await;
    if let Some(origin) = origin.as_deref() {
        allow_origin(resp.headers_mut(), &state.cors_origins, origin);
    }
    resp
}

fn allow_origin(headers: &mut HeaderMap, origins: &CorsOrigins, origin: &str) -> bool {
    // The answer depends on the caller's origin whenever it is not `*`
    if let CorsOrigins::List(_) = origins {
        headers.append(header::VARY, HeaderValue::from_static("origin"));
    }
    if !origins.allows(origin) {
        return false;
    }
    let value = match origins {
        CorsOrigins::Any => HeaderValue::from_static("*"),
        CorsOrigins::List(_) => match HeaderValue::from_str(origin) {
            Ok(v) => v,
            Err(_) => return false,
        },
    };
    headers.insert("access-control-allow-origin", value);
    true
}

pub(crate) async fn request_tracing_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().to_string();
    let route = request.uri().path().to_string();
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty() && v.len() <= 128)
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let span = tracing::info_span!(
        "http.request",
        request_id = %request_id,
        method = %method,
        route = %route,
    );

    let mut response = next.run(request).instrument(span.clone()).await;
    span.in_scope(|| {
        tracing::info!(status = response.status().as_u16(), "request completed");
    });
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert("x-request-id", value);
    }
    response
}
