// SPDX-License-Identifier: Apache-2.0

use crate::AppState;
use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bazaar_api::{status_for, ApiError, ApiErrorCode};
use serde_json::json;
use std::sync::atomic::Ordering;
use std::time::Instant;
use tracing::info;

pub(crate) fn normalized_header_value(
    headers: &HeaderMap,
    key: &str,
    max_len: usize,
) -> Option<String> {
    let raw = headers.get(key)?.to_str().ok()?.trim();
    if raw.is_empty() || raw.len() > max_len {
        return None;
    }
    Some(raw.to_string())
}

pub(crate) fn make_request_id(state: &AppState) -> String {
    format!("req-{}", state.request_id_seed.fetch_add(1, Ordering::Relaxed))
}

pub(crate) fn propagated_request_id(headers: &HeaderMap, state: &AppState) -> String {
    normalized_header_value(headers, "x-request-id", 128)
        .unwrap_or_else(|| make_request_id(state))
}

pub(crate) fn with_request_id(mut resp: Response, request_id: &str) -> Response {
    if let Ok(value) = HeaderValue::from_str(request_id) {
        resp.headers_mut().insert("x-request-id", value);
    }
    resp
}

pub(crate) fn api_error_response(err: ApiError) -> Response {
    let status = axum::http::StatusCode::from_u16(status_for(err.code))
        .unwrap_or(axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(err)).into_response()
}

/// Request hygiene: URI and header size caps, plus the per-request audit
/// log line when enabled.
pub(crate) async fn security_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let uri_text = req.uri().to_string();
    if uri_text.len() > state.api.max_uri_bytes {
        return api_error_response(ApiError::new(
            ApiErrorCode::RequestRejected,
            "request URI too large",
            json!({"max_uri_bytes": state.api.max_uri_bytes, "actual": uri_text.len()}),
        ));
    }
    let header_bytes: usize = req
        .headers()
        .iter()
        .map(|(k, v)| k.as_str().len() + v.as_bytes().len())
        .sum();
    if header_bytes > state.api.max_header_bytes {
        return api_error_response(ApiError::new(
            ApiErrorCode::RequestRejected,
            "request headers too large",
            json!({"max_header_bytes": state.api.max_header_bytes, "actual": header_bytes}),
        ));
    }

    let started = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let request_id =
        normalized_header_value(req.headers(), "x-request-id", 128).unwrap_or_default();
    let resp = next.run(req).await;
    if state.api.enable_audit_log {
        info!(
            target: "bazaar_audit",
            method = %method,
            path = %path,
            status = resp.status().as_u16(),
            request_id = %request_id,
            latency_ms = started.elapsed().as_millis() as u64,
            "audit"
        );
    }
    resp
}
