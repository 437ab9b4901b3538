// SPDX-License-Identifier: Apache-2.0

use crate::http::finish;
use crate::middleware::propagated_request_id;
use crate::{AppState, CONFIG_SCHEMA_VERSION, CRATE_NAME};
use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::time::Instant;

pub(crate) async fn healthz_handler() -> Response {
    Json(json!({"status": "ok"})).into_response()
}

pub(crate) async fn readyz_handler(State(state): State<AppState>) -> Response {
    match state.store.ping().await {
        Ok(()) => Json(json!({"ready": true})).into_response(),
        Err(e) => {
            tracing::warn!("readiness probe failed: {e}");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({"ready": false})),
            )
                .into_response()
        }
    }
}

pub(crate) async fn version_handler() -> Response {
    Json(json!({
        "name": CRATE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "config_schema_version": CONFIG_SCHEMA_VERSION,
    }))
    .into_response()
}

pub(crate) async fn metrics_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Response {
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    let body = state.metrics.render_text().await;
    let mut resp = (StatusCode::OK, body).into_response();
    resp.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; version=0.0.4"),
    );
    finish(&state, "/metrics", resp, started, &request_id).await
}
