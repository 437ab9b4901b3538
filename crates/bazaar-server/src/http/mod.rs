// SPDX-License-Identifier: Apache-2.0

pub(crate) mod orders;
pub(crate) mod system;

use crate::middleware::{api_error_response, normalized_header_value, with_request_id};
use crate::{AppState, SESSION_TOKEN_HEADER};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use bazaar_api::ApiError;
use bazaar_model::User;
use serde_json::json;
use std::time::Instant;

/// Resolves the authenticated principal. An absent or unknown token yields
/// the controller's not-found contract.
pub(crate) async fn current_user(state: &AppState, headers: &HeaderMap) -> Result<User, ApiError> {
    let Some(token) = normalized_header_value(headers, SESSION_TOKEN_HEADER, 256) else {
        return Err(ApiError::not_found("user"));
    };
    match state.identity.resolve(&token).await {
        Ok(Some(user)) => Ok(user),
        Ok(None) => Err(ApiError::not_found("user")),
        Err(e) => {
            tracing::error!("identity lookup failed: {e}");
            Err(ApiError::internal("identity lookup failed"))
        }
    }
}

/// 303 See Other with a JSON body naming the target, the service's
/// rendering of the controller's redirect-to-action responses.
pub(crate) fn see_other(location: &str) -> Response {
    let mut resp =
        (StatusCode::SEE_OTHER, Json(json!({"redirect_to": location}))).into_response();
    if let Ok(value) = HeaderValue::from_str(location) {
        resp.headers_mut().insert(header::LOCATION, value);
    }
    resp
}

pub(crate) fn error_response(err: ApiError, request_id: &str) -> Response {
    api_error_response(err.with_request_id(request_id))
}

/// Records the request in the metrics and stamps the request id header.
pub(crate) async fn finish(
    state: &AppState,
    route: &'static str,
    resp: Response,
    started: Instant,
    request_id: &str,
) -> Response {
    state
        .metrics
        .observe_request(route, resp.status(), started.elapsed())
        .await;
    with_request_id(resp, request_id)
}
