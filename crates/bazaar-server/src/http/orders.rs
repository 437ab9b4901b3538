// SPDX-License-Identifier: Apache-2.0

//! The order/cart actions: listing, cart view, detail, add/remove line
//! items, checkout (edit), confirmation, and draft deletion.

use crate::http::{current_user, error_response, finish, see_other};
use crate::middleware::{normalized_header_value, propagated_request_id};
use crate::security::{issue_token, verify_token, ANTI_FORGERY_HEADER};
use crate::{unix_now_secs, AppState};
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bazaar_api::{field_errors_json, ApiError, ApiErrorCode, CheckoutForm};
use bazaar_model::{LineItemId, OrderId, ProductId};
use bazaar_store::{StoreError, UpdateOutcome};
use serde_json::json;
use std::time::Instant;
use tracing::info;

fn store_failure(e: StoreError) -> ApiError {
    tracing::error!("store operation failed: {e}");
    ApiError::internal("store operation failed")
}

pub(crate) async fn index_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Response {
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    let resp = match index(&state, &headers).await {
        Ok(resp) => resp,
        Err(err) => error_response(err, &request_id),
    };
    finish(&state, "/orders", resp, started, &request_id).await
}

async fn index(state: &AppState, headers: &HeaderMap) -> Result<Response, ApiError> {
    let user = current_user(state, headers).await?;
    let orders = state
        .store
        .completed_orders(user.id)
        .await
        .map_err(store_failure)?;
    Ok(Json(json!({"orders": orders})).into_response())
}

pub(crate) async fn cart_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    let resp = match cart(&state, &headers).await {
        Ok(resp) => resp,
        Err(err) => error_response(err, &request_id),
    };
    finish(&state, "/orders/cart", resp, started, &request_id).await
}

async fn cart(state: &AppState, headers: &HeaderMap) -> Result<Response, ApiError> {
    let user = current_user(state, headers).await?;
    let cart = state.store.open_cart(user.id).await.map_err(store_failure)?;
    Ok(Json(json!({"cart": cart})).into_response())
}

pub(crate) async fn details_handler(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    let resp = match details(&state, &headers, &raw_id).await {
        Ok(resp) => resp,
        Err(err) => error_response(err, &request_id),
    };
    finish(&state, "/orders/{id}", resp, started, &request_id).await
}

async fn details(
    state: &AppState,
    headers: &HeaderMap,
    raw_id: &str,
) -> Result<Response, ApiError> {
    let id = OrderId::parse(raw_id)
        .map_err(|_| ApiError::invalid_identifier("order_id", raw_id))?;
    let user = current_user(state, headers).await?;
    let detail = state.store.order_detail(id).await.map_err(store_failure)?;
    match detail {
        Some(detail) if detail.order.owned_by(user.id) => {
            Ok(Json(json!({"order": detail})).into_response())
        }
        _ => Err(ApiError::not_found("order")),
    }
}

pub(crate) async fn add_to_cart_handler(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    let resp = match add_to_cart(&state, &headers, &raw_id).await {
        Ok(resp) => resp,
        Err(err) => error_response(err, &request_id),
    };
    finish(&state, "/orders/add/{product_id}", resp, started, &request_id).await
}

async fn add_to_cart(
    state: &AppState,
    headers: &HeaderMap,
    raw_id: &str,
) -> Result<Response, ApiError> {
    let product_id = ProductId::parse(raw_id)
        .map_err(|_| ApiError::invalid_identifier("product_id", raw_id))?;
    let user = current_user(state, headers).await?;
    let product = state
        .store
        .product_by_id(product_id)
        .await
        .map_err(store_failure)?
        .ok_or_else(|| ApiError::not_found("product"))?;
    let order_id = state
        .store
        .add_to_cart(user.id, product.id, unix_now_secs())
        .await
        .map_err(store_failure)?;
    info!(
        order_id = order_id.as_i64(),
        product_id = product.id.as_i64(),
        "product added to cart"
    );
    Ok(see_other("/orders/cart"))
}

pub(crate) async fn remove_from_cart_handler(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    let resp = match remove_from_cart(&state, &headers, &raw_id).await {
        Ok(resp) => resp,
        Err(err) => error_response(err, &request_id),
    };
    finish(
        &state,
        "/orders/remove/{item_id}",
        resp,
        started,
        &request_id,
    )
    .await
}

async fn remove_from_cart(
    state: &AppState,
    headers: &HeaderMap,
    raw_id: &str,
) -> Result<Response, ApiError> {
    let item_id = LineItemId::parse(raw_id)
        .map_err(|_| ApiError::invalid_identifier("line_item_id", raw_id))?;
    let user = current_user(state, headers).await?;
    let removed = state
        .store
        .remove_line_item(item_id, user.id)
        .await
        .map_err(store_failure)?;
    if removed {
        Ok(see_other("/orders/cart"))
    } else {
        Err(ApiError::not_found("line item"))
    }
}

pub(crate) async fn edit_form_handler(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    let resp = match edit_form(&state, &headers, &raw_id).await {
        Ok(resp) => resp,
        Err(err) => error_response(err, &request_id),
    };
    finish(&state, "/orders/{id}/edit", resp, started, &request_id).await
}

async fn edit_form(
    state: &AppState,
    headers: &HeaderMap,
    raw_id: &str,
) -> Result<Response, ApiError> {
    let id = OrderId::parse(raw_id)
        .map_err(|_| ApiError::invalid_identifier("order_id", raw_id))?;
    let user = current_user(state, headers).await?;
    let order = state
        .store
        .order_header(id)
        .await
        .map_err(store_failure)?
        .ok_or_else(|| ApiError::not_found("order"))?;
    if !order.is_open() {
        return Err(ApiError::not_found("order"));
    }
    let payment_options = state
        .store
        .payment_types_for(user.id)
        .await
        .map_err(store_failure)?;
    let action = format!("/orders/{}/edit", id.as_i64());
    let token = issue_token(
        &state.api.anti_forgery_secret,
        user.id,
        &action,
        unix_now_secs(),
    );
    Ok(Json(json!({
        "order": order,
        "payment_options": payment_options,
        "anti_forgery_token": token,
    }))
    .into_response())
}

pub(crate) async fn edit_submit_handler(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    headers: HeaderMap,
    Json(form): Json<CheckoutForm>,
) -> Response {
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    let resp = match edit_submit(&state, &headers, &raw_id, form).await {
        Ok(resp) => resp,
        Err(err) => error_response(err, &request_id),
    };
    finish(&state, "/orders/{id}/edit", resp, started, &request_id).await
}

async fn edit_submit(
    state: &AppState,
    headers: &HeaderMap,
    raw_id: &str,
    form: CheckoutForm,
) -> Result<Response, ApiError> {
    let id = OrderId::parse(raw_id)
        .map_err(|_| ApiError::invalid_identifier("order_id", raw_id))?;
    let user = current_user(state, headers).await?;

    let action = format!("/orders/{}/edit", id.as_i64());
    let token = normalized_header_value(headers, ANTI_FORGERY_HEADER, 256);
    verify_token(
        &state.api.anti_forgery_secret,
        user.id,
        &action,
        token.as_deref(),
        unix_now_secs(),
        state.api.anti_forgery_max_skew.as_secs(),
    )
    .map_err(|e| ApiError::anti_forgery_rejected(&e.to_string()))?;

    if form.id != id.as_i64() {
        return Err(ApiError::not_found("order"));
    }
    let valid = match form.validate() {
        Ok(valid) => valid,
        Err(errors) => {
            // Redisplay: the submitted form rides along with the field errors.
            return Err(ApiError::new(
                ApiErrorCode::ValidationFailed,
                "validation failed",
                json!({"field_errors": field_errors_json(&errors), "form": form}),
            ));
        }
    };

    let order = state
        .store
        .order_header(id)
        .await
        .map_err(store_failure)?
        .ok_or_else(|| ApiError::not_found("order"))?;
    if !order.is_open() {
        return Err(ApiError::not_found("order"));
    }

    // Owner and completion time are forced here, never taken from the form.
    let outcome = state
        .store
        .checkout_order(
            id,
            user.id,
            valid.payment_type_id,
            valid.row_version,
            unix_now_secs(),
        )
        .await
        .map_err(store_failure)?;
    match outcome {
        UpdateOutcome::Updated { new_version } => {
            info!(
                order_id = id.as_i64(),
                row_version = new_version,
                "order checked out"
            );
            Ok(see_other("/orders/confirm"))
        }
        UpdateOutcome::NotFound => Err(ApiError::not_found("order")),
        UpdateOutcome::Conflict => Err(ApiError::conflict("order")),
    }
}

pub(crate) async fn order_confirm_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Response {
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    let resp = Json(json!({
        "view": "order_confirm",
        "message": "thank you, your order has been placed",
    }))
    .into_response();
    finish(&state, "/orders/confirm", resp, started, &request_id).await
}

pub(crate) async fn delete_confirm_handler(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    let resp = match delete_confirm(&state, &headers, &raw_id).await {
        Ok(resp) => resp,
        Err(err) => error_response(err, &request_id),
    };
    finish(&state, "/orders/{id}/delete", resp, started, &request_id).await
}

async fn delete_confirm(
    state: &AppState,
    headers: &HeaderMap,
    raw_id: &str,
) -> Result<Response, ApiError> {
    let id = OrderId::parse(raw_id)
        .map_err(|_| ApiError::invalid_identifier("order_id", raw_id))?;
    let user = current_user(state, headers).await?;
    let detail = state
        .store
        .order_detail(id)
        .await
        .map_err(store_failure)?
        .ok_or_else(|| ApiError::not_found("order"))?;
    if !detail.order.owned_by(user.id) || !detail.order.is_open() {
        return Err(ApiError::not_found("order"));
    }
    let action = format!("/orders/{}/delete", id.as_i64());
    let token = issue_token(
        &state.api.anti_forgery_secret,
        user.id,
        &action,
        unix_now_secs(),
    );
    Ok(Json(json!({
        "order": detail,
        "anti_forgery_token": token,
    }))
    .into_response())
}

pub(crate) async fn delete_submit_handler(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    let resp = match delete_submit(&state, &headers, &raw_id).await {
        Ok(resp) => resp,
        Err(err) => error_response(err, &request_id),
    };
    finish(&state, "/orders/{id}/delete", resp, started, &request_id).await
}

async fn delete_submit(
    state: &AppState,
    headers: &HeaderMap,
    raw_id: &str,
) -> Result<Response, ApiError> {
    let id = OrderId::parse(raw_id)
        .map_err(|_| ApiError::invalid_identifier("order_id", raw_id))?;
    let user = current_user(state, headers).await?;

    let action = format!("/orders/{}/delete", id.as_i64());
    let token = normalized_header_value(headers, ANTI_FORGERY_HEADER, 256);
    verify_token(
        &state.api.anti_forgery_secret,
        user.id,
        &action,
        token.as_deref(),
        unix_now_secs(),
        state.api.anti_forgery_max_skew.as_secs(),
    )
    .map_err(|e| ApiError::anti_forgery_rejected(&e.to_string()))?;

    let deleted = state
        .store
        .delete_order(id, user.id)
        .await
        .map_err(store_failure)?;
    if deleted {
        info!(order_id = id.as_i64(), "draft order deleted");
        Ok(see_other("/orders"))
    } else {
        Err(ApiError::not_found("order"))
    }
}
