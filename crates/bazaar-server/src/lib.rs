#![forbid(unsafe_code)]

//! HTTP surface of the bazaar order service: the nine order/cart actions
//! plus health, readiness, version, and metrics endpoints.

use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn_with_state;
use axum::routing::get;
use axum::Router;
use bazaar_store::Store;
use std::sync::atomic::AtomicU64;
use std::sync::Arc;

mod config;
mod http;
mod identity;
mod metrics;
mod middleware;
mod security;

pub use config::{validate_startup_config_contract, ApiConfig, CONFIG_SCHEMA_VERSION};
pub use identity::{FakeIdentity, IdentityProvider, StoreIdentity, SESSION_TOKEN_HEADER};
pub use metrics::RequestMetrics;
pub use security::{issue_token, verify_token, AntiForgeryError, ANTI_FORGERY_HEADER};

pub const CRATE_NAME: &str = "bazaar-server";

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
    pub identity: Arc<dyn IdentityProvider>,
    pub api: ApiConfig,
    pub metrics: Arc<RequestMetrics>,
    pub(crate) request_id_seed: Arc<AtomicU64>,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<Store>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self::with_config(store, identity, ApiConfig::default())
    }

    #[must_use]
    pub fn with_config(
        store: Arc<Store>,
        identity: Arc<dyn IdentityProvider>,
        api: ApiConfig,
    ) -> Self {
        Self {
            store,
            identity,
            api,
            metrics: Arc::new(RequestMetrics::default()),
            request_id_seed: Arc::new(AtomicU64::new(1)),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(http::system::healthz_handler))
        .route("/readyz", get(http::system::readyz_handler))
        .route("/metrics", get(http::system::metrics_handler))
        .route("/v1/version", get(http::system::version_handler))
        .route("/orders", get(http::orders::index_handler))
        .route("/orders/cart", get(http::orders::cart_handler))
        .route("/orders/confirm", get(http::orders::order_confirm_handler))
        .route(
            "/orders/add/:product_id",
            get(http::orders::add_to_cart_handler).post(http::orders::add_to_cart_handler),
        )
        .route(
            "/orders/remove/:item_id",
            get(http::orders::remove_from_cart_handler)
                .post(http::orders::remove_from_cart_handler),
        )
        .route("/orders/:id", get(http::orders::details_handler))
        .route(
            "/orders/:id/edit",
            get(http::orders::edit_form_handler).post(http::orders::edit_submit_handler),
        )
        .route(
            "/orders/:id/delete",
            get(http::orders::delete_confirm_handler).post(http::orders::delete_submit_handler),
        )
        .layer(from_fn_with_state(
            state.clone(),
            middleware::security_middleware,
        ))
        .layer(DefaultBodyLimit::max(state.api.max_body_bytes))
        .with_state(state)
}

/// Wall-clock seconds since the unix epoch; the only clock read in the
/// service. Store writes receive this value explicitly.
pub(crate) fn unix_now_secs() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs() as i64)
}
