#![forbid(unsafe_code)]

use bazaar_server::{
    build_router, validate_startup_config_contract, ApiConfig, AppState, IdentityProvider,
    StoreIdentity,
};
use bazaar_store::Store;
use std::env;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn env_bool(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| match v.as_str() {
            "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
            "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

fn env_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if env_bool("BAZAAR_LOG_JSON", true) {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate()).expect("register SIGTERM");
        let mut sigint = signal(SignalKind::interrupt()).expect("register SIGINT");
        tokio::select! {
            _ = sigterm.recv() => {}
            _ = sigint.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

#[tokio::main]
async fn main() -> Result<(), String> {
    init_tracing();

    let bind_addr = env::var("BAZAAR_BIND").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let db_path =
        env::var("BAZAAR_DB_PATH").unwrap_or_else(|_| "artifacts/bazaar.sqlite".to_string());

    let api = ApiConfig {
        max_body_bytes: env_usize("BAZAAR_MAX_BODY_BYTES", 16 * 1024),
        max_uri_bytes: env_usize("BAZAAR_MAX_URI_BYTES", 2048),
        max_header_bytes: env_usize("BAZAAR_MAX_HEADER_BYTES", 16 * 1024),
        anti_forgery_secret: env::var("BAZAAR_ANTI_FORGERY_SECRET")
            .unwrap_or_else(|_| ApiConfig::default().anti_forgery_secret),
        anti_forgery_max_skew: Duration::from_secs(env_u64("BAZAAR_ANTI_FORGERY_SKEW_SECS", 300)),
        enable_audit_log: env_bool("BAZAAR_ENABLE_AUDIT_LOG", false),
    };
    validate_startup_config_contract(&api)?;

    let store = Store::open(&db_path).map_err(|e| format!("open store {db_path}: {e}"))?;
    let identity: Arc<dyn IdentityProvider> = Arc::new(StoreIdentity::new(store.clone()));
    let state = AppState::with_config(store, identity, api);
    let app = build_router(state);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| format!("bind {bind_addr}: {e}"))?;
    info!("bazaar-server listening on {bind_addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown_signal())
        .await
        .map_err(|e| format!("server failed: {e}"))
}
