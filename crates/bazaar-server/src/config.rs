use std::time::Duration;

pub const CONFIG_SCHEMA_VERSION: &str = "1";

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub max_body_bytes: usize,
    pub max_uri_bytes: usize,
    pub max_header_bytes: usize,
    pub anti_forgery_secret: String,
    pub anti_forgery_max_skew: Duration,
    pub enable_audit_log: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 16 * 1024,
            max_uri_bytes: 2048,
            max_header_bytes: 16 * 1024,
            anti_forgery_secret: "insecure-dev-secret".to_string(),
            anti_forgery_max_skew: Duration::from_secs(300),
            enable_audit_log: false,
        }
    }
}

pub fn validate_startup_config_contract(api: &ApiConfig) -> Result<(), String> {
    if api.max_body_bytes == 0 || api.max_uri_bytes == 0 || api.max_header_bytes == 0 {
        return Err("api size limits must be > 0".to_string());
    }
    if api.anti_forgery_secret.is_empty() {
        return Err("anti_forgery_secret must be non-empty".to_string());
    }
    if api.anti_forgery_max_skew.is_zero() {
        return Err("anti_forgery_max_skew must be > 0".to_string());
    }
    Ok(())
}
