use crate::api::HttpOptions;
use std::env;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://localhost:7256/api";

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

fn env_string(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base: String,
    pub accept_invalid_certs: bool,
    /// `None` waits forever, like the browser did.
    pub http_timeout: Option<Duration>,
    pub log_json: bool,
}

impl Config {
    pub fn from_env() -> Self {
        let timeout_ms = env_u64("SCHOOLD_HTTP_TIMEOUT_MS", 0);
        Self {
            api_base: env_string("SCHOOLD_API_BASE", DEFAULT_API_BASE),
            accept_invalid_certs: env_bool("SCHOOLD_ACCEPT_INVALID_CERTS", false),
            http_timeout: (timeout_ms > 0).then(|| Duration::from_millis(timeout_ms)),
            log_json: env_bool("SCHOOLD_LOG_JSON", false),
        }
    }

    pub fn http_options(&self) -> HttpOptions {
        HttpOptions {
            accept_invalid_certs: self.accept_invalid_certs,
            timeout: self.http_timeout,
        }
    }
}
