//! Server configuration.
//!
//! Everything except `JWT_SECRET` has a default that works for local
//! development. `SMTP_*` lives in `shelfwatch-events`; `DATABASE_URL`
//! is read directly in `main`.

use crate::auth::jwt::JwtConfig;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (`HOST`, default `0.0.0.0`).
    pub host: String,
    /// Bind port (`PORT`, default `3000`).
    pub port: u16,
    /// Allowed CORS origins (`CORS_ORIGINS`, comma-separated).
    pub cors_origins: Vec<String>,
    /// Per-request timeout (`REQUEST_TIMEOUT_SECS`, default `30`).
    pub request_timeout_secs: u64,
    /// Base URL for item links in alert emails (`FRONTEND_URL`).
    pub frontend_url: String,
    pub jwt: JwtConfig,
}

const DEFAULT_FRONTEND_URL: &str = "http://localhost:5173/";

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

impl ServerConfig {
    /// Load from the environment.
    ///
    /// Panics on unparseable numeric values and on a missing
    /// `JWT_SECRET`; configuration problems should stop the process at
    /// startup, not surface per-request.
    pub fn from_env() -> Self {
        let port: u16 = env_or("PORT", "3000")
            .parse()
            .expect("PORT must be a valid u16");

        let request_timeout_secs: u64 = env_or("REQUEST_TIMEOUT_SECS", "30")
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let cors_origins: Vec<String> = env_or("CORS_ORIGINS", "http://localhost:5173")
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Self {
            host: env_or("HOST", "0.0.0.0"),
            port,
            cors_origins,
            request_timeout_secs,
            frontend_url: env_or("FRONTEND_URL", DEFAULT_FRONTEND_URL),
            jwt: JwtConfig::from_env(),
        }
    }
}
