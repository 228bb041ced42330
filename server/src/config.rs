//! Console configuration parsed from environment variables.
//!
//! Everything has a default except the signing secret: without it no session
//! can be verified, so startup fails instead of serving a console that
//! rejects everyone.

use std::time::Duration;

use api::client::{DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_REQUEST_TIMEOUT_SECS, HttpTimeouts, normalize_base_url};
use api::query::DEFAULT_STALE_SECS;

use crate::services::session::CookiePolicy;

pub const DEV_API_URL: &str = "http://localhost:8000/api";
pub const PROD_API_URL: &str = "https://backend:8000/api";
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Dev,
    Prod,
}

impl Mode {
    fn parse(raw: Option<&str>) -> Self {
        match raw.map(|m| m.trim().to_ascii_lowercase()) {
            Some(m) if m == "prod" || m == "production" => Self::Prod,
            _ => Self::Dev,
        }
    }

    #[must_use]
    pub fn default_api_url(self) -> &'static str {
        match self {
            Self::Dev => DEV_API_URL,
            Self::Prod => PROD_API_URL,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing signing secret: set JWT_SECRET_KEY or JWT_SECRET")]
    MissingSecret,
    #[error("invalid API_URL: {0}")]
    InvalidApiUrl(String),
}

#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    pub mode: Mode,
    pub api_url: String,
    pub jwt_secret: String,
    pub port: u16,
    pub cookies: CookiePolicy,
    pub timeouts: HttpTimeouts,
    pub query_stale: Duration,
}

impl ConsoleConfig {
    /// Build typed config from environment variables.
    ///
    /// Required:
    /// - `JWT_SECRET_KEY` or `JWT_SECRET`
    ///
    /// Optional:
    /// - `MODE`: `dev` (default) or `prod`; picks the default backend URL
    /// - `API_URL`: explicit backend base URL
    /// - `PORT`: default 3000
    /// - `COOKIE_SECURE`: default true iff the backend URL is https
    /// - `COOKIE_DOMAIN`: unset by default
    /// - `API_REQUEST_TIMEOUT_SECS`: default 30
    /// - `API_CONNECT_TIMEOUT_SECS`: default 10
    /// - `QUERY_STALE_SECS`: default 300
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Same as [`ConsoleConfig::from_env`], reading through `var`.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_blank = |key: &str| var(key).filter(|v| !v.trim().is_empty());

        let jwt_secret = non_blank("JWT_SECRET_KEY")
            .or_else(|| non_blank("JWT_SECRET"))
            .ok_or(ConfigError::MissingSecret)?;

        let mode = Mode::parse(var("MODE").as_deref());
        let raw_url = non_blank("API_URL").unwrap_or_else(|| mode.default_api_url().to_owned());
        let api_url = normalize_base_url(&raw_url).map_err(|_| ConfigError::InvalidApiUrl(raw_url.clone()))?;

        let secure = var("COOKIE_SECURE")
            .as_deref()
            .and_then(parse_bool)
            .unwrap_or_else(|| api_url.starts_with("https://"));
        let cookies = CookiePolicy {
            secure,
            domain: non_blank("COOKIE_DOMAIN").map(|d| d.trim().to_owned()),
        };

        let timeouts = HttpTimeouts {
            request_secs: parse_or(var("API_REQUEST_TIMEOUT_SECS"), DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: parse_or(var("API_CONNECT_TIMEOUT_SECS"), DEFAULT_CONNECT_TIMEOUT_SECS),
        };

        Ok(Self {
            mode,
            api_url,
            jwt_secret,
            port: parse_or(var("PORT"), DEFAULT_PORT),
            cookies,
            timeouts,
            query_stale: Duration::from_secs(parse_or(var("QUERY_STALE_SECS"), DEFAULT_STALE_SECS)),
        })
    }
}

/// `1/true/yes/on` or `0/false/no/off`, case-insensitive.
fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_or<T>(raw: Option<String>, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    raw.and_then(|v| v.trim().parse::<T>().ok()).unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
