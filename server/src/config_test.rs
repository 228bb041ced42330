use std::collections::HashMap;

use super::*;

fn config(vars: &[(&str, &str)]) -> Result<ConsoleConfig, ConfigError> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();
    ConsoleConfig::from_vars(|key| vars.get(key).cloned())
}

// =============================================================================
// ConsoleConfig
// =============================================================================

#[test]
fn defaults_to_dev_backend() {
    let cfg = config(&[("JWT_SECRET_KEY", "s3cret")]).unwrap();
    assert_eq!(cfg.mode, Mode::Dev);
    assert_eq!(cfg.api_url, DEV_API_URL);
    assert_eq!(cfg.jwt_secret, "s3cret");
    assert_eq!(cfg.port, DEFAULT_PORT);
    assert!(!cfg.cookies.secure);
    assert_eq!(cfg.cookies.domain, None);
    assert_eq!(cfg.timeouts, HttpTimeouts::default());
    assert_eq!(cfg.query_stale, Duration::from_secs(300));
}

#[test]
fn prod_mode_selects_https_backend_and_secure_cookies() {
    let cfg = config(&[("JWT_SECRET", "s"), ("MODE", "prod")]).unwrap();
    assert_eq!(cfg.mode, Mode::Prod);
    assert_eq!(cfg.api_url, PROD_API_URL);
    assert!(cfg.cookies.secure);
}

#[test]
fn secret_key_wins_over_fallback_name() {
    let cfg = config(&[("JWT_SECRET_KEY", "primary"), ("JWT_SECRET", "fallback")]).unwrap();
    assert_eq!(cfg.jwt_secret, "primary");

    let cfg = config(&[("JWT_SECRET_KEY", "  "), ("JWT_SECRET", "fallback")]).unwrap();
    assert_eq!(cfg.jwt_secret, "fallback");
}

#[test]
fn missing_secret_is_an_error() {
    assert!(matches!(config(&[]), Err(ConfigError::MissingSecret)));
}

#[test]
fn overrides_are_parsed() {
    let cfg = config(&[
        ("JWT_SECRET_KEY", "s"),
        ("API_URL", "https://api.example.test/api/"),
        ("PORT", "8080"),
        ("COOKIE_SECURE", "off"),
        ("COOKIE_DOMAIN", "console.example.test"),
        ("API_REQUEST_TIMEOUT_SECS", "5"),
        ("API_CONNECT_TIMEOUT_SECS", "2"),
        ("QUERY_STALE_SECS", "0"),
    ])
    .unwrap();
    assert_eq!(cfg.api_url, "https://api.example.test/api");
    assert_eq!(cfg.port, 8080);
    assert!(!cfg.cookies.secure);
    assert_eq!(cfg.cookies.domain.as_deref(), Some("console.example.test"));
    assert_eq!(cfg.timeouts, HttpTimeouts { request_secs: 5, connect_secs: 2 });
    assert_eq!(cfg.query_stale, Duration::ZERO);
}

#[test]
fn invalid_numbers_fall_back_to_defaults() {
    let cfg = config(&[("JWT_SECRET_KEY", "s"), ("PORT", "eighty"), ("API_REQUEST_TIMEOUT_SECS", "-1")]).unwrap();
    assert_eq!(cfg.port, DEFAULT_PORT);
    assert_eq!(cfg.timeouts.request_secs, 30);
}

#[test]
fn invalid_api_url_is_an_error() {
    let err = config(&[("JWT_SECRET_KEY", "s"), ("API_URL", "backend:8000")]).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidApiUrl(ref url) if url == "backend:8000"));
}

// =============================================================================
// parse_bool
// =============================================================================

#[test]
fn parse_bool_variants() {
    for val in ["1", "true", "yes", "on", "  TRUE ", "On"] {
        assert_eq!(parse_bool(val), Some(true), "expected true for {val:?}");
    }
    for val in ["0", "false", "no", "off", "NO"] {
        assert_eq!(parse_bool(val), Some(false), "expected false for {val:?}");
    }
    for val in ["", "maybe", "2"] {
        assert_eq!(parse_bool(val), None, "expected none for {val:?}");
    }
}

#[test]
fn cookie_secure_flag_overrides_inference() {
    let cfg = config(&[("JWT_SECRET_KEY", "s"), ("COOKIE_SECURE", "yes")]).unwrap();
    assert!(cfg.cookies.secure);

    let cfg = config(&[("JWT_SECRET_KEY", "s"), ("COOKIE_SECURE", "bogus"), ("MODE", "prod")]).unwrap();
    assert!(cfg.cookies.secure);
}
