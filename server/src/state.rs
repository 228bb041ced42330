//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the parsed configuration, the one `reqwest::Client` every
//! per-request `ApiClient` is built on, the credential verifier, and the
//! query cache shared by all page views.

use std::sync::Arc;

use api::ApiError;
use api::client::build_http;
use api::query::QueryCache;

use crate::config::ConsoleConfig;
use crate::services::verify::Verifier;

/// Clone is required by Axum; all inner fields are Arc-wrapped or Clone.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ConsoleConfig>,
    pub http: reqwest::Client,
    pub verifier: Arc<Verifier>,
    pub queries: QueryCache,
}

impl AppState {
    pub fn new(config: ConsoleConfig) -> Result<Self, ApiError> {
        let http = build_http(config.timeouts)?;
        Ok(Self {
            verifier: Arc::new(Verifier::new(&config.jwt_secret)),
            queries: QueryCache::new(config.query_stale),
            http,
            config: Arc::new(config),
        })
    }
}
