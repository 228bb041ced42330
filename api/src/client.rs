//! Backend HTTP client.
//!
//! DESIGN
//! ======
//! One `ApiClient` covers both calling modes. `send` is the authenticated
//! path: it attaches the access credential as a bearer token and, on a 401
//! or 403, exchanges the refresh credential and resends exactly once.
//! `send_public` is the unauthenticated path used by login, refresh and
//! logout; it never carries a bearer token and never retries.
//!
//! Requests are plain `ApiRequest` descriptions. The resend rebuilds the HTTP
//! request from the description, so "already retried" is just the control
//! flow of `send` and nothing shared is mutated.
//!
//! Concurrent authorization failures coalesce on `refresh_gate`: the first
//! caller performs the exchange, later callers find the credential already
//! replaced and go straight to their resend.
//!
//! COOKIES
//! =======
//! The refresh credential is an opaque cookie owned by the backend. A client
//! can carry a `Cookie` header to forward (from the browser, or from the CLI
//! session file) and a [`CookieRelay`] that receives every `Set-Cookie` the
//! backend issues for `refresh_token`. The value itself is never parsed.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, COOKIE, HeaderValue, SET_COOKIE};
use reqwest::{Method, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;

use crate::auth::{self, RefreshError};
use crate::error::ApiError;
use crate::token::{REFRESH_TOKEN_COOKIE, TokenStore};

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Backend request and connect timeouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self {
            request_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }
}

/// Build the shared `reqwest::Client` used for backend calls.
pub fn build_http(timeouts: HttpTimeouts) -> Result<reqwest::Client, ApiError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeouts.request_secs))
        .connect_timeout(Duration::from_secs(timeouts.connect_secs))
        .build()
        .map_err(ApiError::Transport)
}

/// Check a backend base URL and strip its trailing slash.
pub fn normalize_base_url(raw: &str) -> Result<String, ApiError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let rest = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"));
    match rest {
        Some(host) if !host.is_empty() => Ok(trimmed.to_owned()),
        _ => Err(ApiError::InvalidUrl(raw.to_owned())),
    }
}

/// Sink for backend `Set-Cookie` headers that carry the refresh credential.
pub trait CookieRelay: Send + Sync {
    fn relay(&self, set_cookie: &HeaderValue);
}

// =============================================================================
// REQUESTS
// =============================================================================

#[derive(Debug, Clone)]
enum Body {
    Empty,
    Json(serde_json::Value),
    File {
        field: &'static str,
        file_name: String,
        bytes: Vec<u8>,
    },
}

/// Rebuildable description of one backend call.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Body,
}

impl ApiRequest {
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: Body::Empty,
        }
    }

    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    #[must_use]
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    #[must_use]
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    #[must_use]
    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_owned(), value.to_string()));
        self
    }

    #[must_use]
    pub fn query_opt<V: ToString>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.body = Body::Json(value);
        Ok(self)
    }

    /// Attach a file as the single multipart form part named `field`.
    #[must_use]
    pub fn file(mut self, field: &'static str, file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.body = Body::File {
            field,
            file_name: file_name.into(),
            bytes,
        };
        self
    }

    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }
}

// =============================================================================
// CLIENT
// =============================================================================

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenStore>,
    forwarded_cookie: Option<HeaderValue>,
    relay: Option<Arc<dyn CookieRelay>>,
    refresh_gate: Arc<Mutex<()>>,
}

impl ApiClient {
    /// `base_url` is expected to be normalized (see [`normalize_base_url`]).
    #[must_use]
    pub fn new(http: reqwest::Client, base_url: &str, tokens: Arc<dyn TokenStore>) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
            tokens,
            forwarded_cookie: None,
            relay: None,
            refresh_gate: Arc::new(Mutex::new(())),
        }
    }

    /// Send this `Cookie` header with every request.
    #[must_use]
    pub fn with_forwarded_cookie(mut self, cookie: HeaderValue) -> Self {
        self.forwarded_cookie = Some(cookie);
        self
    }

    #[must_use]
    pub fn with_cookie_relay(mut self, relay: Arc<dyn CookieRelay>) -> Self {
        self.relay = Some(relay);
        self
    }

    #[must_use]
    pub fn tokens(&self) -> &dyn TokenStore {
        self.tokens.as_ref()
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Authenticated call with at most one refresh-and-resend.
    ///
    /// If the refresh fails, the original authorization error is returned.
    /// A refresh rejected because the refresh credential is missing or
    /// invalid also clears the stored access credential.
    pub async fn send(&self, request: &ApiRequest) -> Result<Response, ApiError> {
        let stale = self.tokens.access_token();
        let error = match self.dispatch(request, stale.as_deref()).await {
            Ok(response) => return Ok(response),
            Err(error) if error.is_auth_failure() => error,
            Err(error) => return Err(error),
        };

        tracing::debug!(
            method = %request.method,
            path = %request.path,
            status = ?error.status(),
            "authorization failed; refreshing credential"
        );
        if let Err(refresh_error) = self.refresh_after(stale.as_deref()).await {
            if refresh_error.invalidates_session() {
                tracing::info!(error = %refresh_error, "refresh credential rejected; clearing access credential");
                self.tokens.remove_access_token();
            } else {
                tracing::warn!(error = %refresh_error, "credential refresh failed");
            }
            return Err(error);
        }

        let current = self.tokens.access_token();
        self.dispatch(request, current.as_deref()).await
    }

    /// Unauthenticated call: no bearer credential, no retry.
    pub async fn send_public(&self, request: &ApiRequest) -> Result<Response, ApiError> {
        self.dispatch(request, None).await
    }

    pub async fn send_json<T: DeserializeOwned>(&self, request: &ApiRequest) -> Result<T, ApiError> {
        decode(self.send(request).await?).await
    }

    pub async fn send_public_json<T: DeserializeOwned>(
        &self,
        request: &ApiRequest,
    ) -> Result<T, ApiError> {
        decode(self.send_public(request).await?).await
    }

    /// Run the refresh exchange unless another caller already replaced the
    /// credential this request was sent with.
    async fn refresh_after(&self, stale: Option<&str>) -> Result<(), RefreshError> {
        let _gate = self.refresh_gate.lock().await;
        let current = self.tokens.access_token();
        if current.is_some() && current.as_deref() != stale {
            tracing::debug!("credential already refreshed by a concurrent request");
            return Ok(());
        }
        auth::refresh(self).await.map(|_| ())
    }

    async fn dispatch(&self, request: &ApiRequest, bearer: Option<&str>) -> Result<Response, ApiError> {
        let url = format!("{}{}", self.base_url, request.path);
        let mut builder = self.http.request(request.method.clone(), url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = bearer {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        if let Some(cookie) = &self.forwarded_cookie {
            builder = builder.header(COOKIE, cookie.clone());
        }
        builder = match &request.body {
            Body::Empty => builder,
            Body::Json(value) => builder.json(value),
            Body::File {
                field,
                file_name,
                bytes,
            } => {
                let part = reqwest::multipart::Part::bytes(bytes.clone()).file_name(file_name.clone());
                builder.multipart(reqwest::multipart::Form::new().part(*field, part))
            }
        };

        let response = builder.send().await?;
        self.relay_cookies(&response);
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(ApiError::from_response(response).await)
        }
    }

    fn relay_cookies(&self, response: &Response) {
        let Some(relay) = &self.relay else {
            return;
        };
        let prefix = format!("{REFRESH_TOKEN_COOKIE}=");
        for value in response.headers().get_all(SET_COOKIE) {
            if value.as_bytes().starts_with(prefix.as_bytes()) {
                relay.relay(value);
            }
        }
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
