//! Per-request backend session.
//!
//! DESIGN
//! ======
//! Every browser request gets its own `ApiClient`. Its access credential
//! lives in a `CookieTokenStore` seeded from the request's `access_token`
//! cookie, and the browser's `refresh_token` cookie is forwarded to the
//! backend untouched. Writes to the store (login, refresh, logout) are
//! recorded and replayed onto the response as `Set-Cookie` headers by
//! [`BackendSession::finish`], together with any refresh-cookie updates the
//! backend issued during the request.
//!
//! TRADE-OFFS
//! ==========
//! Because the client is per request, concurrent refreshes coalesce only
//! within one request. Separate browser requests each carry their own
//! cookies, so there is nothing shared to coalesce across them.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use api::ApiClient;
use api::client::CookieRelay;
use api::token::{ACCESS_TOKEN_COOKIE, ACCESS_TOKEN_MAX_AGE_SECS, REFRESH_TOKEN_COOKIE, TokenStore, non_empty};
use axum::extract::FromRequestParts;
use axum::http::header::SET_COOKIE;
use axum::http::request::Parts;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

use crate::services::verify::{Session, remaining_lifetime};
use crate::state::AppState;

/// Attributes for the access cookie.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookiePolicy {
    pub secure: bool,
    pub domain: Option<String>,
}

// =============================================================================
// COOKIE TOKEN STORE
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum Change {
    Saved(String),
    Removed,
}

#[derive(Debug)]
struct StoreState {
    current: Option<String>,
    change: Option<Change>,
}

/// Access credential backed by the request's cookies.
#[derive(Debug)]
pub struct CookieTokenStore {
    had_cookie: bool,
    state: Mutex<StoreState>,
}

impl CookieTokenStore {
    #[must_use]
    pub fn from_jar(jar: &CookieJar) -> Self {
        let cookie = jar.get(ACCESS_TOKEN_COOKIE);
        Self {
            had_cookie: cookie.is_some(),
            state: Mutex::new(StoreState {
                current: non_empty(cookie.map(|c| c.value().to_owned())),
                change: None,
            }),
        }
    }

    /// Add the recorded change, if any, to `jar`.
    ///
    /// A saved credential lives for its remaining signed lifetime, capped at
    /// one day. Removal is only emitted when the browser sent a cookie.
    #[must_use]
    pub fn apply(&self, jar: CookieJar, policy: &CookiePolicy) -> CookieJar {
        let change = self.lock().change.clone();
        match change {
            Some(Change::Saved(token)) => {
                let lifetime = remaining_lifetime(&token)
                    .map_or(ACCESS_TOKEN_MAX_AGE_SECS, |secs| secs.clamp(0, ACCESS_TOKEN_MAX_AGE_SECS));
                jar.add(access_cookie(token, Duration::seconds(lifetime), policy))
            }
            Some(Change::Removed) if self.had_cookie => jar.add(access_cookie(String::new(), Duration::ZERO, policy)),
            _ => jar,
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TokenStore for CookieTokenStore {
    fn access_token(&self) -> Option<String> {
        self.lock().current.clone()
    }

    fn save_access_token(&self, token: &str) {
        let mut state = self.lock();
        state.current = non_empty(Some(token.to_owned()));
        state.change = Some(state.current.clone().map_or(Change::Removed, Change::Saved));
    }

    fn remove_access_token(&self) {
        let mut state = self.lock();
        state.current = None;
        state.change = Some(Change::Removed);
    }
}

fn access_cookie(value: String, max_age: Duration, policy: &CookiePolicy) -> Cookie<'static> {
    let mut cookie = Cookie::build((ACCESS_TOKEN_COOKIE, value))
        .path("/")
        .http_only(false)
        .same_site(SameSite::Strict)
        .secure(policy.secure)
        .max_age(max_age);
    if let Some(domain) = &policy.domain {
        cookie = cookie.domain(domain.clone());
    }
    cookie.build()
}

// =============================================================================
// RELAYED REFRESH COOKIES
// =============================================================================

/// Collects the backend's refresh-cookie `Set-Cookie` headers verbatim.
#[derive(Debug, Default)]
pub struct RelayedCookies(Mutex<Vec<HeaderValue>>);

impl RelayedCookies {
    fn take(&self) -> Vec<HeaderValue> {
        std::mem::take(&mut *self.0.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl CookieRelay for RelayedCookies {
    fn relay(&self, set_cookie: &HeaderValue) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(set_cookie.clone());
    }
}

// =============================================================================
// BACKEND SESSION
// =============================================================================

/// Backend access for one browser request.
///
/// Inserted as a request extension by the route guard; handlers take it as
/// an extractor. `session` is set on guarded pages once the caller is
/// verified, and is `None` on ungated routes.
#[derive(Clone)]
pub struct BackendSession {
    pub client: ApiClient,
    pub session: Option<Session>,
    tokens: Arc<CookieTokenStore>,
    relayed: Arc<RelayedCookies>,
    has_refresh_cookie: bool,
}

impl BackendSession {
    #[must_use]
    pub fn from_jar(state: &AppState, jar: &CookieJar) -> Self {
        let tokens = Arc::new(CookieTokenStore::from_jar(jar));
        let relayed = Arc::new(RelayedCookies::default());

        let forwarded = jar
            .get(REFRESH_TOKEN_COOKIE)
            .map(Cookie::value)
            .filter(|v| !v.is_empty())
            .and_then(|value| match HeaderValue::from_str(&format!("{REFRESH_TOKEN_COOKIE}={value}")) {
                Ok(header) => Some(header),
                Err(e) => {
                    tracing::warn!(error = %e, "refresh cookie is not a valid header value");
                    None
                }
            });
        let has_refresh_cookie = forwarded.is_some();

        let mut client =
            ApiClient::new(state.http.clone(), &state.config.api_url, tokens.clone()).with_cookie_relay(relayed.clone());
        if let Some(header) = forwarded {
            client = client.with_forwarded_cookie(header);
        }

        Self {
            client,
            session: None,
            tokens,
            relayed,
            has_refresh_cookie,
        }
    }

    #[must_use]
    pub fn has_refresh_credential(&self) -> bool {
        self.has_refresh_cookie
    }

    /// Cache scope for this caller.
    #[must_use]
    pub fn scope(&self) -> String {
        self.session
            .as_ref()
            .map_or_else(|| "anonymous".to_owned(), |s| s.subject_id.to_string())
    }

    /// Replay credential changes onto the response.
    #[must_use]
    pub fn finish(&self, response: Response, policy: &CookiePolicy) -> Response {
        let jar = self.tokens.apply(CookieJar::new(), policy);
        let mut response = (jar, response).into_response();
        for value in self.relayed.take() {
            response.headers_mut().append(SET_COOKIE, value);
        }
        response
    }
}

impl<S> FromRequestParts<S> for BackendSession
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Self>().cloned().ok_or_else(|| {
            tracing::error!("backend session missing; route guard not installed");
            StatusCode::INTERNAL_SERVER_ERROR
        })
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
