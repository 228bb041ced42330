//! Access-credential storage.
//!
//! The access credential is the only token the console itself holds. The
//! refresh credential lives in an HTTP-only cookie owned by the backend; the
//! console forwards it opaquely and never stores it here.

use std::sync::{PoisonError, RwLock};

/// Cookie carrying the short-lived access credential.
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";
/// Backend-owned cookie carrying the refresh credential.
pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";
/// Upper bound on how long a stored access credential may live: one day.
pub const ACCESS_TOKEN_MAX_AGE_SECS: i64 = 24 * 60 * 60;

/// Where the current access credential is kept.
///
/// Implementations are shared between concurrent requests, so they take
/// `&self` and synchronize internally. An empty string is never a credential.
pub trait TokenStore: Send + Sync {
    fn access_token(&self) -> Option<String>;
    fn save_access_token(&self, token: &str);
    fn remove_access_token(&self);
}

/// Process-local store. Used by tests and short-lived tools.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn access_token(&self) -> Option<String> {
        let guard = self.token.read().unwrap_or_else(PoisonError::into_inner);
        non_empty(guard.clone())
    }

    fn save_access_token(&self, token: &str) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = non_empty(Some(token.to_owned()));
    }

    fn remove_access_token(&self) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

/// Treat an empty credential as absent.
#[must_use]
pub fn non_empty(token: Option<String>) -> Option<String> {
    token.filter(|t| !t.trim().is_empty())
}
