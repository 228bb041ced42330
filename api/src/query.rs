//! In-memory query cache for backend reads.
//!
//! Entries are keyed by `(scope, resource, params)`. The scope is the caller
//! (subject id) so one user's data is never served to another. Reads inside
//! the freshness window come from memory; failures are never stored, so the
//! next read goes back to the backend. Mutations drop every entry of the
//! resource they touch.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::ApiError;

pub const DEFAULT_STALE_SECS: u64 = 5 * 60;

/// Stable resource names used in cache keys and invalidation.
pub mod resource {
    pub const PROFILE: &str = "profile";
    pub const USERS: &str = "users";
    pub const PARTNERS: &str = "partners";
    pub const PAYMENTS: &str = "payments";
    pub const STORIES: &str = "stories";
    pub const WITHDRAWALS: &str = "withdrawals";
    pub const DASHBOARD_STATISTICS: &str = "dashboard-statistics";
    pub const PARTNER_STATISTICS: &str = "partner-statistics";
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    scope: String,
    resource: &'static str,
    params: String,
}

impl QueryKey {
    #[must_use]
    pub fn new(scope: impl ToString, resource: &'static str, params: impl Into<String>) -> Self {
        Self {
            scope: scope.to_string(),
            resource,
            params: params.into(),
        }
    }

    #[must_use]
    pub fn resource(&self) -> &'static str {
        self.resource
    }
}

struct Entry {
    value: serde_json::Value,
    fetched_at: Instant,
}

#[derive(Clone)]
pub struct QueryCache {
    entries: Arc<Mutex<HashMap<QueryKey, Entry>>>,
    stale_after: Duration,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_STALE_SECS))
    }
}

impl QueryCache {
    #[must_use]
    pub fn new(stale_after: Duration) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            stale_after,
        }
    }

    /// Serve a fresh cached value, or run `fetch` and remember its success.
    pub async fn fetch<T, F, Fut>(&self, key: QueryKey, fetch: F) -> Result<T, ApiError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        if let Some(cached) = self.fresh(&key) {
            match serde_json::from_value(cached) {
                Ok(hit) => return Ok(hit),
                Err(e) => tracing::debug!(error = %e, resource = key.resource, "cached value no longer decodes"),
            }
        }

        let value = fetch().await?;
        match serde_json::to_value(&value) {
            Ok(json) => {
                let mut entries = self.lock();
                entries.retain(|_, entry| entry.fetched_at.elapsed() < self.stale_after);
                entries.insert(
                    key,
                    Entry {
                        value: json,
                        fetched_at: Instant::now(),
                    },
                );
            }
            Err(e) => tracing::debug!(error = %e, "query result not cacheable"),
        }
        Ok(value)
    }

    /// Drop every entry of `resource`, across all scopes.
    pub fn invalidate(&self, resource: &str) {
        self.lock().retain(|key, _| key.resource != resource);
    }

    /// Drop every entry belonging to one caller.
    pub fn invalidate_scope(&self, scope: &str) {
        self.lock().retain(|key, _| key.scope != scope);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn fresh(&self, key: &QueryKey) -> Option<serde_json::Value> {
        let entries = self.lock();
        let entry = entries.get(key)?;
        (entry.fetched_at.elapsed() < self.stale_after).then(|| entry.value.clone())
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<QueryKey, Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Result of a read as rendered by a view: data, or an inline error.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Loadable<T> {
    Ready { data: T },
    Error { message: String },
}

impl<T> Loadable<T> {
    #[must_use]
    pub fn from_result(result: Result<T, ApiError>) -> Self {
        match result {
            Ok(data) => Self::Ready { data },
            Err(error) => {
                tracing::warn!(error = %error, "query failed");
                Self::Error {
                    message: error.message(),
                }
            }
        }
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }
}

#[cfg(test)]
#[path = "query_test.rs"]
mod tests;
