//! Error type shared by every backend call.
//!
//! The backend reports failures as JSON bodies carrying either `message`
//! (a string, or a list of strings) or `detail` (a string, or a list of
//! validation entries with `msg`). [`ApiError::message`] flattens those
//! shapes into the single line the console shows to a person.

use serde_json::Value;

const UNKNOWN_ERROR: &str = "Unknown error";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response (connect, timeout, TLS).
    #[error("http request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The backend answered with a non-2xx status.
    #[error("request failed with status code {status}")]
    Status { status: u16, message: Option<String> },
    /// A request or response body did not match the expected shape.
    #[error("payload (de)serialization failed: {0}")]
    Decode(String),
    #[error("invalid API URL: {0}")]
    InvalidUrl(String),
    /// Rejected locally before any network call.
    #[error("{0}")]
    Validation(String),
}

impl ApiError {
    /// HTTP status of the failed response, if there was one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// 401 and 403 are the statuses that trigger refresh-and-retry.
    #[must_use]
    pub fn is_auth_failure(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }

    /// Message carried in the backend's error body.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Human-readable message: the backend's own text when present.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Status { message: None, .. } => UNKNOWN_ERROR.to_owned(),
            _ => self
                .server_message()
                .map_or_else(|| self.to_string(), str::to_owned),
        }
    }

    pub(crate) async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Self::Status {
            status,
            message: extract_message(&body),
        }
    }
}

/// Pull the error message out of a backend error body.
///
/// `message` wins over `detail`. A `message` list yields its first entry, a
/// `detail` list yields the first entry's `msg`.
pub(crate) fn extract_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;

    match value.get("message") {
        Some(Value::String(s)) if !s.is_empty() => return Some(s.clone()),
        Some(Value::Array(items)) => {
            let first = items.first().and_then(Value::as_str).unwrap_or(UNKNOWN_ERROR);
            return Some(first.to_owned());
        }
        _ => {}
    }

    match value.get("detail")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Array(items) => items
            .first()
            .and_then(|item| item.get("msg"))
            .and_then(Value::as_str)
            .map(str::to_owned),
        _ => None,
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
