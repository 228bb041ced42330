//! File-backed credential store for the CLI.
//!
//! One JSON document holds the access credential and the refresh cookie the
//! backend set on login. Every change rewrites the whole file through a
//! temporary sibling and a rename, so a crash never leaves half a session.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use api::client::CookieRelay;
use api::token::{REFRESH_TOKEN_COOKIE, TokenStore, non_empty};
use reqwest::header::HeaderValue;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session file {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("session file {path} is not valid JSON: {source}")]
    Corrupt { path: PathBuf, source: serde_json::Error },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    /// `refresh_token=<value>`, replayed verbatim as a `Cookie` header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookie: Option<String>,
}

#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    data: Mutex<SessionData>,
}

impl FileTokenStore {
    /// Open the session at `path`. A missing file is an empty session.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, SessionError> {
        let path = path.into();
        let data = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|source| SessionError::Corrupt {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => SessionData::default(),
            Err(source) => return Err(SessionError::Io { path, source }),
        };
        Ok(Self {
            path,
            data: Mutex::new(data),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionData {
        self.lock().clone()
    }

    /// Stored refresh cookie as a request header.
    #[must_use]
    pub fn cookie_header(&self) -> Option<HeaderValue> {
        let cookie = self.lock().cookie.clone()?;
        HeaderValue::from_str(&cookie)
            .inspect_err(|e| tracing::warn!(error = %e, "stored cookie is not a valid header value"))
            .ok()
    }

    fn update(&self, change: impl FnOnce(&mut SessionData)) {
        let mut data = self.lock();
        change(&mut data);
        if let Err(e) = write_atomic(&self.path, &data) {
            tracing::warn!(error = %e, "failed to persist session");
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionData> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn write_atomic(path: &Path, data: &SessionData) -> Result<(), SessionError> {
    let io_error = |source: io::Error| SessionError::Io {
        path: path.to_path_buf(),
        source,
    };
    let json = serde_json::to_vec_pretty(data).map_err(|source| SessionError::Corrupt {
        path: path.to_path_buf(),
        source,
    })?;
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    let mut file = create_private(&tmp).map_err(io_error)?;
    file.write_all(&json).map_err(io_error)?;
    drop(file);
    fs::rename(&tmp, path).map_err(io_error)
}

/// Create `path` readable by the owner only; it holds credentials.
fn create_private(path: &Path) -> io::Result<fs::File> {
    // A leftover temp file keeps its old mode, so start fresh.
    let _ = fs::remove_file(path);
    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    options.open(path)
}

impl TokenStore for FileTokenStore {
    fn access_token(&self) -> Option<String> {
        non_empty(self.lock().access_token.clone())
    }

    fn save_access_token(&self, token: &str) {
        let token = non_empty(Some(token.to_owned()));
        self.update(|data| data.access_token = token);
    }

    fn remove_access_token(&self) {
        self.update(|data| data.access_token = None);
    }
}

impl CookieRelay for FileTokenStore {
    /// Keep the `name=value` pair of a refresh `Set-Cookie`; an empty value
    /// means the backend cleared it.
    fn relay(&self, set_cookie: &HeaderValue) {
        let Ok(raw) = set_cookie.to_str() else {
            return;
        };
        let pair = raw.split(';').next().unwrap_or_default().trim();
        let Some(value) = pair.strip_prefix(REFRESH_TOKEN_COOKIE).and_then(|rest| rest.strip_prefix('=')) else {
            return;
        };
        let cookie = (!value.is_empty()).then(|| pair.to_owned());
        self.update(|data| data.cookie = cookie);
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
