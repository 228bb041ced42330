//! Typed client for the console backend.
//!
//! This crate owns everything that talks to the backend HTTP API: the
//! credential store seam, the authenticated client with its one-shot
//! refresh-and-retry, the login/logout flows, the role-to-area page map, and
//! thin typed wrappers over every backend endpoint the console uses.
//!
//! Both the `server` (browser-facing console) and the `cli` build on it; they
//! differ only in where the access credential is kept.

pub mod auth;
pub mod client;
pub mod error;
pub mod pages;
pub mod query;
pub mod services;
pub mod token;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use client::{ApiClient, ApiRequest, CookieRelay};
pub use error::ApiError;
pub use token::{MemoryTokenStore, TokenStore};
pub use types::ListQuery;
pub use types::auth::Role;
