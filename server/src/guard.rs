//! Route guard middleware.
//!
//! ARCHITECTURE
//! ============
//! Runs in front of every route. Ungated paths pass straight through with a
//! [`BackendSession`] attached. Gated paths (the login page, the admin area
//! under `/dashboard`, the partner area under `/profile`) first resolve the
//! caller's session:
//!
//! 1. No refresh cookie: unauthenticated, and any access cookie is dropped.
//! 2. No access cookie: exchange the refresh cookie for one.
//! 3. Verify the access credential. If it fails and no exchange happened yet
//!    on this request, exchange once and verify the new one.
//!
//! [`decide`] then maps `(area, session)` to allow / redirect / not-found.
//! Wrong-role callers get the not-found page rather than a login redirect so
//! the existence of the other area's pages is not confirmed.
//!
//! Credential changes made while resolving (a freshly exchanged token, a
//! dropped one) are written back as cookies on whatever response goes out.

use api::auth;
use api::pages::{self, Area, home_for};
use api::token::TokenStore;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;

use crate::services::session::BackendSession;
use crate::services::verify::{Session, Verifier};
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Redirect(&'static str),
    NotFound,
}

/// Gate decision for a resolved session.
#[must_use]
pub fn decide(area: Area, session: Option<&Session>) -> Decision {
    match (area, session) {
        (Area::Login, None) => Decision::Allow,
        (Area::Login, Some(session)) => Decision::Redirect(home_for(Some(session.role))),
        (_, None) => Decision::Redirect(pages::LOGIN),
        (area, Some(session)) if area.required_role() == Some(session.role) => Decision::Allow,
        (_, Some(_)) => Decision::NotFound,
    }
}

/// Resolve the caller's verified session, exchanging the refresh credential
/// at most once.
pub async fn resolve_session(verifier: &Verifier, backend: &BackendSession) -> Option<Session> {
    let tokens = backend.client.tokens();
    if !backend.has_refresh_credential() {
        if tokens.access_token().is_some() {
            tracing::debug!("access cookie without refresh cookie; discarding");
            tokens.remove_access_token();
        }
        return None;
    }

    let mut exchanged = false;
    if tokens.access_token().is_none() {
        if !exchange(backend).await {
            return None;
        }
        exchanged = true;
    }

    let token = tokens.access_token()?;
    match verifier.verify(&token) {
        Ok(session) => Some(session),
        Err(error) if !exchanged => {
            tracing::debug!(error = %error, "access credential rejected; exchanging refresh credential");
            tokens.remove_access_token();
            if !exchange(backend).await {
                return None;
            }
            let token = tokens.access_token()?;
            verifier
                .verify(&token)
                .inspect_err(|error| tracing::info!(error = %error, "exchanged credential failed verification"))
                .ok()
        }
        Err(error) => {
            tracing::info!(error = %error, "exchanged credential failed verification");
            None
        }
    }
}

async fn exchange(backend: &BackendSession) -> bool {
    match auth::refresh(&backend.client).await {
        Ok(_) => true,
        Err(error) => {
            if error.invalidates_session() {
                tracing::debug!(error = %error, "refresh credential rejected");
            } else {
                tracing::warn!(error = %error, "refresh exchange failed");
            }
            backend.client.tokens().remove_access_token();
            false
        }
    }
}

/// Axum middleware enforcing [`decide`] on gated paths.
pub async fn route_guard(State(state): State<AppState>, jar: CookieJar, mut request: Request, next: Next) -> Response {
    let mut backend = BackendSession::from_jar(&state, &jar);

    if let Some(area) = Area::for_path(request.uri().path()) {
        let session = resolve_session(&state.verifier, &backend).await;
        match decide(area, session.as_ref()) {
            Decision::Allow => backend.session = session,
            Decision::Redirect(to) => {
                tracing::debug!(path = %request.uri().path(), to, "guard redirect");
                return backend.finish(Redirect::temporary(to).into_response(), &state.config.cookies);
            }
            Decision::NotFound => {
                tracing::debug!(path = %request.uri().path(), "guard: wrong role");
                return backend.finish(Redirect::temporary(pages::NOT_FOUND).into_response(), &state.config.cookies);
            }
        }
    }

    request.extensions_mut().insert(backend.clone());
    let response = next.run(request).await;
    backend.finish(response, &state.config.cookies)
}

#[cfg(test)]
#[path = "guard_test.rs"]
mod tests;
