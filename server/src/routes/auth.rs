//! Auth routes: login and logout through the backend.

use api::auth::{self as flows, LoginForm, SignIn, SignOut};
use api::token::TokenStore;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;

use super::error_status;
use crate::services::session::BackendSession;
use crate::state::AppState;

/// `POST /api/auth/login`: sets the access cookie and relays the backend's
/// refresh cookie on success.
pub async fn login(
    State(state): State<AppState>,
    backend: BackendSession,
    Json(form): Json<LoginForm>,
) -> (StatusCode, Json<SignIn>) {
    let result = flows::login(&backend.client, &form).await;
    let status = match &result {
        Ok(auth) => {
            if let Some(user) = &auth.user {
                state.queries.invalidate_scope(&user.id.to_string());
            }
            StatusCode::OK
        }
        Err(error) => error_status(error),
    };
    (status, Json(SignIn::from_result(result)))
}

/// `POST /api/auth/logout`: always answers with a redirect to the login page.
pub async fn logout(State(state): State<AppState>, backend: BackendSession) -> Json<SignOut> {
    let scope = backend
        .client
        .tokens()
        .access_token()
        .and_then(|token| state.verifier.verify(&token).ok())
        .map(|session| session.subject_id.to_string());

    let outcome = flows::sign_out(&backend.client).await;
    if let Some(scope) = scope {
        state.queries.invalidate_scope(&scope);
    }
    Json(outcome)
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
