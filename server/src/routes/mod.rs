//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! The console serves two kinds of routes under one Axum router:
//! - guarded page views (`/login`, `/dashboard/...`, `/profile/...`) that
//!   return `{ page, session, data }` documents for the UI to render;
//! - JSON endpoints under `/api` that proxy to the backend with the caller's
//!   cookies. The backend enforces authorization there.
//!
//! Every route runs behind [`guard::route_guard`](crate::guard::route_guard),
//! which attaches the per-request `BackendSession` and writes credential
//! cookie changes back onto the response.

pub mod auth;
pub mod partners;
pub mod statistics;
pub mod stories;
pub mod users;
pub mod views;
pub mod withdrawals;

use api::ApiError;
use api::pages::{self, admin, partner};
use axum::Router;
use axum::http::StatusCode;
use axum::middleware;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, patch, post, put};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::guard;
use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    Router::new()
        // Pages
        .route(pages::LOGIN, get(views::login))
        .route(pages::NOT_FOUND, get(views::not_found))
        .route(admin::HOME, get(views::admin_dashboard))
        .route(admin::USERS, get(views::admin_users))
        .route(admin::PARTNERS, get(views::admin_partners))
        .route(admin::PAYMENTS, get(views::admin_payments))
        .route(admin::STORIES, get(views::admin_stories))
        .route(admin::WITHDRAWALS, get(views::admin_withdrawals))
        .route(admin::SETTINGS, get(views::admin_settings))
        .route(partner::HOME, get(views::partner_home))
        .route(partner::PAYMENTS, get(views::partner_payments))
        .route(partner::REFERRALS, get(views::partner_referrals))
        .route(partner::WITHDRAWALS, get(views::partner_withdrawals))
        .route(partner::SETTINGS, get(views::partner_settings))
        // JSON API
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/profile", get(partners::profile))
        .route("/api/partners", get(partners::list_partners).post(partners::create_partner))
        .route("/api/partners/me/profile", put(partners::update_own_profile))
        .route(
            "/api/partners/{id}",
            get(partners::get_partner)
                .put(partners::update_partner)
                .delete(partners::delete_partner),
        )
        .route("/api/partners/{id}/toggle", patch(partners::toggle_partner))
        .route("/api/users", get(users::list_users))
        .route("/api/users/{telegram_user_id}", put(users::update_user))
        .route("/api/payments", get(users::list_payments))
        .route("/api/stories", get(stories::list_stories))
        .route("/api/stories/{id}", get(stories::get_story).put(stories::update_story))
        .route(
            "/api/withdrawals",
            get(withdrawals::list_withdrawals).post(withdrawals::create_withdrawal),
        )
        .route("/api/withdrawals/{id}", put(withdrawals::update_status))
        .route("/api/withdrawals/{id}/cancel", post(withdrawals::cancel_withdrawal))
        .route("/api/statistics/dashboard", get(statistics::dashboard))
        .route("/api/statistics/partner", get(statistics::partner))
        .route("/healthz", get(healthz))
        .fallback(views::not_found)
        .layer(middleware::from_fn_with_state(state.clone(), guard::route_guard))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

// =============================================================================
// ERRORS
// =============================================================================

/// Backend failure surfaced by a JSON route as `{ "error": message }`.
#[derive(Debug)]
pub struct RouteError(ApiError);

impl From<ApiError> for RouteError {
    fn from(error: ApiError) -> Self {
        Self(error)
    }
}

impl IntoResponse for RouteError {
    fn into_response(self) -> Response {
        let status = error_status(&self.0);
        if status.is_server_error() {
            tracing::error!(error = %self.0, %status, "backend call failed");
        } else {
            tracing::debug!(error = %self.0, %status, "backend call rejected");
        }
        (status, Json(json!({ "error": self.0.message() }))).into_response()
    }
}

/// Backend statuses pass through; a backend that could not be reached or
/// answered garbage is a bad gateway.
pub(crate) fn error_status(error: &ApiError) -> StatusCode {
    match error {
        ApiError::Status { status, .. } => StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY),
        ApiError::Validation(_) => StatusCode::BAD_REQUEST,
        ApiError::Transport(_) | ApiError::Decode(_) => StatusCode::BAD_GATEWAY,
        ApiError::InvalidUrl(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
