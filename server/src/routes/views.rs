//! Page views.
//!
//! Each guarded page answers a `{ page, session, data }` document. Reads go
//! through the shared query cache scoped to the caller, and a failed read
//! becomes an inline `{ status: "error", message }` rather than a failed
//! page.

use std::future::Future;

use api::ApiError;
use api::pages::{self, admin, partner};
use api::query::{Loadable, QueryKey, resource};
use api::services::{admins, payments, statistics, stories, users, withdrawals};
use api::types::ListQuery;
use api::types::auth::AdminProfile;
use api::types::statistics::PartnerStatistics;
use api::types::withdrawals::WithdrawalQuery;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::services::session::BackendSession;
use crate::services::verify::Session;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct PageView<T> {
    pub page: &'static str,
    pub session: Option<Session>,
    pub data: T,
}

fn view<T>(page: &'static str, backend: &BackendSession, data: T) -> Json<PageView<T>> {
    Json(PageView {
        page,
        session: backend.session.clone(),
        data,
    })
}

/// Cached read scoped to the caller.
async fn load<T, F, Fut>(
    state: &AppState,
    backend: &BackendSession,
    resource: &'static str,
    params: &impl Serialize,
    fetch: F,
) -> Loadable<T>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let params = serde_json::to_string(params).unwrap_or_default();
    let key = QueryKey::new(backend.scope(), resource, params);
    Loadable::from_result(state.queries.fetch(key, fetch).await)
}

// =============================================================================
// PUBLIC
// =============================================================================

/// `GET /login`, reachable only without a session.
pub async fn login(backend: BackendSession) -> Json<PageView<()>> {
    view(pages::LOGIN, &backend, ())
}

/// `GET /not-found` and the router fallback.
pub async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "page": pages::NOT_FOUND, "error": "Page not found" })),
    )
        .into_response()
}

// =============================================================================
// ADMIN AREA
// =============================================================================

pub async fn admin_dashboard(State(state): State<AppState>, backend: BackendSession) -> impl IntoResponse {
    let data = load(&state, &backend, resource::DASHBOARD_STATISTICS, &(), || {
        statistics::dashboard(&backend.client)
    })
    .await;
    view(admin::HOME, &backend, data)
}

pub async fn admin_users(
    State(state): State<AppState>,
    backend: BackendSession,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    let data = load(&state, &backend, resource::USERS, &query, || users::list_users(&backend.client, &query)).await;
    view(admin::USERS, &backend, data)
}

pub async fn admin_partners(
    State(state): State<AppState>,
    backend: BackendSession,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    let data = load(&state, &backend, resource::PARTNERS, &query, || {
        admins::list_partners(&backend.client, &query)
    })
    .await;
    view(admin::PARTNERS, &backend, data)
}

pub async fn admin_payments(
    State(state): State<AppState>,
    backend: BackendSession,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    let data = load(&state, &backend, resource::PAYMENTS, &query, || {
        payments::list_payments(&backend.client, &query)
    })
    .await;
    view(admin::PAYMENTS, &backend, data)
}

pub async fn admin_stories(
    State(state): State<AppState>,
    backend: BackendSession,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    let data = load(&state, &backend, resource::STORIES, &query, || {
        stories::list_stories(&backend.client, &query)
    })
    .await;
    view(admin::STORIES, &backend, data)
}

pub async fn admin_withdrawals(
    State(state): State<AppState>,
    backend: BackendSession,
    Query(query): Query<WithdrawalQuery>,
) -> impl IntoResponse {
    let data = load(&state, &backend, resource::WITHDRAWALS, &query, || {
        withdrawals::list_withdrawals(&backend.client, &query)
    })
    .await;
    view(admin::WITHDRAWALS, &backend, data)
}

pub async fn admin_settings(State(state): State<AppState>, backend: BackendSession) -> impl IntoResponse {
    let data = load(&state, &backend, resource::PROFILE, &(), || admins::profile(&backend.client)).await;
    view(admin::SETTINGS, &backend, data)
}

// =============================================================================
// PARTNER AREA
// =============================================================================

#[derive(Debug, Serialize)]
pub struct PartnerHome {
    pub profile: Loadable<AdminProfile>,
    pub statistics: Loadable<PartnerStatistics>,
}

pub async fn partner_home(State(state): State<AppState>, backend: BackendSession) -> impl IntoResponse {
    let profile = load(&state, &backend, resource::PROFILE, &(), || admins::profile(&backend.client)).await;
    let statistics = load(&state, &backend, resource::PARTNER_STATISTICS, &(), || {
        statistics::partner(&backend.client)
    })
    .await;
    view(partner::HOME, &backend, PartnerHome { profile, statistics })
}

/// Restrict a list query to the signed-in partner.
fn own(query: ListQuery, backend: &BackendSession) -> ListQuery {
    match &backend.session {
        Some(session) => query.for_partner(session.subject_id),
        None => query,
    }
}

pub async fn partner_payments(
    State(state): State<AppState>,
    backend: BackendSession,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    let query = own(query, &backend);
    let data = load(&state, &backend, resource::PAYMENTS, &query, || {
        payments::list_payments(&backend.client, &query)
    })
    .await;
    view(partner::PAYMENTS, &backend, data)
}

pub async fn partner_referrals(
    State(state): State<AppState>,
    backend: BackendSession,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    let query = own(query, &backend);
    let data = load(&state, &backend, resource::USERS, &query, || users::list_users(&backend.client, &query)).await;
    view(partner::REFERRALS, &backend, data)
}

pub async fn partner_withdrawals(
    State(state): State<AppState>,
    backend: BackendSession,
    Query(query): Query<WithdrawalQuery>,
) -> impl IntoResponse {
    let data = load(&state, &backend, resource::WITHDRAWALS, &query, || {
        withdrawals::list_withdrawals(&backend.client, &query)
    })
    .await;
    view(partner::WITHDRAWALS, &backend, data)
}

pub async fn partner_settings(State(state): State<AppState>, backend: BackendSession) -> impl IntoResponse {
    let data = load(&state, &backend, resource::PROFILE, &(), || admins::profile(&backend.client)).await;
    view(partner::SETTINGS, &backend, data)
}

#[cfg(test)]
#[path = "views_test.rs"]
mod tests;
