//! Payout request endpoints.

use api::query::resource;
use api::services::withdrawals;
use api::types::Paged;
use api::types::withdrawals::{StatusUpdate, Withdrawal, WithdrawalQuery, WithdrawalRequest};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;

use super::RouteError;
use crate::services::session::BackendSession;
use crate::state::AppState;

/// Status changes move payout totals, so the statistics go too.
fn invalidate_payouts(state: &AppState) {
    state.queries.invalidate(resource::WITHDRAWALS);
    state.queries.invalidate(resource::DASHBOARD_STATISTICS);
    state.queries.invalidate(resource::PARTNER_STATISTICS);
}

/// `GET /api/withdrawals`
pub async fn list_withdrawals(
    backend: BackendSession,
    Query(query): Query<WithdrawalQuery>,
) -> Result<Json<Paged<Withdrawal>>, RouteError> {
    Ok(Json(withdrawals::list_withdrawals(&backend.client, &query).await?))
}

/// `POST /api/withdrawals`
pub async fn create_withdrawal(
    State(state): State<AppState>,
    backend: BackendSession,
    Json(request): Json<WithdrawalRequest>,
) -> Result<(StatusCode, Json<Withdrawal>), RouteError> {
    let withdrawal = withdrawals::create_withdrawal(&backend.client, &request).await?;
    state.queries.invalidate(resource::WITHDRAWALS);
    tracing::info!(withdrawal_id = withdrawal.id, partner_id = withdrawal.partner_id, "withdrawal requested");
    Ok((StatusCode::CREATED, Json(withdrawal)))
}

/// `PUT /api/withdrawals/{id}`
pub async fn update_status(
    State(state): State<AppState>,
    backend: BackendSession,
    Path(id): Path<i64>,
    Json(update): Json<StatusUpdate>,
) -> Result<Json<Withdrawal>, RouteError> {
    let withdrawal = withdrawals::update_status(&backend.client, id, &update).await?;
    invalidate_payouts(&state);
    tracing::info!(withdrawal_id = id, status = withdrawal.status.as_str(), "withdrawal status changed");
    Ok(Json(withdrawal))
}

/// `POST /api/withdrawals/{id}/cancel`
pub async fn cancel_withdrawal(
    State(state): State<AppState>,
    backend: BackendSession,
    Path(id): Path<i64>,
) -> Result<StatusCode, RouteError> {
    withdrawals::cancel_withdrawal(&backend.client, id).await?;
    invalidate_payouts(&state);
    Ok(StatusCode::NO_CONTENT)
}
