//! User and payment endpoints.

use api::query::resource;
use api::services::{payments, users};
use api::types::payments::Payment;
use api::types::users::{User, UserUpdate};
use api::types::{ListQuery, Paged};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;

use super::RouteError;
use crate::services::session::BackendSession;
use crate::state::AppState;

/// `GET /api/users`
pub async fn list_users(backend: BackendSession, Query(query): Query<ListQuery>) -> Result<Json<Paged<User>>, RouteError> {
    Ok(Json(users::list_users(&backend.client, &query).await?))
}

/// `PUT /api/users/{telegram_user_id}`
pub async fn update_user(
    State(state): State<AppState>,
    backend: BackendSession,
    Path(telegram_user_id): Path<i64>,
    Json(update): Json<UserUpdate>,
) -> Result<StatusCode, RouteError> {
    users::update_user(&backend.client, telegram_user_id, &update).await?;
    state.queries.invalidate(resource::USERS);
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/payments`
pub async fn list_payments(
    backend: BackendSession,
    Query(query): Query<ListQuery>,
) -> Result<Json<Paged<Payment>>, RouteError> {
    Ok(Json(payments::list_payments(&backend.client, &query).await?))
}
