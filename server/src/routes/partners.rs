//! Profile and partner management endpoints.

use api::query::resource;
use api::services::admins;
use api::types::ListQuery;
use api::types::auth::AdminProfile;
use api::types::partners::{CreatePartner, DeletedPartner, Partner, PartnerList, UpdatePartner};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;

use super::RouteError;
use crate::services::session::BackendSession;
use crate::state::AppState;

/// Partner changes also show up in profiles.
fn invalidate(state: &AppState) {
    state.queries.invalidate(resource::PARTNERS);
    state.queries.invalidate(resource::PROFILE);
}

/// `GET /api/profile`
pub async fn profile(backend: BackendSession) -> Result<Json<AdminProfile>, RouteError> {
    Ok(Json(admins::profile(&backend.client).await?))
}

/// `GET /api/partners`
pub async fn list_partners(
    backend: BackendSession,
    Query(query): Query<ListQuery>,
) -> Result<Json<PartnerList>, RouteError> {
    Ok(Json(admins::list_partners(&backend.client, &query).await?))
}

/// `GET /api/partners/{id}`
pub async fn get_partner(backend: BackendSession, Path(id): Path<i64>) -> Result<Json<Partner>, RouteError> {
    Ok(Json(admins::get_partner(&backend.client, id).await?))
}

/// `POST /api/partners`
pub async fn create_partner(
    State(state): State<AppState>,
    backend: BackendSession,
    Json(form): Json<CreatePartner>,
) -> Result<(StatusCode, Json<Partner>), RouteError> {
    let partner = admins::create_partner(&backend.client, &form).await?;
    invalidate(&state);
    tracing::info!(partner_id = partner.id, "partner created");
    Ok((StatusCode::CREATED, Json(partner)))
}

/// `PUT /api/partners/{id}`
pub async fn update_partner(
    State(state): State<AppState>,
    backend: BackendSession,
    Path(id): Path<i64>,
    Json(update): Json<UpdatePartner>,
) -> Result<Json<Partner>, RouteError> {
    let partner = admins::update_partner(&backend.client, id, &update).await?;
    invalidate(&state);
    Ok(Json(partner))
}

/// `PATCH /api/partners/{id}/toggle`
pub async fn toggle_partner(
    State(state): State<AppState>,
    backend: BackendSession,
    Path(id): Path<i64>,
) -> Result<Json<Partner>, RouteError> {
    let partner = admins::toggle_partner(&backend.client, id).await?;
    invalidate(&state);
    tracing::info!(partner_id = id, active = ?partner.is_active, "partner toggled");
    Ok(Json(partner))
}

/// `DELETE /api/partners/{id}`
pub async fn delete_partner(
    State(state): State<AppState>,
    backend: BackendSession,
    Path(id): Path<i64>,
) -> Result<Json<DeletedPartner>, RouteError> {
    let deleted = admins::delete_partner(&backend.client, id).await?;
    invalidate(&state);
    tracing::info!(partner_id = id, "partner deleted");
    Ok(Json(deleted))
}

/// `PUT /api/partners/me/profile`
pub async fn update_own_profile(
    State(state): State<AppState>,
    backend: BackendSession,
    Json(update): Json<UpdatePartner>,
) -> Result<Json<Partner>, RouteError> {
    let partner = admins::update_own_profile(&backend.client, &update).await?;
    invalidate(&state);
    Ok(Json(partner))
}

#[cfg(test)]
#[path = "partners_test.rs"]
mod tests;
