//! Story content endpoints.

use api::query::resource;
use api::services::stories;
use api::types::stories::{Story, StoryUpdate};
use api::types::{ListQuery, Paged};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

use super::RouteError;
use crate::services::session::BackendSession;
use crate::state::AppState;

/// `GET /api/stories`
pub async fn list_stories(
    backend: BackendSession,
    Query(query): Query<ListQuery>,
) -> Result<Json<Paged<Story>>, RouteError> {
    Ok(Json(stories::list_stories(&backend.client, &query).await?))
}

/// `GET /api/stories/{id}`, 404 when the story cannot be loaded.
pub async fn get_story(backend: BackendSession, Path(id): Path<String>) -> Response {
    match stories::get_story(&backend.client, &id).await {
        Some(story) => Json(story).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({ "error": "Story not found" }))).into_response(),
    }
}

/// `PUT /api/stories/{id}`
pub async fn update_story(
    State(state): State<AppState>,
    backend: BackendSession,
    Path(id): Path<String>,
    Json(update): Json<StoryUpdate>,
) -> Result<StatusCode, RouteError> {
    stories::update_story(&backend.client, &id, &update).await?;
    state.queries.invalidate(resource::STORIES);
    Ok(StatusCode::NO_CONTENT)
}
