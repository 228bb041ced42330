use crate::client::{ApiClient, ApiRequest};
use crate::error::ApiError;
use crate::types::stories::{BulkUpdateResult, Story, StoryUpdate};
use crate::types::{DEFAULT_PAGE_SIZE, ListQuery, Paged};

const STORIES: &str = "/stories";
const BULK_UPLOAD_FIELD: &str = "file";
const BULK_UPDATE_FAILED: &str = "Bulk update failed";

pub async fn list_stories(client: &ApiClient, query: &ListQuery) -> Result<Paged<Story>, ApiError> {
    let query = ListQuery {
        partner_id: None,
        ..query.clone()
    };
    let request = query.apply(ApiRequest::get(STORIES), DEFAULT_PAGE_SIZE);
    client.send_json(&request).await
}

/// Single story, or `None` when it cannot be loaded.
pub async fn get_story(client: &ApiClient, story_id: &str) -> Option<Story> {
    match client.send_json(&ApiRequest::get(format!("{STORIES}/{story_id}"))).await {
        Ok(story) => Some(story),
        Err(error) => {
            tracing::debug!(error = %error, story_id, "story lookup failed");
            None
        }
    }
}

pub async fn update_story(client: &ApiClient, story_id: &str, update: &StoryUpdate) -> Result<(), ApiError> {
    let request = ApiRequest::put(format!("{STORIES}/{story_id}")).json(update)?;
    client.send(&request).await?;
    Ok(())
}

/// Replace the story set from an uploaded file.
///
/// Never fails: an upload error comes back as an unsuccessful result with
/// zero counters and the backend's explanation when it gave one.
pub async fn bulk_update_from_file(client: &ApiClient, file_name: &str, bytes: Vec<u8>) -> BulkUpdateResult {
    let request = ApiRequest::post(format!("{STORIES}/bulk-update")).file(BULK_UPLOAD_FIELD, file_name, bytes);
    match client.send_json::<BulkUpdateResult>(&request).await {
        Ok(result) => result,
        Err(error) => {
            tracing::warn!(error = %error, file_name, "story bulk update failed");
            BulkUpdateResult::failed(error.server_message().unwrap_or(BULK_UPDATE_FAILED))
        }
    }
}
