use crate::client::{ApiClient, ApiRequest};
use crate::error::ApiError;
use crate::types::users::{User, UserUpdate};
use crate::types::{DEFAULT_PAGE_SIZE, ListQuery, Paged};

const USERS: &str = "/admin/users";

pub async fn list_users(client: &ApiClient, query: &ListQuery) -> Result<Paged<User>, ApiError> {
    let request = query.apply(ApiRequest::get(USERS), DEFAULT_PAGE_SIZE);
    client.send_json(&request).await
}

/// Change a user's account status or subscription window.
pub async fn update_user(client: &ApiClient, telegram_user_id: i64, update: &UserUpdate) -> Result<(), ApiError> {
    let request = ApiRequest::put(format!("{USERS}/{telegram_user_id}")).json(update)?;
    client.send(&request).await?;
    Ok(())
}
