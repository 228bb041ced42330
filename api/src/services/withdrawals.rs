use crate::client::{ApiClient, ApiRequest};
use crate::error::ApiError;
use crate::types::withdrawals::{StatusUpdate, Withdrawal, WithdrawalQuery, WithdrawalRequest};
use crate::types::{DEFAULT_PAGE_SIZE, Paged};

const WITHDRAWALS: &str = "/withdrawals";

/// Paginated withdrawals. The `All` filter sends no status parameter.
pub async fn list_withdrawals(client: &ApiClient, query: &WithdrawalQuery) -> Result<Paged<Withdrawal>, ApiError> {
    let search = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let request = ApiRequest::get(WITHDRAWALS)
        .query("page", query.page.unwrap_or(1).max(1))
        .query("page_size", query.page_size.unwrap_or(DEFAULT_PAGE_SIZE))
        .query_opt("search", search)
        .query_opt("status", query.status.status().map(|s| s.as_str()));
    client.send_json(&request).await
}

pub async fn create_withdrawal(client: &ApiClient, request: &WithdrawalRequest) -> Result<Withdrawal, ApiError> {
    request.validate()?;
    client
        .send_json(&ApiRequest::post(WITHDRAWALS).json(request)?)
        .await
}

pub async fn update_status(client: &ApiClient, withdrawal_id: i64, update: &StatusUpdate) -> Result<Withdrawal, ApiError> {
    let update = update.normalized();
    update.validate()?;
    let request = ApiRequest::put(format!("{WITHDRAWALS}/{withdrawal_id}")).json(&update)?;
    client.send_json(&request).await
}

pub async fn cancel_withdrawal(client: &ApiClient, withdrawal_id: i64) -> Result<(), ApiError> {
    client
        .send(&ApiRequest::post(format!("{WITHDRAWALS}/{withdrawal_id}/cancel")))
        .await?;
    Ok(())
}
