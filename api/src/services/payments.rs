use crate::client::{ApiClient, ApiRequest};
use crate::error::ApiError;
use crate::types::payments::Payment;
use crate::types::{DEFAULT_PAGE_SIZE, ListQuery, Paged};

const PAYMENTS: &str = "/admin/payments";

/// Paginated payments, optionally only those attributed to one partner.
pub async fn list_payments(client: &ApiClient, query: &ListQuery) -> Result<Paged<Payment>, ApiError> {
    let request = query.apply(ApiRequest::get(PAYMENTS), DEFAULT_PAGE_SIZE);
    client.send_json(&request).await
}
