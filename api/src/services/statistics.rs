use crate::client::{ApiClient, ApiRequest};
use crate::error::ApiError;
use crate::types::statistics::{DashboardStatistics, PartnerStatistics};

pub async fn dashboard(client: &ApiClient) -> Result<DashboardStatistics, ApiError> {
    client.send_json(&ApiRequest::get("/statistics/dashboard")).await
}

pub async fn partner(client: &ApiClient) -> Result<PartnerStatistics, ApiError> {
    client.send_json(&ApiRequest::get("/statistics/partner")).await
}
