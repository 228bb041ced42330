//! Aggregate metrics endpoints.

use api::services::statistics;
use api::types::statistics::{DashboardStatistics, PartnerStatistics};
use axum::response::Json;

use super::RouteError;
use crate::services::session::BackendSession;

/// `GET /api/statistics/dashboard`
pub async fn dashboard(backend: BackendSession) -> Result<Json<DashboardStatistics>, RouteError> {
    Ok(Json(statistics::dashboard(&backend.client).await?))
}

/// `GET /api/statistics/partner`
pub async fn partner(backend: BackendSession) -> Result<Json<PartnerStatistics>, RouteError> {
    Ok(Json(statistics::partner(&backend.client).await?))
}
