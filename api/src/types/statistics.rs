use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub date: String,
    pub value: f64,
}

/// Admin dashboard aggregates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStatistics {
    pub total_revenue: f64,
    pub total_withdrawn_to_partners: f64,
    pub net_profit: f64,
    pub new_users_last_30_days: u64,
    pub total_users: u64,
    #[serde(default)]
    pub users_chart: Vec<ChartPoint>,
    #[serde(default)]
    pub payments_chart: Vec<ChartPoint>,
}

/// Partner-scoped charts; the backend derives the partner from the credential.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartnerStatistics {
    #[serde(default)]
    pub users_chart: Vec<ChartPoint>,
    #[serde(default)]
    pub payments_chart: Vec<ChartPoint>,
}
