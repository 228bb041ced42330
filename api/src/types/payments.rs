use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: i64,
    pub telegram_user_id: i64,
    pub telegram_payment_id: String,
    pub amount: f64,
    pub currency: String,
    pub status: String,
    pub description: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub completed_at: Option<String>,
    #[serde(default)]
    pub used_for_subscription: bool,
    pub partner_id: Option<i64>,
    pub partner_commission_amount: Option<f64>,
}
