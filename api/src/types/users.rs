use serde::{Deserialize, Serialize};

use super::double_option;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub telegram_chat_id: i64,
    pub telegram_user_id: i64,
    pub first_name: String,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub account_status: String,
    #[serde(default)]
    pub birth_date: String,
    #[serde(default)]
    pub birth_time: String,
    #[serde(default)]
    pub birth_city: String,
    #[serde(default)]
    pub birth_country: String,
    pub zodiac_sign: Option<String>,
    pub matrix_of_cosmic_angles: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub subscription_start: Option<String>,
    pub subscription_end: Option<String>,
    pub partner_id: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountStatus {
    Basic,
    Premium,
}

/// Per-user update. Subscription dates distinguish "leave alone" (`None`)
/// from "clear" (`Some(None)`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_status: Option<AccountStatus>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub subscription_start: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub subscription_end: Option<Option<String>>,
}
