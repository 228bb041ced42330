use serde::{Deserialize, Serialize};

use crate::error::ApiError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Partner {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    #[serde(default)]
    pub role: String,
    pub partner_code: Option<String>,
    pub commission_rate: Option<f64>,
    pub is_active: Option<bool>,
    pub ton_wallet_address: Option<String>,
    pub total_referrals: Option<i64>,
    pub total_earnings: Option<f64>,
    pub referral_balance: Option<f64>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    pub last_login_at: Option<String>,
}

/// `/admin/partners` list envelope. Unlike the other lists it has no `pages`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartnerList {
    pub partners: Vec<Partner>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreatePartner {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    pub partner_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commission_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ton_wallet_address: Option<String>,
}

impl CreatePartner {
    /// Trim every text field and drop optional ones left blank.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let trim_opt = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
        };
        Self {
            username: self.username.trim().to_owned(),
            email: self.email.trim().to_owned(),
            password: self.password.trim().to_owned(),
            first_name: self.first_name.trim().to_owned(),
            last_name: trim_opt(&self.last_name),
            bio: trim_opt(&self.bio),
            partner_code: self.partner_code.trim().to_owned(),
            commission_rate: self.commission_rate,
            ton_wallet_address: trim_opt(&self.ton_wallet_address),
        }
    }

    /// Required fields must be present after trimming; email needs an `@`.
    pub fn validate(&self) -> Result<(), ApiError> {
        let required = [
            ("Username", &self.username),
            ("Email", &self.email),
            ("Password", &self.password),
            ("First name", &self.first_name),
            ("Partner code", &self.partner_code),
        ];
        for (label, value) in required {
            if value.trim().is_empty() {
                return Err(ApiError::Validation(format!("{label} is required")));
            }
        }
        if !self.email.contains('@') {
            return Err(ApiError::Validation("Email is invalid".to_owned()));
        }
        Ok(())
    }
}

/// Partial update; unset fields are left out of the request body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdatePartner {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partner_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commission_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ton_wallet_address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletedPartner {
    pub message: String,
    pub id: i64,
}
