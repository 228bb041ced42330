use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Wallet address prefixes accepted for payouts.
pub const WALLET_PREFIXES: [&str; 2] = ["UQ", "EQ"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WithdrawalStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    Cancelled,
}

impl WithdrawalStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Processing => "PROCESSING",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

/// List filter. `All` means "no status parameter".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Processing,
    Completed,
    Failed,
    Cancelled,
}

impl StatusFilter {
    #[must_use]
    pub fn status(self) -> Option<WithdrawalStatus> {
        match self {
            Self::All => None,
            Self::Pending => Some(WithdrawalStatus::Pending),
            Self::Processing => Some(WithdrawalStatus::Processing),
            Self::Completed => Some(WithdrawalStatus::Completed),
            Self::Failed => Some(WithdrawalStatus::Failed),
            Self::Cancelled => Some(WithdrawalStatus::Cancelled),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Withdrawal {
    pub id: i64,
    pub partner_id: i64,
    pub partner_name: Option<String>,
    pub partner_code: Option<String>,
    pub stars_amount: f64,
    pub ton_stars_rate: f64,
    pub ton_amount: f64,
    pub ton_wallet_address: String,
    pub status: WithdrawalStatus,
    pub description: Option<String>,
    pub error_message: Option<String>,
    pub ton_transaction_hash: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub processed_at: Option<String>,
    pub completed_at: Option<String>,
}

/// Query parameters for the withdrawal list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WithdrawalQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default)]
    pub status: StatusFilter,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithdrawalRequest {
    pub partner_id: i64,
    pub stars_amount: f64,
    pub ton_wallet_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl WithdrawalRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.partner_id <= 0 {
            return Err(ApiError::Validation("Partner is required".to_owned()));
        }
        if !self.stars_amount.is_finite() || self.stars_amount <= 0.0 {
            return Err(ApiError::Validation("Amount must be greater than zero".to_owned()));
        }
        let wallet = self.ton_wallet_address.trim();
        if wallet.is_empty() {
            return Err(ApiError::Validation("Wallet address is required".to_owned()));
        }
        if !WALLET_PREFIXES.iter().any(|prefix| wallet.starts_with(prefix)) {
            return Err(ApiError::Validation(
                "Wallet address must start with UQ or EQ".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Status change for an existing withdrawal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: WithdrawalStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ton_transaction_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl StatusUpdate {
    /// Drop blank optional fields.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let keep = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
        };
        Self {
            status: self.status,
            ton_transaction_hash: keep(&self.ton_transaction_hash),
            error_message: keep(&self.error_message),
        }
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        match self.status {
            WithdrawalStatus::Cancelled => Err(ApiError::Validation(
                "Use cancel to cancel a withdrawal".to_owned(),
            )),
            WithdrawalStatus::Completed
                if self
                    .ton_transaction_hash
                    .as_deref()
                    .is_none_or(|hash| hash.trim().is_empty()) =>
            {
                Err(ApiError::Validation(
                    "Transaction hash is required for completed withdrawals".to_owned(),
                ))
            }
            _ => Ok(()),
        }
    }
}
