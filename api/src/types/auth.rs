use serde::{Deserialize, Serialize};

/// Closed set of console roles. Parsed only through [`Role::from_claim`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Partner,
}

impl Role {
    /// Parse a role claim. Anything but `ADMIN` or `PARTNER` is unrecognized.
    #[must_use]
    pub fn from_claim(raw: &str) -> Option<Self> {
        match raw {
            "ADMIN" => Some(Self::Admin),
            "PARTNER" => Some(Self::Partner),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Partner => "PARTNER",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Console account as returned by login and refresh.
///
/// `role` stays a raw string so an unknown role survives decoding and can be
/// routed to the login page instead of failing the whole response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminUser {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    pub last_login_at: Option<String>,
    pub role: String,
}

impl AdminUser {
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        Role::from_claim(&self.role)
    }
}

/// `/admin/profile`: the account plus partner fields, absent for admins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminProfile {
    #[serde(flatten)]
    pub user: AdminUser,
    pub partner_code: Option<String>,
    pub commission_rate: Option<f64>,
    pub is_active: Option<bool>,
    pub ton_wallet_address: Option<String>,
    pub total_referrals: Option<i64>,
    pub total_earnings: Option<f64>,
    pub referral_balance: Option<f64>,
}
