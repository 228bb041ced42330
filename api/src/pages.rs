//! Page map: which paths are gated, and where each role lands.
//!
//! Areas match on whole path segments, so `/dashboard` gates
//! `/dashboard/users` but not `/dashboards`.

use crate::types::auth::Role;

pub const LOGIN: &str = "/login";
pub const NOT_FOUND: &str = "/not-found";

/// Administrator pages.
pub mod admin {
    pub const HOME: &str = "/dashboard";
    pub const USERS: &str = "/dashboard/users";
    pub const PAYMENTS: &str = "/dashboard/payments";
    pub const STORIES: &str = "/dashboard/stories";
    pub const PARTNERS: &str = "/dashboard/partners";
    pub const WITHDRAWALS: &str = "/dashboard/withdrawals";
    pub const SETTINGS: &str = "/dashboard/settings";
}

/// Partner pages.
pub mod partner {
    pub const HOME: &str = "/profile";
    pub const PAYMENTS: &str = "/profile/payments";
    pub const REFERRALS: &str = "/profile/referrals";
    pub const WITHDRAWALS: &str = "/profile/withdrawals";
    pub const SETTINGS: &str = "/profile/settings";
}

/// A gated section of the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Area {
    Login,
    Admin,
    Partner,
}

impl Area {
    /// Area a request path falls under, or `None` for ungated paths.
    #[must_use]
    pub fn for_path(path: &str) -> Option<Self> {
        if within(path, LOGIN) {
            Some(Self::Login)
        } else if within(path, admin::HOME) {
            Some(Self::Admin)
        } else if within(path, partner::HOME) {
            Some(Self::Partner)
        } else {
            None
        }
    }

    /// Role allowed into the area. The login area has none.
    #[must_use]
    pub fn required_role(self) -> Option<Role> {
        match self {
            Self::Login => None,
            Self::Admin => Some(Role::Admin),
            Self::Partner => Some(Role::Partner),
        }
    }
}

/// Landing page for a role; unrecognized roles go back to login.
#[must_use]
pub fn home_for(role: Option<Role>) -> &'static str {
    match role {
        Some(Role::Admin) => admin::HOME,
        Some(Role::Partner) => partner::HOME,
        None => LOGIN,
    }
}

fn within(path: &str, prefix: &str) -> bool {
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

#[cfg(test)]
#[path = "pages_test.rs"]
mod tests;
