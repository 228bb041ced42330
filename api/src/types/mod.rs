//! Backend record types.
//!
//! These mirror the backend's JSON shapes. The console passes them through to
//! the views without interpreting most fields; only the pieces that drive
//! routing (`role`) or client-side validation get behavior here.

pub mod auth;
pub mod partners;
pub mod payments;
pub mod statistics;
pub mod stories;
pub mod users;
pub mod withdrawals;

use serde::{Deserialize, Deserializer, Serialize};

use crate::client::ApiRequest;

/// Default page size for paginated lists.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Standard paginated envelope (`items`, `total`, `page`, `page_size`, `pages`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    #[serde(default)]
    pub pages: u32,
}

/// Paging and filtering shared by the list endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partner_id: Option<i64>,
}

impl ListQuery {
    #[must_use]
    pub fn page(page: u32) -> Self {
        Self {
            page: Some(page),
            ..Self::default()
        }
    }

    /// Restrict to records attributed to one partner.
    #[must_use]
    pub fn for_partner(mut self, partner_id: i64) -> Self {
        self.partner_id = Some(partner_id);
        self
    }

    /// Search text with surrounding whitespace removed; blank means none.
    #[must_use]
    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    /// Add `page`, `page_size`, `search` and `partner_id` to a request.
    ///
    /// Blank search text and a zero partner id are left off.
    pub(crate) fn apply(&self, request: ApiRequest, default_page_size: u32) -> ApiRequest {
        let request = request
            .query("page", self.page.unwrap_or(1).max(1))
            .query("page_size", self.page_size.unwrap_or(default_page_size))
            .query_opt("search", self.search_term());
        request.query_opt("partner_id", self.partner_id.filter(|id| *id != 0))
    }
}

/// Distinguish an absent field (`None`) from an explicit `null` (`Some(None)`).
pub(crate) fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
