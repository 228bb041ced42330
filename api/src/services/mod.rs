//! Typed wrappers over the backend endpoints, one module per resource.
//!
//! Every call goes through [`ApiClient::send`](crate::ApiClient::send), so
//! each one gets the bearer credential and the one-shot refresh. Input forms
//! are validated locally before anything is sent.

pub mod admins;
pub mod payments;
pub mod statistics;
pub mod stories;
pub mod users;
pub mod withdrawals;

#[cfg(test)]
#[path = "services_test.rs"]
mod tests;
