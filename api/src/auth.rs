//! Login, refresh and logout against the backend's `/auth` endpoints.
//!
//! All three use the unauthenticated path of [`ApiClient`]; the refresh
//! credential rides along as a forwarded cookie. The `sign_in`/`sign_out`
//! wrappers turn the raw outcomes into what the console shows: where to go
//! next and a notice for the user.

use serde::{Deserialize, Serialize};

use crate::client::{ApiClient, ApiRequest};
use crate::error::ApiError;
use crate::pages::{self, home_for};
use crate::types::auth::AdminUser;

const LOGIN_PATH: &str = "/auth/login";
const REFRESH_PATH: &str = "/auth/refresh";
const LOGOUT_PATH: &str = "/auth/logout";

/// Backend messages meaning the refresh cookie never arrived.
const MISSING_REFRESH_MARKERS: &[&str] = &["refresh token отсутствует", "refresh token missing"];
/// Backend messages meaning the refresh cookie is expired or revoked.
const INVALID_REFRESH_MARKERS: &[&str] = &[
    "недействительный refresh_token",
    "invalid refresh token",
    "invalid refresh_token",
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.username.trim().is_empty() {
            return Err(ApiError::Validation("Username is required".to_owned()));
        }
        if self.password.is_empty() {
            return Err(ApiError::Validation("Password is required".to_owned()));
        }
        Ok(())
    }
}

/// Body of a successful login or refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    #[serde(default)]
    pub user: Option<AdminUser>,
}

#[derive(Debug, thiserror::Error)]
pub enum RefreshError {
    #[error("refresh token is missing")]
    MissingRefreshToken,
    #[error("refresh token is invalid or expired")]
    InvalidRefreshToken,
    #[error("refresh failed: {0}")]
    Api(#[source] ApiError),
}

impl RefreshError {
    /// Whether the failure proves the session is gone, as opposed to a
    /// transient backend or network problem.
    #[must_use]
    pub fn invalidates_session(&self) -> bool {
        matches!(self, Self::MissingRefreshToken | Self::InvalidRefreshToken)
    }

    pub(crate) fn classify(error: ApiError) -> Self {
        let Some(message) = error.server_message() else {
            return Self::Api(error);
        };
        let lowered = message.to_lowercase();
        if MISSING_REFRESH_MARKERS.iter().any(|m| lowered.contains(m)) {
            Self::MissingRefreshToken
        } else if INVALID_REFRESH_MARKERS.iter().any(|m| lowered.contains(m)) {
            Self::InvalidRefreshToken
        } else {
            Self::Api(error)
        }
    }
}

// =============================================================================
// EXCHANGES
// =============================================================================

/// Log in with username and password; saves the returned access credential.
pub async fn login(client: &ApiClient, form: &LoginForm) -> Result<AuthResponse, ApiError> {
    form.validate()?;
    let request = ApiRequest::post(LOGIN_PATH).json(form)?;
    let auth: AuthResponse = client.send_public_json(&request).await?;
    if !auth.access_token.is_empty() {
        client.tokens().save_access_token(&auth.access_token);
    }
    Ok(auth)
}

/// Exchange the refresh credential for a new access credential.
pub async fn refresh(client: &ApiClient) -> Result<AuthResponse, RefreshError> {
    let auth: AuthResponse = client
        .send_public_json(&ApiRequest::post(REFRESH_PATH))
        .await
        .map_err(RefreshError::classify)?;
    if auth.access_token.is_empty() {
        return Err(RefreshError::Api(ApiError::Decode(
            "refresh response carried no access token".to_owned(),
        )));
    }
    client.tokens().save_access_token(&auth.access_token);
    Ok(auth)
}

/// Invalidate the refresh credential server-side, then drop the local one.
pub async fn logout(client: &ApiClient) -> Result<(), ApiError> {
    client.send_public(&ApiRequest::post(LOGOUT_PATH)).await?;
    client.tokens().remove_access_token();
    Ok(())
}

// =============================================================================
// USER-FACING OUTCOMES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Toast-style message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SignIn {
    /// Where to navigate; `None` keeps the user on the login form.
    pub redirect: Option<&'static str>,
    pub notice: Notice,
    pub user: Option<AdminUser>,
}

impl SignIn {
    #[must_use]
    pub fn from_result(result: Result<AuthResponse, ApiError>) -> Self {
        match result {
            Ok(auth) => {
                let role = auth.user.as_ref().and_then(AdminUser::role);
                if role.is_none() {
                    tracing::warn!(
                        role = auth.user.as_ref().map_or("<none>", |u| u.role.as_str()),
                        "login returned an unrecognized role"
                    );
                }
                Self {
                    redirect: Some(home_for(role)),
                    notice: Notice::success("Signed in"),
                    user: auth.user,
                }
            }
            Err(error) => {
                tracing::warn!(error = %error, "login failed");
                Self {
                    redirect: None,
                    notice: Notice::error(login_error_message(&error)),
                    user: None,
                }
            }
        }
    }
}

/// Log in and decide where the user goes next.
pub async fn sign_in(client: &ApiClient, form: &LoginForm) -> SignIn {
    SignIn::from_result(login(client, form).await)
}

#[derive(Debug, Clone, Serialize)]
pub struct SignOut {
    pub redirect: &'static str,
    pub notice: Notice,
}

/// Log out. The user always ends up on the login page without a local
/// access credential, whatever the backend said.
pub async fn sign_out(client: &ApiClient) -> SignOut {
    let notice = match logout(client).await {
        Ok(()) => Notice::success("Signed out"),
        Err(error) => {
            tracing::warn!(error = %error, "logout failed");
            client.tokens().remove_access_token();
            Notice::error("Sign-out failed")
        }
    };
    SignOut {
        redirect: pages::LOGIN,
        notice,
    }
}

/// Map a login failure to the message shown on the login form.
#[must_use]
pub fn login_error_message(error: &ApiError) -> String {
    match error.status() {
        Some(401) => return "Invalid credentials".to_owned(),
        Some(400) => return "Invalid data format".to_owned(),
        Some(500) => return "Server error. Try again later".to_owned(),
        Some(404) => return "Service unavailable".to_owned(),
        _ => {}
    }
    if let Some(message) = error.server_message() {
        return message.to_owned();
    }
    match error {
        ApiError::Transport(_) => "Could not connect to the server".to_owned(),
        ApiError::Validation(message) => message.clone(),
        _ => "Login failed".to_owned(),
    }
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
