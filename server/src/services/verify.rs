//! Credential verification for access tokens.
//!
//! DESIGN
//! ======
//! Access tokens are HMAC-signed JWTs issued by the backend with claims
//! `{ id, aud, iat, exp }`. The backend puts the role in `aud`, so audience
//! validation is disabled here; checking it would reject every token.
//! Expiry is enforced with zero leeway.
//!
//! The role claim is closed at this boundary: a token whose role is neither
//! `ADMIN` nor `PARTNER` fails verification and the guard treats the caller
//! as unauthenticated.

use api::Role;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, get_current_timestamp};
use serde::{Deserialize, Serialize};

const HMAC_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

/// Claims as they appear on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub id: i64,
    pub aud: String,
    #[serde(default)]
    pub iat: i64,
    pub exp: i64,
}

/// A verified session. Rebuilt from the token on every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub subject_id: i64,
    pub role: Role,
    pub issued_at: i64,
    pub expires_at: i64,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum VerifyError {
    #[error("token expired")]
    Expired,
    #[error("token signature is invalid")]
    InvalidSignature,
    #[error("token is malformed: {0}")]
    Malformed(String),
    #[error("unrecognized role claim: {0}")]
    UnrecognizedRole(String),
}

pub struct Verifier {
    key: DecodingKey,
    validation: Validation,
}

impl Verifier {
    #[must_use]
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = HMAC_ALGORITHMS.to_vec();
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Check signature and expiry, then map the claims to a [`Session`].
    pub fn verify(&self, token: &str) -> Result<Session, VerifyError> {
        let data = decode::<TokenClaims>(token, &self.key, &self.validation).map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => VerifyError::Expired,
            ErrorKind::InvalidSignature => VerifyError::InvalidSignature,
            _ => VerifyError::Malformed(e.to_string()),
        })?;
        let claims = data.claims;

        let role = Role::from_claim(&claims.aud).ok_or(VerifyError::UnrecognizedRole(claims.aud))?;
        Ok(Session {
            subject_id: claims.id,
            role,
            issued_at: claims.iat,
            expires_at: claims.exp,
        })
    }
}

/// Seconds until the token's `exp`, read without checking the signature.
///
/// Only used to size the access cookie; never for authorization.
#[must_use]
pub fn remaining_lifetime(token: &str) -> Option<i64> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.algorithms = HMAC_ALGORITHMS.to_vec();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.set_required_spec_claims(&["exp"]);

    let data = decode::<TokenClaims>(token, &DecodingKey::from_secret(&[]), &validation).ok()?;
    let now = i64::try_from(get_current_timestamp()).ok()?;
    Some(data.claims.exp - now)
}

#[cfg(test)]
#[path = "verify_test.rs"]
mod tests;
