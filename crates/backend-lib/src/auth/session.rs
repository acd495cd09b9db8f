// ============================
// crates/backend-lib/src/auth/session.rs
// ============================
//! Signed, stateless session tokens.
//!
//! A token is an HS256 JWT over the user id. It carries its own `exp`
//! claim so a replayed token dies with the cookie that carried it.
use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use shopfront_common::UserId;
use std::time::Duration;

use crate::error::AppError;

/// Session TTL (time to live)
pub const SESSION_TTL: Duration = Duration::from_secs(60 * 60 * 24 * 365); // 365 days

/// Claims carried by a session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: UserId,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies session tokens with the application secret
#[derive(Clone)]
pub struct SessionTokens {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl SessionTokens {
    pub fn new(secret: &SecretString) -> Self {
        let secret = secret.expose_secret().as_bytes();
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Issue a token for `user_id`, valid for [`SESSION_TTL`] from now
    pub fn issue(&self, user_id: UserId) -> Result<String, AppError> {
        self.issue_at(user_id, Utc::now())
    }

    /// Issue a token as if it had been created at `issued_at`
    pub fn issue_at(&self, user_id: UserId, issued_at: DateTime<Utc>) -> Result<String, AppError> {
        let iat = issued_at.timestamp();
        let claims = Claims {
            user_id,
            iat,
            exp: iat + SESSION_TTL.as_secs() as i64,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("failed to sign session token: {e}")))
    }

    /// Decode a token and return the user id it was issued for
    pub fn verify(&self, token: &str) -> Result<UserId, AppError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims.user_id)
            .map_err(|e| {
                tracing::debug!("rejected session token: {e}");
                AppError::Unauthenticated
            })
    }
}
