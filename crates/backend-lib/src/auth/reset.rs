// ============================
// crates/backend-lib/src/auth/reset.rs
// ============================
//! Single-use password-reset tokens.
//!
//! A token is stored on the user together with its expiry. There is no
//! separate consume step: the caller clears the token in the same update
//! that writes the new password.
use chrono::{DateTime, Duration, Utc};
use shopfront_common::{ResetToken, User};

use super::token_generator::generate_secure_token;
use crate::error::AppError;
use crate::storage::Storage;

/// Reset token lifetime in seconds (1 hour)
pub const RESET_TOKEN_TTL_SECS: i64 = 60 * 60;

/// Create a fresh reset token expiring one hour after `now`
pub fn generate_reset_token(now: DateTime<Utc>) -> ResetToken {
    ResetToken {
        token: generate_secure_token(),
        expires_at: now + Duration::seconds(RESET_TOKEN_TTL_SECS),
    }
}

/// Find the user a reset token was issued to.
///
/// Tokens are not unique-indexed, so every holder is fetched and filtered by
/// expiry. Fails with `NotFound` when nobody holds the token and with
/// `ExpiredOrInvalidToken` when every holder's token has lapsed.
pub async fn consume_reset_token(
    storage: &dyn Storage,
    token: &str,
    now: DateTime<Utc>,
) -> Result<User, AppError> {
    if token.is_empty() {
        return Err(AppError::NotFound("reset token".to_string()));
    }

    let holders = storage.users_by_reset_token(token).await?;
    if holders.is_empty() {
        return Err(AppError::NotFound("reset token".to_string()));
    }

    holders
        .into_iter()
        .find(|user| user.reset_token.as_ref().is_some_and(|t| t.is_live_at(now)))
        .ok_or(AppError::ExpiredOrInvalidToken)
}
