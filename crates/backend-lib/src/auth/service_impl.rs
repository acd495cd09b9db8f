// =============
// crates/backend-lib/src/auth/service_impl.rs
// =============
use async_trait::async_trait;
use shopfront_common::UserId;
use zeroize::Zeroizing;

use super::{hash_password, verify_password, AuthService, SessionTokens};
use crate::error::AppError;

/// scrypt passwords and JWT session tokens
pub struct DefaultAuth {
    tokens: SessionTokens,
}

impl DefaultAuth {
    pub fn new(tokens: SessionTokens) -> Self {
        Self { tokens }
    }
}

#[async_trait]
impl AuthService for DefaultAuth {
    async fn hash_password(&self, plain: &str) -> Result<String, AppError> {
        // scrypt is CPU bound; keep it off the async workers
        let plain = Zeroizing::new(plain.to_owned());
        tokio::task::spawn_blocking(move || hash_password(&plain))
            .await
            .map_err(|e| AppError::Internal(format!("hashing task failed: {e}")))?
            .map_err(|e| AppError::Internal(format!("password hashing failed: {e}")))
    }

    async fn verify_password(&self, hash: &str, plain: &str) -> bool {
        let hash = hash.to_owned();
        let plain = Zeroizing::new(plain.to_owned());
        tokio::task::spawn_blocking(move || verify_password(&hash, &plain))
            .await
            .unwrap_or(false)
    }

    fn issue_session_token(&self, user_id: UserId) -> Result<String, AppError> {
        self.tokens.issue(user_id)
    }

    fn verify_session_token(&self, token: &str) -> Result<UserId, AppError> {
        self.tokens.verify(token)
    }
}
