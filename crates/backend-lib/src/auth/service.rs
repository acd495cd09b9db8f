// =============
// crates/backend-lib/src/auth/service.rs
// =============
//! This module defines the `AuthService` trait, the credential seam the
//! resolvers depend on.
use async_trait::async_trait;
use shopfront_common::UserId;

use crate::error::AppError;

#[async_trait]
pub trait AuthService: Send + Sync {
    /// Salted one-way hash of `plain`
    async fn hash_password(&self, plain: &str) -> Result<String, AppError>;
    /// False for a wrong password and for a malformed hash
    async fn verify_password(&self, hash: &str, plain: &str) -> bool;
    fn issue_session_token(&self, user_id: UserId) -> Result<String, AppError>;
    /// `Unauthenticated` for bad signatures, garbage and expired tokens
    fn verify_session_token(&self, token: &str) -> Result<UserId, AppError>;
}
