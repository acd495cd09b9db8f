// ============================
// crates/backend-lib/src/auth/mod.rs
// ============================
//! Authentication, authorization and credential issuance.

pub mod gate;
pub mod password;
pub mod permissions;
pub mod reset;
mod service;
mod service_impl;
pub mod session;
pub mod token_generator;

pub use gate::require_identity;
pub use password::{hash_password, verify_password, SCRYPT_LOG_N};
pub use permissions::{authorize, authorize_owner_or, can_view};
pub use reset::{consume_reset_token, generate_reset_token, RESET_TOKEN_TTL_SECS};
pub use service::AuthService;
pub use service_impl::DefaultAuth;
pub use session::{Claims, SessionTokens, SESSION_TTL};
