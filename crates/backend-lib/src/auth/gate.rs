// ============================
// crates/backend-lib/src/auth/gate.rs
// ============================
//! Authentication gate.
use crate::context::{Identity, RequestContext};
use crate::error::AppError;

/// The caller's identity, or `Unauthenticated` when there is none.
///
/// Mutations call this first. Personalised reads (`me`) check
/// `ctx.identity()` instead and return nothing for anonymous callers.
pub fn require_identity(ctx: &RequestContext) -> Result<&Identity, AppError> {
    ctx.identity().ok_or(AppError::Unauthenticated)
}
