// ============================
// crates/backend-lib/src/auth/permissions.rs
// ============================
//! Permission policy.
//!
//! A check passes when the identity holds at least one of the listed
//! permissions. There is no hierarchy: ADMIN only satisfies a check that
//! lists ADMIN.
use shopfront_common::{Permission, UserId};

use crate::context::{Identity, RequestContext};
use crate::error::AppError;

/// Accepted by `updateItem` for items the caller does not own
pub const UPDATE_ITEM: &[Permission] = &[Permission::Admin, Permission::ItemUpdate];

/// Accepted by `deleteItem` for items the caller does not own
pub const DELETE_ITEM: &[Permission] = &[Permission::Admin, Permission::ItemDelete];

/// Accepted by `users` and `updatePermissions`
pub const MANAGE_PERMISSIONS: &[Permission] = &[Permission::Admin, Permission::PermissionUpdate];

/// Accepted by `order` for orders the caller did not place
pub const VIEW_ANY_ORDER: &[Permission] = &[Permission::Admin];

/// Lets the caller read another user's email and permissions
pub const VIEW_USER_DETAILS: &[Permission] = &[Permission::Admin, Permission::PermissionUpdate];

/// Lets the caller read another user's cart
pub const VIEW_ANY_CART: &[Permission] = &[Permission::Admin];

/// Read-side check for private user fields. The user themselves always
/// passes; anyone else needs one of `required`. Anonymous callers never pass.
pub fn can_view(ctx: &RequestContext, owner: UserId, required: &[Permission]) -> bool {
    ctx.acts_as(owner)
        || ctx
            .identity()
            .is_some_and(|identity| identity.permissions.intersects(required))
}

/// Fail with `Forbidden` unless `identity` holds one of `required`
pub fn authorize(identity: &Identity, required: &[Permission]) -> Result<(), AppError> {
    if identity.permissions.intersects(required) {
        return Ok(());
    }

    metrics::counter!(crate::metrics::PERMISSION_DENIED).increment(1);
    tracing::warn!(
        user_id = %identity.id,
        required = ?required,
        "permission denied"
    );
    Err(AppError::Forbidden)
}

/// Owners always pass; everyone else needs one of `required`
pub fn authorize_owner_or(
    identity: &Identity,
    owner: UserId,
    required: &[Permission],
) -> Result<(), AppError> {
    if identity.id == owner {
        return Ok(());
    }
    authorize(identity, required)
}
