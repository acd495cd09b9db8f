// ==============================
// tests/unit/permission_tests.rs
// ==============================
//! Unit tests for the permission policy
use backend_lib::auth::permissions::{
    authorize, authorize_owner_or, DELETE_ITEM, MANAGE_PERMISSIONS, UPDATE_ITEM, VIEW_ANY_ORDER,
};
use backend_lib::context::Identity;
use backend_lib::error::AppError;
use shopfront_common::{Permission, PermissionSet};
use uuid::Uuid;

fn identity_with(permissions: &[Permission]) -> Identity {
    Identity {
        id: Uuid::new_v4(),
        name: "Policy".to_string(),
        email: "policy@example.com".to_string(),
        permissions: permissions.iter().copied().collect(),
    }
}

#[test]
fn test_admin_is_not_a_wildcard() {
    // ADMIN passes only where a check lists it
    let admin = identity_with(&[Permission::Admin]);
    for required in [UPDATE_ITEM, DELETE_ITEM, MANAGE_PERMISSIONS, VIEW_ANY_ORDER] {
        assert!(authorize(&admin, required).is_ok());
    }
    assert!(matches!(
        authorize(&admin, &[Permission::ItemCreate]),
        Err(AppError::Forbidden)
    ));
}

#[test]
fn test_narrow_permissions_do_not_leak() {
    let updater = identity_with(&[Permission::User, Permission::ItemUpdate]);
    assert!(authorize(&updater, UPDATE_ITEM).is_ok());
    assert!(matches!(authorize(&updater, DELETE_ITEM), Err(AppError::Forbidden)));
    assert!(matches!(
        authorize(&updater, MANAGE_PERMISSIONS),
        Err(AppError::Forbidden)
    ));
}

#[test]
fn test_empty_permission_set_only_passes_as_owner() {
    let nobody = Identity {
        permissions: PermissionSet::default(),
        ..identity_with(&[])
    };
    assert!(authorize_owner_or(&nobody, nobody.id, DELETE_ITEM).is_ok());
    assert!(matches!(
        authorize_owner_or(&nobody, Uuid::new_v4(), DELETE_ITEM),
        Err(AppError::Forbidden)
    ));
}
