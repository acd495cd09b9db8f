// ================
// common/src/lib.rs
// ================
//! Common record types shared by the `Shopfront` backend and its tools.
//! These are the shapes the store owns; the policy layer only relies on
//! ownership fields, permissions and the reset-token slot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

pub type UserId = Uuid;
pub type ItemId = Uuid;
pub type CartItemId = Uuid;
pub type OrderId = Uuid;

/// Capability label granted to a user
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Permission {
    #[serde(rename = "ADMIN")]
    Admin,
    #[serde(rename = "USER")]
    User,
    #[serde(rename = "ITEMCREATE")]
    ItemCreate,
    #[serde(rename = "ITEMUPDATE")]
    ItemUpdate,
    #[serde(rename = "ITEMDELETE")]
    ItemDelete,
    #[serde(rename = "PERMISSIONUPDATE")]
    PermissionUpdate,
}

impl Permission {
    pub const ALL: [Permission; 6] = [
        Permission::Admin,
        Permission::User,
        Permission::ItemCreate,
        Permission::ItemUpdate,
        Permission::ItemDelete,
        Permission::PermissionUpdate,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Permission::Admin => "ADMIN",
            Permission::User => "USER",
            Permission::ItemCreate => "ITEMCREATE",
            Permission::ItemUpdate => "ITEMUPDATE",
            Permission::ItemDelete => "ITEMDELETE",
            Permission::PermissionUpdate => "PERMISSIONUPDATE",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| format!("unknown permission: {s}"))
    }
}

/// Set of permissions held by a user.
///
/// Checks are plain set intersection; no permission implies another.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct PermissionSet(BTreeSet<Permission>);

impl PermissionSet {
    /// The set every new account starts with
    pub fn default_user() -> Self {
        Self::from_iter([Permission::User])
    }

    pub fn contains(&self, permission: Permission) -> bool {
        self.0.contains(&permission)
    }

    /// True when at least one of `required` is held
    pub fn intersects(&self, required: &[Permission]) -> bool {
        required.iter().any(|p| self.0.contains(p))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Permission> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<T: IntoIterator<Item = Permission>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Pending password-reset credential stored on a user
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ResetToken {
    /// Hex-encoded random value mailed to the user
    pub token: String,
    /// The token stops authorizing a reset at this instant
    pub expires_at: DateTime<Utc>,
}

impl ResetToken {
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// A registered account
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub name: String,
    /// Always stored lower-cased
    pub email: String,
    /// scrypt PHC string
    pub password: String,
    pub permissions: PermissionSet,
    #[serde(default)]
    pub reset_token: Option<ResetToken>,
}

/// A product listed for sale
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub large_image: Option<String>,
    /// Price in cents
    pub price: i32,
    /// Owner (creator) of the item
    pub user: UserId,
    pub created_at: DateTime<Utc>,
}

/// One line in a user's cart
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CartItem {
    pub id: CartItemId,
    pub quantity: i32,
    pub item: ItemId,
    pub user: UserId,
}

/// Snapshot of an item at checkout time
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct OrderItem {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub large_image: Option<String>,
    pub price: i32,
    pub quantity: i32,
}

/// A completed checkout
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Order {
    pub id: OrderId,
    pub items: Vec<OrderItem>,
    /// Sum of `price * quantity` over `items`, in cents
    pub total: i32,
    pub user: UserId,
    /// Reference returned by an external payment processor, if any
    pub charge: Option<String>,
    pub created_at: DateTime<Utc>,
}
