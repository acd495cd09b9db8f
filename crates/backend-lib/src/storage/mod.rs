// ============================
// crates/backend-lib/src/storage/mod.rs
// ============================
//! Storage abstraction: the record store every resolver forwards to.
//!
//! Each call is atomic on its own. Nothing here spans calls, so
//! read-then-write sequences in the resolvers (e.g. cart increments) can race.
use async_trait::async_trait;
use shopfront_common::{
    CartItem, CartItemId, Item, ItemId, Order, OrderId, OrderItem, PermissionSet, ResetToken,
    User, UserId,
};
use thiserror::Error;

mod flat_file;
mod memory;

pub use flat_file::{FlatFileStorage, STORE_FILE};
pub use memory::{MemoryStorage, Tables};

/// Errors raised by a storage backend
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("unique constraint violated on {0}")]
    UniqueViolation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Sort order for item listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ItemOrder {
    #[default]
    CreatedAtDesc,
    CreatedAtAsc,
    PriceAsc,
    PriceDesc,
}

/// Filter and pagination for item listings
#[derive(Debug, Clone, Default)]
pub struct ItemQuery {
    /// Case-insensitive match against title or description
    pub search: Option<String>,
    pub order_by: ItemOrder,
    pub skip: Option<usize>,
    pub first: Option<usize>,
}

impl ItemQuery {
    /// Whether `item` passes the filter part of the query
    pub fn matches(&self, item: &Item) -> bool {
        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                let term = term.to_lowercase();
                item.title.to_lowercase().contains(&term)
                    || item.description.to_lowercase().contains(&term)
            },
        }
    }
}

/// Data for a new item
#[derive(Debug, Clone)]
pub struct NewItem {
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub large_image: Option<String>,
    pub price: i32,
    pub user: UserId,
}

/// Partial item update; `None` leaves a field unchanged
#[derive(Debug, Clone, Default)]
pub struct ItemChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub large_image: Option<String>,
    pub price: Option<i32>,
}

/// Data for a new user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub permissions: PermissionSet,
}

/// Partial user update; `None` leaves a field unchanged
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub password: Option<String>,
    pub permissions: Option<PermissionSet>,
    /// `Some(None)` clears the reset token
    pub reset_token: Option<Option<ResetToken>>,
}

/// Data for a new order
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub items: Vec<OrderItem>,
    pub total: i32,
    pub user: UserId,
    pub charge: Option<String>,
}

/// Trait for storage backends
#[async_trait]
pub trait Storage: Send + Sync {
    /// List items matching `query`, sorted and paginated
    async fn items(&self, query: &ItemQuery) -> Result<Vec<Item>, StoreError>;

    /// Count items matching `query`, ignoring pagination
    async fn count_items(&self, query: &ItemQuery) -> Result<usize, StoreError>;

    async fn item(&self, id: ItemId) -> Result<Option<Item>, StoreError>;

    async fn create_item(&self, data: NewItem) -> Result<Item, StoreError>;

    async fn update_item(&self, id: ItemId, changes: ItemChanges) -> Result<Item, StoreError>;

    async fn delete_item(&self, id: ItemId) -> Result<Item, StoreError>;

    async fn user(&self, id: UserId) -> Result<Option<User>, StoreError>;

    /// Look up a user by (already lower-cased) email
    async fn user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Every user holding this reset token value, expired or not
    async fn users_by_reset_token(&self, token: &str) -> Result<Vec<User>, StoreError>;

    async fn users(&self) -> Result<Vec<User>, StoreError>;

    /// Create a user; fails with `UniqueViolation` on a taken email
    async fn create_user(&self, data: NewUser) -> Result<User, StoreError>;

    async fn update_user(&self, id: UserId, changes: UserChanges) -> Result<User, StoreError>;

    async fn cart_items(&self, user: UserId) -> Result<Vec<CartItem>, StoreError>;

    async fn cart_item(&self, id: CartItemId) -> Result<Option<CartItem>, StoreError>;

    /// The cart line for `item` in `user`'s cart, if any
    async fn find_cart_item(
        &self,
        user: UserId,
        item: ItemId,
    ) -> Result<Option<CartItem>, StoreError>;

    /// Insert a new cart line with quantity 1
    async fn create_cart_item(&self, user: UserId, item: ItemId) -> Result<CartItem, StoreError>;

    async fn update_cart_quantity(
        &self,
        id: CartItemId,
        quantity: i32,
    ) -> Result<CartItem, StoreError>;

    async fn delete_cart_item(&self, id: CartItemId) -> Result<CartItem, StoreError>;

    async fn order(&self, id: OrderId) -> Result<Option<Order>, StoreError>;

    /// Orders placed by `user`, newest first
    async fn orders(&self, user: UserId) -> Result<Vec<Order>, StoreError>;

    async fn create_order(&self, data: NewOrder) -> Result<Order, StoreError>;
}
