// ============================
// crates/backend-lib/src/storage/memory.rs
// ============================
//! In-memory implementation of the Storage trait.
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use shopfront_common::{
    CartItem, CartItemId, Item, ItemId, Order, OrderId, User, UserId,
};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use super::{
    ItemChanges, ItemOrder, ItemQuery, NewItem, NewOrder, NewUser, Storage, StoreError,
    UserChanges,
};

/// Every record the store holds
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Tables {
    #[serde(default)]
    pub items: HashMap<ItemId, Item>,
    #[serde(default)]
    pub users: HashMap<UserId, User>,
    #[serde(default)]
    pub cart_items: HashMap<CartItemId, CartItem>,
    #[serde(default)]
    pub orders: HashMap<OrderId, Order>,
}

/// Store backed by process memory
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tables(tables: Tables) -> Self {
        Self {
            tables: Arc::new(RwLock::new(tables)),
        }
    }

    /// Copy of the current contents
    pub fn snapshot(&self) -> Tables {
        self.tables.read().clone()
    }

    fn sorted_matches(tables: &Tables, query: &ItemQuery) -> Vec<Item> {
        let mut items: Vec<Item> = tables
            .items
            .values()
            .filter(|item| query.matches(item))
            .cloned()
            .collect();

        match query.order_by {
            ItemOrder::CreatedAtDesc => {
                items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)))
            },
            ItemOrder::CreatedAtAsc => {
                items.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)))
            },
            ItemOrder::PriceAsc => items.sort_by(|a, b| a.price.cmp(&b.price).then(a.id.cmp(&b.id))),
            ItemOrder::PriceDesc => {
                items.sort_by(|a, b| b.price.cmp(&a.price).then(a.id.cmp(&b.id)))
            },
        }
        items
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn items(&self, query: &ItemQuery) -> Result<Vec<Item>, StoreError> {
        let tables = self.tables.read();
        let items = Self::sorted_matches(&tables, query)
            .into_iter()
            .skip(query.skip.unwrap_or(0))
            .take(query.first.unwrap_or(usize::MAX))
            .collect();
        Ok(items)
    }

    async fn count_items(&self, query: &ItemQuery) -> Result<usize, StoreError> {
        let tables = self.tables.read();
        Ok(tables.items.values().filter(|item| query.matches(item)).count())
    }

    async fn item(&self, id: ItemId) -> Result<Option<Item>, StoreError> {
        Ok(self.tables.read().items.get(&id).cloned())
    }

    async fn create_item(&self, data: NewItem) -> Result<Item, StoreError> {
        let item = Item {
            id: Uuid::new_v4(),
            title: data.title,
            description: data.description,
            image: data.image,
            large_image: data.large_image,
            price: data.price,
            user: data.user,
            created_at: Utc::now(),
        };
        self.tables.write().items.insert(item.id, item.clone());
        Ok(item)
    }

    async fn update_item(&self, id: ItemId, changes: ItemChanges) -> Result<Item, StoreError> {
        let mut tables = self.tables.write();
        let item = tables
            .items
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("item {id}")))?;

        if let Some(title) = changes.title {
            item.title = title;
        }
        if let Some(description) = changes.description {
            item.description = description;
        }
        if let Some(image) = changes.image {
            item.image = Some(image);
        }
        if let Some(large_image) = changes.large_image {
            item.large_image = Some(large_image);
        }
        if let Some(price) = changes.price {
            item.price = price;
        }
        Ok(item.clone())
    }

    async fn delete_item(&self, id: ItemId) -> Result<Item, StoreError> {
        self.tables
            .write()
            .items
            .remove(&id)
            .ok_or_else(|| StoreError::NotFound(format!("item {id}")))
    }

    async fn user(&self, id: UserId) -> Result<Option<User>, StoreError> {
        Ok(self.tables.read().users.get(&id).cloned())
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read();
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn users_by_reset_token(&self, token: &str) -> Result<Vec<User>, StoreError> {
        let tables = self.tables.read();
        Ok(tables
            .users
            .values()
            .filter(|u| u.reset_token.as_ref().is_some_and(|t| t.token == token))
            .cloned()
            .collect())
    }

    async fn users(&self) -> Result<Vec<User>, StoreError> {
        let tables = self.tables.read();
        let mut users: Vec<User> = tables.users.values().cloned().collect();
        users.sort_by(|a, b| a.email.cmp(&b.email));
        Ok(users)
    }

    async fn create_user(&self, data: NewUser) -> Result<User, StoreError> {
        let mut tables = self.tables.write();
        if tables.users.values().any(|u| u.email == data.email) {
            return Err(StoreError::UniqueViolation("email".to_string()));
        }

        let user = User {
            id: Uuid::new_v4(),
            name: data.name,
            email: data.email,
            password: data.password,
            permissions: data.permissions,
            reset_token: None,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_user(&self, id: UserId, changes: UserChanges) -> Result<User, StoreError> {
        let mut tables = self.tables.write();
        let user = tables
            .users
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("user {id}")))?;

        if let Some(name) = changes.name {
            user.name = name;
        }
        if let Some(password) = changes.password {
            user.password = password;
        }
        if let Some(permissions) = changes.permissions {
            user.permissions = permissions;
        }
        if let Some(reset_token) = changes.reset_token {
            user.reset_token = reset_token;
        }
        Ok(user.clone())
    }

    async fn cart_items(&self, user: UserId) -> Result<Vec<CartItem>, StoreError> {
        let tables = self.tables.read();
        let mut lines: Vec<CartItem> = tables
            .cart_items
            .values()
            .filter(|line| line.user == user)
            .cloned()
            .collect();
        lines.sort_by_key(|line| line.id);
        Ok(lines)
    }

    async fn cart_item(&self, id: CartItemId) -> Result<Option<CartItem>, StoreError> {
        Ok(self.tables.read().cart_items.get(&id).cloned())
    }

    async fn find_cart_item(
        &self,
        user: UserId,
        item: ItemId,
    ) -> Result<Option<CartItem>, StoreError> {
        let tables = self.tables.read();
        Ok(tables
            .cart_items
            .values()
            .find(|line| line.user == user && line.item == item)
            .cloned())
    }

    async fn create_cart_item(&self, user: UserId, item: ItemId) -> Result<CartItem, StoreError> {
        let mut tables = self.tables.write();
        if !tables.items.contains_key(&item) {
            return Err(StoreError::NotFound(format!("item {item}")));
        }
        let line = CartItem {
            id: Uuid::new_v4(),
            quantity: 1,
            item,
            user,
        };
        tables.cart_items.insert(line.id, line.clone());
        Ok(line)
    }

    async fn update_cart_quantity(
        &self,
        id: CartItemId,
        quantity: i32,
    ) -> Result<CartItem, StoreError> {
        let mut tables = self.tables.write();
        let line = tables
            .cart_items
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("cart item {id}")))?;
        line.quantity = quantity;
        Ok(line.clone())
    }

    async fn delete_cart_item(&self, id: CartItemId) -> Result<CartItem, StoreError> {
        self.tables
            .write()
            .cart_items
            .remove(&id)
            .ok_or_else(|| StoreError::NotFound(format!("cart item {id}")))
    }

    async fn order(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        Ok(self.tables.read().orders.get(&id).cloned())
    }

    async fn orders(&self, user: UserId) -> Result<Vec<Order>, StoreError> {
        let tables = self.tables.read();
        let mut orders: Vec<Order> = tables
            .orders
            .values()
            .filter(|order| order.user == user)
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    async fn create_order(&self, data: NewOrder) -> Result<Order, StoreError> {
        let order = Order {
            id: Uuid::new_v4(),
            items: data.items,
            total: data.total,
            user: data.user,
            charge: data.charge,
            created_at: Utc::now(),
        };
        self.tables.write().orders.insert(order.id, order.clone());
        Ok(order)
    }
}
