// ============================
// crates/backend-lib/src/storage/flat_file.rs
// ============================
//! Flat-file implementation of the Storage trait.
//!
//! Records live in memory and the whole table set is rewritten to
//! `store.json` after every mutation.
use async_trait::async_trait;
use shopfront_common::{CartItem, CartItemId, Item, ItemId, Order, OrderId, User, UserId};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::{fs as tokio_fs, sync::Mutex};

use super::{
    ItemChanges, ItemQuery, MemoryStorage, NewItem, NewOrder, NewUser, Storage, StoreError,
    Tables, UserChanges,
};

/// Name of the snapshot file inside the data directory
pub const STORE_FILE: &str = "store.json";

/// Store persisted as a JSON snapshot on disk
#[derive(Clone)]
pub struct FlatFileStorage {
    root: PathBuf,
    inner: MemoryStorage,
    write_lock: Arc<Mutex<()>>,
}

impl FlatFileStorage {
    /// Open (or create) a store rooted at `root`
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;

        let path = root.join(STORE_FILE);
        let tables = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str::<Tables>(&content)?
        } else {
            Tables::default()
        };
        tracing::debug!(
            path = %path.display(),
            users = tables.users.len(),
            items = tables.items.len(),
            "opened flat-file store"
        );

        Ok(Self {
            root,
            inner: MemoryStorage::from_tables(tables),
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn path(&self) -> PathBuf {
        self.root.join(STORE_FILE)
    }

    /// Write the current tables to disk via a temp file and rename
    async fn persist(&self) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let json = serde_json::to_vec_pretty(&self.inner.snapshot())?;

        let tmp = self.root.join(format!("{STORE_FILE}.tmp"));
        tokio_fs::write(&tmp, json).await?;
        tokio_fs::rename(&tmp, self.path()).await?;
        Ok(())
    }
}

#[async_trait]
impl Storage for FlatFileStorage {
    async fn items(&self, query: &ItemQuery) -> Result<Vec<Item>, StoreError> {
        self.inner.items(query).await
    }

    async fn count_items(&self, query: &ItemQuery) -> Result<usize, StoreError> {
        self.inner.count_items(query).await
    }

    async fn item(&self, id: ItemId) -> Result<Option<Item>, StoreError> {
        self.inner.item(id).await
    }

    async fn create_item(&self, data: NewItem) -> Result<Item, StoreError> {
        let item = self.inner.create_item(data).await?;
        self.persist().await?;
        Ok(item)
    }

    async fn update_item(&self, id: ItemId, changes: ItemChanges) -> Result<Item, StoreError> {
        let item = self.inner.update_item(id, changes).await?;
        self.persist().await?;
        Ok(item)
    }

    async fn delete_item(&self, id: ItemId) -> Result<Item, StoreError> {
        let item = self.inner.delete_item(id).await?;
        self.persist().await?;
        Ok(item)
    }

    async fn user(&self, id: UserId) -> Result<Option<User>, StoreError> {
        self.inner.user(id).await
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.inner.user_by_email(email).await
    }

    async fn users_by_reset_token(&self, token: &str) -> Result<Vec<User>, StoreError> {
        self.inner.users_by_reset_token(token).await
    }

    async fn users(&self) -> Result<Vec<User>, StoreError> {
        self.inner.users().await
    }

    async fn create_user(&self, data: NewUser) -> Result<User, StoreError> {
        let user = self.inner.create_user(data).await?;
        self.persist().await?;
        Ok(user)
    }

    async fn update_user(&self, id: UserId, changes: UserChanges) -> Result<User, StoreError> {
        let user = self.inner.update_user(id, changes).await?;
        self.persist().await?;
        Ok(user)
    }

    async fn cart_items(&self, user: UserId) -> Result<Vec<CartItem>, StoreError> {
        self.inner.cart_items(user).await
    }

    async fn cart_item(&self, id: CartItemId) -> Result<Option<CartItem>, StoreError> {
        self.inner.cart_item(id).await
    }

    async fn find_cart_item(
        &self,
        user: UserId,
        item: ItemId,
    ) -> Result<Option<CartItem>, StoreError> {
        self.inner.find_cart_item(user, item).await
    }

    async fn create_cart_item(&self, user: UserId, item: ItemId) -> Result<CartItem, StoreError> {
        let line = self.inner.create_cart_item(user, item).await?;
        self.persist().await?;
        Ok(line)
    }

    async fn update_cart_quantity(
        &self,
        id: CartItemId,
        quantity: i32,
    ) -> Result<CartItem, StoreError> {
        let line = self.inner.update_cart_quantity(id, quantity).await?;
        self.persist().await?;
        Ok(line)
    }

    async fn delete_cart_item(&self, id: CartItemId) -> Result<CartItem, StoreError> {
        let line = self.inner.delete_cart_item(id).await?;
        self.persist().await?;
        Ok(line)
    }

    async fn order(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        self.inner.order(id).await
    }

    async fn orders(&self, user: UserId) -> Result<Vec<Order>, StoreError> {
        self.inner.orders(user).await
    }

    async fn create_order(&self, data: NewOrder) -> Result<Order, StoreError> {
        let order = self.inner.create_order(data).await?;
        self.persist().await?;
        Ok(order)
    }
}
