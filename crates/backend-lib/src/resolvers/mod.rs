// ============================
// crates/backend-lib/src/resolvers/mod.rs
// ============================
//! Resolver dispatch.
//!
//! Every operation takes the per-request [`RequestContext`] explicitly, runs
//! the gate and policy checks it needs, then forwards to the store. The
//! GraphQL layer is a thin shell over these methods.
use std::sync::Arc;

use shopfront_common::{Item, ItemId, User, UserId};

use crate::auth::AuthService;
use crate::config::Settings;
use crate::error::AppError;
use crate::mail::Mailer;
use crate::storage::Storage;

mod cart;
mod items;
mod orders;
mod users;

pub use items::CreateItem;
pub use users::{GOODBYE_MESSAGE, THANKS_MESSAGE};

/// Collaborators shared by every operation
#[derive(Clone)]
pub struct Resolvers {
    storage: Arc<dyn Storage>,
    auth: Arc<dyn AuthService>,
    mailer: Arc<dyn Mailer>,
    settings: Arc<Settings>,
}

impl Resolvers {
    pub fn new(
        storage: Arc<dyn Storage>,
        auth: Arc<dyn AuthService>,
        mailer: Arc<dyn Mailer>,
        settings: Arc<Settings>,
    ) -> Self {
        Self {
            storage,
            auth,
            mailer,
            settings,
        }
    }

    pub fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    pub fn auth(&self) -> &dyn AuthService {
        self.auth.as_ref()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Load an item or fail with `NotFound`
    async fn fetch_item(&self, id: ItemId) -> Result<Item, AppError> {
        self.storage
            .item(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("item {id}")))
    }

    /// Load a user or fail with `NotFound`
    async fn fetch_user(&self, id: UserId) -> Result<User, AppError> {
        self.storage
            .user(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {id}")))
    }
}
