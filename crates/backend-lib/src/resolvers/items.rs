// ============================
// crates/backend-lib/src/resolvers/items.rs
// ============================
//! Item operations.
use metrics::counter;
use shopfront_common::{Item, ItemId};
use tracing::{info, instrument};

use super::Resolvers;
use crate::auth::permissions::{authorize_owner_or, DELETE_ITEM, UPDATE_ITEM};
use crate::auth::require_identity;
use crate::context::RequestContext;
use crate::error::AppError;
use crate::metrics::{ITEM_CREATED, ITEM_DELETED};
use crate::storage::{ItemChanges, ItemQuery, NewItem};
use crate::validation::{validate_price, validate_title};

/// Arguments of `createItem`
#[derive(Debug, Clone, Default)]
pub struct CreateItem {
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub large_image: Option<String>,
    pub price: i32,
}

impl Resolvers {
    /// Create an item owned by the caller
    #[instrument(skip(self, ctx, input), fields(title = %input.title))]
    pub async fn create_item(
        &self,
        ctx: &RequestContext,
        input: CreateItem,
    ) -> Result<Item, AppError> {
        let identity = require_identity(ctx)?;
        let title = validate_title(&input.title)?.to_string();
        let price = validate_price(input.price)?;

        let item = self
            .storage
            .create_item(NewItem {
                title,
                description: input.description,
                image: input.image,
                large_image: input.large_image,
                price,
                user: identity.id,
            })
            .await?;

        counter!(ITEM_CREATED).increment(1);
        info!(item_id = %item.id, user_id = %identity.id, "item created");
        Ok(item)
    }

    /// Change the provided fields of an item
    #[instrument(skip(self, ctx, changes))]
    pub async fn update_item(
        &self,
        ctx: &RequestContext,
        id: ItemId,
        mut changes: ItemChanges,
    ) -> Result<Item, AppError> {
        let identity = require_identity(ctx)?;
        let item = self.fetch_item(id).await?;
        authorize_owner_or(identity, item.user, UPDATE_ITEM)?;

        if let Some(title) = changes.title.take() {
            changes.title = Some(validate_title(&title)?.to_string());
        }
        if let Some(price) = changes.price {
            validate_price(price)?;
        }

        Ok(self.storage.update_item(id, changes).await?)
    }

    /// Delete an item the caller owns or may delete
    #[instrument(skip(self, ctx))]
    pub async fn delete_item(&self, ctx: &RequestContext, id: ItemId) -> Result<Item, AppError> {
        let identity = require_identity(ctx)?;
        let item = self.fetch_item(id).await?;
        authorize_owner_or(identity, item.user, DELETE_ITEM)?;

        let deleted = self.storage.delete_item(id).await?;
        counter!(ITEM_DELETED).increment(1);
        info!(item_id = %id, user_id = %identity.id, "item deleted");
        Ok(deleted)
    }

    pub async fn items(&self, query: &ItemQuery) -> Result<Vec<Item>, AppError> {
        Ok(self.storage.items(query).await?)
    }

    pub async fn item(&self, id: ItemId) -> Result<Option<Item>, AppError> {
        Ok(self.storage.item(id).await?)
    }

    /// Number of items matching the filter part of `query`
    pub async fn items_count(&self, query: &ItemQuery) -> Result<usize, AppError> {
        Ok(self.storage.count_items(query).await?)
    }
}
