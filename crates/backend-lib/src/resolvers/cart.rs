// ============================
// crates/backend-lib/src/resolvers/cart.rs
// ============================
//! Cart operations.
//!
//! `add_to_cart` reads the existing line and then writes it back without
//! any compare-and-swap. Two concurrent adds of the same item can lose an
//! increment or leave two lines behind.
use metrics::counter;
use shopfront_common::{CartItem, CartItemId, ItemId, UserId};
use tracing::{debug, instrument, warn};

use super::Resolvers;
use crate::auth::require_identity;
use crate::context::RequestContext;
use crate::error::AppError;
use crate::metrics::{CART_ADD, PERMISSION_DENIED};

impl Resolvers {
    /// Put one more of `item_id` into the caller's cart
    #[instrument(skip(self, ctx))]
    pub async fn add_to_cart(
        &self,
        ctx: &RequestContext,
        item_id: ItemId,
    ) -> Result<CartItem, AppError> {
        let identity = require_identity(ctx)?;
        self.fetch_item(item_id).await?;

        let line = match self.storage.find_cart_item(identity.id, item_id).await? {
            Some(existing) => {
                debug!(cart_item_id = %existing.id, "incrementing cart line");
                self.storage
                    .update_cart_quantity(existing.id, existing.quantity + 1)
                    .await?
            },
            None => self.storage.create_cart_item(identity.id, item_id).await?,
        };

        counter!(CART_ADD).increment(1);
        Ok(line)
    }

    /// Remove a line from the caller's own cart
    #[instrument(skip(self, ctx))]
    pub async fn remove_from_cart(
        &self,
        ctx: &RequestContext,
        id: CartItemId,
    ) -> Result<CartItem, AppError> {
        let identity = require_identity(ctx)?;
        let line = self
            .storage
            .cart_item(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("cart item {id}")))?;

        if line.user != identity.id {
            counter!(PERMISSION_DENIED).increment(1);
            warn!(user_id = %identity.id, owner = %line.user, "cart line belongs to someone else");
            return Err(AppError::Forbidden);
        }

        Ok(self.storage.delete_cart_item(id).await?)
    }

    /// Lines in `user`'s cart
    pub async fn cart(&self, user: UserId) -> Result<Vec<CartItem>, AppError> {
        Ok(self.storage.cart_items(user).await?)
    }
}
