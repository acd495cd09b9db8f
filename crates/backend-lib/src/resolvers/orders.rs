// ============================
// crates/backend-lib/src/resolvers/orders.rs
// ============================
//! Orders: checkout snapshots of a cart.
//!
//! No payment is captured here; `charge` stays empty until an external
//! processor fills it in.
use metrics::counter;
use shopfront_common::{Order, OrderId, OrderItem};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::Resolvers;
use crate::auth::permissions::{authorize_owner_or, VIEW_ANY_ORDER};
use crate::auth::require_identity;
use crate::context::RequestContext;
use crate::error::AppError;
use crate::metrics::ORDER_CREATED;
use crate::storage::NewOrder;

impl Resolvers {
    /// One order, visible to the customer who placed it and to admins
    #[instrument(skip(self, ctx))]
    pub async fn order(&self, ctx: &RequestContext, id: OrderId) -> Result<Order, AppError> {
        let identity = require_identity(ctx)?;
        let order = self
            .storage
            .order(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("order {id}")))?;
        authorize_owner_or(identity, order.user, VIEW_ANY_ORDER)?;
        Ok(order)
    }

    /// The caller's orders, newest first
    pub async fn orders(&self, ctx: &RequestContext) -> Result<Vec<Order>, AppError> {
        let identity = require_identity(ctx)?;
        Ok(self.storage.orders(identity.id).await?)
    }

    /// Turn the caller's cart into an order and empty the cart
    #[instrument(skip(self, ctx))]
    pub async fn create_order(&self, ctx: &RequestContext) -> Result<Order, AppError> {
        let identity = require_identity(ctx)?;
        let cart = self.storage.cart_items(identity.id).await?;

        let mut items = Vec::with_capacity(cart.len());
        let mut total: i32 = 0;
        for line in &cart {
            let Some(item) = self.storage.item(line.item).await? else {
                warn!(cart_item_id = %line.id, item_id = %line.item, "cart line for a deleted item");
                continue;
            };

            total = item
                .price
                .checked_mul(line.quantity)
                .and_then(|amount| total.checked_add(amount))
                .ok_or_else(|| AppError::ValidationFailed("Order total is too large".to_string()))?;

            items.push(OrderItem {
                id: Uuid::new_v4(),
                title: item.title,
                description: item.description,
                image: item.image,
                large_image: item.large_image,
                price: item.price,
                quantity: line.quantity,
            });
        }

        if items.is_empty() {
            return Err(AppError::ValidationFailed("Your cart is empty".to_string()));
        }

        let order = self
            .storage
            .create_order(NewOrder {
                items,
                total,
                user: identity.id,
                charge: None,
            })
            .await?;

        for line in cart {
            self.storage.delete_cart_item(line.id).await?;
        }

        counter!(ORDER_CREATED).increment(1);
        info!(order_id = %order.id, user_id = %identity.id, total, "order created");
        Ok(order)
    }
}
