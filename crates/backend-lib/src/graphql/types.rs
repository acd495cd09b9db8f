// ============================
// crates/backend-lib/src/graphql/types.rs
// ============================
//! GraphQL object types over the store records.
use async_graphql::{Context, Enum, ErrorExtensions, Object, Result, SimpleObject, ID};
use chrono::{DateTime, Utc};
use shopfront_common::{CartItem, Item, Order, OrderItem, Permission, User};

use super::{request_context, resolvers};
use crate::auth::can_view;
use crate::auth::permissions::{VIEW_ANY_CART, VIEW_USER_DETAILS};
use crate::storage::ItemOrder;

/// Permission labels as they appear on the wire
#[derive(Enum, Copy, Clone, Debug, PartialEq, Eq)]
#[graphql(name = "Permission")]
pub enum PermissionValue {
    #[graphql(name = "ADMIN")]
    Admin,
    #[graphql(name = "USER")]
    User,
    #[graphql(name = "ITEMCREATE")]
    ItemCreate,
    #[graphql(name = "ITEMUPDATE")]
    ItemUpdate,
    #[graphql(name = "ITEMDELETE")]
    ItemDelete,
    #[graphql(name = "PERMISSIONUPDATE")]
    PermissionUpdate,
}

impl From<Permission> for PermissionValue {
    fn from(permission: Permission) -> Self {
        match permission {
            Permission::Admin => Self::Admin,
            Permission::User => Self::User,
            Permission::ItemCreate => Self::ItemCreate,
            Permission::ItemUpdate => Self::ItemUpdate,
            Permission::ItemDelete => Self::ItemDelete,
            Permission::PermissionUpdate => Self::PermissionUpdate,
        }
    }
}

impl From<PermissionValue> for Permission {
    fn from(value: PermissionValue) -> Self {
        match value {
            PermissionValue::Admin => Self::Admin,
            PermissionValue::User => Self::User,
            PermissionValue::ItemCreate => Self::ItemCreate,
            PermissionValue::ItemUpdate => Self::ItemUpdate,
            PermissionValue::ItemDelete => Self::ItemDelete,
            PermissionValue::PermissionUpdate => Self::PermissionUpdate,
        }
    }
}

/// Sort order accepted by `items`
#[derive(Enum, Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ItemOrderBy {
    #[default]
    #[graphql(name = "createdAt_DESC")]
    CreatedAtDesc,
    #[graphql(name = "createdAt_ASC")]
    CreatedAtAsc,
    #[graphql(name = "price_ASC")]
    PriceAsc,
    #[graphql(name = "price_DESC")]
    PriceDesc,
}

impl From<ItemOrderBy> for ItemOrder {
    fn from(order: ItemOrderBy) -> Self {
        match order {
            ItemOrderBy::CreatedAtDesc => Self::CreatedAtDesc,
            ItemOrderBy::CreatedAtAsc => Self::CreatedAtAsc,
            ItemOrderBy::PriceAsc => Self::PriceAsc,
            ItemOrderBy::PriceDesc => Self::PriceDesc,
        }
    }
}

/// Plain acknowledgement returned by `signout` and `requestReset`
#[derive(SimpleObject, Debug, Clone)]
pub struct SuccessMessage {
    pub message: String,
}

impl From<&str> for SuccessMessage {
    fn from(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

#[derive(SimpleObject, Debug, Clone)]
#[graphql(name = "AggregateItem")]
pub struct ItemAggregate {
    pub count: i32,
}

/// Result of `itemsConnection`
#[derive(SimpleObject, Debug, Clone)]
pub struct ItemConnection {
    pub aggregate: ItemAggregate,
}

pub struct ItemObject(pub Item);

#[Object(name = "Item")]
impl ItemObject {
    async fn id(&self) -> ID {
        ID(self.0.id.to_string())
    }

    async fn title(&self) -> &str {
        &self.0.title
    }

    async fn description(&self) -> &str {
        &self.0.description
    }

    async fn image(&self) -> Option<&str> {
        self.0.image.as_deref()
    }

    async fn large_image(&self) -> Option<&str> {
        self.0.large_image.as_deref()
    }

    /// Price in cents
    async fn price(&self) -> i32 {
        self.0.price
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.0.created_at
    }

    /// The user who listed the item
    async fn user(&self, ctx: &Context<'_>) -> Result<Option<UserObject>> {
        let user = resolvers(ctx)?
            .user(self.0.user)
            .await
            .map_err(|e| e.extend())?;
        Ok(user.map(UserObject))
    }
}

pub struct UserObject(pub User);

#[Object(name = "User")]
impl UserObject {
    async fn id(&self) -> ID {
        ID(self.0.id.to_string())
    }

    async fn name(&self) -> &str {
        &self.0.name
    }

    /// `null` unless the caller is this user or may manage permissions
    async fn email(&self, ctx: &Context<'_>) -> Result<Option<&str>> {
        let visible = can_view(request_context(ctx)?, self.0.id, VIEW_USER_DETAILS);
        Ok(visible.then_some(self.0.email.as_str()))
    }

    /// `null` unless the caller is this user or may manage permissions
    async fn permissions(&self, ctx: &Context<'_>) -> Result<Option<Vec<PermissionValue>>> {
        if !can_view(request_context(ctx)?, self.0.id, VIEW_USER_DETAILS) {
            return Ok(None);
        }
        Ok(Some(self.0.permissions.iter().map(PermissionValue::from).collect()))
    }

    /// Empty unless the caller is this user or an admin
    async fn cart(&self, ctx: &Context<'_>) -> Result<Vec<CartItemObject>> {
        if !can_view(request_context(ctx)?, self.0.id, VIEW_ANY_CART) {
            return Ok(Vec::new());
        }
        let lines = resolvers(ctx)?
            .cart(self.0.id)
            .await
            .map_err(|e| e.extend())?;
        Ok(lines.into_iter().map(CartItemObject).collect())
    }
}

pub struct CartItemObject(pub CartItem);

#[Object(name = "CartItem")]
impl CartItemObject {
    async fn id(&self) -> ID {
        ID(self.0.id.to_string())
    }

    async fn quantity(&self) -> i32 {
        self.0.quantity
    }

    /// `null` once the item has been deleted
    async fn item(&self, ctx: &Context<'_>) -> Result<Option<ItemObject>> {
        let item = resolvers(ctx)?
            .item(self.0.item)
            .await
            .map_err(|e| e.extend())?;
        Ok(item.map(ItemObject))
    }

    async fn user(&self, ctx: &Context<'_>) -> Result<Option<UserObject>> {
        let user = resolvers(ctx)?
            .user(self.0.user)
            .await
            .map_err(|e| e.extend())?;
        Ok(user.map(UserObject))
    }
}

pub struct OrderItemObject(pub OrderItem);

#[Object(name = "OrderItem")]
impl OrderItemObject {
    async fn id(&self) -> ID {
        ID(self.0.id.to_string())
    }

    async fn title(&self) -> &str {
        &self.0.title
    }

    async fn description(&self) -> &str {
        &self.0.description
    }

    async fn image(&self) -> Option<&str> {
        self.0.image.as_deref()
    }

    async fn large_image(&self) -> Option<&str> {
        self.0.large_image.as_deref()
    }

    async fn price(&self) -> i32 {
        self.0.price
    }

    async fn quantity(&self) -> i32 {
        self.0.quantity
    }
}

pub struct OrderObject(pub Order);

#[Object(name = "Order")]
impl OrderObject {
    async fn id(&self) -> ID {
        ID(self.0.id.to_string())
    }

    async fn items(&self) -> Vec<OrderItemObject> {
        self.0.items.iter().cloned().map(OrderItemObject).collect()
    }

    /// Total in cents
    async fn total(&self) -> i32 {
        self.0.total
    }

    async fn charge(&self) -> Option<&str> {
        self.0.charge.as_deref()
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.0.created_at
    }

    async fn user(&self, ctx: &Context<'_>) -> Result<Option<UserObject>> {
        let user = resolvers(ctx)?
            .user(self.0.user)
            .await
            .map_err(|e| e.extend())?;
        Ok(user.map(UserObject))
    }
}
