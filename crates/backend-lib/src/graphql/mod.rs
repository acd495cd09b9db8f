// ============================
// crates/backend-lib/src/graphql/mod.rs
// ============================
//! GraphQL schema.
//!
//! Roots are thin: they parse arguments, pull the [`Resolvers`] and the
//! per-request [`RequestContext`] out of the execution context, and map
//! `AppError` into GraphQL errors carrying an `extensions.code`.
use std::sync::Arc;

use async_graphql::{
    Context, EmptySubscription, ErrorExtensions, Object, Result, Schema, ID,
};
use uuid::Uuid;

use crate::context::RequestContext;
use crate::error::AppError;
use crate::resolvers::{CreateItem, Resolvers};
use crate::storage::{ItemChanges, ItemQuery};

mod types;

pub use types::{
    CartItemObject, ItemAggregate, ItemConnection, ItemObject, ItemOrderBy, OrderItemObject,
    OrderObject, PermissionValue, SuccessMessage, UserObject,
};

pub type ShopSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Build the schema around a set of resolvers.
///
/// Each request must carry an `Arc<RequestContext>` in its data.
pub fn build_schema(resolvers: Resolvers) -> ShopSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(resolvers)
        .finish()
}

fn resolvers<'a>(ctx: &Context<'a>) -> Result<&'a Resolvers> {
    ctx.data::<Resolvers>()
}

fn request_context<'a>(ctx: &Context<'a>) -> Result<&'a RequestContext> {
    ctx.data_opt::<Arc<RequestContext>>()
        .map(|c| c.as_ref())
        .ok_or_else(|| AppError::Internal("request context missing".to_string()).extend())
}

fn parse_id(id: &ID) -> Result<Uuid> {
    Uuid::parse_str(id.as_str())
        .map_err(|_| AppError::NotFound(format!("no record with id {}", id.as_str())).extend())
}

fn to_usize(name: &str, value: Option<i32>) -> Result<Option<usize>> {
    value
        .map(|v| {
            usize::try_from(v).map_err(|_| {
                AppError::ValidationFailed(format!("{name} must not be negative")).extend()
            })
        })
        .transpose()
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Items for sale, newest first unless `orderBy` says otherwise
    async fn items(
        &self,
        ctx: &Context<'_>,
        search: Option<String>,
        order_by: Option<ItemOrderBy>,
        skip: Option<i32>,
        first: Option<i32>,
    ) -> Result<Vec<ItemObject>> {
        let query = ItemQuery {
            search,
            order_by: order_by.unwrap_or_default().into(),
            skip: to_usize("skip", skip)?,
            first: to_usize("first", first)?,
        };
        let items = resolvers(ctx)?.items(&query).await.map_err(|e| e.extend())?;
        Ok(items.into_iter().map(ItemObject).collect())
    }

    async fn item(&self, ctx: &Context<'_>, id: ID) -> Result<Option<ItemObject>> {
        let id = parse_id(&id)?;
        let item = resolvers(ctx)?.item(id).await.map_err(|e| e.extend())?;
        Ok(item.map(ItemObject))
    }

    /// Aggregate over the items matching `search`
    async fn items_connection(
        &self,
        ctx: &Context<'_>,
        search: Option<String>,
    ) -> Result<ItemConnection> {
        let query = ItemQuery {
            search,
            ..ItemQuery::default()
        };
        let count = resolvers(ctx)?
            .items_count(&query)
            .await
            .map_err(|e| e.extend())?;
        Ok(ItemConnection {
            aggregate: ItemAggregate {
                count: i32::try_from(count).unwrap_or(i32::MAX),
            },
        })
    }

    /// The signed-in user, `null` when anonymous
    async fn me(&self, ctx: &Context<'_>) -> Result<Option<UserObject>> {
        let user = resolvers(ctx)?
            .me(request_context(ctx)?)
            .await
            .map_err(|e| e.extend())?;
        Ok(user.map(UserObject))
    }

    async fn users(&self, ctx: &Context<'_>) -> Result<Vec<UserObject>> {
        let users = resolvers(ctx)?
            .users(request_context(ctx)?)
            .await
            .map_err(|e| e.extend())?;
        Ok(users.into_iter().map(UserObject).collect())
    }

    async fn order(&self, ctx: &Context<'_>, id: ID) -> Result<OrderObject> {
        let id = parse_id(&id)?;
        let order = resolvers(ctx)?
            .order(request_context(ctx)?, id)
            .await
            .map_err(|e| e.extend())?;
        Ok(OrderObject(order))
    }

    async fn orders(&self, ctx: &Context<'_>) -> Result<Vec<OrderObject>> {
        let orders = resolvers(ctx)?
            .orders(request_context(ctx)?)
            .await
            .map_err(|e| e.extend())?;
        Ok(orders.into_iter().map(OrderObject).collect())
    }
}

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn create_item(
        &self,
        ctx: &Context<'_>,
        title: String,
        description: String,
        price: i32,
        image: Option<String>,
        large_image: Option<String>,
    ) -> Result<ItemObject> {
        let input = CreateItem {
            title,
            description,
            image,
            large_image,
            price,
        };
        let item = resolvers(ctx)?
            .create_item(request_context(ctx)?, input)
            .await
            .map_err(|e| e.extend())?;
        Ok(ItemObject(item))
    }

    /// Only the provided fields change
    async fn update_item(
        &self,
        ctx: &Context<'_>,
        id: ID,
        title: Option<String>,
        description: Option<String>,
        price: Option<i32>,
        image: Option<String>,
        large_image: Option<String>,
    ) -> Result<ItemObject> {
        let id = parse_id(&id)?;
        let changes = ItemChanges {
            title,
            description,
            image,
            large_image,
            price,
        };
        let item = resolvers(ctx)?
            .update_item(request_context(ctx)?, id, changes)
            .await
            .map_err(|e| e.extend())?;
        Ok(ItemObject(item))
    }

    async fn delete_item(&self, ctx: &Context<'_>, id: ID) -> Result<ItemObject> {
        let id = parse_id(&id)?;
        let item = resolvers(ctx)?
            .delete_item(request_context(ctx)?, id)
            .await
            .map_err(|e| e.extend())?;
        Ok(ItemObject(item))
    }

    async fn signup(
        &self,
        ctx: &Context<'_>,
        email: String,
        password: String,
        name: String,
    ) -> Result<UserObject> {
        let user = resolvers(ctx)?
            .signup(request_context(ctx)?, &email, &name, &password)
            .await
            .map_err(|e| e.extend())?;
        Ok(UserObject(user))
    }

    async fn signin(&self, ctx: &Context<'_>, email: String, password: String) -> Result<UserObject> {
        let user = resolvers(ctx)?
            .signin(request_context(ctx)?, &email, &password)
            .await
            .map_err(|e| e.extend())?;
        Ok(UserObject(user))
    }

    async fn signout(&self, ctx: &Context<'_>) -> Result<SuccessMessage> {
        Ok(resolvers(ctx)?.signout(request_context(ctx)?).into())
    }

    async fn request_reset(&self, ctx: &Context<'_>, email: String) -> Result<SuccessMessage> {
        let message = resolvers(ctx)?
            .request_reset(&email)
            .await
            .map_err(|e| e.extend())?;
        Ok(message.into())
    }

    async fn reset_password(
        &self,
        ctx: &Context<'_>,
        reset_token: String,
        password: String,
        confirm_password: String,
    ) -> Result<UserObject> {
        let user = resolvers(ctx)?
            .reset_password(request_context(ctx)?, &reset_token, &password, &confirm_password)
            .await
            .map_err(|e| e.extend())?;
        Ok(UserObject(user))
    }

    async fn update_permissions(
        &self,
        ctx: &Context<'_>,
        user_id: ID,
        permissions: Vec<PermissionValue>,
    ) -> Result<UserObject> {
        let user_id = parse_id(&user_id)?;
        let permissions = permissions.into_iter().map(Into::into).collect();
        let user = resolvers(ctx)?
            .update_permissions(request_context(ctx)?, user_id, permissions)
            .await
            .map_err(|e| e.extend())?;
        Ok(UserObject(user))
    }

    /// Add one of item `id` to the caller's cart
    async fn add_to_cart(&self, ctx: &Context<'_>, id: ID) -> Result<CartItemObject> {
        let id = parse_id(&id)?;
        let line = resolvers(ctx)?
            .add_to_cart(request_context(ctx)?, id)
            .await
            .map_err(|e| e.extend())?;
        Ok(CartItemObject(line))
    }

    /// Remove cart line `id`
    async fn remove_from_cart(&self, ctx: &Context<'_>, id: ID) -> Result<CartItemObject> {
        let id = parse_id(&id)?;
        let line = resolvers(ctx)?
            .remove_from_cart(request_context(ctx)?, id)
            .await
            .map_err(|e| e.extend())?;
        Ok(CartItemObject(line))
    }

    /// Check out the caller's cart
    async fn create_order(&self, ctx: &Context<'_>) -> Result<OrderObject> {
        let order = resolvers(ctx)?
            .create_order(request_context(ctx)?)
            .await
            .map_err(|e| e.extend())?;
        Ok(OrderObject(order))
    }
}
