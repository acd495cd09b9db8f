// ===================================
// tests/integration/item_flow_tests.rs
// ===================================
//! Item CRUD and permission-gated administration over HTTP
use crate::test_utils::TestApp;
use backend_lib::storage::UserChanges;
use serde_json::json;
use shopfront_common::{Permission, PermissionSet};
use uuid::Uuid;

const UPDATE_PRICE: &str = "mutation($id: ID!, $price: Int) {
    updateItem(id: $id, price: $price) { id title price }
}";
const DELETE: &str = "mutation($id: ID!) { deleteItem(id: $id) { id } }";

/// Give `user_id` exactly `permissions`, bypassing the API
async fn grant(app: &TestApp, user_id: &str, permissions: &[Permission]) {
    app.storage
        .update_user(
            Uuid::parse_str(user_id).unwrap(),
            UserChanges {
                permissions: Some(permissions.iter().copied().collect::<PermissionSet>()),
                ..UserChanges::default()
            },
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_create_item_requires_sign_in() {
    let app = TestApp::new();
    let reply = app
        .graphql(
            r#"mutation { createItem(title: "Hat", description: "d", price: 100) { id } }"#,
            None,
        )
        .await;
    assert_eq!(reply.error_code(), Some("AUTH_001"));
}

#[tokio::test]
async fn test_item_owner_is_creator() {
    let app = TestApp::new();
    let (user_id, token) = app.signup("seller@example.com", "secret").await;
    let item_id = app.create_item(&token, "Hat", 1500).await;

    let reply = app
        .graphql_with(
            "query($id: ID!) { item(id: $id) { title price user { id } } }",
            json!({ "id": item_id }),
            None,
        )
        .await;
    assert_eq!(reply.data()["item"]["title"], "Hat");
    assert_eq!(reply.data()["item"]["price"], 1500);
    assert_eq!(reply.data()["item"]["user"]["id"], user_id.as_str());
}

#[tokio::test]
async fn test_update_item_owner_or_permission() {
    let app = TestApp::new();
    let (_, owner) = app.signup("owner@example.com", "secret").await;
    let (stranger_id, stranger) = app.signup("stranger@example.com", "secret").await;
    let item_id = app.create_item(&owner, "Hat", 1500).await;

    let reply = app
        .graphql_with(UPDATE_PRICE, json!({ "id": item_id, "price": 1 }), Some(&stranger))
        .await;
    assert_eq!(reply.error_code(), Some("AUTH_002"));

    let reply = app
        .graphql_with(UPDATE_PRICE, json!({ "id": item_id, "price": 1 }), None)
        .await;
    assert_eq!(reply.error_code(), Some("AUTH_001"));

    let reply = app
        .graphql_with(UPDATE_PRICE, json!({ "id": item_id, "price": 1200 }), Some(&owner))
        .await;
    assert_eq!(reply.data()["updateItem"]["price"], 1200);
    assert_eq!(reply.data()["updateItem"]["title"], "Hat");

    // Permissions are read fresh from the store on every request
    grant(&app, &stranger_id, &[Permission::User, Permission::ItemUpdate]).await;
    let reply = app
        .graphql_with(UPDATE_PRICE, json!({ "id": item_id, "price": 900 }), Some(&stranger))
        .await;
    assert_eq!(reply.data()["updateItem"]["price"], 900);
}

#[tokio::test]
async fn test_delete_item_owner_or_permission() {
    let app = TestApp::new();
    let (_, owner) = app.signup("owner@example.com", "secret").await;
    let (deleter_id, deleter) = app.signup("deleter@example.com", "secret").await;
    let first = app.create_item(&owner, "Hat", 1500).await;
    let second = app.create_item(&owner, "Scarf", 900).await;

    let reply = app
        .graphql_with(DELETE, json!({ "id": first }), Some(&deleter))
        .await;
    assert_eq!(reply.error_code(), Some("AUTH_002"));

    let reply = app.graphql_with(DELETE, json!({ "id": first }), Some(&owner)).await;
    assert_eq!(reply.data()["deleteItem"]["id"], first.as_str());

    grant(&app, &deleter_id, &[Permission::ItemDelete]).await;
    let reply = app
        .graphql_with(DELETE, json!({ "id": second }), Some(&deleter))
        .await;
    assert_eq!(reply.data()["deleteItem"]["id"], second.as_str());

    let reply = app.graphql_with(DELETE, json!({ "id": first }), Some(&owner)).await;
    assert_eq!(reply.error_code(), Some("NF_001"));

    let reply = app
        .graphql("{ itemsConnection { aggregate { count } } }", None)
        .await;
    assert_eq!(reply.data()["itemsConnection"]["aggregate"]["count"], 0);
}

#[tokio::test]
async fn test_items_pagination_and_order() {
    let app = TestApp::new();
    let (_, token) = app.signup("seller@example.com", "secret").await;
    for (title, price) in [("Hat", 300), ("Scarf", 100), ("Gloves", 200)] {
        app.create_item(&token, title, price).await;
    }

    let reply = app
        .graphql(
            "{ items(orderBy: price_DESC, skip: 1, first: 1) { title } }",
            None,
        )
        .await;
    assert_eq!(reply.data()["items"], json!([{ "title": "Gloves" }]));

    let reply = app
        .graphql(r#"{ items(search: "SCA") { title } }"#, None)
        .await;
    assert_eq!(reply.data()["items"], json!([{ "title": "Scarf" }]));
}

#[tokio::test]
async fn test_permission_administration() {
    let app = TestApp::new();
    let (admin_id, admin) = app.signup("admin@example.com", "secret").await;
    let (user_id, user) = app.signup("user@example.com", "secret").await;

    let update = "mutation($id: ID!, $perms: [Permission!]!) {
        updatePermissions(userId: $id, permissions: $perms) { id permissions }
    }";

    let reply = app.graphql("{ users { id } }", Some(&user)).await;
    assert_eq!(reply.error_code(), Some("AUTH_002"));

    let reply = app
        .graphql_with(update, json!({ "id": admin_id, "perms": ["ADMIN"] }), Some(&user))
        .await;
    assert_eq!(reply.error_code(), Some("AUTH_002"));

    grant(&app, &admin_id, &[Permission::User, Permission::PermissionUpdate]).await;

    let reply = app.graphql("{ users { id } }", Some(&admin)).await;
    assert_eq!(reply.data()["users"].as_array().unwrap().len(), 2);

    let reply = app
        .graphql_with(
            update,
            json!({ "id": user_id, "perms": ["USER", "ITEMCREATE"] }),
            Some(&admin),
        )
        .await;
    let mut granted: Vec<String> = reply.data()["updatePermissions"]["permissions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p.as_str().unwrap().to_string())
        .collect();
    granted.sort();
    assert_eq!(granted, ["ITEMCREATE", "USER"]);

    let reply = app
        .graphql_with(update, json!({ "id": user_id, "perms": [] }), Some(&admin))
        .await;
    assert_eq!(reply.error_code(), Some("VAL_001"));
}

#[tokio::test]
async fn test_health_endpoint() {
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    let app = TestApp::new();
    let response = app
        .router
        .clone()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], b"Healthy");
}
