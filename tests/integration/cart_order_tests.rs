// ====================================
// tests/integration/cart_order_tests.rs
// ====================================
//! Cart and checkout over HTTP
use crate::test_utils::TestApp;
use serde_json::json;

const ADD: &str = "mutation($id: ID!) { addToCart(id: $id) { id quantity item { title } } }";
const REMOVE: &str = "mutation($id: ID!) { removeFromCart(id: $id) { id } }";
const CART: &str = "{ me { cart { id quantity item { id title price } } } }";

#[tokio::test]
async fn test_add_to_cart_twice_increments() {
    let app = TestApp::new();
    let (_, token) = app.signup("buyer@example.com", "secret").await;
    let item = app.create_item(&token, "Mug", 1200).await;

    let first = app.graphql_with(ADD, json!({ "id": item }), Some(&token)).await;
    assert_eq!(first.data()["addToCart"]["quantity"], 1);
    let second = app.graphql_with(ADD, json!({ "id": item }), Some(&token)).await;
    assert_eq!(second.data()["addToCart"]["quantity"], 2);
    assert_eq!(second.data()["addToCart"]["id"], first.data()["addToCart"]["id"]);

    let cart = app.graphql(CART, Some(&token)).await;
    let lines = cart.data()["me"]["cart"].as_array().unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["quantity"], 2);
    assert_eq!(lines[0]["item"]["title"], "Mug");
}

#[tokio::test]
async fn test_cart_requires_sign_in_and_known_item() {
    let app = TestApp::new();
    let (_, token) = app.signup("buyer@example.com", "secret").await;
    let item = app.create_item(&token, "Mug", 1200).await;

    let reply = app.graphql_with(ADD, json!({ "id": item }), None).await;
    assert_eq!(reply.error_code(), Some("AUTH_001"));

    let missing = "00000000-0000-4000-8000-000000000000";
    let reply = app.graphql_with(ADD, json!({ "id": missing }), Some(&token)).await;
    assert_eq!(reply.error_code(), Some("NF_001"));
}

#[tokio::test]
async fn test_remove_from_cart_is_owner_only() {
    let app = TestApp::new();
    let (_, buyer) = app.signup("buyer@example.com", "secret").await;
    let (_, other) = app.signup("other@example.com", "secret").await;
    let item = app.create_item(&buyer, "Mug", 1200).await;

    let added = app.graphql_with(ADD, json!({ "id": item }), Some(&buyer)).await;
    let line = added.data()["addToCart"]["id"].as_str().unwrap().to_string();

    let reply = app.graphql_with(REMOVE, json!({ "id": line }), Some(&other)).await;
    assert_eq!(reply.error_code(), Some("AUTH_002"));

    let reply = app.graphql_with(REMOVE, json!({ "id": line }), Some(&buyer)).await;
    assert_eq!(reply.data()["removeFromCart"]["id"], line.as_str());

    let reply = app.graphql_with(REMOVE, json!({ "id": line }), Some(&buyer)).await;
    assert_eq!(reply.error_code(), Some("NF_001"));
}

#[tokio::test]
async fn test_deleted_item_shows_as_null_in_cart() {
    let app = TestApp::new();
    let (_, token) = app.signup("buyer@example.com", "secret").await;
    let item = app.create_item(&token, "Mug", 1200).await;
    app.graphql_with(ADD, json!({ "id": item }), Some(&token)).await;

    app.graphql_with(
        "mutation($id: ID!) { deleteItem(id: $id) { id } }",
        json!({ "id": item }),
        Some(&token),
    )
    .await;

    let cart = app.graphql(CART, Some(&token)).await;
    assert!(cart.body.get("errors").is_none());
    assert!(cart.data()["me"]["cart"][0]["item"].is_null());
}

#[tokio::test]
async fn test_checkout_flow() {
    let app = TestApp::new();
    let (buyer_id, buyer) = app.signup("buyer@example.com", "secret").await;
    let (_, other) = app.signup("other@example.com", "secret").await;
    let mug = app.create_item(&buyer, "Mug", 1200).await;
    let hat = app.create_item(&buyer, "Hat", 500).await;
    for id in [&mug, &mug, &hat] {
        app.graphql_with(ADD, json!({ "id": id }), Some(&buyer)).await;
    }

    let reply = app
        .graphql(
            "mutation { createOrder { id total charge user { id } items { title price quantity } } }",
            Some(&buyer),
        )
        .await;
    let order = &reply.data()["createOrder"];
    assert_eq!(order["total"], 2900);
    assert!(order["charge"].is_null());
    assert_eq!(order["user"]["id"], buyer_id.as_str());
    assert_eq!(order["items"].as_array().unwrap().len(), 2);
    let order_id = order["id"].as_str().unwrap().to_string();

    let cart = app.graphql(CART, Some(&buyer)).await;
    assert_eq!(cart.data()["me"]["cart"], json!([]));

    let fetch = "query($id: ID!) { order(id: $id) { id total } }";
    let reply = app.graphql_with(fetch, json!({ "id": order_id }), Some(&buyer)).await;
    assert_eq!(reply.data()["order"]["total"], 2900);

    let reply = app.graphql_with(fetch, json!({ "id": order_id }), Some(&other)).await;
    assert_eq!(reply.error_code(), Some("AUTH_002"));

    let reply = app.graphql("{ orders { id } }", Some(&buyer)).await;
    assert_eq!(reply.data()["orders"][0]["id"], order_id.as_str());

    // Nothing left to check out
    let reply = app.graphql("mutation { createOrder { id } }", Some(&buyer)).await;
    assert_eq!(reply.error_code(), Some("VAL_001"));
}

#[tokio::test]
async fn test_seller_cart_not_visible_through_items() {
    let app = TestApp::new();
    let (_, seller) = app.signup("seller@example.com", "secret").await;
    let (_, other) = app.signup("other@example.com", "secret").await;
    let item = app.create_item(&seller, "Hat", 900).await;
    app.graphql_with(ADD, json!({ "id": item }), Some(&seller)).await;

    let query = "{ items { user { email permissions cart { quantity item { title } } } } }";
    for token in [None, Some(other.as_str())] {
        let reply = app.graphql(query, token).await;
        let user = &reply.data()["items"][0]["user"];
        assert!(user["email"].is_null());
        assert!(user["permissions"].is_null());
        assert_eq!(user["cart"], json!([]));
    }

    let reply = app.graphql(query, Some(&seller)).await;
    let user = &reply.data()["items"][0]["user"];
    assert_eq!(user["email"], "seller@example.com");
    assert_eq!(user["cart"][0]["item"]["title"], "Hat");
}
