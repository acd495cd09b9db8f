// =====================================
// tests/integration/persistence_tests.rs
// =====================================
//! Flat-file storage survives a restart
use crate::test_utils::TestApp;
use backend_lib::storage::STORE_FILE;
use serde_json::json;
use tempfile::tempdir;

#[tokio::test]
async fn test_state_survives_restart() {
    let dir = tempdir().unwrap();

    let (user_id, token, item_id) = {
        let app = TestApp::with_flat_file(dir.path());
        let (user_id, token) = app.signup("keeper@example.com", "secret").await;
        let item_id = app.create_item(&token, "Lamp", 4200).await;
        (user_id, token, item_id)
    };
    assert!(dir.path().join(STORE_FILE).exists());

    let app = TestApp::with_flat_file(dir.path());

    // Sessions are stateless, so the old cookie still works
    let reply = app.graphql("{ me { id } }", Some(&token)).await;
    assert_eq!(reply.data()["me"]["id"], user_id.as_str());

    let reply = app
        .graphql_with(
            "query($id: ID!) { item(id: $id) { title price } }",
            json!({ "id": item_id }),
            None,
        )
        .await;
    assert_eq!(reply.data()["item"]["title"], "Lamp");

    let reply = app
        .graphql(
            r#"mutation { signin(email: "keeper@example.com", password: "secret") { id } }"#,
            None,
        )
        .await;
    assert_eq!(reply.data()["signin"]["id"], user_id.as_str());
}
