// ===================================
// tests/integration/auth_flow_tests.rs
// ===================================
//! Signup, signin, signout and password reset over HTTP
use crate::test_utils::{TestApp, TEST_SECRET};
use axum::http::StatusCode;
use backend_lib::auth::SessionTokens;
use secrecy::SecretString;
use serde_json::json;

const ME: &str = "{ me { id email permissions } }";

#[tokio::test]
async fn test_signup_sets_cookie_for_new_user() {
    let app = TestApp::new();

    let reply = app
        .graphql(
            r#"mutation { signup(email: "A@X.com", password: "secret", name: "Al") { id email permissions } }"#,
            None,
        )
        .await;

    assert_eq!(reply.status, StatusCode::OK);
    let user = &reply.data()["signup"];
    assert_eq!(user["email"], "a@x.com");
    assert_eq!(user["permissions"], json!(["USER"]));

    let token = reply.session_token().expect("no session cookie");
    let tokens = SessionTokens::new(&SecretString::from(TEST_SECRET.to_string()));
    assert_eq!(
        tokens.verify(&token).unwrap().to_string(),
        user["id"].as_str().unwrap()
    );

    let cookie = reply
        .headers
        .get_all("set-cookie")
        .iter()
        .find_map(|v| v.to_str().ok().filter(|v| v.starts_with("token=")))
        .unwrap()
        .to_string();
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("Path=/"));
    assert!(cookie.contains("Max-Age=31536000"));
}

#[tokio::test]
async fn test_cookie_identifies_caller() {
    let app = TestApp::new();
    let (id, token) = app.signup("me@example.com", "secret").await;

    let reply = app.graphql(ME, Some(&token)).await;
    assert_eq!(reply.data()["me"]["id"], id.as_str());

    let reply = app.graphql(ME, None).await;
    assert!(reply.data()["me"].is_null());

    let reply = app.graphql(ME, Some("forged.token.value")).await;
    assert!(reply.data()["me"].is_null());
}

#[tokio::test]
async fn test_signin_wrong_password_sets_no_cookie() {
    let app = TestApp::new();
    app.signup("a@x.com", "secret").await;

    let reply = app
        .graphql(
            r#"mutation { signin(email: "a@x.com", password: "wrong") { id } }"#,
            None,
        )
        .await;
    assert_eq!(reply.error_code(), Some("AUTH_003"));
    assert!(reply.session_token().is_none());

    let reply = app
        .graphql(
            r#"mutation { signin(email: "A@x.com", password: "secret") { email } }"#,
            None,
        )
        .await;
    assert_eq!(reply.data()["signin"]["email"], "a@x.com");
    assert!(reply.session_token().is_some());
}

#[tokio::test]
async fn test_signout_clears_cookie() {
    let app = TestApp::new();
    let (_, token) = app.signup("a@x.com", "secret").await;

    let reply = app
        .graphql("mutation { signout { message } }", Some(&token))
        .await;
    assert_eq!(reply.data()["signout"]["message"], "Goodbye!");
    assert!(reply.clears_session());
}

#[tokio::test]
async fn test_duplicate_signup_is_rejected() {
    let app = TestApp::new();
    app.signup("a@x.com", "secret").await;

    let reply = app
        .graphql(
            r#"mutation { signup(email: "a@X.com", password: "other", name: "B") { id } }"#,
            None,
        )
        .await;
    assert_eq!(reply.error_code(), Some("STORE_001"));
    assert!(reply.session_token().is_none());
}

#[tokio::test]
async fn test_password_reset_flow() {
    let app = TestApp::new();
    let (id, _) = app.signup("forgetful@example.com", "old-password").await;

    let reply = app
        .graphql(
            r#"mutation { requestReset(email: "Forgetful@example.com") { message } }"#,
            None,
        )
        .await;
    assert_eq!(reply.data()["requestReset"]["message"], "Thanks!");

    let sent = app.mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "forgetful@example.com");
    assert!(sent[0].html.contains("http://shop.test/reset?resetToken="));
    let reset_token = app.mailer.last_reset_token().unwrap();
    assert_eq!(reset_token.len(), 40);

    let reset = "mutation($t: String!, $p: String!, $c: String!) {
        resetPassword(resetToken: $t, password: $p, confirmPassword: $c) { id }
    }";

    // Mismatch is rejected before the token is looked at
    let reply = app
        .graphql_with(
            reset,
            json!({ "t": reset_token, "p": "new1", "c": "new2" }),
            None,
        )
        .await;
    assert_eq!(reply.error_code(), Some("VAL_001"));

    let reply = app
        .graphql_with(
            reset,
            json!({ "t": reset_token, "p": "new-password", "c": "new-password" }),
            None,
        )
        .await;
    assert_eq!(reply.data()["resetPassword"]["id"], id.as_str());
    assert!(reply.session_token().is_some());

    // The token is spent
    let reply = app
        .graphql_with(
            reset,
            json!({ "t": reset_token, "p": "again", "c": "again" }),
            None,
        )
        .await;
    assert_eq!(reply.error_code(), Some("NF_001"));

    let reply = app
        .graphql(
            r#"mutation { signin(email: "forgetful@example.com", password: "new-password") { id } }"#,
            None,
        )
        .await;
    assert_eq!(reply.data()["signin"]["id"], id.as_str());
}

#[tokio::test]
async fn test_request_reset_for_unknown_email() {
    let app = TestApp::new();

    let reply = app
        .graphql(
            r#"mutation { requestReset(email: "nobody@example.com") { message } }"#,
            None,
        )
        .await;
    assert_eq!(reply.data()["requestReset"]["message"], "Thanks!");
    assert!(app.mailer.sent().is_empty());
}

#[tokio::test]
async fn test_mail_failure_does_not_reveal_account() {
    let app = TestApp::with_failing_mail();
    app.signup("a@x.com", "secret").await;

    for email in ["a@x.com", "nobody@x.com"] {
        let reply = app
            .graphql_with(
                "mutation($email: String!) { requestReset(email: $email) { message } }",
                json!({ "email": email }),
                None,
            )
            .await;
        assert!(reply.body.get("errors").is_none(), "{email}");
        assert_eq!(reply.data()["requestReset"]["message"], "Thanks!");
    }
}
