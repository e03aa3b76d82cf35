//! Registration, login and token handling

use crate::common::TestApp;
use serde_json::json;

fn register_body(username: &str, email: &str, role: &str) -> serde_json::Value {
    json!({
        "username": username,
        "email": email,
        "password": "sufficiently-long",
        "role": role,
        "phone": "+919876543210",
    })
}

#[tokio::test]
async fn register_returns_token_and_public_user() {
    let app = TestApp::new().await;

    let response = app
        .post_json(
            "/api/v1/auth/register",
            register_body("asha", "asha@example.com", "donor"),
        )
        .await;
    response.assert_created();

    let body = response.json();
    assert_eq!(body["message"], "Registration successful");
    assert_eq!(body["token_type"], "Bearer");
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(body["user"]["username"], "asha");
    assert_eq!(body["user"]["role"], "donor");
    assert!(body["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn duplicate_username_conflicts() {
    let app = TestApp::new().await;

    app.post_json(
        "/api/v1/auth/register",
        register_body("asha", "asha@example.com", "donor"),
    )
    .await
    .assert_created();

    let response = app
        .post_json(
            "/api/v1/auth/register",
            register_body("asha", "other@example.com", "donor"),
        )
        .await;
    response.assert_conflict();
}

#[tokio::test]
async fn duplicate_email_conflicts() {
    let app = TestApp::new().await;

    app.post_json(
        "/api/v1/auth/register",
        register_body("asha", "asha@example.com", "donor"),
    )
    .await
    .assert_created();

    app.post_json(
        "/api/v1/auth/register",
        register_body("other", "asha@example.com", "donor"),
    )
    .await
    .assert_conflict();
}

#[tokio::test]
async fn short_password_is_rejected() {
    let app = TestApp::new().await;

    let mut body = register_body("asha", "asha@example.com", "donor");
    body["password"] = json!("short");

    app.post_json("/api/v1/auth/register", body)
        .await
        .assert_bad_request();
}

#[tokio::test]
async fn login_accepts_username_or_email() {
    let app = TestApp::new().await;

    app.post_json(
        "/api/v1/auth/register",
        register_body("asha", "asha@example.com", "donor"),
    )
    .await
    .assert_created();

    let by_username = app
        .post_json(
            "/api/v1/auth/login",
            json!({"username": "asha", "password": "sufficiently-long"}),
        )
        .await;
    by_username.assert_ok();
    assert_eq!(by_username.json()["message"], "Login successful");

    let by_email = app
        .post_json(
            "/api/v1/auth/login",
            json!({"username": "asha@example.com", "password": "sufficiently-long"}),
        )
        .await;
    by_email.assert_ok();
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let app = TestApp::new().await;

    app.post_json(
        "/api/v1/auth/register",
        register_body("asha", "asha@example.com", "donor"),
    )
    .await
    .assert_created();

    app.post_json(
        "/api/v1/auth/login",
        json!({"username": "asha", "password": "wrong-password"}),
    )
    .await
    .assert_unauthorized();
}

#[tokio::test]
async fn unknown_user_is_unauthorized() {
    let app = TestApp::new().await;

    app.post_json(
        "/api/v1/auth/login",
        json!({"username": "nobody", "password": "whatever-long"}),
    )
    .await
    .assert_unauthorized();
}

#[tokio::test]
async fn me_requires_and_honors_token() {
    let app = TestApp::new().await;

    app.get("/api/v1/auth/me").await.assert_unauthorized();

    app.get_auth("/api/v1/auth/me", "garbage-token")
        .await
        .assert_unauthorized();

    let token = app.register_user("requester").await;
    let response = app.get_auth("/api/v1/auth/me", &token).await;
    response.assert_ok();
    assert_eq!(response.json()["role"], "requester");
}
