use accounts_adapters::http::ErrorResponse;
use chrono::{Duration, Utc};
use serde_json::json;

use crate::helpers::{PASSWORD, TestApp};

#[tokio::test]
async fn should_return_tokens_with_expirations() {
    let app = TestApp::new().await;
    app.register_verified("alice@example.com").await;

    let tokens = app.login("alice@example.com", PASSWORD).await;

    assert!(!tokens.access.is_empty());
    assert!(!tokens.refresh.is_empty());
    let access_ttl = tokens.access_token_expiration - Utc::now();
    assert!(access_ttl <= Duration::minutes(5) && access_ttl > Duration::minutes(4));
    assert!(tokens.refresh_token_expiration > tokens.access_token_expiration);
}

#[tokio::test]
async fn should_accept_username_in_any_case() {
    let app = TestApp::new().await;
    app.register_verified("alice@example.com").await;

    app.login(" ALICE@example.com ", PASSWORD).await;
}

#[tokio::test]
async fn should_return_403_for_unverified_account() {
    let app = TestApp::new().await;
    app.register("alice@example.com").await;

    let response = app
        .post_login(&json!({ "username": "alice@example.com", "password": PASSWORD }))
        .await;

    assert_eq!(response.status().as_u16(), 403);
    let body = response.json::<ErrorResponse>().await.unwrap();
    assert_eq!(body.code, "account_not_verified");
}

#[tokio::test]
async fn should_return_423_for_disabled_account() {
    let app = TestApp::new().await;
    app.register_verified("alice@example.com").await;
    let user_id = app.user_id("alice@example.com").await;
    app.user_store.deactivate_user(user_id).await.unwrap();

    let response = app
        .post_login(&json!({ "username": "alice@example.com", "password": PASSWORD }))
        .await;

    assert_eq!(response.status().as_u16(), 423);
}

#[tokio::test]
async fn should_not_reveal_whether_the_user_exists() {
    let app = TestApp::new().await;
    app.register_verified("alice@example.com").await;

    let wrong_password = app
        .post_login(&json!({ "username": "alice@example.com", "password": "wrong-password" }))
        .await;
    let unknown_user = app
        .post_login(&json!({ "username": "bob@example.com", "password": PASSWORD }))
        .await;

    assert_eq!(wrong_password.status().as_u16(), 401);
    assert_eq!(unknown_user.status().as_u16(), 401);
    let wrong_password = wrong_password.json::<ErrorResponse>().await.unwrap();
    let unknown_user = unknown_user.json::<ErrorResponse>().await.unwrap();
    assert_eq!(wrong_password.error, unknown_user.error);
    assert_eq!(wrong_password.code, "invalid_credentials");
}
