use accounts_adapters::http::routes::refresh_token::RefreshTokenResponse;
use serde_json::json;

use crate::helpers::{PASSWORD, TestApp};

#[tokio::test]
async fn should_issue_a_working_access_token() {
    let app = TestApp::new().await;
    app.register_verified("alice@example.com").await;
    let tokens = app.login("alice@example.com", PASSWORD).await;

    let response = app.post_refresh(&json!({ "refresh": tokens.refresh })).await;

    assert_eq!(response.status().as_u16(), 200);
    let refreshed = response.json::<RefreshTokenResponse>().await.unwrap();
    let response = app.get_profile(&refreshed.access).await;
    assert_eq!(response.status().as_u16(), 200);
}

#[tokio::test]
async fn should_reject_an_access_token() {
    let app = TestApp::new().await;
    app.register_verified("alice@example.com").await;
    let tokens = app.login("alice@example.com", PASSWORD).await;

    let response = app.post_refresh(&json!({ "refresh": tokens.access })).await;

    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn should_not_accept_a_refresh_token_as_bearer() {
    let app = TestApp::new().await;
    app.register_verified("alice@example.com").await;
    let tokens = app.login("alice@example.com", PASSWORD).await;

    let response = app.get_profile(&tokens.refresh).await;

    assert_eq!(response.status().as_u16(), 401);
}
