use serde_json::json;

use crate::helpers::{PASSWORD, TestApp};

#[tokio::test]
async fn should_reject_the_access_token_after_logout() {
    let app = TestApp::new().await;
    app.register_verified("alice@example.com").await;
    let tokens = app.login("alice@example.com", PASSWORD).await;

    let response = app.post_logout(&tokens.access, &json!({})).await;
    assert_eq!(response.status().as_u16(), 200);

    let response = app.get_profile(&tokens.access).await;
    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn should_also_ban_the_refresh_token_when_sent() {
    let app = TestApp::new().await;
    app.register_verified("alice@example.com").await;
    let tokens = app.login("alice@example.com", PASSWORD).await;

    app.post_logout(&tokens.access, &json!({ "refresh": tokens.refresh }))
        .await;

    let response = app.post_refresh(&json!({ "refresh": tokens.refresh })).await;
    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn should_return_401_without_a_token() {
    let app = TestApp::new().await;

    let response = app
        .http_client
        .post(format!("{}/logout", &app.address))
        .json(&json!({}))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn should_return_401_for_a_garbage_token() {
    let app = TestApp::new().await;

    let response = app.post_logout("not-a-jwt", &json!({})).await;

    assert_eq!(response.status().as_u16(), 401);
}
