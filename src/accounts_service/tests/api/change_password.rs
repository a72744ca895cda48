use serde_json::json;

use crate::helpers::{PASSWORD, TestApp};

const NEW_PASSWORD: &str = "a-brand-new-password";

#[tokio::test]
async fn should_switch_credentials_to_the_new_password() {
    let app = TestApp::new().await;
    app.register_verified("alice@example.com").await;
    let tokens = app.login("alice@example.com", PASSWORD).await;

    let response = app
        .put_change_password(
            &tokens.access,
            &json!({ "old_password": PASSWORD, "new_password": NEW_PASSWORD }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 200);

    app.login("alice@example.com", NEW_PASSWORD).await;
    let response = app
        .post_login(&json!({ "username": "alice@example.com", "password": PASSWORD }))
        .await;
    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn should_return_401_for_a_wrong_old_password() {
    let app = TestApp::new().await;
    app.register_verified("alice@example.com").await;
    let tokens = app.login("alice@example.com", PASSWORD).await;

    let response = app
        .put_change_password(
            &tokens.access,
            &json!({ "old_password": "not-my-password", "new_password": NEW_PASSWORD }),
        )
        .await;

    assert_eq!(response.status().as_u16(), 401);
    app.login("alice@example.com", PASSWORD).await;
}

#[tokio::test]
async fn should_return_400_for_a_too_short_new_password() {
    let app = TestApp::new().await;
    app.register_verified("alice@example.com").await;
    let tokens = app.login("alice@example.com", PASSWORD).await;

    let response = app
        .put_change_password(
            &tokens.access,
            &json!({ "old_password": PASSWORD, "new_password": "short" }),
        )
        .await;

    assert_eq!(response.status().as_u16(), 400);
}
