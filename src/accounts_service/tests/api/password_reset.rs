use accounts_adapters::http::ErrorResponse;
use accounts_core::OtpPurpose;
use serde_json::json;

use crate::helpers::{PASSWORD, TestApp};

const NEW_PASSWORD: &str = "freshly-reset-password";

fn confirm_body(password: &str, confirmation: &str) -> serde_json::Value {
    json!({
        "email": "alice@example.com",
        "new_password": password,
        "new_password2": confirmation,
    })
}

async fn app_with_checked_reset_code() -> TestApp {
    let app = TestApp::new().await;
    app.register_verified("alice@example.com").await;
    app.post_otp_request(&json!({ "email": "alice@example.com", "purpose": "reset_password" }))
        .await;
    let code = app
        .latest_code("alice@example.com", OtpPurpose::ResetPassword)
        .await
        .unwrap();
    let response = app
        .post_check_otp(&json!({
            "email": "alice@example.com", "otp": code, "purpose": "reset_password"
        }))
        .await;
    assert_eq!(response.status().as_u16(), 200);
    app
}

#[tokio::test]
async fn should_reset_the_password_after_a_checked_code() {
    let app = app_with_checked_reset_code().await;

    let response = app
        .post_password_reset_confirm(&confirm_body(NEW_PASSWORD, NEW_PASSWORD))
        .await;

    assert_eq!(response.status().as_u16(), 200);
    app.login("alice@example.com", NEW_PASSWORD).await;
    let response = app
        .post_login(&json!({ "username": "alice@example.com", "password": PASSWORD }))
        .await;
    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn should_only_confirm_once() {
    let app = app_with_checked_reset_code().await;
    app.post_password_reset_confirm(&confirm_body(NEW_PASSWORD, NEW_PASSWORD))
        .await;

    let response = app
        .post_password_reset_confirm(&confirm_body("yet-another-password", "yet-another-password"))
        .await;

    assert_eq!(response.status().as_u16(), 400);
    let error = response.json::<ErrorResponse>().await.unwrap();
    assert_eq!(error.code, "otp_invalid_or_expired");
}

#[tokio::test]
async fn should_require_a_checked_code() {
    let app = TestApp::new().await;
    app.register_verified("alice@example.com").await;
    app.post_otp_request(&json!({ "email": "alice@example.com", "purpose": "reset_password" }))
        .await;

    let response = app
        .post_password_reset_confirm(&confirm_body(NEW_PASSWORD, NEW_PASSWORD))
        .await;

    assert_eq!(response.status().as_u16(), 400);
    let error = response.json::<ErrorResponse>().await.unwrap();
    assert_eq!(error.code, "otp_invalid_or_expired");
}

#[tokio::test]
async fn should_still_confirm_after_requesting_another_code() {
    let app = app_with_checked_reset_code().await;
    let response = app
        .post_otp_request(&json!({ "email": "alice@example.com", "purpose": "reset_password" }))
        .await;
    assert_eq!(response.status().as_u16(), 201);

    let response = app
        .post_password_reset_confirm(&confirm_body(NEW_PASSWORD, NEW_PASSWORD))
        .await;

    assert_eq!(response.status().as_u16(), 200);
    app.login("alice@example.com", NEW_PASSWORD).await;
}

#[tokio::test]
async fn should_return_400_when_passwords_differ() {
    let app = app_with_checked_reset_code().await;

    let response = app
        .post_password_reset_confirm(&confirm_body(NEW_PASSWORD, "something-else-entirely"))
        .await;

    assert_eq!(response.status().as_u16(), 400);
    let error = response.json::<ErrorResponse>().await.unwrap();
    assert_eq!(error.code, "validation_error");

    let response = app
        .post_password_reset_confirm(&confirm_body(NEW_PASSWORD, NEW_PASSWORD))
        .await;
    assert_eq!(response.status().as_u16(), 200);
}
