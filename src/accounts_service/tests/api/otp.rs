use std::time::Duration as StdDuration;

use accounts_adapters::http::ErrorResponse;
use accounts_core::{OtpPolicy, OtpPurpose, UserStore};
use chrono::Duration;
use serde_json::json;

use crate::helpers::{PASSWORD, TestApp};

fn reset_request(email: &str) -> serde_json::Value {
    json!({ "email": email, "purpose": "reset_password" })
}

#[tokio::test]
async fn should_verify_the_account_with_the_registration_code() {
    let app = TestApp::new().await;
    app.register("alice@example.com").await;
    let code = app
        .latest_code("alice@example.com", OtpPurpose::Register)
        .await
        .unwrap();

    let response = app
        .post_check_otp(&json!({ "email": "alice@example.com", "otp": code, "purpose": "register" }))
        .await;

    assert_eq!(response.status().as_u16(), 200);
    let user_id = app.user_id("alice@example.com").await;
    assert!(app.user_store.get_user(user_id).await.unwrap().is_verified());
    assert_eq!(
        app.latest_code("alice@example.com", OtpPurpose::Register)
            .await,
        None
    );
    app.login("alice@example.com", PASSWORD).await;
}

#[tokio::test]
async fn should_mail_a_requested_code() {
    let app = TestApp::new().await;
    app.register("alice@example.com").await;

    let response = app.post_otp_request(&reset_request("alice@example.com")).await;

    assert_eq!(response.status().as_u16(), 201);
    let code = app
        .latest_code("alice@example.com", OtpPurpose::ResetPassword)
        .await
        .unwrap();
    let email = app
        .email_client
        .last_email_to("alice@example.com")
        .await
        .unwrap();
    assert!(email.content.contains(&code));
}

#[tokio::test]
async fn should_supersede_the_previous_code() {
    let app = TestApp::new().await;
    app.register("alice@example.com").await;

    app.post_otp_request(&reset_request("alice@example.com")).await;
    let first = app
        .latest_code("alice@example.com", OtpPurpose::ResetPassword)
        .await
        .unwrap();
    app.post_otp_request(&reset_request("alice@example.com")).await;
    let second = app
        .latest_code("alice@example.com", OtpPurpose::ResetPassword)
        .await
        .unwrap();

    if first != second {
        let response = app
            .post_check_otp(&json!({
                "email": "alice@example.com", "otp": first, "purpose": "reset_password"
            }))
            .await;
        assert_eq!(response.status().as_u16(), 400);
    }

    let response = app
        .post_check_otp(&json!({
            "email": "alice@example.com", "otp": second, "purpose": "reset_password"
        }))
        .await;
    assert_eq!(response.status().as_u16(), 200);
}

#[tokio::test]
async fn should_return_429_on_the_fourth_request_within_the_window() {
    let app = TestApp::new().await;
    app.register("alice@example.com").await;

    for _ in 0..3 {
        let response = app.post_otp_request(&reset_request("alice@example.com")).await;
        assert_eq!(response.status().as_u16(), 201);
    }
    let response = app.post_otp_request(&reset_request("alice@example.com")).await;

    assert_eq!(response.status().as_u16(), 429);
    let error = response.json::<ErrorResponse>().await.unwrap();
    assert_eq!(error.code, "rate_limit_exceeded");
}

#[tokio::test]
async fn should_return_404_for_an_unknown_email() {
    let app = TestApp::new().await;

    let response = app.post_otp_request(&reset_request("nobody@example.com")).await;

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn should_return_400_for_an_unknown_purpose() {
    let app = TestApp::new().await;
    app.register("alice@example.com").await;

    let response = app
        .post_otp_request(&json!({ "email": "alice@example.com", "purpose": "login" }))
        .await;

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn should_reject_an_expired_code() {
    let app = TestApp::with_otp_policy(OtpPolicy {
        code_ttl: Duration::zero(),
        ..OtpPolicy::default()
    })
    .await;
    app.register("alice@example.com").await;
    app.post_otp_request(&reset_request("alice@example.com")).await;
    let code = app
        .latest_code("alice@example.com", OtpPurpose::ResetPassword)
        .await
        .unwrap();

    tokio::time::sleep(StdDuration::from_millis(20)).await;
    let response = app
        .post_check_otp(&json!({
            "email": "alice@example.com", "otp": code, "purpose": "reset_password"
        }))
        .await;

    assert_eq!(response.status().as_u16(), 400);
    let error = response.json::<ErrorResponse>().await.unwrap();
    assert_eq!(error.code, "otp_invalid_or_expired");
}

#[tokio::test]
async fn should_not_accept_a_code_for_another_purpose() {
    let app = TestApp::new().await;
    app.register("alice@example.com").await;
    let code = app
        .latest_code("alice@example.com", OtpPurpose::Register)
        .await
        .unwrap();

    let response = app
        .post_check_otp(&json!({
            "email": "alice@example.com", "otp": code, "purpose": "reset_password"
        }))
        .await;

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn should_return_400_for_a_malformed_code() {
    let app = TestApp::new().await;
    app.register("alice@example.com").await;

    let response = app
        .post_check_otp(&json!({ "email": "alice@example.com", "otp": "12a4", "purpose": "register" }))
        .await;

    assert_eq!(response.status().as_u16(), 400);
    let error = response.json::<ErrorResponse>().await.unwrap();
    assert_eq!(error.code, "validation_error");
}
