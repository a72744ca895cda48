use accounts_adapters::http::{ApiResponse, ErrorResponse, routes::register::PublicUser};
use accounts_core::OtpPurpose;
use fake::{Fake, faker::internet::en::SafeEmail};
use serde_json::json;

use crate::helpers::{PASSWORD, TestApp, registration_body};

#[tokio::test]
async fn should_return_201_with_the_public_user() {
    let app = TestApp::new().await;

    let response = app.register("Alice@Example.com").await;

    assert_eq!(response.status().as_u16(), 201);
    let body = response
        .json::<ApiResponse<PublicUser>>()
        .await
        .expect("Could not deserialize response body");
    assert_eq!(body.status_code, 201);
    assert_eq!(body.body.first_name, "Alice");
    assert_eq!(body.body.last_name, "Liddell");
    assert_eq!(body.body.email, "alice@example.com");
}

#[tokio::test]
async fn should_mail_the_registration_code() {
    let app = TestApp::new().await;
    let email: String = SafeEmail().fake();

    app.register(&email).await;

    let code = app
        .latest_code(&email, OtpPurpose::Register)
        .await
        .expect("registration issues a code");
    let welcome = app
        .email_client
        .last_email_to(&email.to_lowercase())
        .await
        .expect("a welcome email is sent");
    assert_eq!(welcome.subject, "Welcome to our platform!");
    assert!(welcome.content.contains(&code));
}

#[tokio::test]
async fn should_return_409_if_email_already_exists() {
    let app = TestApp::new().await;
    app.register("alice@example.com").await;

    let response = app.register("alice@example.com").await;

    assert_eq!(response.status().as_u16(), 409);
    let body = response.json::<ErrorResponse>().await.unwrap();
    assert_eq!(body.code, "user_already_exists");
}

#[tokio::test]
async fn should_return_400_for_invalid_input() {
    let app = TestApp::new().await;

    let mismatched = json!({
        "first_name": "Alice",
        "last_name": "Liddell",
        "email": "alice@example.com",
        "password": PASSWORD,
        "password2": "another-password",
    });
    let bad_email = registration_body("not-an-email");
    let mut short_password = registration_body("alice@example.com");
    short_password["password"] = json!("short");
    short_password["password2"] = json!("short");
    let mut blank_name = registration_body("alice@example.com");
    blank_name["first_name"] = json!("   ");

    for body in [mismatched, bad_email, short_password, blank_name] {
        let response = app.post_register(&body).await;
        assert_eq!(response.status().as_u16(), 400, "Failed for input: {body}");
        let error = response.json::<ErrorResponse>().await.unwrap();
        assert_eq!(error.code, "validation_error");
    }
}

#[tokio::test]
async fn should_return_400_for_malformed_body() {
    let app = TestApp::new().await;

    let response = app
        .post_register(&json!({ "email": "alice@example.com" }))
        .await;

    assert_eq!(response.status().as_u16(), 400);
}
