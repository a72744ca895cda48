use accounts_adapters::http::{ApiResponse, ErrorResponse, routes::profile::ProfileBody};
use serde_json::json;

use crate::helpers::{PASSWORD, TestApp};

async fn logged_in_app() -> (TestApp, String) {
    let app = TestApp::new().await;
    app.register_verified("alice@example.com").await;
    let tokens = app.login("alice@example.com", PASSWORD).await;
    (app, tokens.access)
}

#[tokio::test]
async fn should_return_the_empty_profile_created_at_registration() {
    let (app, access) = logged_in_app().await;

    let response = app.get_profile(&access).await;

    assert_eq!(response.status().as_u16(), 200);
    let profile = response
        .json::<ApiResponse<ProfileBody>>()
        .await
        .unwrap()
        .body;
    assert_eq!(profile.first_name, "Alice");
    assert_eq!(profile.email, "alice@example.com");
    assert_eq!(profile.telephone_number, "");
    assert_eq!(profile.profile_picture, None);
    assert_eq!(profile.address.country, "");
    assert_eq!(profile.address.city, "");
}

#[tokio::test]
async fn should_only_change_the_fields_sent() {
    let (app, access) = logged_in_app().await;

    let response = app
        .patch_profile(
            &access,
            &json!({
                "telephone_number": "0612345678",
                "profile_picture": "avatars/alice.png",
                "address": { "city": "Oxford", "country": "United Kingdom" }
            }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 200);

    let response = app
        .put_profile(&access, &json!({ "address": { "postal_code": "OX1 1DP" } }))
        .await;
    let profile = response
        .json::<ApiResponse<ProfileBody>>()
        .await
        .unwrap()
        .body;

    assert_eq!(profile.first_name, "Alice");
    assert_eq!(profile.telephone_number, "0612345678");
    assert_eq!(profile.profile_picture.as_deref(), Some("avatars/alice.png"));
    assert_eq!(profile.address.city, "Oxford");
    assert_eq!(profile.address.country, "United Kingdom");
    assert_eq!(profile.address.postal_code, "OX1 1DP");
}

#[tokio::test]
async fn should_keep_the_email_read_only() {
    let (app, access) = logged_in_app().await;

    let response = app
        .patch_profile(&access, &json!({ "email": "mallory@example.com" }))
        .await;

    let profile = response
        .json::<ApiResponse<ProfileBody>>()
        .await
        .unwrap()
        .body;
    assert_eq!(profile.email, "alice@example.com");
}

#[tokio::test]
async fn should_return_400_for_invalid_fields() {
    let (app, access) = logged_in_app().await;

    let test_cases = [
        json!({ "telephone_number": "12345" }),
        json!({ "first_name": "" }),
        json!({ "address": { "postal_code": "x".repeat(21) } }),
    ];

    for body in test_cases {
        let response = app.patch_profile(&access, &body).await;
        assert_eq!(response.status().as_u16(), 400, "Failed for input: {body}");
        let error = response.json::<ErrorResponse>().await.unwrap();
        assert_eq!(error.code, "validation_error");
    }
}

#[tokio::test]
async fn should_return_401_without_a_token() {
    let app = TestApp::new().await;

    let response = app
        .http_client
        .get(format!("{}/profile", &app.address))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(response.status().as_u16(), 401);
    let error = response.json::<ErrorResponse>().await.unwrap();
    assert_eq!(error.code, "unauthorized");
}
