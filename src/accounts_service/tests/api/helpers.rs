use accounts_adapters::{
    HashMapOtpStore, HashMapUserStore, HashSetBannedTokenStore, JwtConfig, JwtTokenIssuer,
    MockEmailClient,
    config::test,
    http::{ApiResponse, routes::login::LoginResponse},
};
use accounts_core::{Email, OtpPolicy, OtpPurpose, OtpStore, UserId, UserStore};
use accounts_service::AccountsService;
use chrono::Duration;
use secrecy::Secret;
use serde::Serialize;
use serde_json::json;
use tokio::net::TcpListener;

pub const PASSWORD: &str = "correct-horse-battery";

pub struct TestApp {
    pub address: String,
    pub http_client: reqwest::Client,
    pub user_store: HashMapUserStore,
    pub otp_store: HashMapOtpStore,
    pub email_client: MockEmailClient,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_otp_policy(OtpPolicy::default()).await
    }

    pub async fn with_otp_policy(otp_policy: OtpPolicy) -> Self {
        let user_store = HashMapUserStore::new();
        let otp_store = HashMapOtpStore::new();
        let email_client = MockEmailClient::new();
        let token_issuer = JwtTokenIssuer::new(JwtConfig {
            secret: Secret::new(test::JWT_SECRET.to_string()),
            access_token_ttl: Duration::minutes(5),
            refresh_token_ttl: Duration::days(1),
        });

        let accounts_service = AccountsService::new(
            user_store.clone(),
            otp_store.clone(),
            HashSetBannedTokenStore::new(),
            email_client.clone(),
            token_issuer,
            otp_policy,
        );

        let listener = TcpListener::bind(test::APP_ADDRESS)
            .await
            .expect("Failed to bind test listener");
        let address = format!("http://{}", listener.local_addr().unwrap());

        tokio::spawn(accounts_service.run_standalone(listener, None));

        Self {
            address,
            http_client: reqwest::Client::new(),
            user_store,
            otp_store,
            email_client,
        }
    }

    pub async fn get_health(&self) -> reqwest::Response {
        self.http_client
            .get(format!("{}/health", &self.address))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_register<Body: Serialize>(&self, body: &Body) -> reqwest::Response {
        self.post("/register", body).await
    }

    pub async fn post_login<Body: Serialize>(&self, body: &Body) -> reqwest::Response {
        self.post("/login", body).await
    }

    pub async fn post_refresh<Body: Serialize>(&self, body: &Body) -> reqwest::Response {
        self.post("/token/refresh", body).await
    }

    pub async fn post_otp_request<Body: Serialize>(&self, body: &Body) -> reqwest::Response {
        self.post("/otp-request", body).await
    }

    pub async fn post_check_otp<Body: Serialize>(&self, body: &Body) -> reqwest::Response {
        self.post("/check-otp", body).await
    }

    pub async fn post_password_reset_confirm<Body: Serialize>(
        &self,
        body: &Body,
    ) -> reqwest::Response {
        self.post("/password-reset/confirm", body).await
    }

    pub async fn post_logout<Body: Serialize>(
        &self,
        access_token: &str,
        body: &Body,
    ) -> reqwest::Response {
        self.http_client
            .post(format!("{}/logout", &self.address))
            .bearer_auth(access_token)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_profile(&self, access_token: &str) -> reqwest::Response {
        self.http_client
            .get(format!("{}/profile", &self.address))
            .bearer_auth(access_token)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn patch_profile<Body: Serialize>(
        &self,
        access_token: &str,
        body: &Body,
    ) -> reqwest::Response {
        self.http_client
            .patch(format!("{}/profile", &self.address))
            .bearer_auth(access_token)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn put_profile<Body: Serialize>(
        &self,
        access_token: &str,
        body: &Body,
    ) -> reqwest::Response {
        self.http_client
            .put(format!("{}/profile", &self.address))
            .bearer_auth(access_token)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn put_change_password<Body: Serialize>(
        &self,
        access_token: &str,
        body: &Body,
    ) -> reqwest::Response {
        self.http_client
            .put(format!("{}/change-password", &self.address))
            .bearer_auth(access_token)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    async fn post<Body: Serialize>(&self, path: &str, body: &Body) -> reqwest::Response {
        self.http_client
            .post(format!("{}{}", &self.address, path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn user_id(&self, email: &str) -> UserId {
        let email = Email::parse(Secret::new(email.to_string())).unwrap();
        self.user_store.get_user_by_email(&email).await.unwrap().id()
    }

    /// Code of the newest request for `purpose`, if it is still set.
    pub async fn latest_code(&self, email: &str, purpose: OtpPurpose) -> Option<String> {
        let user_id = self.user_id(email).await;
        self.otp_store
            .requests_for(user_id, purpose)
            .await
            .unwrap()
            .first()
            .and_then(|request| request.code().map(|code| code.as_str().to_string()))
    }

    pub async fn register(&self, email: &str) -> reqwest::Response {
        self.post_register(&registration_body(email)).await
    }

    /// Register, then verify the address with the mailed code.
    pub async fn register_verified(&self, email: &str) {
        assert_eq!(self.register(email).await.status().as_u16(), 201);

        let code = self
            .latest_code(email, OtpPurpose::Register)
            .await
            .expect("registration issues a code");
        let response = self
            .post_check_otp(&json!({ "email": email, "otp": code, "purpose": "register" }))
            .await;
        assert_eq!(response.status().as_u16(), 200);
    }

    pub async fn login(&self, email: &str, password: &str) -> LoginResponse {
        let response = self
            .post_login(&json!({ "username": email, "password": password }))
            .await;
        assert_eq!(response.status().as_u16(), 200);

        response
            .json::<ApiResponse<LoginResponse>>()
            .await
            .expect("Could not deserialize login response")
            .body
    }
}

pub fn registration_body(email: &str) -> serde_json::Value {
    json!({
        "first_name": "Alice",
        "last_name": "Liddell",
        "email": email,
        "password": PASSWORD,
        "password2": PASSWORD,
    })
}
