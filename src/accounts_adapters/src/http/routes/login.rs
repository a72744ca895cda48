use accounts_application::LoginUseCase;
use accounts_core::{Password, TokenIssuer, TokenPair, UserStore};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::WithRejection;
use chrono::{DateTime, Utc};
use secrecy::Secret;
use serde::{Deserialize, Serialize};

use super::error::AccountsApiError;
use crate::http::ApiResponse;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: Secret<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access: String,
    pub refresh: String,
    pub access_token_expiration: DateTime<Utc>,
    pub refresh_token_expiration: DateTime<Utc>,
}

impl From<TokenPair> for LoginResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            access: pair.access.token,
            refresh: pair.refresh.token,
            access_token_expiration: pair.access.expires_at,
            refresh_token_expiration: pair.refresh.expires_at,
        }
    }
}

#[tracing::instrument(name = "Login", skip_all)]
pub async fn login<U, T>(
    State((user_store, token_issuer)): State<(U, T)>,
    WithRejection(Json(request), _): WithRejection<Json<LoginRequest>, AccountsApiError>,
) -> Result<impl IntoResponse, AccountsApiError>
where
    U: UserStore + Clone + 'static,
    T: TokenIssuer + Clone + 'static,
{
    let use_case = LoginUseCase::new(user_store, token_issuer);

    // A password that could never have been set cannot match either.
    let password =
        Password::parse(request.password).map_err(|_| AccountsApiError::InvalidCredentials)?;

    let pair = use_case.execute(&request.username, password).await?;

    Ok(ApiResponse::new(StatusCode::OK, LoginResponse::from(pair)))
}
