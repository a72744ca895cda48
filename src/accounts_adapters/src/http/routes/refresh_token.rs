use accounts_application::RefreshTokenUseCase;
use accounts_core::{BannedTokenStore, TokenIssuer, UserStore};
use axum::{Json, extract::State, response::IntoResponse};
use axum_extra::extract::WithRejection;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::AccountsApiError;

#[derive(Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshTokenResponse {
    pub access: String,
    pub access_token_expiration: DateTime<Utc>,
}

#[tracing::instrument(name = "Refresh Token", skip_all)]
pub async fn refresh_token<U, B, T>(
    State((user_store, banned_token_store, token_issuer)): State<(U, B, T)>,
    WithRejection(Json(request), _): WithRejection<Json<RefreshTokenRequest>, AccountsApiError>,
) -> Result<impl IntoResponse, AccountsApiError>
where
    U: UserStore + Clone + 'static,
    B: BannedTokenStore + Clone + 'static,
    T: TokenIssuer + Clone + 'static,
{
    let use_case = RefreshTokenUseCase::new(user_store, banned_token_store, token_issuer);

    let access = use_case.execute(&request.refresh).await?;

    Ok(Json(RefreshTokenResponse {
        access: access.token,
        access_token_expiration: access.expires_at,
    }))
}
