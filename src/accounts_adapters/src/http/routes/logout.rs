use accounts_application::LogoutUseCase;
use accounts_core::BannedTokenStore;
use axum::{Extension, Json, extract::State, response::IntoResponse};
use axum_extra::extract::WithRejection;
use serde::Deserialize;

use super::error::AccountsApiError;
use crate::http::{AuthenticatedUser, MessageResponse};

#[derive(Debug, Default, Deserialize)]
pub struct LogoutRequest {
    #[serde(default)]
    pub refresh: Option<String>,
}

#[tracing::instrument(name = "Logout", skip_all)]
pub async fn logout<B>(
    State(banned_token_store): State<B>,
    Extension(user): Extension<AuthenticatedUser>,
    WithRejection(Json(request), _): WithRejection<Json<LogoutRequest>, AccountsApiError>,
) -> Result<impl IntoResponse, AccountsApiError>
where
    B: BannedTokenStore + Clone + 'static,
{
    let use_case = LogoutUseCase::new(banned_token_store);

    use_case.execute(user.access_token, request.refresh).await?;

    Ok(MessageResponse::new("Logged out successfully"))
}
