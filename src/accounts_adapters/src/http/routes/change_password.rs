use accounts_application::ChangePasswordUseCase;
use accounts_core::{Password, UserStore};
use axum::{Extension, Json, extract::State, response::IntoResponse};
use axum_extra::extract::WithRejection;
use secrecy::Secret;
use serde::Deserialize;

use super::error::AccountsApiError;
use crate::http::{AuthenticatedUser, MessageResponse};

#[derive(Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: Secret<String>,
    pub new_password: Secret<String>,
}

#[tracing::instrument(name = "Change Password", skip_all)]
pub async fn change_password<U>(
    State(user_store): State<U>,
    Extension(user): Extension<AuthenticatedUser>,
    WithRejection(Json(request), _): WithRejection<Json<ChangePasswordRequest>, AccountsApiError>,
) -> Result<impl IntoResponse, AccountsApiError>
where
    U: UserStore + Clone + 'static,
{
    let use_case = ChangePasswordUseCase::new(user_store);

    let old_password = Password::parse(request.old_password)
        .map_err(|_| AccountsApiError::InvalidCredentials)?;
    let new_password = Password::parse(request.new_password)?;

    use_case
        .execute(user.user_id, old_password, new_password)
        .await?;

    Ok(MessageResponse::new("Password updated successfully"))
}
