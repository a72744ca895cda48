use accounts_application::ConfirmPasswordResetUseCase;
use accounts_core::{Email, OtpStore, Password, UserStore};
use axum::{Json, extract::State, response::IntoResponse};
use axum_extra::extract::WithRejection;
use secrecy::Secret;
use serde::Deserialize;

use super::error::AccountsApiError;
use crate::http::MessageResponse;

#[derive(Deserialize)]
pub struct ConfirmPasswordResetRequest {
    pub email: Secret<String>,
    pub new_password: Secret<String>,
    pub new_password2: Secret<String>,
}

#[tracing::instrument(name = "Confirm Password Reset", skip_all)]
pub async fn confirm_password_reset<U, O>(
    State((user_store, otp_store)): State<(U, O)>,
    WithRejection(Json(request), _): WithRejection<
        Json<ConfirmPasswordResetRequest>,
        AccountsApiError,
    >,
) -> Result<impl IntoResponse, AccountsApiError>
where
    U: UserStore + Clone + 'static,
    O: OtpStore + Clone + 'static,
{
    let use_case = ConfirmPasswordResetUseCase::new(user_store, otp_store);

    let email = Email::parse(request.email)?;
    let new_password = Password::parse(request.new_password)?;
    let confirmation = Password::parse(request.new_password2)?;

    if !new_password.matches(&confirmation) {
        return Err(AccountsApiError::ValidationError(
            "Passwords must match".to_string(),
        ));
    }

    use_case.execute(&email, new_password).await?;

    Ok(MessageResponse::new("Password has been reset successfully"))
}
