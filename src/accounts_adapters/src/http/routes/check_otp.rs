use accounts_application::VerifyOtpUseCase;
use accounts_core::{Email, OtpCode, OtpPurpose, OtpStore, UserStore};
use axum::{Json, extract::State, response::IntoResponse};
use axum_extra::extract::WithRejection;
use secrecy::Secret;
use serde::Deserialize;

use super::error::AccountsApiError;
use crate::http::MessageResponse;

#[derive(Deserialize)]
pub struct CheckOtpRequest {
    pub email: Secret<String>,
    pub otp: String,
    pub purpose: OtpPurpose,
}

#[tracing::instrument(name = "Check OTP", skip_all)]
pub async fn check_otp<U, O>(
    State((user_store, otp_store)): State<(U, O)>,
    WithRejection(Json(request), _): WithRejection<Json<CheckOtpRequest>, AccountsApiError>,
) -> Result<impl IntoResponse, AccountsApiError>
where
    U: UserStore + Clone + 'static,
    O: OtpStore + Clone + 'static,
{
    let use_case = VerifyOtpUseCase::new(user_store, otp_store);

    let email = Email::parse(request.email)?;
    let code = OtpCode::parse(&request.otp)?;

    use_case.execute(&email, &code, request.purpose).await?;

    let message = match request.purpose {
        OtpPurpose::Register => "Email verified successfully",
        OtpPurpose::ResetPassword => "OTP verified, you can now reset your password",
    };
    Ok(MessageResponse::new(message))
}
