use accounts_application::RequestOtpUseCase;
use accounts_core::{Email, EmailClient, OtpPolicy, OtpPurpose, OtpStore, UserStore};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::WithRejection;
use secrecy::Secret;
use serde::Deserialize;

use super::error::AccountsApiError;
use crate::http::MessageResponse;

#[derive(Deserialize)]
pub struct RequestOtpRequest {
    pub email: Secret<String>,
    pub purpose: OtpPurpose,
}

#[tracing::instrument(name = "Request OTP", skip_all)]
pub async fn request_otp<U, O, E>(
    State((user_store, otp_store, email_client, otp_policy)): State<(U, O, E, OtpPolicy)>,
    WithRejection(Json(request), _): WithRejection<Json<RequestOtpRequest>, AccountsApiError>,
) -> Result<impl IntoResponse, AccountsApiError>
where
    U: UserStore + Clone + 'static,
    O: OtpStore + Clone + 'static,
    E: EmailClient + Clone + 'static,
{
    let use_case = RequestOtpUseCase::new(user_store, otp_store, email_client, otp_policy);

    let email = Email::parse(request.email)?;
    use_case.execute(&email, request.purpose).await?;

    Ok((
        StatusCode::CREATED,
        MessageResponse::new("OTP sent to your email"),
    ))
}
