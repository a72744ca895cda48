use accounts_application::{RegisterUseCase, Registration};
use accounts_core::{
    Email, EmailClient, OtpPolicy, OtpStore, Password, PersonName, User, UserStore,
};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::WithRejection;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

use super::error::AccountsApiError;
use crate::http::ApiResponse;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: Secret<String>,
    pub password: Secret<String>,
    pub password2: Secret<String>,
}

/// What a client may see of a user.
#[derive(Debug, Serialize, Deserialize)]
pub struct PublicUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            first_name: user.first_name().to_string(),
            last_name: user.last_name().to_string(),
            email: user.email().as_ref().expose_secret().clone(),
        }
    }
}

#[tracing::instrument(name = "Register", skip_all)]
pub async fn register<U, O, E>(
    State((user_store, otp_store, email_client, otp_policy)): State<(U, O, E, OtpPolicy)>,
    WithRejection(Json(request), _): WithRejection<Json<RegisterRequest>, AccountsApiError>,
) -> Result<impl IntoResponse, AccountsApiError>
where
    U: UserStore + Clone + 'static,
    O: OtpStore + Clone + 'static,
    E: EmailClient + Clone + 'static,
{
    let use_case = RegisterUseCase::new(user_store, otp_store, email_client, otp_policy);

    let registration = Registration {
        email: Email::parse(request.email)?,
        first_name: PersonName::parse(&request.first_name, "first_name")?,
        last_name: PersonName::parse(&request.last_name, "last_name")?,
        password: Password::parse(request.password)?,
        password_confirmation: Password::parse(request.password2)?,
    };

    let user = use_case.execute(registration).await?;

    Ok(ApiResponse::new(
        StatusCode::CREATED,
        PublicUser::from(&user),
    ))
}
