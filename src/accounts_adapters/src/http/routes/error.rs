use accounts_application::{
    ChangePasswordError, ConfirmPasswordResetError, LoginError, LogoutError, ProfileError,
    RefreshTokenError, RegisterError, RequestOtpError, VerifyOtpError,
};
use accounts_core::{
    BannedTokenStoreError, OtpError, OtpStoreError, TokenError, UserError, UserStoreError,
};
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::http::auth::TokenAuthError;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status_code: u16,
    pub error: String,
    pub code: String,
}

#[derive(Debug, Error)]
pub enum AccountsApiError {
    #[error("{0}")]
    ValidationError(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account is not verified yet")]
    AccountNotVerified,

    #[error("Account has been disabled, please contact the site administrators")]
    AccountDisabled,

    #[error("User not found")]
    UserNotFound,

    #[error("Invalid or expired OTP")]
    OtpInvalidOrExpired,

    #[error("Too many OTP requests, try again later")]
    RateLimitExceeded,

    #[error("User already exists")]
    UserAlreadyExists,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Unexpected error: {0}")]
    UnexpectedError(String),
}

impl AccountsApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AccountsApiError::ValidationError(_) | AccountsApiError::OtpInvalidOrExpired => {
                StatusCode::BAD_REQUEST
            }
            AccountsApiError::InvalidCredentials | AccountsApiError::Unauthorized(_) => {
                StatusCode::UNAUTHORIZED
            }
            AccountsApiError::AccountNotVerified => StatusCode::FORBIDDEN,
            AccountsApiError::AccountDisabled => StatusCode::LOCKED,
            AccountsApiError::UserNotFound => StatusCode::NOT_FOUND,
            AccountsApiError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            AccountsApiError::UserAlreadyExists => StatusCode::CONFLICT,
            AccountsApiError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AccountsApiError::ValidationError(_) => "validation_error",
            AccountsApiError::InvalidCredentials => "invalid_credentials",
            AccountsApiError::AccountNotVerified => "account_not_verified",
            AccountsApiError::AccountDisabled => "account_disabled",
            AccountsApiError::UserNotFound => "user_not_found",
            AccountsApiError::OtpInvalidOrExpired => "otp_invalid_or_expired",
            AccountsApiError::RateLimitExceeded => "rate_limit_exceeded",
            AccountsApiError::UserAlreadyExists => "user_already_exists",
            AccountsApiError::Unauthorized(_) => "unauthorized",
            AccountsApiError::UnexpectedError(_) => "unexpected_error",
        }
    }
}

impl IntoResponse for AccountsApiError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        // Internal details stay in the logs.
        let error = match &self {
            AccountsApiError::UnexpectedError(detail) => {
                tracing::error!(error = %detail, "Request failed unexpectedly");
                "Unexpected error".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(ErrorResponse {
            status_code: status_code.as_u16(),
            error,
            code: self.code().to_string(),
        });

        (status_code, body).into_response()
    }
}

impl From<JsonRejection> for AccountsApiError {
    fn from(rejection: JsonRejection) -> Self {
        AccountsApiError::ValidationError(rejection.body_text())
    }
}

impl From<UserError> for AccountsApiError {
    fn from(error: UserError) -> Self {
        AccountsApiError::ValidationError(error.to_string())
    }
}

impl From<OtpError> for AccountsApiError {
    fn from(error: OtpError) -> Self {
        AccountsApiError::ValidationError(error.to_string())
    }
}

impl From<UserStoreError> for AccountsApiError {
    fn from(error: UserStoreError) -> Self {
        match error {
            UserStoreError::UserAlreadyExists => AccountsApiError::UserAlreadyExists,
            UserStoreError::UserNotFound => AccountsApiError::UserNotFound,
            UserStoreError::IncorrectPassword => AccountsApiError::InvalidCredentials,
            UserStoreError::UnexpectedError(e) => AccountsApiError::UnexpectedError(e),
        }
    }
}

impl From<OtpStoreError> for AccountsApiError {
    fn from(error: OtpStoreError) -> Self {
        match error {
            OtpStoreError::RateLimitExceeded => AccountsApiError::RateLimitExceeded,
            OtpStoreError::NoMatchingRequest => AccountsApiError::OtpInvalidOrExpired,
            OtpStoreError::UnexpectedError(e) => AccountsApiError::UnexpectedError(e),
        }
    }
}

impl From<BannedTokenStoreError> for AccountsApiError {
    fn from(error: BannedTokenStoreError) -> Self {
        AccountsApiError::UnexpectedError(error.to_string())
    }
}

impl From<TokenError> for AccountsApiError {
    fn from(error: TokenError) -> Self {
        match error {
            TokenError::UnexpectedError(e) => AccountsApiError::UnexpectedError(e),
            other => AccountsApiError::Unauthorized(other.to_string()),
        }
    }
}

impl From<TokenAuthError> for AccountsApiError {
    fn from(error: TokenAuthError) -> Self {
        match error {
            TokenAuthError::MissingToken | TokenAuthError::TokenIsBanned => {
                AccountsApiError::Unauthorized(error.to_string())
            }
            TokenAuthError::TokenError(e) => e.into(),
            TokenAuthError::BannedTokenStoreError(e) => e.into(),
        }
    }
}

impl From<RegisterError> for AccountsApiError {
    fn from(error: RegisterError) -> Self {
        match error {
            RegisterError::PasswordMismatch => {
                AccountsApiError::ValidationError(error.to_string())
            }
            RegisterError::UserStoreError(e) => e.into(),
            RegisterError::OtpStoreError(e) => e.into(),
        }
    }
}

impl From<LoginError> for AccountsApiError {
    fn from(error: LoginError) -> Self {
        match error {
            LoginError::InvalidCredentials => AccountsApiError::InvalidCredentials,
            LoginError::AccountNotVerified => AccountsApiError::AccountNotVerified,
            LoginError::AccountDisabled => AccountsApiError::AccountDisabled,
            LoginError::UserStoreError(e) => e.into(),
            // Signing a token for a valid user is never the client's fault.
            LoginError::TokenError(e) => AccountsApiError::UnexpectedError(e.to_string()),
        }
    }
}

impl From<LogoutError> for AccountsApiError {
    fn from(error: LogoutError) -> Self {
        match error {
            LogoutError::BannedTokenStoreError(e) => e.into(),
        }
    }
}

impl From<RefreshTokenError> for AccountsApiError {
    fn from(error: RefreshTokenError) -> Self {
        match error {
            RefreshTokenError::TokenError(e) => e.into(),
            RefreshTokenError::TokenIsBanned => AccountsApiError::Unauthorized(error.to_string()),
            RefreshTokenError::AccountDisabled => AccountsApiError::AccountDisabled,
            RefreshTokenError::BannedTokenStoreError(e) => e.into(),
            RefreshTokenError::UserStoreError(UserStoreError::UserNotFound) => {
                AccountsApiError::Unauthorized("Token subject no longer exists".to_string())
            }
            RefreshTokenError::UserStoreError(e) => e.into(),
        }
    }
}

impl From<ChangePasswordError> for AccountsApiError {
    fn from(error: ChangePasswordError) -> Self {
        match error {
            ChangePasswordError::InvalidCredentials => AccountsApiError::InvalidCredentials,
            ChangePasswordError::UserStoreError(e) => e.into(),
        }
    }
}

impl From<ProfileError> for AccountsApiError {
    fn from(error: ProfileError) -> Self {
        match error {
            ProfileError::UserStoreError(e) => e.into(),
        }
    }
}

impl From<RequestOtpError> for AccountsApiError {
    fn from(error: RequestOtpError) -> Self {
        match error {
            RequestOtpError::UserStoreError(e) => e.into(),
            RequestOtpError::OtpStoreError(e) => e.into(),
        }
    }
}

impl From<VerifyOtpError> for AccountsApiError {
    fn from(error: VerifyOtpError) -> Self {
        match error {
            VerifyOtpError::UserStoreError(e) => e.into(),
            VerifyOtpError::OtpStoreError(e) => e.into(),
        }
    }
}

impl From<ConfirmPasswordResetError> for AccountsApiError {
    fn from(error: ConfirmPasswordResetError) -> Self {
        match error {
            ConfirmPasswordResetError::UserStoreError(e) => e.into(),
            ConfirmPasswordResetError::OtpStoreError(e) => e.into(),
        }
    }
}
