pub mod notifications;
pub mod use_cases;

pub use use_cases::{
    change_password::{ChangePasswordError, ChangePasswordUseCase},
    confirm_password_reset::{ConfirmPasswordResetError, ConfirmPasswordResetUseCase},
    login::{LoginError, LoginUseCase},
    logout::{LogoutError, LogoutUseCase},
    profile::{GetProfileUseCase, ProfileError, UpdateProfileUseCase},
    refresh_token::{RefreshTokenError, RefreshTokenUseCase},
    register::{RegisterError, RegisterUseCase, Registration},
    request_otp::{RequestOtpError, RequestOtpUseCase},
    verify_otp::{VerifyOtpError, VerifyOtpUseCase},
};
