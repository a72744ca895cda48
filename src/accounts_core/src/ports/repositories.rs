use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::{
    email::Email,
    otp::{OtpCode, OtpPurpose, OtpRequest, RateLimit},
    password::Password,
    profile::{Profile, ProfileUpdate},
    user::{User, UserId},
};

// UserStore port trait and errors
#[derive(Debug, Error)]
pub enum UserStoreError {
    #[error("User already exists")]
    UserAlreadyExists,
    #[error("User not found")]
    UserNotFound,
    #[error("Incorrect password")]
    IncorrectPassword,
    #[error("Unexpected error {0}")]
    UnexpectedError(String),
}

impl PartialEq for UserStoreError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::UserAlreadyExists, Self::UserAlreadyExists)
                | (Self::UserNotFound, Self::UserNotFound)
                | (Self::IncorrectPassword, Self::IncorrectPassword)
                | (Self::UnexpectedError(_), Self::UnexpectedError(_))
        )
    }
}

/// Accounts, their hashed credentials and their profile data.
///
/// Implementations hash passwords themselves; plain-text passwords never
/// leave the call that receives them.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn add_user(&self, user: User, password: Password) -> Result<(), UserStoreError>;
    async fn get_user(&self, user_id: UserId) -> Result<User, UserStoreError>;
    async fn get_user_by_email(&self, email: &Email) -> Result<User, UserStoreError>;
    /// Check `password` against the account registered under `username`.
    ///
    /// Costs the same whether or not `username` exists.
    async fn authenticate_user(
        &self,
        username: &str,
        password: &Password,
    ) -> Result<User, UserStoreError>;
    async fn set_new_password(
        &self,
        user_id: UserId,
        new_password: Password,
    ) -> Result<(), UserStoreError>;
    async fn mark_verified(&self, user_id: UserId) -> Result<(), UserStoreError>;
    async fn get_profile(&self, user_id: UserId) -> Result<Profile, UserStoreError>;
    async fn update_profile(
        &self,
        user_id: UserId,
        update: ProfileUpdate,
    ) -> Result<Profile, UserStoreError>;
}

// BannedTokenStore port trait and errors
#[derive(Debug, Error)]
pub enum BannedTokenStoreError {
    #[error("Database error: {0}")]
    DatabaseError(String),
}

#[async_trait]
pub trait BannedTokenStore: Send + Sync {
    async fn ban_token(&self, token: String) -> Result<(), BannedTokenStoreError>;
    async fn contains_token(&self, token: &str) -> Result<bool, BannedTokenStoreError>;
}

// OtpStore port trait and errors
#[derive(Debug, Error)]
pub enum OtpStoreError {
    #[error("Too many OTP requests, try again later")]
    RateLimitExceeded,
    #[error("Invalid or expired OTP")]
    NoMatchingRequest,
    #[error("Unexpected error {0}")]
    UnexpectedError(String),
}

impl PartialEq for OtpStoreError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::RateLimitExceeded, Self::RateLimitExceeded)
                | (Self::NoMatchingRequest, Self::NoMatchingRequest)
                | (Self::UnexpectedError(_), Self::UnexpectedError(_))
        )
    }
}

/// Ledger of OTP requests.
///
/// Every state change happens as one atomic step per call: two concurrent
/// callers can never both redeem or both consume the same request, and
/// concurrent issuers cannot slip past the rate limit.
#[async_trait]
pub trait OtpStore: Send + Sync {
    /// Record `request` after superseding every active (unused, unexpired)
    /// request of the same user and purpose. Checked reset requests waiting
    /// for confirmation are left alone.
    ///
    /// Fails with `RateLimitExceeded` when `rate_limit.max_requests` requests
    /// for that user and purpose were created inside the window ending at the
    /// new request's creation time.
    async fn issue(
        &self,
        request: OtpRequest,
        rate_limit: &RateLimit,
    ) -> Result<(), OtpStoreError>;

    /// Advance the active, unexpired request matching `code` and `purpose`
    /// past verification and return it in its new state.
    async fn redeem(
        &self,
        user_id: UserId,
        purpose: OtpPurpose,
        code: &OtpCode,
        now: DateTime<Utc>,
    ) -> Result<OtpRequest, OtpStoreError>;

    /// Consume the unexpired reset request awaiting confirmation.
    async fn consume_pending_reset(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<OtpRequest, OtpStoreError>;

    /// All requests of a user for `purpose`, newest first.
    async fn requests_for(
        &self,
        user_id: UserId,
        purpose: OtpPurpose,
    ) -> Result<Vec<OtpRequest>, OtpStoreError>;
}
