use accounts_core::{Email, OtpStore, OtpStoreError, Password, UserStore, UserStoreError};
use chrono::Utc;

/// Error types for confirm password reset use case
#[derive(Debug, thiserror::Error)]
pub enum ConfirmPasswordResetError {
    #[error("User store error: {0}")]
    UserStoreError(#[from] UserStoreError),
    #[error("OTP store error: {0}")]
    OtpStoreError(#[from] OtpStoreError),
}

/// Confirm password reset use case - sets a new password once a reset code
/// has been verified
pub struct ConfirmPasswordResetUseCase<U, O>
where
    U: UserStore,
    O: OtpStore,
{
    user_store: U,
    otp_store: O,
}

impl<U, O> ConfirmPasswordResetUseCase<U, O>
where
    U: UserStore,
    O: OtpStore,
{
    pub fn new(user_store: U, otp_store: O) -> Self {
        Self {
            user_store,
            otp_store,
        }
    }

    /// Execute the confirm password reset use case
    ///
    /// The pending reset request is consumed before the password is written,
    /// so a verified code unlocks exactly one reset. When the write then
    /// fails the code is spent and the user has to request a new one.
    #[tracing::instrument(
        name = "ConfirmPasswordResetUseCase::execute",
        skip(self, email, new_password)
    )]
    pub async fn execute(
        &self,
        email: &Email,
        new_password: Password,
    ) -> Result<(), ConfirmPasswordResetError> {
        let user = self.user_store.get_user_by_email(email).await?;

        self.otp_store
            .consume_pending_reset(user.id(), Utc::now())
            .await?;
        self.user_store
            .set_new_password(user.id(), new_password)
            .await
            .inspect_err(|e| {
                tracing::error!(
                    user_id = %user.id(),
                    error = %e,
                    "Reset request consumed but password not updated"
                )
            })?;

        tracing::info!(user_id = %user.id(), "Password reset");
        Ok(())
    }
}
