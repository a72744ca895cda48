use accounts_core::{
    Email, OtpCode, OtpPurpose, OtpStore, OtpStoreError, UserStore, UserStoreError,
};
use chrono::Utc;

/// Error types for verify OTP use case
#[derive(Debug, thiserror::Error)]
pub enum VerifyOtpError {
    #[error("User store error: {0}")]
    UserStoreError(#[from] UserStoreError),
    #[error("OTP store error: {0}")]
    OtpStoreError(#[from] OtpStoreError),
}

/// Verify OTP use case - redeems a code.
///
/// A registration code verifies the account on the spot. A reset code only
/// unlocks [`ConfirmPasswordResetUseCase`](super::confirm_password_reset::ConfirmPasswordResetUseCase)
/// for the rest of its validity window.
pub struct VerifyOtpUseCase<U, O>
where
    U: UserStore,
    O: OtpStore,
{
    user_store: U,
    otp_store: O,
}

impl<U, O> VerifyOtpUseCase<U, O>
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

    #[tracing::instrument(name = "VerifyOtpUseCase::execute", skip(self, email, code))]
    pub async fn execute(
        &self,
        email: &Email,
        code: &OtpCode,
        purpose: OtpPurpose,
    ) -> Result<(), VerifyOtpError> {
        let user = self.user_store.get_user_by_email(email).await?;

        self.otp_store
            .redeem(user.id(), purpose, code, Utc::now())
            .await?;

        if purpose == OtpPurpose::Register {
            self.user_store
                .mark_verified(user.id())
                .await
                .inspect_err(|e| {
                    tracing::error!(
                        user_id = %user.id(),
                        error = %e,
                        "Registration code consumed but account not verified"
                    )
                })?;
            tracing::info!(user_id = %user.id(), "Email address verified");
        }

        Ok(())
    }
}
