use accounts_core::{
    Email, EmailClient, OtpPolicy, OtpPurpose, OtpRequest, OtpStore, OtpStoreError, UserStore,
    UserStoreError,
};
use chrono::Utc;

use crate::notifications::{self, OtpEmail};

/// Error types for request OTP use case
#[derive(Debug, thiserror::Error)]
pub enum RequestOtpError {
    #[error("User store error: {0}")]
    UserStoreError(#[from] UserStoreError),
    #[error("OTP store error: {0}")]
    OtpStoreError(#[from] OtpStoreError),
}

/// Request OTP use case - issues a fresh code for a purpose, superseding
/// the previous ones, and mails it
pub struct RequestOtpUseCase<U, O, E>
where
    U: UserStore,
    O: OtpStore,
    E: EmailClient,
{
    user_store: U,
    otp_store: O,
    email_client: E,
    otp_policy: OtpPolicy,
}

impl<U, O, E> RequestOtpUseCase<U, O, E>
where
    U: UserStore,
    O: OtpStore,
    E: EmailClient,
{
    pub fn new(user_store: U, otp_store: O, email_client: E, otp_policy: OtpPolicy) -> Self {
        Self {
            user_store,
            otp_store,
            email_client,
            otp_policy,
        }
    }

    #[tracing::instrument(name = "RequestOtpUseCase::execute", skip(self, email))]
    pub async fn execute(&self, email: &Email, purpose: OtpPurpose) -> Result<(), RequestOtpError> {
        let user = self.user_store.get_user_by_email(email).await?;

        let ttl = self.otp_policy.code_ttl;
        let request = OtpRequest::issue(user.id(), purpose, ttl, Utc::now());
        let code = request.code().cloned();
        self.otp_store
            .issue(request, &self.otp_policy.rate_limit)
            .await?;

        if let Some(code) = code {
            let message = OtpEmail::new(
                user.first_name().as_str(),
                purpose,
                code.as_str(),
                ttl.num_minutes(),
            );
            notifications::deliver(
                &self.email_client,
                user.email(),
                OtpEmail::subject(purpose),
                &message,
            )
            .await;
        }

        Ok(())
    }
}
