use accounts_core::{
    Email, EmailClient, OtpPolicy, OtpPurpose, OtpRequest, OtpStore, OtpStoreError, Password,
    PersonName, User, UserStore, UserStoreError,
};
use chrono::Utc;

use crate::notifications::{self, WELCOME_SUBJECT, WelcomeEmail};

/// Validated sign-up form.
#[derive(Debug)]
pub struct Registration {
    pub email: Email,
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub password: Password,
    pub password_confirmation: Password,
}

/// Error types for register use case
#[derive(Debug, thiserror::Error)]
pub enum RegisterError {
    #[error("Passwords must match")]
    PasswordMismatch,
    #[error("User store error: {0}")]
    UserStoreError(#[from] UserStoreError),
    #[error("OTP store error: {0}")]
    OtpStoreError(#[from] OtpStoreError),
}

/// Register use case - creates the account, its verification code and
/// sends the welcome mail
pub struct RegisterUseCase<U, O, E>
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

impl<U, O, E> RegisterUseCase<U, O, E>
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

    /// Execute the register use case
    ///
    /// # Returns
    /// The newly created, not yet verified user
    #[tracing::instrument(name = "RegisterUseCase::execute", skip_all)]
    pub async fn execute(&self, registration: Registration) -> Result<User, RegisterError> {
        let Registration {
            email,
            first_name,
            last_name,
            password,
            password_confirmation,
        } = registration;

        if !password.matches(&password_confirmation) {
            return Err(RegisterError::PasswordMismatch);
        }

        let user = User::new(email, first_name, last_name);
        self.user_store.add_user(user.clone(), password).await?;

        let ttl = self.otp_policy.registration_code_ttl;
        let request = OtpRequest::issue(user.id(), OtpPurpose::Register, ttl, Utc::now());
        let code = request.code().cloned();
        self.otp_store
            .issue(request, &self.otp_policy.rate_limit)
            .await?;

        if let Some(code) = code {
            let message = WelcomeEmail {
                first_name: user.first_name().as_str(),
                code: code.as_str(),
                valid_for_minutes: ttl.num_minutes(),
            };
            notifications::deliver(&self.email_client, user.email(), WELCOME_SUBJECT, &message)
                .await;
        }

        tracing::info!(user_id = %user.id(), "User registered");
        Ok(user)
    }
}
