use accounts_core::{Password, TokenError, TokenIssuer, TokenPair, UserStore, UserStoreError};

/// Error types specific to login use case
#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Account is not verified yet")]
    AccountNotVerified,
    #[error("Account has been disabled, please contact the site administrators")]
    AccountDisabled,
    #[error("User store error: {0}")]
    UserStoreError(UserStoreError),
    #[error("Token error: {0}")]
    TokenError(#[from] TokenError),
}

impl From<UserStoreError> for LoginError {
    fn from(error: UserStoreError) -> Self {
        match error {
            UserStoreError::UserNotFound | UserStoreError::IncorrectPassword => {
                LoginError::InvalidCredentials
            }
            other => LoginError::UserStoreError(other),
        }
    }
}

/// Login use case - checks credentials and account state, then issues a
/// token pair
pub struct LoginUseCase<U, T>
where
    U: UserStore,
    T: TokenIssuer,
{
    user_store: U,
    token_issuer: T,
}

impl<U, T> LoginUseCase<U, T>
where
    U: UserStore,
    T: TokenIssuer,
{
    pub fn new(user_store: U, token_issuer: T) -> Self {
        Self {
            user_store,
            token_issuer,
        }
    }

    /// Execute the login use case
    ///
    /// # Arguments
    /// * `username` - Login name; self-registered users log in with their email
    /// * `password` - Candidate password
    ///
    /// # Returns
    /// Access and refresh tokens with their expiry instants
    #[tracing::instrument(name = "LoginUseCase::execute", skip(self, password))]
    pub async fn execute(
        &self,
        username: &str,
        password: Password,
    ) -> Result<TokenPair, LoginError> {
        let username = username.trim().to_lowercase();
        let user = self
            .user_store
            .authenticate_user(&username, &password)
            .await?;

        if !user.is_verified() {
            return Err(LoginError::AccountNotVerified);
        }
        if !user.is_active() {
            return Err(LoginError::AccountDisabled);
        }

        Ok(self.token_issuer.issue_pair(&user)?)
    }
}
