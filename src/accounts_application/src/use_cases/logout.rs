use accounts_core::{BannedTokenStore, BannedTokenStoreError};

/// Error types for logout use case
#[derive(Debug, thiserror::Error)]
pub enum LogoutError {
    #[error("Banned token store error: {0}")]
    BannedTokenStoreError(#[from] BannedTokenStoreError),
}

/// Logout use case - invalidates JWT tokens
pub struct LogoutUseCase<B>
where
    B: BannedTokenStore,
{
    banned_token_store: B,
}

impl<B> LogoutUseCase<B>
where
    B: BannedTokenStore,
{
    pub fn new(banned_token_store: B) -> Self {
        Self { banned_token_store }
    }

    /// Execute the logout use case
    ///
    /// # Arguments
    /// * `access_token` - The access token the request was authenticated with
    /// * `refresh_token` - Optional refresh token to invalidate as well
    #[tracing::instrument(name = "LogoutUseCase::execute", skip_all)]
    pub async fn execute(
        &self,
        access_token: String,
        refresh_token: Option<String>,
    ) -> Result<(), LogoutError> {
        self.banned_token_store.ban_token(access_token).await?;

        if let Some(refresh_token) = refresh_token {
            self.banned_token_store.ban_token(refresh_token).await?;
        }

        Ok(())
    }
}
