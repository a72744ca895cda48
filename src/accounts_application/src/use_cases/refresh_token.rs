use accounts_core::{
    BannedTokenStore, BannedTokenStoreError, IssuedToken, TokenError, TokenIssuer, TokenKind,
    UserStore, UserStoreError,
};

/// Error types for refresh token use case
#[derive(Debug, thiserror::Error)]
pub enum RefreshTokenError {
    #[error("Token error: {0}")]
    TokenError(#[from] TokenError),
    #[error("Token has been revoked")]
    TokenIsBanned,
    #[error("Account has been disabled, please contact the site administrators")]
    AccountDisabled,
    #[error("Banned token store error: {0}")]
    BannedTokenStoreError(#[from] BannedTokenStoreError),
    #[error("User store error: {0}")]
    UserStoreError(#[from] UserStoreError),
}

/// Refresh token use case - trades a live refresh token for a new access token
pub struct RefreshTokenUseCase<U, B, T>
where
    U: UserStore,
    B: BannedTokenStore,
    T: TokenIssuer,
{
    user_store: U,
    banned_token_store: B,
    token_issuer: T,
}

impl<U, B, T> RefreshTokenUseCase<U, B, T>
where
    U: UserStore,
    B: BannedTokenStore,
    T: TokenIssuer,
{
    pub fn new(user_store: U, banned_token_store: B, token_issuer: T) -> Self {
        Self {
            user_store,
            banned_token_store,
            token_issuer,
        }
    }

    #[tracing::instrument(name = "RefreshTokenUseCase::execute", skip_all)]
    pub async fn execute(&self, refresh_token: &str) -> Result<IssuedToken, RefreshTokenError> {
        let claims = self
            .token_issuer
            .validate(refresh_token, TokenKind::Refresh)?;

        if self
            .banned_token_store
            .contains_token(refresh_token)
            .await?
        {
            return Err(RefreshTokenError::TokenIsBanned);
        }

        let user = self.user_store.get_user(claims.user_id).await?;
        if !user.is_active() {
            return Err(RefreshTokenError::AccountDisabled);
        }

        Ok(self.token_issuer.issue_access(user.id())?)
    }
}
