use accounts_core::{
    BannedTokenStore, BannedTokenStoreError, TokenError, TokenIssuer, TokenKind, UserId,
};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use thiserror::Error;

use super::routes::error::AccountsApiError;

#[derive(Debug, Error)]
pub enum TokenAuthError {
    #[error("Missing bearer token")]
    MissingToken,
    #[error("{0}")]
    TokenError(#[from] TokenError),
    #[error("Token has been revoked")]
    TokenIsBanned,
    #[error("Banned token store error: {0}")]
    BannedTokenStoreError(#[from] BannedTokenStoreError),
}

/// The caller behind a validated access token, inserted as a request extension.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub access_token: String,
}

/// Validates bearer access tokens and rejects revoked ones.
#[derive(Clone)]
pub struct TokenGuard<T, B>
where
    T: TokenIssuer + Clone,
    B: BannedTokenStore + Clone,
{
    token_issuer: T,
    banned_token_store: B,
}

impl<T, B> TokenGuard<T, B>
where
    T: TokenIssuer + Clone,
    B: BannedTokenStore + Clone,
{
    pub fn new(token_issuer: T, banned_token_store: B) -> Self {
        Self {
            token_issuer,
            banned_token_store,
        }
    }

    #[tracing::instrument(name = "TokenGuard::authenticate", skip_all)]
    pub async fn authenticate(&self, token: &str) -> Result<AuthenticatedUser, TokenAuthError> {
        let claims = self.token_issuer.validate(token, TokenKind::Access)?;

        if self.banned_token_store.contains_token(token).await? {
            return Err(TokenAuthError::TokenIsBanned);
        }

        Ok(AuthenticatedUser {
            user_id: claims.user_id,
            access_token: token.to_string(),
        })
    }
}

/// Middleware for routes that need a logged-in user.
pub async fn require_auth<T, B>(
    State(guard): State<TokenGuard<T, B>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AccountsApiError>
where
    T: TokenIssuer + Clone + 'static,
    B: BannedTokenStore + Clone + 'static,
{
    let bearer = request
        .headers()
        .typed_get::<Authorization<Bearer>>()
        .ok_or(TokenAuthError::MissingToken)?;

    let user = guard.authenticate(bearer.token()).await?;
    tracing::Span::current().record("user_id", tracing::field::display(user.user_id));
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}
