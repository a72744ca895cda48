use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{
    email::Email,
    token::{IssuedToken, TokenClaims, TokenKind, TokenPair},
    user::{User, UserId},
};

/// Port trait for email sending service
#[async_trait]
pub trait EmailClient: Send + Sync {
    async fn send_email(
        &self,
        recipient: &Email,
        subject: &str,
        content: &str,
    ) -> Result<(), String>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token has expired")]
    ExpiredToken,
    #[error("Wrong token type")]
    WrongTokenKind,
    #[error("Unexpected error {0}")]
    UnexpectedError(String),
}

/// Signs and checks session tokens.
pub trait TokenIssuer: Send + Sync {
    fn issue_pair(&self, user: &User) -> Result<TokenPair, TokenError>;
    fn issue_access(&self, user_id: UserId) -> Result<IssuedToken, TokenError>;
    /// Decode `token`, requiring a valid signature, an unexpired `exp` and
    /// the given kind.
    fn validate(&self, token: &str, kind: TokenKind) -> Result<TokenClaims, TokenError>;
}
