use accounts_core::{
    IssuedToken, TokenClaims, TokenError, TokenIssuer, TokenKind, TokenPair, User, UserId,
};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone)]
pub struct JwtConfig {
    pub secret: Secret<String>,
    pub access_token_ttl: Duration,
    pub refresh_token_ttl: Duration,
}

impl JwtConfig {
    pub fn as_bytes(&self) -> &[u8] {
        self.secret.expose_secret().as_bytes()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub iat: usize,
    /// Unique per token, so that two tokens minted in the same second differ.
    pub jti: String,
    pub token_type: TokenKind,
}

/// HS256 tokens signed with a shared secret.
#[derive(Clone)]
pub struct JwtTokenIssuer {
    config: JwtConfig,
}

impl JwtTokenIssuer {
    pub fn new(config: JwtConfig) -> Self {
        Self { config }
    }

    fn ttl(&self, kind: TokenKind) -> Duration {
        match kind {
            TokenKind::Access => self.config.access_token_ttl,
            TokenKind::Refresh => self.config.refresh_token_ttl,
        }
    }

    fn generate(
        &self,
        user_id: UserId,
        kind: TokenKind,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, TokenError> {
        let expires_at = now.checked_add_signed(self.ttl(kind)).ok_or(
            TokenError::UnexpectedError("Duration out of range".to_string()),
        )?;

        let claims = Claims {
            sub: user_id.to_string(),
            exp: to_timestamp(expires_at)?,
            iat: to_timestamp(now)?,
            jti: Uuid::new_v4().to_string(),
            token_type: kind,
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.as_bytes()),
        )
        .map_err(|e| TokenError::UnexpectedError(e.to_string()))?;

        Ok(IssuedToken { token, expires_at })
    }
}

impl TokenIssuer for JwtTokenIssuer {
    fn issue_pair(&self, user: &User) -> Result<TokenPair, TokenError> {
        let now = Utc::now();
        Ok(TokenPair {
            access: self.generate(user.id(), TokenKind::Access, now)?,
            refresh: self.generate(user.id(), TokenKind::Refresh, now)?,
        })
    }

    fn issue_access(&self, user_id: UserId) -> Result<IssuedToken, TokenError> {
        self.generate(user_id, TokenKind::Access, Utc::now())
    }

    fn validate(&self, token: &str, kind: TokenKind) -> Result<TokenClaims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::ExpiredToken,
            _ => TokenError::InvalidToken,
        })?
        .claims;

        if claims.token_type != kind {
            return Err(TokenError::WrongTokenKind);
        }

        let expires_at = i64::try_from(claims.exp)
            .ok()
            .and_then(|exp| DateTime::from_timestamp(exp, 0))
            .ok_or(TokenError::InvalidToken)?;

        Ok(TokenClaims {
            user_id: UserId::parse(&claims.sub).map_err(|_| TokenError::InvalidToken)?,
            kind,
            expires_at,
        })
    }
}

fn to_timestamp(instant: DateTime<Utc>) -> Result<usize, TokenError> {
    instant
        .timestamp()
        .try_into()
        .map_err(|_| TokenError::UnexpectedError("Failed to cast i64 to usize".to_string()))
}
