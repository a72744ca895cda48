pub mod auth;
pub mod config;
pub mod email;
pub mod http;
pub mod persistence;

pub use auth::{JwtConfig, JwtTokenIssuer};
pub use crate::config::{AccountsSettings, AllowedOrigins, StorageBackend};
pub use email::{MockEmailClient, PostmarkEmailClient, SentEmail};
pub use persistence::{
    HashMapOtpStore, HashMapUserStore, HashSetBannedTokenStore, PostgresOtpStore,
    PostgresUserStore, RedisBannedTokenStore,
};
pub use http::{AccountsApiError, AuthenticatedUser, TokenGuard};
