use std::sync::Arc;

use accounts_core::{BannedTokenStore, BannedTokenStoreError};
use redis::{Commands, Connection};
use tokio::sync::RwLock;

/// Banned tokens kept in Redis until they would have expired anyway.
#[derive(Clone)]
pub struct RedisBannedTokenStore {
    conn: Arc<RwLock<Connection>>,
    token_ttl_in_seconds: u64,
}

impl RedisBannedTokenStore {
    /// `token_ttl_in_seconds` should cover the longest-lived token, the
    /// refresh token.
    pub fn new(conn: Arc<RwLock<Connection>>, token_ttl_in_seconds: u64) -> Self {
        Self {
            conn,
            token_ttl_in_seconds,
        }
    }
}

#[async_trait::async_trait]
impl BannedTokenStore for RedisBannedTokenStore {
    #[tracing::instrument(name = "Banning token in Redis", skip_all)]
    async fn ban_token(&self, token: String) -> Result<(), BannedTokenStoreError> {
        let key = get_key(&token);

        let mut conn = self.conn.write().await;
        conn.set_ex(key, true, self.token_ttl_in_seconds)
            .map_err(|e| BannedTokenStoreError::DatabaseError(e.to_string()))
    }

    #[tracing::instrument(name = "Looking up banned token in Redis", skip_all)]
    async fn contains_token(&self, token: &str) -> Result<bool, BannedTokenStoreError> {
        let key = get_key(token);

        let mut conn = self.conn.write().await;
        conn.exists(&key)
            .map_err(|e| BannedTokenStoreError::DatabaseError(e.to_string()))
    }
}

const BANNED_TOKEN_KEY_PREFIX: &str = "accounts:banned_token:";

fn get_key(token: &str) -> String {
    format!("{}{}", BANNED_TOKEN_KEY_PREFIX, token)
}
