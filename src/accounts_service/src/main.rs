use std::sync::Arc;

use accounts_adapters::{
    AccountsSettings, HashMapOtpStore, HashMapUserStore, HashSetBannedTokenStore,
    JwtTokenIssuer, PostgresOtpStore, PostgresUserStore, RedisBannedTokenStore, StorageBackend,
};
use accounts_service::{
    AccountsService, build_email_client, configure_postgresql, configure_redis, init_tracing,
};
use color_eyre::eyre::Result;
use tokio::{net::TcpListener, sync::RwLock};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing()?;

    let settings = AccountsSettings::load()?;

    let token_issuer = JwtTokenIssuer::new(settings.jwt_config());
    let email_client = build_email_client(&settings.email_client)?;
    let otp_policy = settings.otp_policy();

    let accounts_service = match settings.application.storage {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage, all data is lost on shutdown");
            AccountsService::new(
                HashMapUserStore::new(),
                HashMapOtpStore::new(),
                HashSetBannedTokenStore::new(),
                email_client,
                token_issuer,
                otp_policy,
            )
        }
        StorageBackend::Postgres => {
            let pg_pool = configure_postgresql(&settings.database).await?;
            let redis_conn = Arc::new(RwLock::new(configure_redis(&settings.redis)?));

            // A banned token only needs to outlive the longest token lifetime.
            let ban_ttl = settings.jwt.refresh_token_ttl_in_seconds.max(0) as u64;

            AccountsService::new(
                PostgresUserStore::new(pg_pool.clone()),
                PostgresOtpStore::new(pg_pool),
                RedisBannedTokenStore::new(redis_conn, ban_ttl),
                email_client,
                token_issuer,
                otp_policy,
            )
        }
    };

    let listener = TcpListener::bind(settings.address()).await?;
    accounts_service
        .run_standalone(listener, settings.allowed_origins())
        .await?;

    Ok(())
}
