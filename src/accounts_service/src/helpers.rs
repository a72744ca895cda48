use accounts_adapters::{
    PostmarkEmailClient,
    config::{DatabaseSettings, EmailClientSettings, RedisSettings},
};
use accounts_core::{Email, UserError};
use redis::{Client, RedisResult};
use secrecy::{ExposeSecret, Secret};
use sqlx::{PgPool, postgres::PgPoolOptions};

/// Connect to PostgreSQL and run all pending migrations.
pub async fn configure_postgresql(settings: &DatabaseSettings) -> Result<PgPool, sqlx::Error> {
    let pg_pool = get_postgres_pool(settings.url.expose_secret(), settings.max_connections).await?;

    sqlx::migrate!().run(&pg_pool).await?;

    Ok(pg_pool)
}

pub fn configure_redis(settings: &RedisSettings) -> RedisResult<redis::Connection> {
    get_redis_client(&settings.host_name)?.get_connection()
}

pub async fn get_postgres_pool(url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(url)
        .await
}

pub fn get_redis_client(redis_hostname: &str) -> RedisResult<Client> {
    let redis_url = format!("redis://{}/", redis_hostname);
    redis::Client::open(redis_url)
}

#[derive(Debug, thiserror::Error)]
pub enum EmailClientSetupError {
    #[error("Invalid sender address: {0}")]
    InvalidSender(#[from] UserError),
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

pub fn build_email_client(
    settings: &EmailClientSettings,
) -> Result<PostmarkEmailClient, EmailClientSetupError> {
    let http_client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_millis(
            settings.timeout_in_milliseconds,
        ))
        .build()?;

    Ok(PostmarkEmailClient::new(
        settings.base_url.clone(),
        Email::parse(Secret::new(settings.sender.clone()))?,
        settings.auth_token.clone(),
        http_client,
    ))
}
