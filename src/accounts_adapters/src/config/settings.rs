use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use accounts_core::{OtpPolicy, RateLimit};
use axum::http::HeaderValue;
use chrono::Duration;
use ::config::{Config, ConfigError, Environment, File};
use secrecy::Secret;
use serde::Deserialize;

use super::constants::{DEFAULT_CONFIG_DIR, DEFAULT_ENVIRONMENT, env};
use crate::auth::JwtConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Everything in process memory, lost on restart.
    Memory,
    /// Users and OTP requests in PostgreSQL, banned tokens in Redis.
    Postgres,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
    pub storage: StorageBackend,
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: Secret<String>,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedisSettings {
    pub host_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    pub secret: Secret<String>,
    pub access_token_ttl_in_seconds: i64,
    pub refresh_token_ttl_in_seconds: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OtpSettings {
    pub code_ttl_in_minutes: i64,
    pub registration_code_ttl_in_minutes: i64,
    pub rate_limit_window_in_minutes: i64,
    pub rate_limit_max_requests: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmailClientSettings {
    pub base_url: String,
    pub sender: String,
    pub auth_token: Secret<String>,
    pub timeout_in_milliseconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccountsSettings {
    pub application: ApplicationSettings,
    pub database: DatabaseSettings,
    pub redis: RedisSettings,
    pub jwt: JwtSettings,
    pub otp: OtpSettings,
    pub email_client: EmailClientSettings,
}

impl AccountsSettings {
    /// Layered configuration: `base.json`, then `{APP_ENVIRONMENT}.json`,
    /// then `ACCOUNTS__SECTION__KEY` environment variables. A `.env` file is
    /// loaded first when present.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = std::env::var(env::APP_ENVIRONMENT_ENV_VAR)
            .unwrap_or_else(|_| DEFAULT_ENVIRONMENT.to_string());
        let config_dir = std::env::var(env::CONFIG_DIR_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_DIR));

        tracing::debug!(%environment, config_dir = %config_dir.display(), "Loading settings");

        Config::builder()
            .add_source(File::from(config_dir.join("base.json")))
            .add_source(File::from(config_dir.join(format!("{environment}.json"))).required(false))
            .add_source(
                Environment::with_prefix(env::ENV_PREFIX)
                    .prefix_separator(env::ENV_SEPARATOR)
                    .separator(env::ENV_SEPARATOR)
                    .list_separator(",")
                    .with_list_parse_key("application.allowed_origins")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.application.host, self.application.port)
    }

    pub fn otp_policy(&self) -> OtpPolicy {
        OtpPolicy {
            code_ttl: Duration::minutes(self.otp.code_ttl_in_minutes),
            registration_code_ttl: Duration::minutes(self.otp.registration_code_ttl_in_minutes),
            rate_limit: RateLimit {
                window: Duration::minutes(self.otp.rate_limit_window_in_minutes),
                max_requests: self.otp.rate_limit_max_requests,
            },
        }
    }

    pub fn jwt_config(&self) -> JwtConfig {
        JwtConfig {
            secret: self.jwt.secret.clone(),
            access_token_ttl: Duration::seconds(self.jwt.access_token_ttl_in_seconds),
            refresh_token_ttl: Duration::seconds(self.jwt.refresh_token_ttl_in_seconds),
        }
    }

    /// `None` when no origin is configured, which leaves CORS disabled.
    pub fn allowed_origins(&self) -> Option<AllowedOrigins> {
        if self.application.allowed_origins.is_empty() {
            return None;
        }
        Some(AllowedOrigins::new(
            self.application.allowed_origins.iter().cloned(),
        ))
    }
}

/// Origins allowed to call the API from a browser.
#[derive(Debug, Clone)]
pub struct AllowedOrigins(Arc<HashSet<String>>);

impl AllowedOrigins {
    pub fn new(origins: impl IntoIterator<Item = String>) -> Self {
        Self(Arc::new(
            origins
                .into_iter()
                .map(|origin| origin.trim().trim_end_matches('/').to_string())
                .filter(|origin| !origin.is_empty())
                .collect(),
        ))
    }

    pub fn contains(&self, origin: &HeaderValue) -> bool {
        origin
            .to_str()
            .map(|origin| self.0.contains(origin))
            .unwrap_or(false)
    }
}
