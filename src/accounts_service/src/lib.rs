mod accounts_service;
mod helpers;
mod telemetry;

pub use accounts_service::AccountsService;
pub use helpers::{
    EmailClientSetupError, build_email_client, configure_postgresql, configure_redis,
    get_postgres_pool, get_redis_client,
};
pub use telemetry::init_tracing;

// Re-export commonly used types
pub use accounts_core::{BannedTokenStore, EmailClient, OtpStore, TokenIssuer, UserStore};
