pub mod constants;
pub mod settings;

pub use constants::*;
pub use settings::{
    AccountsSettings, AllowedOrigins, ApplicationSettings, DatabaseSettings,
    EmailClientSettings, JwtSettings, OtpSettings, RedisSettings, StorageBackend,
};
