//! # Accounts - user account service library
//!
//! Facade crate that re-exports the public APIs of the accounts components:
//! registration with email verification, JWT login, profile management and
//! OTP based password reset.
//!
//! ## Structure
//!
//! - **Core domain types**: `Email`, `Password`, `User`, `OtpRequest`, etc.
//! - **Repository traits**: `UserStore`, `OtpStore`, `BannedTokenStore`
//! - **Use cases**: `RegisterUseCase`, `LoginUseCase`, `RequestOtpUseCase`, etc.
//! - **Adapters**: `PostgresUserStore`, `RedisBannedTokenStore`, `PostmarkEmailClient`, etc.
//! - **Service**: `AccountsService` - The main entry point

// ============================================================================
// Core Domain Types
// ============================================================================

/// Core domain types and value objects
pub mod core {
    pub use accounts_core::*;
}

pub use accounts_core::{
    Address, Email, OtpCode, OtpPolicy, OtpPurpose, OtpRequest, OtpState, Password, Profile,
    ProfileUpdate, User, UserError, UserId,
};

// ============================================================================
// Ports
// ============================================================================

/// Repository trait definitions
pub mod repositories {
    pub use accounts_core::{
        BannedTokenStore, BannedTokenStoreError, OtpStore, OtpStoreError, UserStore,
        UserStoreError,
    };
}

pub use accounts_core::{
    BannedTokenStore, BannedTokenStoreError, EmailClient, OtpStore, OtpStoreError, TokenIssuer,
    UserStore, UserStoreError,
};

// ============================================================================
// Use Cases (Application Layer)
// ============================================================================

/// Application use cases
pub mod use_cases {
    pub use accounts_application::*;
}

pub use accounts_application::{
    ChangePasswordUseCase, ConfirmPasswordResetUseCase, GetProfileUseCase, LoginUseCase,
    LogoutUseCase, RefreshTokenUseCase, RegisterUseCase, RequestOtpUseCase,
    UpdateProfileUseCase, VerifyOtpUseCase,
};

// ============================================================================
// Adapters (Infrastructure)
// ============================================================================

/// Infrastructure adapters
pub mod adapters {
    /// HTTP route handlers and middleware
    pub mod http {
        pub use accounts_adapters::http::*;
    }

    /// Persistence implementations
    pub mod persistence {
        pub use accounts_adapters::persistence::*;
    }

    /// Email client implementations
    pub mod email {
        pub use accounts_adapters::email::*;
    }

    /// JWT issuing and validation
    pub mod auth {
        pub use accounts_adapters::auth::*;
    }

    /// Configuration
    pub mod config {
        pub use accounts_adapters::config::*;
    }
}

pub use accounts_adapters::{
    AccountsSettings, JwtTokenIssuer, MockEmailClient, PostmarkEmailClient,
    persistence::{
        HashMapOtpStore, HashMapUserStore, HashSetBannedTokenStore, PostgresOtpStore,
        PostgresUserStore, RedisBannedTokenStore,
    },
};

// ============================================================================
// Accounts Service (Main Entry Point)
// ============================================================================

pub use accounts_service::{
    AccountsService, build_email_client, configure_postgresql, configure_redis, get_redis_client,
    init_tracing,
};

// ============================================================================
// Re-export common external dependencies
// ============================================================================

/// Re-export async-trait for implementing repository traits
pub use async_trait::async_trait;

/// Re-export secrecy for working with secrets
pub use secrecy::{ExposeSecret, Secret};

pub use axum;
