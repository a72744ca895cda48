pub mod domain;
pub mod ports;

// Re-export commonly used types for convenience
pub use domain::{
    email::Email,
    otp::{OtpCode, OtpError, OtpPolicy, OtpPurpose, OtpRequest, OtpState, RateLimit},
    password::Password,
    profile::{Address, AddressUpdate, Profile, ProfileUpdate},
    token::{IssuedToken, TokenClaims, TokenKind, TokenPair},
    user::{
        AccountStatus, PersonName, PersonalDetails, TelephoneNumber, User, UserError, UserId,
    },
};

pub use ports::{
    repositories::{
        BannedTokenStore, BannedTokenStoreError, OtpStore, OtpStoreError, UserStore,
        UserStoreError,
    },
    services::{EmailClient, TokenError, TokenIssuer},
};
