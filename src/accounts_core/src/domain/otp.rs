//! One-time passwords mailed to users to prove control of their address.
//!
//! Every [`OtpRequest`] follows a small state machine:
//!
//! ```text
//! Active ──verify (register)────────► Consumed
//!   │   └─verify (reset_password)──► PendingConfirmation ──confirm──► Consumed
//!   └──newer request issued──────────► Superseded ◄──newer request issued──┘
//! ```
//!
//! Expiry is never a state of its own: it is checked against the wall clock
//! whenever a request is looked up, and an expired request is never revived.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::user::UserId;

pub const OTP_CODE_LENGTH: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OtpError {
    #[error("OTP code must be 4 digits")]
    InvalidCode,
    #[error("Unknown OTP purpose: {0}")]
    UnknownPurpose(String),
    #[error("Unknown OTP state: {0}")]
    UnknownState(String),
}

#[derive(Clone, PartialEq, Eq)]
pub struct OtpCode(String);

impl OtpCode {
    /// Draw a fresh code in `1000..=9999`.
    pub fn generate() -> Self {
        let value: u16 = rand::rng().random_range(1000..=9999);
        Self(value.to_string())
    }

    pub fn parse(raw: &str) -> Result<Self, OtpError> {
        let trimmed = raw.trim();
        if trimmed.len() != OTP_CODE_LENGTH || !trimmed.chars().all(|c| c.is_ascii_digit()) {
            return Err(OtpError::InvalidCode);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for OtpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OtpCode(****)")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OtpPurpose {
    Register,
    ResetPassword,
}

impl OtpPurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            OtpPurpose::Register => "register",
            OtpPurpose::ResetPassword => "reset_password",
        }
    }

    /// Where a request of this purpose lands once its code has been checked.
    pub fn state_after_verification(&self) -> OtpState {
        match self {
            OtpPurpose::Register => OtpState::Consumed,
            OtpPurpose::ResetPassword => OtpState::PendingConfirmation,
        }
    }
}

impl fmt::Display for OtpPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OtpPurpose {
    type Err = OtpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "register" => Ok(OtpPurpose::Register),
            "reset_password" => Ok(OtpPurpose::ResetPassword),
            other => Err(OtpError::UnknownPurpose(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OtpState {
    Active,
    PendingConfirmation,
    Consumed,
    Superseded,
}

impl OtpState {
    pub fn as_str(&self) -> &'static str {
        match self {
            OtpState::Active => "active",
            OtpState::PendingConfirmation => "pending_confirmation",
            OtpState::Consumed => "consumed",
            OtpState::Superseded => "superseded",
        }
    }
}

impl FromStr for OtpState {
    type Err = OtpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(OtpState::Active),
            "pending_confirmation" => Ok(OtpState::PendingConfirmation),
            "consumed" => Ok(OtpState::Consumed),
            "superseded" => Ok(OtpState::Superseded),
            other => Err(OtpError::UnknownState(other.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OtpRequest {
    id: Uuid,
    user_id: UserId,
    code: Option<OtpCode>,
    purpose: OtpPurpose,
    state: OtpState,
    expires_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

impl OtpRequest {
    /// A new active request carrying a freshly generated code.
    pub fn issue(user_id: UserId, purpose: OtpPurpose, ttl: Duration, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            code: Some(OtpCode::generate()),
            purpose,
            state: OtpState::Active,
            expires_at: now + ttl,
            created_at: now,
        }
    }

    /// Rebuild a request from persisted state.
    pub fn restore(
        id: Uuid,
        user_id: UserId,
        code: Option<OtpCode>,
        purpose: OtpPurpose,
        state: OtpState,
        expires_at: DateTime<Utc>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            code,
            purpose,
            state,
            expires_at,
            created_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn code(&self) -> Option<&OtpCode> {
        self.code.as_ref()
    }

    pub fn purpose(&self) -> OtpPurpose {
        self.purpose
    }

    pub fn state(&self) -> OtpState {
        self.state
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// The `used` flag of the ledger: anything but `Active` has been used up.
    pub fn used(&self) -> bool {
        self.state != OtpState::Active
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }

    /// Unused and unexpired. Only these are superseded by a newer request.
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.state == OtpState::Active && !self.is_expired(now)
    }

    /// Whether `code` redeems this request for `purpose` at `now`.
    pub fn accepts(&self, code: &OtpCode, purpose: OtpPurpose, now: DateTime<Utc>) -> bool {
        self.state == OtpState::Active
            && self.purpose == purpose
            && self.code.as_ref() == Some(code)
            && !self.is_expired(now)
    }

    pub fn is_pending_reset(&self, now: DateTime<Utc>) -> bool {
        self.state == OtpState::PendingConfirmation
            && self.purpose == OtpPurpose::ResetPassword
            && !self.is_expired(now)
    }

    /// Record a successful code check.
    pub fn verify(&mut self) {
        self.move_to(self.purpose.state_after_verification());
    }

    /// Finish a password reset that was gated by this request.
    pub fn consume(&mut self) {
        self.move_to(OtpState::Consumed);
    }

    pub fn supersede(&mut self) {
        self.move_to(OtpState::Superseded);
    }

    fn move_to(&mut self, state: OtpState) {
        self.state = state;
        if matches!(state, OtpState::Consumed | OtpState::Superseded) {
            self.code = None;
        }
    }
}

/// At most `max_requests` requests per user and purpose within `window`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    pub window: Duration,
    pub max_requests: usize,
}

impl RateLimit {
    pub fn window_start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.window
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OtpPolicy {
    /// Validity of codes requested explicitly.
    pub code_ttl: Duration,
    /// Validity of the code issued alongside a new registration.
    pub registration_code_ttl: Duration,
    pub rate_limit: RateLimit,
}

impl Default for OtpPolicy {
    fn default() -> Self {
        Self {
            code_ttl: Duration::minutes(10),
            registration_code_ttl: Duration::minutes(60),
            rate_limit: RateLimit {
                window: Duration::minutes(5),
                max_requests: 3,
            },
        }
    }
}
