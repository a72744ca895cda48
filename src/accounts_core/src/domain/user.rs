use std::fmt;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::email::Email;

pub const MAX_NAME_LENGTH: usize = 50;

static TELEPHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{10}$").expect("telephone pattern is a valid regex"));

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserError {
    #[error("Invalid email address")]
    InvalidEmail,
    #[error("Password must be between 8 and 128 characters")]
    InvalidPassword,
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },
    #[error("{field} must be at most {max} characters")]
    FieldTooLong { field: &'static str, max: usize },
    #[error("Phone number must be 10 digits only")]
    InvalidTelephoneNumber,
    #[error("Invalid user id")]
    InvalidUserId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(Uuid);

impl UserId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(raw: &str) -> Result<Self, UserError> {
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| UserError::InvalidUserId)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for UserId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// First or last name: non-empty once trimmed, bounded length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonName(String);

impl PersonName {
    pub fn parse(raw: &str, field: &'static str) -> Result<Self, UserError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(UserError::EmptyField { field });
        }
        if trimmed.chars().count() > MAX_NAME_LENGTH {
            return Err(UserError::FieldTooLong {
                field,
                max: MAX_NAME_LENGTH,
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Telephone number, either unset (empty) or exactly ten digits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TelephoneNumber(String);

impl TelephoneNumber {
    pub fn parse(raw: &str) -> Result<Self, UserError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(Self::default());
        }
        if !TELEPHONE_PATTERN.is_match(trimmed) {
            return Err(UserError::InvalidTelephoneNumber);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonalDetails {
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub telephone_number: TelephoneNumber,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountStatus {
    pub is_verified: bool,
    pub is_active: bool,
    pub is_staff: bool,
}

impl AccountStatus {
    /// Status of a freshly self-registered account: active, awaiting email verification.
    pub fn registered() -> Self {
        Self {
            is_verified: false,
            is_active: true,
            is_staff: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct User {
    id: UserId,
    username: String,
    email: Email,
    details: PersonalDetails,
    status: AccountStatus,
    registered_at: DateTime<Utc>,
}

impl User {
    /// A self-registered user. The email doubles as the login username.
    pub fn new(email: Email, first_name: PersonName, last_name: PersonName) -> Self {
        let username = email.as_ref().expose_secret().clone();
        Self {
            id: UserId::new(),
            username,
            email,
            details: PersonalDetails {
                first_name,
                last_name,
                telephone_number: TelephoneNumber::default(),
            },
            status: AccountStatus::registered(),
            registered_at: Utc::now(),
        }
    }

    /// Rebuild a user from persisted state.
    pub fn restore(
        id: UserId,
        username: String,
        email: Email,
        details: PersonalDetails,
        status: AccountStatus,
        registered_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            username,
            email,
            details,
            status,
            registered_at,
        }
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn details(&self) -> &PersonalDetails {
        &self.details
    }

    pub fn first_name(&self) -> &PersonName {
        &self.details.first_name
    }

    pub fn last_name(&self) -> &PersonName {
        &self.details.last_name
    }

    pub fn telephone_number(&self) -> &TelephoneNumber {
        &self.details.telephone_number
    }

    pub fn status(&self) -> AccountStatus {
        self.status
    }

    pub fn is_verified(&self) -> bool {
        self.status.is_verified
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active
    }

    pub fn is_staff(&self) -> bool {
        self.status.is_staff
    }

    pub fn registered_at(&self) -> DateTime<Utc> {
        self.registered_at
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.details.first_name, self.details.last_name)
    }

    pub fn mark_verified(&mut self) {
        self.status.is_verified = true;
    }

    pub fn deactivate(&mut self) {
        self.status.is_active = false;
    }

    /// Overwrite the personal details that are present, keep the others.
    pub fn update_details(
        &mut self,
        first_name: Option<PersonName>,
        last_name: Option<PersonName>,
        telephone_number: Option<TelephoneNumber>,
    ) {
        if let Some(first_name) = first_name {
            self.details.first_name = first_name;
        }
        if let Some(last_name) = last_name {
            self.details.last_name = last_name;
        }
        if let Some(telephone_number) = telephone_number {
            self.details.telephone_number = telephone_number;
        }
    }
}
