use std::hash::{Hash, Hasher};
use std::sync::LazyLock;

use regex::Regex;
use secrecy::{ExposeSecret, Secret};

use super::user::UserError;

pub const MAX_EMAIL_LENGTH: usize = 50;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

/// A validated, lower-cased email address.
///
/// The address is kept behind a `Secret` so it never leaks into logs through `Debug`.
#[derive(Debug, Clone)]
pub struct Email(Secret<String>);

impl Email {
    pub fn parse(raw: Secret<String>) -> Result<Self, UserError> {
        let normalized = raw.expose_secret().trim().to_lowercase();

        if normalized.chars().count() > MAX_EMAIL_LENGTH {
            return Err(UserError::FieldTooLong {
                field: "email",
                max: MAX_EMAIL_LENGTH,
            });
        }
        if !EMAIL_PATTERN.is_match(&normalized) {
            return Err(UserError::InvalidEmail);
        }

        Ok(Self(Secret::new(normalized)))
    }
}

impl TryFrom<Secret<String>> for Email {
    type Error = UserError;

    fn try_from(value: Secret<String>) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl AsRef<Secret<String>> for Email {
    fn as_ref(&self) -> &Secret<String> {
        &self.0
    }
}

impl PartialEq for Email {
    fn eq(&self, other: &Self) -> bool {
        self.0.expose_secret() == other.0.expose_secret()
    }
}

impl Eq for Email {}

impl Hash for Email {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.expose_secret().hash(state);
    }
}
