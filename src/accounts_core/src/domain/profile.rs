use super::email::Email;
use super::user::{PersonName, TelephoneNumber, User, UserError};

pub const MAX_COUNTRY_LENGTH: usize = 50;
pub const MAX_CITY_LENGTH: usize = 100;
pub const MAX_POSTAL_CODE_LENGTH: usize = 20;
pub const MAX_PROFILE_PICTURE_LENGTH: usize = 255;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Address {
    pub country: String,
    pub city: String,
    pub postal_code: String,
    pub address: String,
}

impl Address {
    pub fn apply(&mut self, update: AddressUpdate) {
        if let Some(country) = update.country {
            self.country = country;
        }
        if let Some(city) = update.city {
            self.city = city;
        }
        if let Some(postal_code) = update.postal_code {
            self.postal_code = postal_code;
        }
        if let Some(address) = update.address {
            self.address = address;
        }
    }
}

/// Everything a user sees on their profile page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub email: Email,
    pub telephone_number: TelephoneNumber,
    pub profile_picture: Option<String>,
    pub address: Address,
}

impl Profile {
    pub fn new(user: &User, profile_picture: Option<String>, address: Address) -> Self {
        Self {
            first_name: user.first_name().clone(),
            last_name: user.last_name().clone(),
            email: user.email().clone(),
            telephone_number: user.telephone_number().clone(),
            profile_picture,
            address,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressUpdate {
    country: Option<String>,
    city: Option<String>,
    postal_code: Option<String>,
    address: Option<String>,
}

impl AddressUpdate {
    pub fn new(
        country: Option<String>,
        city: Option<String>,
        postal_code: Option<String>,
        address: Option<String>,
    ) -> Result<Self, UserError> {
        Ok(Self {
            country: bounded(country, "country", MAX_COUNTRY_LENGTH)?,
            city: bounded(city, "city", MAX_CITY_LENGTH)?,
            postal_code: bounded(postal_code, "postal_code", MAX_POSTAL_CODE_LENGTH)?,
            address: address.map(|a| a.trim().to_string()),
        })
    }
}

/// Partial profile edit. Absent fields are left untouched.
///
/// `profile_picture` is doubly optional so that `Some(None)` clears the picture.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub first_name: Option<PersonName>,
    pub last_name: Option<PersonName>,
    pub telephone_number: Option<TelephoneNumber>,
    pub profile_picture: Option<Option<String>>,
    pub address: Option<AddressUpdate>,
}

impl ProfileUpdate {
    pub fn with_profile_picture(mut self, picture: Option<String>) -> Result<Self, UserError> {
        let picture = bounded(picture, "profile_picture", MAX_PROFILE_PICTURE_LENGTH)?
            .filter(|p| !p.is_empty());
        self.profile_picture = Some(picture);
        Ok(self)
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

fn bounded(
    value: Option<String>,
    field: &'static str,
    max: usize,
) -> Result<Option<String>, UserError> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if v.chars().count() > max => Err(UserError::FieldTooLong { field, max }),
        other => Ok(other),
    }
}
