use accounts_application::{GetProfileUseCase, UpdateProfileUseCase};
use accounts_core::{
    Address, AddressUpdate, PersonName, Profile, ProfileUpdate, TelephoneNumber, UserStore,
};
use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::WithRejection;
use secrecy::ExposeSecret;
use serde::{Deserialize, Deserializer, Serialize};

use super::error::AccountsApiError;
use crate::http::{ApiResponse, AuthenticatedUser};

#[derive(Debug, Serialize, Deserialize)]
pub struct AddressBody {
    pub country: String,
    pub city: String,
    pub postal_code: String,
    pub address: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileBody {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub telephone_number: String,
    pub profile_picture: Option<String>,
    pub address: AddressBody,
}

impl From<Profile> for ProfileBody {
    fn from(profile: Profile) -> Self {
        let Address {
            country,
            city,
            postal_code,
            address,
        } = profile.address;

        Self {
            first_name: profile.first_name.to_string(),
            last_name: profile.last_name.to_string(),
            email: profile.email.as_ref().expose_secret().clone(),
            telephone_number: profile.telephone_number.as_str().to_string(),
            profile_picture: profile.profile_picture,
            address: AddressBody {
                country,
                city,
                postal_code,
                address,
            },
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AddressRequest {
    pub country: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub address: Option<String>,
}

/// Partial profile edit. `email` is read-only and ignored when sent.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub telephone_number: Option<String>,
    /// `null` clears the picture, an absent key leaves it alone.
    #[serde(default, deserialize_with = "present")]
    pub profile_picture: Option<Option<String>>,
    pub address: Option<AddressRequest>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl TryFrom<UpdateProfileRequest> for ProfileUpdate {
    type Error = AccountsApiError;

    fn try_from(request: UpdateProfileRequest) -> Result<Self, Self::Error> {
        let mut update = ProfileUpdate {
            first_name: request
                .first_name
                .map(|name| PersonName::parse(&name, "first_name"))
                .transpose()?,
            last_name: request
                .last_name
                .map(|name| PersonName::parse(&name, "last_name"))
                .transpose()?,
            telephone_number: request
                .telephone_number
                .map(|number| TelephoneNumber::parse(&number))
                .transpose()?,
            profile_picture: None,
            address: request
                .address
                .map(|a| AddressUpdate::new(a.country, a.city, a.postal_code, a.address))
                .transpose()?,
        };

        if let Some(picture) = request.profile_picture {
            update = update.with_profile_picture(picture)?;
        }

        Ok(update)
    }
}

#[tracing::instrument(name = "Get Profile", skip_all)]
pub async fn get_profile<U>(
    State(user_store): State<U>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<impl IntoResponse, AccountsApiError>
where
    U: UserStore + Clone + 'static,
{
    let use_case = GetProfileUseCase::new(user_store);

    let profile = use_case.execute(user.user_id).await?;

    Ok(ApiResponse::new(StatusCode::OK, ProfileBody::from(profile)))
}

/// Serves both `PUT` and `PATCH`; either way only the sent fields change.
#[tracing::instrument(name = "Update Profile", skip_all)]
pub async fn update_profile<U>(
    State(user_store): State<U>,
    Extension(user): Extension<AuthenticatedUser>,
    WithRejection(Json(request), _): WithRejection<Json<UpdateProfileRequest>, AccountsApiError>,
) -> Result<impl IntoResponse, AccountsApiError>
where
    U: UserStore + Clone + 'static,
{
    let use_case = UpdateProfileUseCase::new(user_store);

    let update = ProfileUpdate::try_from(request)?;
    let profile = use_case.execute(user.user_id, update).await?;

    Ok(ApiResponse::new(StatusCode::OK, ProfileBody::from(profile)))
}
