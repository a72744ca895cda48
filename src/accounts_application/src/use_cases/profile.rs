use accounts_core::{Profile, ProfileUpdate, UserId, UserStore, UserStoreError};

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("User store error: {0}")]
    UserStoreError(#[from] UserStoreError),
}

/// Get profile use case
pub struct GetProfileUseCase<U>
where
    U: UserStore,
{
    user_store: U,
}

impl<U> GetProfileUseCase<U>
where
    U: UserStore,
{
    pub fn new(user_store: U) -> Self {
        Self { user_store }
    }

    #[tracing::instrument(name = "GetProfileUseCase::execute", skip(self))]
    pub async fn execute(&self, user_id: UserId) -> Result<Profile, ProfileError> {
        Ok(self.user_store.get_profile(user_id).await?)
    }
}

/// Update profile use case - partial update of personal details, picture
/// and address
pub struct UpdateProfileUseCase<U>
where
    U: UserStore,
{
    user_store: U,
}

impl<U> UpdateProfileUseCase<U>
where
    U: UserStore,
{
    pub fn new(user_store: U) -> Self {
        Self { user_store }
    }

    #[tracing::instrument(name = "UpdateProfileUseCase::execute", skip(self, update))]
    pub async fn execute(
        &self,
        user_id: UserId,
        update: ProfileUpdate,
    ) -> Result<Profile, ProfileError> {
        if update.is_empty() {
            return Ok(self.user_store.get_profile(user_id).await?);
        }
        Ok(self.user_store.update_profile(user_id, update).await?)
    }
}
