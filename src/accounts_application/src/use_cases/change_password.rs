use accounts_core::{Password, UserId, UserStore, UserStoreError};

/// Error types for change password use case
#[derive(Debug, thiserror::Error)]
pub enum ChangePasswordError {
    #[error("Current password is incorrect")]
    InvalidCredentials,
    #[error("User store error: {0}")]
    UserStoreError(#[from] UserStoreError),
}

/// Change password use case - swaps the password of a logged-in user after
/// checking the current one
pub struct ChangePasswordUseCase<U>
where
    U: UserStore,
{
    user_store: U,
}

impl<U> ChangePasswordUseCase<U>
where
    U: UserStore,
{
    pub fn new(user_store: U) -> Self {
        Self { user_store }
    }

    /// Execute the change password use case
    ///
    /// # Arguments
    /// * `user_id` - Authenticated user (from the access token)
    /// * `old_password` - The current password
    /// * `new_password` - The new password to set
    ///
    /// # Returns
    /// Ok(()) on success, or ChangePasswordError
    #[tracing::instrument(
        name = "ChangePasswordUseCase::execute",
        skip(self, old_password, new_password)
    )]
    pub async fn execute(
        &self,
        user_id: UserId,
        old_password: Password,
        new_password: Password,
    ) -> Result<(), ChangePasswordError> {
        let user = self.user_store.get_user(user_id).await?;

        match self
            .user_store
            .authenticate_user(user.username(), &old_password)
            .await
        {
            Ok(_) => {}
            Err(UserStoreError::IncorrectPassword) => {
                return Err(ChangePasswordError::InvalidCredentials);
            }
            Err(e) => return Err(e.into()),
        }

        self.user_store
            .set_new_password(user_id, new_password)
            .await?;

        Ok(())
    }
}
