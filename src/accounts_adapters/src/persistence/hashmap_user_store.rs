use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use accounts_core::{
    Address, Email, Password, Profile, ProfileUpdate, User, UserId, UserStore, UserStoreError,
};
use secrecy::Secret;

use super::password_hashing::{
    compute_password_hash, verify_dummy_password_hash, verify_password_hash,
};

struct UserRecord {
    user: User,
    password_hash: Secret<String>,
    profile_picture: Option<String>,
    address: Address,
}

impl UserRecord {
    fn profile(&self) -> Profile {
        Profile::new(&self.user, self.profile_picture.clone(), self.address.clone())
    }
}

#[derive(Default, Clone)]
pub struct HashMapUserStore {
    users: Arc<RwLock<HashMap<UserId, UserRecord>>>,
}

impl HashMapUserStore {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Mark an account as disabled, as a site administrator would.
    pub async fn deactivate_user(&self, user_id: UserId) -> Result<(), UserStoreError> {
        let mut users = self.users.write().await;
        let record = users.get_mut(&user_id).ok_or(UserStoreError::UserNotFound)?;
        record.user.deactivate();
        Ok(())
    }
}

#[async_trait::async_trait]
impl UserStore for HashMapUserStore {
    async fn add_user(&self, user: User, password: Password) -> Result<(), UserStoreError> {
        let password_hash = compute_password_hash(password)
            .await
            .map_err(UserStoreError::UnexpectedError)?;

        let mut users = self.users.write().await;
        if users.values().any(|record| {
            record.user.email() == user.email() || record.user.username() == user.username()
        }) {
            return Err(UserStoreError::UserAlreadyExists);
        }
        users.insert(
            user.id(),
            UserRecord {
                user,
                password_hash,
                profile_picture: None,
                address: Address::default(),
            },
        );
        Ok(())
    }

    async fn get_user(&self, user_id: UserId) -> Result<User, UserStoreError> {
        let users = self.users.read().await;
        users
            .get(&user_id)
            .map(|record| record.user.clone())
            .ok_or(UserStoreError::UserNotFound)
    }

    async fn get_user_by_email(&self, email: &Email) -> Result<User, UserStoreError> {
        let users = self.users.read().await;
        users
            .values()
            .find(|record| record.user.email() == email)
            .map(|record| record.user.clone())
            .ok_or(UserStoreError::UserNotFound)
    }

    async fn authenticate_user(
        &self,
        username: &str,
        password: &Password,
    ) -> Result<User, UserStoreError> {
        let found = {
            let users = self.users.read().await;
            users
                .values()
                .find(|record| record.user.username() == username)
                .map(|record| (record.user.clone(), record.password_hash.clone()))
        };

        let Some((user, password_hash)) = found else {
            verify_dummy_password_hash(password.clone()).await;
            return Err(UserStoreError::UserNotFound);
        };

        verify_password_hash(password_hash, password.clone())
            .await
            .map_err(|_| UserStoreError::IncorrectPassword)?;

        Ok(user)
    }

    async fn set_new_password(
        &self,
        user_id: UserId,
        new_password: Password,
    ) -> Result<(), UserStoreError> {
        let password_hash = compute_password_hash(new_password)
            .await
            .map_err(UserStoreError::UnexpectedError)?;

        let mut users = self.users.write().await;
        let record = users.get_mut(&user_id).ok_or(UserStoreError::UserNotFound)?;
        record.password_hash = password_hash;
        Ok(())
    }

    async fn mark_verified(&self, user_id: UserId) -> Result<(), UserStoreError> {
        let mut users = self.users.write().await;
        let record = users.get_mut(&user_id).ok_or(UserStoreError::UserNotFound)?;
        record.user.mark_verified();
        Ok(())
    }

    async fn get_profile(&self, user_id: UserId) -> Result<Profile, UserStoreError> {
        let users = self.users.read().await;
        users
            .get(&user_id)
            .map(UserRecord::profile)
            .ok_or(UserStoreError::UserNotFound)
    }

    async fn update_profile(
        &self,
        user_id: UserId,
        update: ProfileUpdate,
    ) -> Result<Profile, UserStoreError> {
        let mut users = self.users.write().await;
        let record = users.get_mut(&user_id).ok_or(UserStoreError::UserNotFound)?;

        record
            .user
            .update_details(update.first_name, update.last_name, update.telephone_number);
        if let Some(profile_picture) = update.profile_picture {
            record.profile_picture = profile_picture;
        }
        if let Some(address) = update.address {
            record.address.apply(address);
        }

        Ok(record.profile())
    }
}
