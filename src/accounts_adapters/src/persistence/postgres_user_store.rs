use accounts_core::{
    AccountStatus, Address, Email, Password, PersonName, PersonalDetails, Profile, ProfileUpdate,
    TelephoneNumber, User, UserId, UserStore, UserStoreError,
};
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, Secret};
use sqlx::{FromRow, PgExecutor, PgPool};
use uuid::Uuid;

use super::password_hashing::{
    compute_password_hash, verify_dummy_password_hash, verify_password_hash,
};

const USER_COLUMNS: &str = "u.id, u.username, u.email, u.first_name, u.last_name, \
     u.telephone_number, u.is_verified, u.is_active, u.is_staff, u.registered_at";

#[derive(FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    email: String,
    first_name: String,
    last_name: String,
    telephone_number: String,
    is_verified: bool,
    is_active: bool,
    is_staff: bool,
    registered_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = UserStoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let corrupt = |e: accounts_core::UserError| UserStoreError::UnexpectedError(e.to_string());
        Ok(User::restore(
            UserId::from(row.id),
            row.username,
            Email::parse(Secret::from(row.email)).map_err(corrupt)?,
            PersonalDetails {
                first_name: PersonName::parse(&row.first_name, "first_name").map_err(corrupt)?,
                last_name: PersonName::parse(&row.last_name, "last_name").map_err(corrupt)?,
                telephone_number: TelephoneNumber::parse(&row.telephone_number)
                    .map_err(corrupt)?,
            },
            AccountStatus {
                is_verified: row.is_verified,
                is_active: row.is_active,
                is_staff: row.is_staff,
            },
            row.registered_at,
        ))
    }
}

#[derive(FromRow)]
struct CredentialsRow {
    #[sqlx(flatten)]
    user: UserRow,
    password_hash: String,
}

#[derive(FromRow)]
struct ProfileRow {
    #[sqlx(flatten)]
    user: UserRow,
    profile_picture: Option<String>,
    country: String,
    city: String,
    postal_code: String,
    address: String,
}

impl ProfileRow {
    fn into_parts(self) -> Result<(User, Option<String>, Address), UserStoreError> {
        let address = Address {
            country: self.country,
            city: self.city,
            postal_code: self.postal_code,
            address: self.address,
        };
        Ok((User::try_from(self.user)?, self.profile_picture, address))
    }
}

#[derive(Clone)]
pub struct PostgresUserStore {
    pool: PgPool,
}

impl PostgresUserStore {
    pub fn new(pool: PgPool) -> Self {
        PostgresUserStore { pool }
    }

    async fn fetch_profile_row<'e, E>(
        executor: E,
        user_id: UserId,
        for_update: bool,
    ) -> Result<ProfileRow, UserStoreError>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "SELECT {USER_COLUMNS}, p.profile_picture, a.country, a.city, a.postal_code, a.address \
             FROM users u \
             JOIN user_profiles p ON p.user_id = u.id \
             JOIN addresses a ON a.user_id = u.id \
             WHERE u.id = $1{}",
            if for_update { " FOR UPDATE" } else { "" }
        );
        let row: Option<ProfileRow> = sqlx::query_as(&query)
            .bind(user_id.as_uuid())
            .fetch_optional(executor)
            .await
            .map_err(unexpected)?;

        row.ok_or(UserStoreError::UserNotFound)
    }
}

#[async_trait::async_trait]
impl UserStore for PostgresUserStore {
    #[tracing::instrument(name = "Adding user to PostgreSQL", skip_all)]
    async fn add_user(&self, user: User, password: Password) -> Result<(), UserStoreError> {
        let password_hash = compute_password_hash(password)
            .await
            .map_err(UserStoreError::UnexpectedError)?;

        let mut transaction = self.pool.begin().await.map_err(unexpected)?;

        sqlx::query(
            r#"
                INSERT INTO users (id, username, email, password_hash, first_name, last_name,
                                   telephone_number, is_verified, is_active, is_staff, registered_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(user.id().as_uuid())
        .bind(user.username())
        .bind(user.email().as_ref().expose_secret())
        .bind(password_hash.expose_secret())
        .bind(user.first_name().as_str())
        .bind(user.last_name().as_str())
        .bind(user.telephone_number().as_str())
        .bind(user.is_verified())
        .bind(user.is_active())
        .bind(user.is_staff())
        .bind(user.registered_at())
        .execute(&mut *transaction)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return UserStoreError::UserAlreadyExists;
                }
            }
            unexpected(e)
        })?;

        sqlx::query("INSERT INTO user_profiles (user_id) VALUES ($1)")
            .bind(user.id().as_uuid())
            .execute(&mut *transaction)
            .await
            .map_err(unexpected)?;

        sqlx::query("INSERT INTO addresses (user_id) VALUES ($1)")
            .bind(user.id().as_uuid())
            .execute(&mut *transaction)
            .await
            .map_err(unexpected)?;

        transaction.commit().await.map_err(unexpected)?;
        Ok(())
    }

    #[tracing::instrument(name = "Retrieving user from PostgreSQL", skip_all)]
    async fn get_user(&self, user_id: UserId) -> Result<User, UserStoreError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users u WHERE u.id = $1");
        let row: Option<UserRow> = sqlx::query_as(&query)
            .bind(user_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(unexpected)?;

        row.ok_or(UserStoreError::UserNotFound)?.try_into()
    }

    #[tracing::instrument(name = "Retrieving user by email from PostgreSQL", skip_all)]
    async fn get_user_by_email(&self, email: &Email) -> Result<User, UserStoreError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users u WHERE u.email = $1");
        let row: Option<UserRow> = sqlx::query_as(&query)
            .bind(email.as_ref().expose_secret())
            .fetch_optional(&self.pool)
            .await
            .map_err(unexpected)?;

        row.ok_or(UserStoreError::UserNotFound)?.try_into()
    }

    #[tracing::instrument(name = "Validating user credentials in PostgreSQL", skip_all)]
    async fn authenticate_user(
        &self,
        username: &str,
        password: &Password,
    ) -> Result<User, UserStoreError> {
        let query =
            format!("SELECT {USER_COLUMNS}, u.password_hash FROM users u WHERE u.username = $1");
        let row: Option<CredentialsRow> = sqlx::query_as(&query)
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(unexpected)?;

        let Some(row) = row else {
            verify_dummy_password_hash(password.clone()).await;
            return Err(UserStoreError::UserNotFound);
        };

        verify_password_hash(Secret::from(row.password_hash), password.clone())
            .await
            .map_err(|_| UserStoreError::IncorrectPassword)?;

        row.user.try_into()
    }

    #[tracing::instrument(name = "Set new password", skip_all)]
    async fn set_new_password(
        &self,
        user_id: UserId,
        new_password: Password,
    ) -> Result<(), UserStoreError> {
        let password_hash = compute_password_hash(new_password)
            .await
            .map_err(UserStoreError::UnexpectedError)?;

        let result = sqlx::query("UPDATE users SET password_hash = $1 WHERE id = $2")
            .bind(password_hash.expose_secret())
            .bind(user_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;

        if result.rows_affected() == 0 {
            return Err(UserStoreError::UserNotFound);
        }
        Ok(())
    }

    #[tracing::instrument(name = "Marking user verified in PostgreSQL", skip_all)]
    async fn mark_verified(&self, user_id: UserId) -> Result<(), UserStoreError> {
        let result = sqlx::query("UPDATE users SET is_verified = TRUE WHERE id = $1")
            .bind(user_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;

        if result.rows_affected() == 0 {
            return Err(UserStoreError::UserNotFound);
        }
        Ok(())
    }

    #[tracing::instrument(name = "Retrieving profile from PostgreSQL", skip_all)]
    async fn get_profile(&self, user_id: UserId) -> Result<Profile, UserStoreError> {
        let (user, profile_picture, address) = Self::fetch_profile_row(&self.pool, user_id, false)
            .await?
            .into_parts()?;

        Ok(Profile::new(&user, profile_picture, address))
    }

    #[tracing::instrument(name = "Updating profile in PostgreSQL", skip_all)]
    async fn update_profile(
        &self,
        user_id: UserId,
        update: ProfileUpdate,
    ) -> Result<Profile, UserStoreError> {
        let mut transaction = self.pool.begin().await.map_err(unexpected)?;
        let (mut user, mut profile_picture, mut address) =
            Self::fetch_profile_row(&mut *transaction, user_id, true)
                .await?
                .into_parts()?;

        user.update_details(update.first_name, update.last_name, update.telephone_number);
        if let Some(picture) = update.profile_picture {
            profile_picture = picture;
        }
        if let Some(address_update) = update.address {
            address.apply(address_update);
        }

        sqlx::query(
            "UPDATE users SET first_name = $1, last_name = $2, telephone_number = $3 WHERE id = $4",
        )
        .bind(user.first_name().as_str())
        .bind(user.last_name().as_str())
        .bind(user.telephone_number().as_str())
        .bind(user_id.as_uuid())
        .execute(&mut *transaction)
        .await
        .map_err(unexpected)?;

        sqlx::query("UPDATE user_profiles SET profile_picture = $1 WHERE user_id = $2")
            .bind(profile_picture.as_deref())
            .bind(user_id.as_uuid())
            .execute(&mut *transaction)
            .await
            .map_err(unexpected)?;

        sqlx::query(
            r#"
                UPDATE addresses
                SET country = $1, city = $2, postal_code = $3, address = $4
                WHERE user_id = $5
            "#,
        )
        .bind(&address.country)
        .bind(&address.city)
        .bind(&address.postal_code)
        .bind(&address.address)
        .bind(user_id.as_uuid())
        .execute(&mut *transaction)
        .await
        .map_err(unexpected)?;

        transaction.commit().await.map_err(unexpected)?;

        Ok(Profile::new(&user, profile_picture, address))
    }
}

fn unexpected(e: sqlx::Error) -> UserStoreError {
    UserStoreError::UnexpectedError(e.to_string())
}
