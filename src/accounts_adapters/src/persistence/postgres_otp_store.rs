use accounts_core::{
    OtpCode, OtpPurpose, OtpRequest, OtpState, OtpStore, OtpStoreError, RateLimit, UserId,
};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

const OTP_COLUMNS: &str = "id, user_id, code, purpose, state, expires_at, created_at";

#[derive(FromRow)]
struct OtpRequestRow {
    id: Uuid,
    user_id: Uuid,
    code: Option<String>,
    purpose: String,
    state: String,
    expires_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

impl TryFrom<OtpRequestRow> for OtpRequest {
    type Error = OtpStoreError;

    fn try_from(row: OtpRequestRow) -> Result<Self, Self::Error> {
        let corrupt = |e: accounts_core::OtpError| OtpStoreError::UnexpectedError(e.to_string());
        Ok(OtpRequest::restore(
            row.id,
            UserId::from(row.user_id),
            row.code
                .as_deref()
                .map(OtpCode::parse)
                .transpose()
                .map_err(corrupt)?,
            row.purpose.parse().map_err(corrupt)?,
            row.state.parse().map_err(corrupt)?,
            row.expires_at,
            row.created_at,
        ))
    }
}

/// OTP ledger in PostgreSQL. Issuance runs in a transaction holding the
/// user's row lock; redeem and consume are single conditional updates.
#[derive(Clone)]
pub struct PostgresOtpStore {
    pool: PgPool,
}

impl PostgresOtpStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl OtpStore for PostgresOtpStore {
    #[tracing::instrument(name = "Issuing OTP request in PostgreSQL", skip_all)]
    async fn issue(
        &self,
        request: OtpRequest,
        rate_limit: &RateLimit,
    ) -> Result<(), OtpStoreError> {
        let user_id = request.user_id().as_uuid();
        let purpose = request.purpose().as_str();
        let now = request.created_at();

        let mut transaction = self.pool.begin().await.map_err(unexpected)?;

        // Serializes concurrent issuers for the same user.
        sqlx::query("SELECT id FROM users WHERE id = $1 FOR UPDATE")
            .bind(user_id)
            .fetch_one(&mut *transaction)
            .await
            .map_err(unexpected)?;

        let recent: i64 = sqlx::query_scalar(
            r#"
                SELECT COUNT(*) FROM otp_requests
                WHERE user_id = $1 AND purpose = $2 AND created_at >= $3
            "#,
        )
        .bind(user_id)
        .bind(purpose)
        .bind(rate_limit.window_start(now))
        .fetch_one(&mut *transaction)
        .await
        .map_err(unexpected)?;

        if recent >= rate_limit.max_requests as i64 {
            return Err(OtpStoreError::RateLimitExceeded);
        }

        sqlx::query(
            r#"
                UPDATE otp_requests
                SET state = $1, code = NULL
                WHERE user_id = $2 AND purpose = $3
                  AND state = $4 AND expires_at >= $5
            "#,
        )
        .bind(OtpState::Superseded.as_str())
        .bind(user_id)
        .bind(purpose)
        .bind(OtpState::Active.as_str())
        .bind(now)
        .execute(&mut *transaction)
        .await
        .map_err(unexpected)?;

        sqlx::query(
            r#"
                INSERT INTO otp_requests (id, user_id, code, purpose, state, expires_at, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(request.id())
        .bind(user_id)
        .bind(request.code().map(OtpCode::as_str))
        .bind(purpose)
        .bind(request.state().as_str())
        .bind(request.expires_at())
        .bind(now)
        .execute(&mut *transaction)
        .await
        .map_err(unexpected)?;

        transaction.commit().await.map_err(unexpected)?;
        Ok(())
    }

    #[tracing::instrument(name = "Redeeming OTP code in PostgreSQL", skip_all)]
    async fn redeem(
        &self,
        user_id: UserId,
        purpose: OtpPurpose,
        code: &OtpCode,
        now: DateTime<Utc>,
    ) -> Result<OtpRequest, OtpStoreError> {
        let next_state = purpose.state_after_verification();
        let query = format!(
            r#"
                UPDATE otp_requests
                SET state = $1, code = CASE WHEN $2 THEN NULL ELSE code END
                WHERE id = (
                    SELECT id FROM otp_requests
                    WHERE user_id = $3 AND purpose = $4 AND code = $5
                      AND state = $6 AND expires_at >= $7
                    ORDER BY created_at DESC
                    LIMIT 1
                    FOR UPDATE
                )
                RETURNING {OTP_COLUMNS}
            "#
        );
        let row: Option<OtpRequestRow> = sqlx::query_as(&query)
            .bind(next_state.as_str())
            .bind(next_state == OtpState::Consumed)
            .bind(user_id.as_uuid())
            .bind(purpose.as_str())
            .bind(code.as_str())
            .bind(OtpState::Active.as_str())
            .bind(now)
            .fetch_optional(&self.pool)
            .await
            .map_err(unexpected)?;

        row.ok_or(OtpStoreError::NoMatchingRequest)?.try_into()
    }

    #[tracing::instrument(name = "Consuming pending reset in PostgreSQL", skip_all)]
    async fn consume_pending_reset(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<OtpRequest, OtpStoreError> {
        let query = format!(
            r#"
                UPDATE otp_requests
                SET state = $1, code = NULL
                WHERE id = (
                    SELECT id FROM otp_requests
                    WHERE user_id = $2 AND purpose = $3
                      AND state = $4 AND expires_at >= $5
                    ORDER BY created_at DESC
                    LIMIT 1
                    FOR UPDATE
                )
                RETURNING {OTP_COLUMNS}
            "#
        );
        let row: Option<OtpRequestRow> = sqlx::query_as(&query)
            .bind(OtpState::Consumed.as_str())
            .bind(user_id.as_uuid())
            .bind(OtpPurpose::ResetPassword.as_str())
            .bind(OtpState::PendingConfirmation.as_str())
            .bind(now)
            .fetch_optional(&self.pool)
            .await
            .map_err(unexpected)?;

        row.ok_or(OtpStoreError::NoMatchingRequest)?.try_into()
    }

    #[tracing::instrument(name = "Listing OTP requests from PostgreSQL", skip_all)]
    async fn requests_for(
        &self,
        user_id: UserId,
        purpose: OtpPurpose,
    ) -> Result<Vec<OtpRequest>, OtpStoreError> {
        let query = format!(
            "SELECT {OTP_COLUMNS} FROM otp_requests \
             WHERE user_id = $1 AND purpose = $2 \
             ORDER BY created_at DESC"
        );
        let rows: Vec<OtpRequestRow> = sqlx::query_as(&query)
            .bind(user_id.as_uuid())
            .bind(purpose.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(unexpected)?;

        rows.into_iter().map(OtpRequest::try_from).collect()
    }
}

fn unexpected(e: sqlx::Error) -> OtpStoreError {
    OtpStoreError::UnexpectedError(e.to_string())
}
