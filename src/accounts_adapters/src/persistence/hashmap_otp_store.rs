use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use accounts_core::{
    OtpCode, OtpPurpose, OtpRequest, OtpStore, OtpStoreError, RateLimit, UserId,
};
use chrono::{DateTime, Utc};

/// In-memory OTP ledger. Each operation runs under a single write lock,
/// which makes issue, redeem and consume atomic.
#[derive(Default, Clone)]
pub struct HashMapOtpStore {
    requests: Arc<RwLock<HashMap<(UserId, OtpPurpose), Vec<OtpRequest>>>>,
}

impl HashMapOtpStore {
    pub fn new() -> Self {
        Self {
            requests: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait::async_trait]
impl OtpStore for HashMapOtpStore {
    async fn issue(
        &self,
        request: OtpRequest,
        rate_limit: &RateLimit,
    ) -> Result<(), OtpStoreError> {
        let now = request.created_at();
        let mut requests = self.requests.write().await;
        let ledger = requests
            .entry((request.user_id(), request.purpose()))
            .or_default();

        let window_start = rate_limit.window_start(now);
        let recent = ledger
            .iter()
            .filter(|r| r.created_at() >= window_start)
            .count();
        if recent >= rate_limit.max_requests {
            return Err(OtpStoreError::RateLimitExceeded);
        }

        ledger
            .iter_mut()
            .filter(|r| r.is_live(now))
            .for_each(OtpRequest::supersede);
        ledger.push(request);
        Ok(())
    }

    async fn redeem(
        &self,
        user_id: UserId,
        purpose: OtpPurpose,
        code: &OtpCode,
        now: DateTime<Utc>,
    ) -> Result<OtpRequest, OtpStoreError> {
        let mut requests = self.requests.write().await;
        let request = requests
            .get_mut(&(user_id, purpose))
            .and_then(|ledger| {
                ledger
                    .iter_mut()
                    .rev()
                    .find(|r| r.accepts(code, purpose, now))
            })
            .ok_or(OtpStoreError::NoMatchingRequest)?;

        request.verify();
        Ok(request.clone())
    }

    async fn consume_pending_reset(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<OtpRequest, OtpStoreError> {
        let mut requests = self.requests.write().await;
        let request = requests
            .get_mut(&(user_id, OtpPurpose::ResetPassword))
            .and_then(|ledger| ledger.iter_mut().rev().find(|r| r.is_pending_reset(now)))
            .ok_or(OtpStoreError::NoMatchingRequest)?;

        request.consume();
        Ok(request.clone())
    }

    async fn requests_for(
        &self,
        user_id: UserId,
        purpose: OtpPurpose,
    ) -> Result<Vec<OtpRequest>, OtpStoreError> {
        let requests = self.requests.read().await;
        Ok(requests
            .get(&(user_id, purpose))
            .map(|ledger| ledger.iter().rev().cloned().collect())
            .unwrap_or_default())
    }
}
