//! Durable Session Store
//!
//! The only state that survives the full-page redirect to the payment
//! provider. `DurableStore` is the raw string key/value seam (browser
//! `sessionStorage` in production, [`MemoryStore`] in tests); `SignupStash`
//! layers the signup attempt's typed records on top of it.

use std::collections::HashMap;
use std::rc::Rc;
use std::sync::RwLock;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::draft::{CompanyId, CompanyInfo, SignupDraft};
use crate::error::StoreError;

/// Attempts older than this are treated as abandoned on the next page load.
pub const ABANDON_AFTER_HOURS: i64 = 24;

pub(crate) const ATTEMPT_KEY: &str = "compcleared.signup.attempt";
pub(crate) const COMPANY_ID_KEY: &str = "compcleared.signup.company_id";
pub(crate) const DRAFT_KEY: &str = "compcleared.signup.draft";

/// String key/value storage that outlives a page navigation.
///
/// Not coordinated across tabs: two concurrent signups race on the same
/// keys and the last write wins.
pub trait DurableStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove a single key. Removing an absent key is not an error.
    fn clear(&self, key: &str) -> Result<(), StoreError>;
}

impl<T: DurableStore + ?Sized> DurableStore for Rc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn clear(&self, key: &str) -> Result<(), StoreError> {
        (**self).clear(key)
    }
}

/// In-memory store (native builds and tests)
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently held
    pub fn len(&self) -> usize {
        self.entries.read().map_or(0, |e| e.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.read().is_ok_and(|e| e.contains_key(key))
    }

    /// Snapshot of every value, for assertions
    pub fn values(&self) -> Vec<String> {
        self.entries
            .read()
            .map(|e| e.values().cloned().collect())
            .unwrap_or_default()
    }
}

impl DurableStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self
            .entries
            .read()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.write().map_err(|e| StoreError::Write {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        entries.remove(key);
        Ok(())
    }
}

/// One pass through the flow, recorded before the checkout request is sent
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupAttempt {
    /// Sent as `Idempotency-Key` so a resubmission after a timeout maps to
    /// the same pending company record
    pub idempotency_key: Uuid,

    pub started_at: DateTime<Utc>,

    /// Company fields the key was issued for
    pub company: CompanyInfo,
}

impl SignupAttempt {
    pub fn new(company: CompanyInfo, now: DateTime<Utc>) -> Self {
        Self {
            idempotency_key: Uuid::new_v4(),
            started_at: now,
            company,
        }
    }

    pub fn is_abandoned(&self, now: DateTime<Utc>) -> bool {
        now - self.started_at > Duration::hours(ABANDON_AFTER_HOURS)
    }
}

/// Typed view of the signup records in a [`DurableStore`]
pub struct SignupStash<S> {
    store: S,
}

impl<S: DurableStore> SignupStash<S> {
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    pub fn attempt(&self) -> Result<Option<SignupAttempt>, StoreError> {
        self.read_json(ATTEMPT_KEY)
    }

    /// Reuse the pending attempt when the company fields are unchanged,
    /// otherwise start a new one with a fresh idempotency key.
    pub fn begin_attempt(
        &self,
        company: &CompanyInfo,
        now: DateTime<Utc>,
    ) -> Result<SignupAttempt, StoreError> {
        let existing = self.attempt().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Discarding unreadable signup attempt");
            None
        });
        if let Some(attempt) = existing.filter(|a| a.company == *company && !a.is_abandoned(now)) {
            tracing::debug!(key = %attempt.idempotency_key, "Reusing signup attempt");
            return Ok(attempt);
        }

        let attempt = SignupAttempt::new(company.clone(), now);
        self.write_json(ATTEMPT_KEY, &attempt)?;
        tracing::debug!(key = %attempt.idempotency_key, "Started signup attempt");
        Ok(attempt)
    }

    pub fn company_id(&self) -> Result<Option<CompanyId>, StoreError> {
        self.read_json(COMPANY_ID_KEY)
    }

    pub fn set_company_id(&self, id: CompanyId) -> Result<(), StoreError> {
        self.write_json(COMPANY_ID_KEY, &id)
    }

    pub fn draft(&self) -> Result<Option<SignupDraft>, StoreError> {
        self.read_json(DRAFT_KEY)
    }

    /// Persist what must survive the redirect to the payment provider
    pub fn save_checkout(&self, id: CompanyId, draft: &SignupDraft) -> Result<(), StoreError> {
        self.set_company_id(id)?;
        self.write_json(DRAFT_KEY, draft)
    }

    /// Remove every signup record.
    ///
    /// Every key is attempted even after a failure; the first failure is
    /// returned.
    pub fn clear(&self) -> Result<(), StoreError> {
        let mut first_err = None;
        for key in [ATTEMPT_KEY, COMPANY_ID_KEY, DRAFT_KEY] {
            if let Err(e) = self.store.clear(key) {
                tracing::warn!(key, error = %e, "Could not clear signup record");
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let Some(raw) = self.store.get(key)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| StoreError::Corrupt {
                key: key.to_string(),
                reason: e.to_string(),
            })
    }

    fn write_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value).map_err(|e| StoreError::Write {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        self.store.set(key, &raw)
    }
}
