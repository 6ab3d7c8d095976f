//! In-process store backing every driven storage port.
//!
//! Used when no database is configured and by integration tests. A single
//! mutex guards all state, so each port call is atomic with respect to the
//! others.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};

use crate::domain::ports::{
    NewStoredRecord, OneTimeCodeRepository, OneTimeCodeRepositoryError, RecordRepository,
    RecordRepositoryError, StoredRecord, UserPersistenceError, UserRepository,
};
use crate::domain::records::{RecordId, RecordType, ZoneName};
use crate::domain::{EmailAddress, OTP_TTL_SECS, OneTimeCode, OtpCode, User, UserId};

const SOA_TYPE: &str = RecordType::Soa.as_str();

#[derive(Default)]
struct MemoryState {
    users: Vec<User>,
    codes: Vec<OneTimeCode>,
    records: BTreeMap<RecordId, StoredRecord>,
    last_record_id: i64,
}

impl MemoryState {
    fn push_record(&mut self, record: &NewStoredRecord) -> StoredRecord {
        self.last_record_id += 1;
        let stored = record.clone().with_id(RecordId::new(self.last_record_id));
        self.records.insert(stored.id, stored.clone());
        stored
    }

    fn prune_codes(&mut self, now: DateTime<Utc>) {
        self.codes.retain(|issued| !issued.is_spent(now));
    }
}

/// Mutex-guarded store implementing the user, login code and record ports.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<MemoryState>,
}

impl InMemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, String> {
        self.state
            .lock()
            .map_err(|_| "in-memory store lock poisoned".to_owned())
    }
}

fn owned_by<'a>(
    owner: &'a UserId,
    zone: &'a ZoneName,
) -> impl Fn(&&StoredRecord) -> bool + 'a {
    move |record| &record.owner == owner && &record.zone == zone
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        let state = self.lock().map_err(UserPersistenceError::query)?;
        Ok(state.users.iter().find(|user| user.email() == email).cloned())
    }

    async fn create_or_fetch(&self, email: &EmailAddress) -> Result<User, UserPersistenceError> {
        let mut state = self.lock().map_err(UserPersistenceError::query)?;
        if let Some(user) = state.users.iter().find(|user| user.email() == email) {
            return Ok(user.clone());
        }
        let user = User::new(UserId::random(), email.clone());
        state.users.push(user.clone());
        Ok(user)
    }
}

#[async_trait]
impl OneTimeCodeRepository for InMemoryStore {
    async fn store(&self, code: &OneTimeCode) -> Result<(), OneTimeCodeRepositoryError> {
        let issued_at = code.expires_at() - TimeDelta::seconds(OTP_TTL_SECS);
        let mut state = self.lock().map_err(OneTimeCodeRepositoryError::query)?;
        state.prune_codes(issued_at);
        state.codes.push(code.clone());
        Ok(())
    }

    async fn consume(
        &self,
        email: &EmailAddress,
        code: &OtpCode,
        now: DateTime<Utc>,
    ) -> Result<bool, OneTimeCodeRepositoryError> {
        let mut state = self.lock().map_err(OneTimeCodeRepositoryError::query)?;
        let matched = state
            .codes
            .iter_mut()
            .find(|issued| issued.redeemable_by(email, code, now));
        let consumed = matched.map(OneTimeCode::consume).is_some();
        state.prune_codes(now);
        Ok(consumed)
    }
}

#[async_trait]
impl RecordRepository for InMemoryStore {
    async fn insert(&self, record: &NewStoredRecord) -> Result<StoredRecord, RecordRepositoryError> {
        let mut state = self.lock().map_err(RecordRepositoryError::query)?;
        Ok(state.push_record(record))
    }

    async fn insert_soa(
        &self,
        record: &NewStoredRecord,
    ) -> Result<Option<StoredRecord>, RecordRepositoryError> {
        let mut state = self.lock().map_err(RecordRepositoryError::query)?;
        let exists = state
            .records
            .values()
            .filter(owned_by(&record.owner, &record.zone))
            .any(|existing| existing.record_type == SOA_TYPE);
        if exists {
            return Ok(None);
        }
        Ok(Some(state.push_record(record)))
    }

    async fn update(
        &self,
        record: &StoredRecord,
    ) -> Result<Option<StoredRecord>, RecordRepositoryError> {
        let mut state = self.lock().map_err(RecordRepositoryError::query)?;
        match state.records.get_mut(&record.id) {
            Some(existing) if existing.owner == record.owner && existing.zone == record.zone => {
                existing.clone_from(record);
                Ok(Some(record.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete(
        &self,
        owner: &UserId,
        zone: &ZoneName,
        id: RecordId,
    ) -> Result<bool, RecordRepositoryError> {
        let mut state = self.lock().map_err(RecordRepositoryError::query)?;
        let matches = state.records.get(&id).is_some_and(|r| owned_by(owner, zone)(&r));
        if matches {
            state.records.remove(&id);
        }
        Ok(matches)
    }

    async fn find(
        &self,
        owner: &UserId,
        zone: &ZoneName,
        id: RecordId,
    ) -> Result<Option<StoredRecord>, RecordRepositoryError> {
        let state = self.lock().map_err(RecordRepositoryError::query)?;
        Ok(state
            .records
            .get(&id)
            .filter(owned_by(owner, zone))
            .cloned())
    }

    async fn list_by_zone(
        &self,
        owner: &UserId,
        zone: &ZoneName,
    ) -> Result<Vec<StoredRecord>, RecordRepositoryError> {
        let state = self.lock().map_err(RecordRepositoryError::query)?;
        Ok(state
            .records
            .values()
            .filter(owned_by(owner, zone))
            .cloned()
            .collect())
    }

    async fn list_zones(&self, owner: &UserId) -> Result<Vec<ZoneName>, RecordRepositoryError> {
        let state = self.lock().map_err(RecordRepositoryError::query)?;
        let mut zones: Vec<ZoneName> = state
            .records
            .values()
            .filter(|record| &record.owner == owner)
            .map(|record| record.zone.clone())
            .collect();
        zones.sort();
        zones.dedup();
        Ok(zones)
    }
}
