//! Record management service.
//!
//! Maps between typed [`Record`]s and the generic stored shape, validates
//! drafts before they reach storage and enforces owner scoping on every
//! call.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use super::data::{RecordData, RecordType, UnknownRecordType};
use super::record::{Record, RecordDraft, RecordId, Ttl, ZoneName};
use super::validation;
use super::zone::SoaDefaults;
use crate::domain::ports::{
    NewStoredRecord, RecordManagement, RecordRepository, RecordRepositoryError, StoredRecord,
};
use crate::domain::{Error, UserId};

/// Record management backed by a [`RecordRepository`].
#[derive(Clone)]
pub struct RecordManager<R> {
    records: Arc<R>,
    soa_defaults: SoaDefaults,
}

impl<R> RecordManager<R> {
    /// Create a manager using the default SOA values.
    pub fn new(records: Arc<R>) -> Self {
        Self {
            records,
            soa_defaults: SoaDefaults::default(),
        }
    }

    /// Use `soa_defaults` for newly created zones.
    #[must_use]
    pub fn with_soa_defaults(mut self, soa_defaults: SoaDefaults) -> Self {
        self.soa_defaults = soa_defaults;
        self
    }
}

fn map_repository_error(error: RecordRepositoryError) -> Error {
    match error {
        RecordRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("record store unavailable: {message}"))
        }
        RecordRepositoryError::Query { message } => {
            Error::internal(format!("record store error: {message}"))
        }
        RecordRepositoryError::Conflict { message } => Error::conflict(message),
    }
}

fn record_not_found(id: RecordId) -> Error {
    Error::not_found(format!("Record {id} not found"))
}

fn encode(owner: &UserId, draft: &RecordDraft) -> Result<NewStoredRecord, Error> {
    let content = draft.data().to_content().map_err(|err| {
        Error::internal(format!(
            "failed to serialise {} record content: {err}",
            draft.record_type()
        ))
    })?;
    Ok(NewStoredRecord {
        owner: owner.clone(),
        zone: draft.zone().clone(),
        name: draft.name().to_owned(),
        ttl: draft.ttl().get(),
        record_type: draft.record_type().as_str().to_owned(),
        content,
    })
}

fn decode(stored: StoredRecord) -> Result<Record, Error> {
    let record_type: RecordType = stored
        .record_type
        .parse()
        .map_err(|err: UnknownRecordType| Error::internal(format!("unknown record type: {}", err.tag)))?;
    let data = RecordData::from_content(record_type, &stored.content).map_err(|err| {
        Error::internal(format!("invalid {record_type} record content: {err}"))
    })?;
    let ttl = Ttl::new(i64::from(stored.ttl))
        .ok_or_else(|| Error::internal(format!("invalid stored TTL: {}", stored.ttl)))?;

    Ok(Record::new(
        stored.id,
        stored.owner,
        RecordDraft::new(stored.zone, stored.name, ttl, data),
    ))
}

fn validated(draft: &RecordDraft) -> Result<(), Error> {
    let errors = validation::validate_draft(draft);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(Error::validation(errors))
    }
}

impl<R> RecordManager<R>
where
    R: RecordRepository,
{
    async fn insert_draft(&self, owner: &UserId, draft: RecordDraft) -> Result<Record, Error> {
        let row = encode(owner, &draft)?;
        let stored = self
            .records
            .insert(&row)
            .await
            .map_err(map_repository_error)?;
        debug!(
            record_id = %stored.id,
            zone = %draft.zone(),
            record_type = %draft.record_type(),
            "record stored"
        );
        Ok(Record::new(stored.id, owner.clone(), draft))
    }
}

#[async_trait]
impl<R> RecordManagement for RecordManager<R>
where
    R: RecordRepository,
{
    async fn create_record(&self, owner: &UserId, draft: RecordDraft) -> Result<Record, Error> {
        validated(&draft)?;
        self.insert_draft(owner, draft).await
    }

    async fn update_record(
        &self,
        owner: &UserId,
        id: RecordId,
        draft: RecordDraft,
    ) -> Result<Record, Error> {
        validated(&draft)?;
        let row = encode(owner, &draft)?.with_id(id);
        self.records
            .update(&row)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| record_not_found(id))?;
        Ok(Record::new(id, owner.clone(), draft))
    }

    async fn delete_record(
        &self,
        owner: &UserId,
        zone: &ZoneName,
        id: RecordId,
    ) -> Result<(), Error> {
        let deleted = self
            .records
            .delete(owner, zone, id)
            .await
            .map_err(map_repository_error)?;
        if deleted {
            Ok(())
        } else {
            Err(record_not_found(id))
        }
    }

    async fn get_record(
        &self,
        owner: &UserId,
        zone: &ZoneName,
        id: RecordId,
    ) -> Result<Record, Error> {
        let stored = self
            .records
            .find(owner, zone, id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| record_not_found(id))?;
        decode(stored)
    }

    async fn list_records_by_zone(
        &self,
        owner: &UserId,
        zone: &ZoneName,
    ) -> Result<Vec<Record>, Error> {
        let rows = self
            .records
            .list_by_zone(owner, zone)
            .await
            .map_err(map_repository_error)?;
        rows.into_iter()
            .map(|row| {
                let id = row.id;
                decode(row).map_err(|err| {
                    Error::internal(format!("failed to convert record {id}: {}", err.message()))
                })
            })
            .collect()
    }

    async fn list_zones(&self, owner: &UserId) -> Result<Vec<ZoneName>, Error> {
        self.records
            .list_zones(owner)
            .await
            .map_err(map_repository_error)
    }

    async fn create_zone(&self, owner: &UserId, zone: &ZoneName) -> Result<Record, Error> {
        let draft = self.soa_defaults.draft_for(zone.clone());
        let row = encode(owner, &draft)?;
        let stored = self
            .records
            .insert_soa(&row)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::conflict(format!("Zone {zone} already exists")))?;
        info!(user_id = %owner, zone = %zone, record_id = %stored.id, "zone created");
        Ok(Record::new(stored.id, owner.clone(), draft))
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
