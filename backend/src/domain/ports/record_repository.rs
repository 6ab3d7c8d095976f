//! Port for record persistence in the generic stored shape.
//!
//! Adapters see records as `(record_type, content)` text pairs; the domain
//! owns the mapping to and from typed payloads. Every method is scoped by
//! owner so one user's records are never visible to another.
use async_trait::async_trait;

use crate::domain::UserId;
use crate::domain::records::{RecordId, ZoneName};

use super::define_port_error;

define_port_error! {
    /// Errors raised by record stores.
    pub enum RecordRepositoryError {
        /// Store connection could not be established.
        Connection { message: String } => "record store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "record store query failed: {message}",
        /// Write rejected by a uniqueness rule, such as a second SOA.
        Conflict { message: String } => "record store conflict: {message}",
    }
}

/// A record as held by storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRecord {
    /// Storage-assigned identifier.
    pub id: RecordId,
    /// Owning user.
    pub owner: UserId,
    /// Zone the record belongs to.
    pub zone: ZoneName,
    /// Owner name within the zone.
    pub name: String,
    /// Time-to-live in seconds.
    pub ttl: i32,
    /// Upper-case type tag such as `A` or `MX`.
    pub record_type: String,
    /// JSON text of the type-specific payload.
    pub content: String,
}

/// A record to be inserted; storage assigns the identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStoredRecord {
    /// Owning user.
    pub owner: UserId,
    /// Zone the record belongs to.
    pub zone: ZoneName,
    /// Owner name within the zone.
    pub name: String,
    /// Time-to-live in seconds.
    pub ttl: i32,
    /// Upper-case type tag.
    pub record_type: String,
    /// JSON text of the type-specific payload.
    pub content: String,
}

impl NewStoredRecord {
    /// Attach an identifier, producing the stored form.
    #[must_use]
    pub fn with_id(self, id: RecordId) -> StoredRecord {
        StoredRecord {
            id,
            owner: self.owner,
            zone: self.zone,
            name: self.name,
            ttl: self.ttl,
            record_type: self.record_type,
            content: self.content,
        }
    }
}

/// Storage for DNS records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordRepository: Send + Sync {
    /// Insert a record and return it with its new identifier.
    async fn insert(&self, record: &NewStoredRecord) -> Result<StoredRecord, RecordRepositoryError>;

    /// Insert `record` as its zone's SOA unless `record.owner` already has
    /// one there.
    ///
    /// The existence check and the insert are one atomic step. Returns
    /// `None` when an SOA already exists.
    async fn insert_soa(
        &self,
        record: &NewStoredRecord,
    ) -> Result<Option<StoredRecord>, RecordRepositoryError>;

    /// Replace name, TTL, type and content of the row matching
    /// `(record.id, record.zone, record.owner)`.
    ///
    /// Returns `None` when no such row exists.
    async fn update(
        &self,
        record: &StoredRecord,
    ) -> Result<Option<StoredRecord>, RecordRepositoryError>;

    /// Delete the row matching `(id, zone, owner)`; `false` when none matched.
    async fn delete(
        &self,
        owner: &UserId,
        zone: &ZoneName,
        id: RecordId,
    ) -> Result<bool, RecordRepositoryError>;

    /// Fetch the row matching `(id, zone, owner)`.
    async fn find(
        &self,
        owner: &UserId,
        zone: &ZoneName,
        id: RecordId,
    ) -> Result<Option<StoredRecord>, RecordRepositoryError>;

    /// All rows in `zone` owned by `owner`, ordered by identifier.
    async fn list_by_zone(
        &self,
        owner: &UserId,
        zone: &ZoneName,
    ) -> Result<Vec<StoredRecord>, RecordRepositoryError>;

    /// Distinct zones holding at least one row owned by `owner`, sorted.
    async fn list_zones(&self, owner: &UserId) -> Result<Vec<ZoneName>, RecordRepositoryError>;
}
