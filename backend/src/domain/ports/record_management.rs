//! Driving port for zone and record management.
//!
//! Every operation takes the caller's [`UserId`] and only ever touches
//! records that caller owns.

use async_trait::async_trait;

use crate::domain::records::{Record, RecordDraft, RecordId, ZoneName};
use crate::domain::{Error, UserId};

/// Domain use-case port for record management.
#[async_trait]
pub trait RecordManagement: Send + Sync {
    /// Validate and store a new record.
    async fn create_record(&self, owner: &UserId, draft: RecordDraft) -> Result<Record, Error>;

    /// Validate and replace the record `id` in the draft's zone.
    async fn update_record(
        &self,
        owner: &UserId,
        id: RecordId,
        draft: RecordDraft,
    ) -> Result<Record, Error>;

    /// Delete record `id` from `zone`.
    async fn delete_record(&self, owner: &UserId, zone: &ZoneName, id: RecordId)
    -> Result<(), Error>;

    /// Fetch record `id` from `zone`.
    async fn get_record(&self, owner: &UserId, zone: &ZoneName, id: RecordId)
    -> Result<Record, Error>;

    /// All records in `zone`, ordered by identifier.
    async fn list_records_by_zone(
        &self,
        owner: &UserId,
        zone: &ZoneName,
    ) -> Result<Vec<Record>, Error>;

    /// Zones the caller holds records in, sorted.
    async fn list_zones(&self, owner: &UserId) -> Result<Vec<ZoneName>, Error>;

    /// Create `zone` by writing its SOA record.
    async fn create_zone(&self, owner: &UserId, zone: &ZoneName) -> Result<Record, Error>;
}
