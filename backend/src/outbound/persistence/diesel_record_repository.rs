//! PostgreSQL-backed `RecordRepository` over `coredns_records`.
//!
//! Every statement filters on `user_id`, and all but the inserts and
//! `list_zones` on `zone` as well, so rows owned by another account are
//! indistinguishable from missing ones.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::UserId;
use crate::domain::ports::{NewStoredRecord, RecordRepository, RecordRepositoryError, StoredRecord};
use crate::domain::records::{RecordId, ZoneName};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewRecordRow, RecordRow, RecordUpdate};
use super::pool::DbPool;
use super::schema::coredns_records;

/// Diesel implementation of [`RecordRepository`].
#[derive(Clone)]
pub struct DieselRecordRepository {
    pool: DbPool,
}

impl DieselRecordRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> RecordRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    if let DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) = &error {
        return RecordRepositoryError::conflict(info.message());
    }
    map_basic_diesel_error(
        error,
        RecordRepositoryError::query,
        RecordRepositoryError::connection,
    )
}

fn stored_zone(raw: String) -> Result<ZoneName, RecordRepositoryError> {
    ZoneName::new(&raw)
        .map_err(|err| RecordRepositoryError::query(format!("stored zone {raw:?} is invalid: {err}")))
}

fn new_row(record: &NewStoredRecord) -> NewRecordRow<'_> {
    NewRecordRow {
        user_id: *record.owner.as_uuid(),
        zone: record.zone.as_str(),
        name: &record.name,
        ttl: record.ttl,
        record_type: &record.record_type,
        content: &record.content,
    }
}

fn row_to_stored(row: RecordRow) -> Result<StoredRecord, RecordRepositoryError> {
    Ok(StoredRecord {
        id: RecordId::new(row.id),
        owner: UserId::from_uuid(row.user_id),
        zone: stored_zone(row.zone)?,
        name: row.name,
        ttl: row.ttl,
        record_type: row.record_type,
        content: row.content,
    })
}

#[async_trait]
impl RecordRepository for DieselRecordRepository {
    async fn insert(&self, record: &NewStoredRecord) -> Result<StoredRecord, RecordRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_basic_pool_error(err, RecordRepositoryError::connection))?;

        let inserted = diesel::insert_into(coredns_records::table)
            .values(&new_row(record))
            .returning(RecordRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_stored(inserted)
    }

    async fn insert_soa(
        &self,
        record: &NewStoredRecord,
    ) -> Result<Option<StoredRecord>, RecordRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_basic_pool_error(err, RecordRepositoryError::connection))?;

        // `coredns_records_one_soa_idx` turns a second SOA into a no-op.
        diesel::insert_into(coredns_records::table)
            .values(&new_row(record))
            .on_conflict_do_nothing()
            .returning(RecordRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_stored)
            .transpose()
    }

    async fn update(
        &self,
        record: &StoredRecord,
    ) -> Result<Option<StoredRecord>, RecordRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_basic_pool_error(err, RecordRepositoryError::connection))?;

        let target = coredns_records::table
            .filter(coredns_records::id.eq(record.id.get()))
            .filter(coredns_records::user_id.eq(record.owner.as_uuid()))
            .filter(coredns_records::zone.eq(record.zone.as_str()));
        let changes = RecordUpdate {
            name: &record.name,
            ttl: record.ttl,
            record_type: &record.record_type,
            content: &record.content,
        };
        diesel::update(target)
            .set(&changes)
            .returning(RecordRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_stored)
            .transpose()
    }

    async fn delete(
        &self,
        owner: &UserId,
        zone: &ZoneName,
        id: RecordId,
    ) -> Result<bool, RecordRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_basic_pool_error(err, RecordRepositoryError::connection))?;

        let target = coredns_records::table
            .filter(coredns_records::id.eq(id.get()))
            .filter(coredns_records::user_id.eq(owner.as_uuid()))
            .filter(coredns_records::zone.eq(zone.as_str()));
        let deleted = diesel::delete(target)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn find(
        &self,
        owner: &UserId,
        zone: &ZoneName,
        id: RecordId,
    ) -> Result<Option<StoredRecord>, RecordRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_basic_pool_error(err, RecordRepositoryError::connection))?;

        coredns_records::table
            .filter(coredns_records::id.eq(id.get()))
            .filter(coredns_records::user_id.eq(owner.as_uuid()))
            .filter(coredns_records::zone.eq(zone.as_str()))
            .select(RecordRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_stored)
            .transpose()
    }

    async fn list_by_zone(
        &self,
        owner: &UserId,
        zone: &ZoneName,
    ) -> Result<Vec<StoredRecord>, RecordRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_basic_pool_error(err, RecordRepositoryError::connection))?;

        let rows: Vec<RecordRow> = coredns_records::table
            .filter(coredns_records::user_id.eq(owner.as_uuid()))
            .filter(coredns_records::zone.eq(zone.as_str()))
            .order(coredns_records::id.asc())
            .select(RecordRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_stored).collect()
    }

    async fn list_zones(&self, owner: &UserId) -> Result<Vec<ZoneName>, RecordRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_basic_pool_error(err, RecordRepositoryError::connection))?;

        let zones: Vec<String> = coredns_records::table
            .filter(coredns_records::user_id.eq(owner.as_uuid()))
            .select(coredns_records::zone)
            .distinct()
            .order(coredns_records::zone.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        zones.into_iter().map(stored_zone).collect()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use diesel::result::{DatabaseErrorKind, Error as DieselError};
    use rstest::rstest;

    #[rstest]
    fn unique_violations_are_conflicts() {
        let error = DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new("duplicate key value violates coredns_records_one_soa_idx".to_owned()),
        );

        assert_eq!(
            map_diesel_error(error),
            RecordRepositoryError::conflict(
                "duplicate key value violates coredns_records_one_soa_idx"
            )
        );
    }

    #[rstest]
    fn other_failures_keep_the_basic_mapping() {
        assert_eq!(
            map_diesel_error(DieselError::NotFound),
            RecordRepositoryError::query("row not found")
        );
    }
}
