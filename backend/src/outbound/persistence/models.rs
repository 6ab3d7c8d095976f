//! Internal Diesel row structs.
//!
//! Never exposed to the domain; repositories convert at the boundary.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{coredns_records, one_time_codes, users};

/// Row read from `users`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
}

/// Insertable account.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
}

/// Insertable login code.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = one_time_codes)]
pub(crate) struct NewOneTimeCodeRow<'a> {
    pub email: &'a str,
    pub code: &'a str,
    pub expires_at: DateTime<Utc>,
    pub consumed: bool,
}

/// Row read from `coredns_records`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = coredns_records)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RecordRow {
    pub id: i64,
    pub user_id: Uuid,
    pub zone: String,
    pub name: String,
    pub ttl: i32,
    pub record_type: String,
    pub content: String,
}

/// Insertable record; the id comes from the sequence.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = coredns_records)]
pub(crate) struct NewRecordRow<'a> {
    pub user_id: Uuid,
    pub zone: &'a str,
    pub name: &'a str,
    pub ttl: i32,
    pub record_type: &'a str,
    pub content: &'a str,
}

/// Changeset for the mutable record columns.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = coredns_records)]
pub(crate) struct RecordUpdate<'a> {
    pub name: &'a str,
    pub ttl: i32,
    pub record_type: &'a str,
    pub content: &'a str,
}
