//! Diesel table definitions for the PostgreSQL schema.
//!
//! Must match `backend/migrations`. Regenerate with `diesel print-schema`
//! after changing a migration.

diesel::table! {
    /// Accounts, one per email address.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Normalised address, unique.
        email -> Varchar,
        /// Account creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Issued login codes.
    one_time_codes (id) {
        id -> Int8,
        email -> Varchar,
        /// Six ASCII digits.
        code -> Varchar,
        expires_at -> Timestamptz,
        /// Set once the code has been redeemed.
        consumed -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Records in the layout read by the CoreDNS PostgreSQL plugin, with an
    /// owning user column added.
    coredns_records (id) {
        id -> Int8,
        /// Owning account.
        user_id -> Uuid,
        zone -> Varchar,
        name -> Varchar,
        ttl -> Int4,
        /// Upper-case type tag.
        record_type -> Varchar,
        /// JSON payload for the type.
        content -> Text,
    }
}

diesel::allow_tables_to_appear_in_same_query!(users, one_time_codes, coredns_records);
