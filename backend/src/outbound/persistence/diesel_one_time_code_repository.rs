//! PostgreSQL-backed `OneTimeCodeRepository`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{OneTimeCodeRepository, OneTimeCodeRepositoryError};
use crate::domain::{EmailAddress, OneTimeCode, OtpCode};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::NewOneTimeCodeRow;
use super::pool::DbPool;
use super::schema::one_time_codes;

/// Diesel implementation of [`OneTimeCodeRepository`].
///
/// Redemption is a single conditional `UPDATE`; PostgreSQL row locking makes
/// a racing second update see `consumed = true` and match nothing.
#[derive(Clone)]
pub struct DieselOneTimeCodeRepository {
    pool: DbPool,
}

impl DieselOneTimeCodeRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> OneTimeCodeRepositoryError {
    map_basic_diesel_error(
        error,
        OneTimeCodeRepositoryError::query,
        OneTimeCodeRepositoryError::connection,
    )
}

#[async_trait]
impl OneTimeCodeRepository for DieselOneTimeCodeRepository {
    async fn store(&self, code: &OneTimeCode) -> Result<(), OneTimeCodeRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_basic_pool_error(err, OneTimeCodeRepositoryError::connection))?;

        let row = NewOneTimeCodeRow {
            email: code.email().as_str(),
            code: code.code().as_str(),
            expires_at: code.expires_at(),
            consumed: code.is_consumed(),
        };
        diesel::insert_into(one_time_codes::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn consume(
        &self,
        email: &EmailAddress,
        code: &OtpCode,
        now: DateTime<Utc>,
    ) -> Result<bool, OneTimeCodeRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_basic_pool_error(err, OneTimeCodeRepositoryError::connection))?;

        let target = one_time_codes::table
            .filter(one_time_codes::email.eq(email.as_str()))
            .filter(one_time_codes::code.eq(code.as_str()))
            .filter(one_time_codes::consumed.eq(false))
            .filter(one_time_codes::expires_at.gt(now));
        let updated = diesel::update(target)
            .set(one_time_codes::consumed.eq(true))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }
}
