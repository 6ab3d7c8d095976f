//! Port for issued login codes.
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{EmailAddress, OneTimeCode, OtpCode};

use super::define_port_error;

define_port_error! {
    /// Errors raised by login code stores.
    pub enum OneTimeCodeRepositoryError {
        /// Store connection could not be established.
        Connection { message: String } => "login code store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "login code store query failed: {message}",
    }
}

/// Storage for issued login codes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OneTimeCodeRepository: Send + Sync {
    /// Persist a freshly issued code.
    async fn store(&self, code: &OneTimeCode) -> Result<(), OneTimeCodeRepositoryError>;

    /// Atomically mark a matching, unconsumed code that has not expired at
    /// `now` as consumed.
    ///
    /// Returns `true` when a code was consumed. Of two concurrent calls for
    /// the same code at most one sees `true`.
    async fn consume(
        &self,
        email: &EmailAddress,
        code: &OtpCode,
        now: DateTime<Utc>,
    ) -> Result<bool, OneTimeCodeRepositoryError>;
}
