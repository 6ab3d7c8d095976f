//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod code_notifier;
mod one_time_code_repository;
mod record_management;
mod record_repository;
mod session_authentication;
mod user_repository;

#[cfg(test)]
pub use code_notifier::MockCodeNotifier;
pub use code_notifier::{CodeNotifier, NotifierError};
#[cfg(test)]
pub use one_time_code_repository::MockOneTimeCodeRepository;
pub use one_time_code_repository::{OneTimeCodeRepository, OneTimeCodeRepositoryError};
pub use record_management::RecordManagement;
#[cfg(test)]
pub use record_repository::MockRecordRepository;
pub use record_repository::{
    NewStoredRecord, RecordRepository, RecordRepositoryError, StoredRecord,
};
pub use session_authentication::{Identity, IssuedSession, SessionAuthentication};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
