//! PostgreSQL adapters using Diesel with `diesel-async` and a `bb8` pool.
//!
//! Row structs (`models`) and table definitions (`schema`) stay private;
//! repositories translate them to the port types and map every database
//! failure to the port's `Connection` or `Query` variant.
//!
//! ```ignore
//! use dnsdesk::outbound::persistence::{DbPool, DieselRecordRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/dnsdesk")).await?;
//! let records = DieselRecordRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_one_time_code_repository;
mod diesel_record_repository;
mod diesel_user_repository;
mod models;
mod pool;
mod schema;

pub use diesel_one_time_code_repository::DieselOneTimeCodeRepository;
pub use diesel_record_repository::DieselRecordRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
