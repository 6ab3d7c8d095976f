//! Outbound adapters implementing the driven ports.
//!
//! - **persistence**: PostgreSQL repositories using Diesel.
//! - **memory**: mutex-guarded store for development and tests.
//! - **notify**: login code delivery through Postmark or the log.
//!
//! Adapters translate between domain and infrastructure types and hold no
//! business rules.

pub mod memory;
pub mod notify;
pub mod persistence;
