//! HTTP server configuration object.

use std::net::SocketAddr;
use std::sync::Arc;

use dnsdesk::domain::SessionSecret;
use dnsdesk::domain::ports::CodeNotifier;
use dnsdesk::domain::records::SoaDefaults;
use dnsdesk::outbound::notify::LogNotifier;
use dnsdesk::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) session_secret: SessionSecret,
    pub(crate) soa_defaults: SoaDefaults,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) notifier: Arc<dyn CodeNotifier>,
}

impl ServerConfig {
    /// Configuration with the in-memory store and log-only code delivery.
    #[must_use]
    pub fn new(session_secret: SessionSecret, bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            session_secret,
            soa_defaults: SoaDefaults::default(),
            db_pool: None,
            notifier: Arc::new(LogNotifier),
        }
    }

    /// Back users, login codes and records with PostgreSQL.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Deliver login codes through `notifier`.
    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn CodeNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// SOA values written when a zone is created.
    #[must_use]
    pub fn with_soa_defaults(mut self, soa_defaults: SoaDefaults) -> Self {
        self.soa_defaults = soa_defaults;
        self
    }
}
