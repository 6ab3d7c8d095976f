//! Builds the HTTP state from the configured adapters.

use std::sync::Arc;

use actix_web::web;

use dnsdesk::domain::ports::{
    OneTimeCodeRepository, RecordManagement, RecordRepository, UserRepository,
};
use dnsdesk::domain::records::{RecordManager, SoaDefaults};
use dnsdesk::domain::{
    AuthenticatorPorts, ProvisioningPolicy, SessionAuthenticator, SessionTokenCodec,
};
use dnsdesk::inbound::http::state::HttpState;
use dnsdesk::outbound::memory::InMemoryStore;
use dnsdesk::outbound::persistence::{
    DbPool, DieselOneTimeCodeRepository, DieselRecordRepository, DieselUserRepository,
};
use tracing::warn;

use super::ServerConfig;

fn record_management<R>(records: Arc<R>, soa_defaults: SoaDefaults) -> Arc<dyn RecordManagement>
where
    R: RecordRepository + 'static,
{
    Arc::new(RecordManager::new(records).with_soa_defaults(soa_defaults))
}

struct StoragePorts {
    users: Arc<dyn UserRepository>,
    codes: Arc<dyn OneTimeCodeRepository>,
    records: Arc<dyn RecordManagement>,
}

fn diesel_ports(pool: &DbPool, soa_defaults: SoaDefaults) -> StoragePorts {
    StoragePorts {
        users: Arc::new(DieselUserRepository::new(pool.clone())),
        codes: Arc::new(DieselOneTimeCodeRepository::new(pool.clone())),
        records: record_management(
            Arc::new(DieselRecordRepository::new(pool.clone())),
            soa_defaults,
        ),
    }
}

fn memory_ports(soa_defaults: SoaDefaults) -> StoragePorts {
    warn!("no database configured; state is held in memory and lost on restart");
    let store = Arc::new(InMemoryStore::new());
    StoragePorts {
        users: store.clone(),
        codes: store.clone(),
        records: record_management(store, soa_defaults),
    }
}

/// Wire the domain services over PostgreSQL when a pool is configured,
/// otherwise over a shared [`InMemoryStore`].
pub(super) fn build_http_state(config: ServerConfig) -> web::Data<HttpState> {
    let ServerConfig {
        bind_addr: _,
        session_secret,
        soa_defaults,
        db_pool,
        notifier,
    } = config;

    let StoragePorts {
        users,
        codes,
        records,
    } = match &db_pool {
        Some(pool) => diesel_ports(pool, soa_defaults),
        None => memory_ports(soa_defaults),
    };

    let auth = SessionAuthenticator::new(
        AuthenticatorPorts {
            users,
            codes,
            notifier,
        },
        SessionTokenCodec::new(session_secret),
    )
    .with_provisioning(ProvisioningPolicy::OnVerifyAndAuthenticate);

    web::Data::new(HttpState::new(Arc::new(auth), records))
}
