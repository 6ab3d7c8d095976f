//! Backend entry-point: loads settings and the session secret, selects the
//! storage and mail adapters, then serves HTTP.

mod server;

use std::io;
use std::sync::Arc;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use reqwest::Url;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use dnsdesk::inbound::http::health::HealthState;
use dnsdesk::inbound::http::session_config::fingerprint::secret_fingerprint;
use dnsdesk::inbound::http::session_config::{BuildMode, session_secret_from_env};
use dnsdesk::outbound::notify::{POSTMARK_EMAIL_ENDPOINT, PostmarkNotifier};
use dnsdesk::outbound::persistence::{DbPool, PoolConfig};
use dnsdesk::settings::AppSettings;
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|e| io::Error::other(format!("failed to load settings: {e}")))?;

    let secret = session_secret_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(io::Error::other)?;
    info!(
        fingerprint = %secret_fingerprint(&secret),
        "session secret loaded"
    );

    let mut config = ServerConfig::new(secret, settings.bind_addr())
        .with_soa_defaults(settings.soa_defaults());

    if let Some(database_url) = settings.database_url.as_deref() {
        let pool_config = PoolConfig::new(database_url).with_max_size(settings.pool_max_size);
        let pool = DbPool::new(pool_config).await.map_err(io::Error::other)?;
        config = config.with_db_pool(pool);
    }

    match settings.postmark_token.as_deref() {
        Some(token) => {
            let raw_endpoint = settings
                .postmark_endpoint
                .as_deref()
                .unwrap_or(POSTMARK_EMAIL_ENDPOINT);
            let endpoint = Url::parse(raw_endpoint)
                .map_err(|e| io::Error::other(format!("invalid postmark endpoint: {e}")))?;
            let notifier =
                PostmarkNotifier::new(endpoint, token, settings.mail_from(), settings.mail_timeout())
                    .map_err(io::Error::other)?;
            config = config.with_notifier(Arc::new(notifier));
        }
        None => warn!("no postmark token configured; login codes are written to the log"),
    }

    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, config)?.await
}
