//! Process settings loaded via OrthoConfig.
//!
//! Values come from `DNSDESK_*` environment variables or the matching
//! command-line flags. Every field is optional; accessors supply defaults.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::records::SoaDefaults;

const DEFAULT_BIND_ADDR: ([u8; 4], u16) = ([0, 0, 0, 0], 8080);
const DEFAULT_MAIL_FROM: &str = "auth@dnsdesk.net";

/// Runtime configuration for the server binary.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "DNSDESK")]
pub struct AppSettings {
    /// Listen address; defaults to `0.0.0.0:8080`.
    pub bind_addr: Option<SocketAddr>,
    /// PostgreSQL URL. Without it the in-memory store is used.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    #[ortho_config(default = 10)]
    pub pool_max_size: u32,
    /// Primary name server written into new SOA records.
    pub soa_ns: Option<String>,
    /// Responsible mailbox written into new SOA records.
    pub soa_mbox: Option<String>,
    /// Postmark server token. Without it codes are only logged.
    pub postmark_token: Option<String>,
    /// Override for the Postmark send endpoint.
    pub postmark_endpoint: Option<String>,
    /// Sender address for login code mail.
    pub mail_from: Option<String>,
    /// Per-request timeout for mail delivery, in seconds.
    #[ortho_config(default = 10)]
    pub mail_timeout_secs: u64,
}

impl AppSettings {
    /// Configured listen address or the default.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
            .unwrap_or_else(|| SocketAddr::from(DEFAULT_BIND_ADDR))
    }

    /// SOA values for new zones, each falling back independently.
    #[must_use]
    pub fn soa_defaults(&self) -> SoaDefaults {
        let fallback = SoaDefaults::default();
        SoaDefaults::new(
            self.soa_ns.as_deref().unwrap_or(fallback.ns()),
            self.soa_mbox.as_deref().unwrap_or(fallback.mbox()),
        )
    }

    /// Sender address or the default.
    #[must_use]
    pub fn mail_from(&self) -> &str {
        self.mail_from.as_deref().unwrap_or(DEFAULT_MAIL_FROM)
    }

    /// Mail delivery timeout.
    #[must_use]
    pub const fn mail_timeout(&self) -> Duration {
        Duration::from_secs(self.mail_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 9] = [
        "DNSDESK_BIND_ADDR",
        "DNSDESK_DATABASE_URL",
        "DNSDESK_POOL_MAX_SIZE",
        "DNSDESK_SOA_NS",
        "DNSDESK_SOA_MBOX",
        "DNSDESK_POSTMARK_TOKEN",
        "DNSDESK_POSTMARK_ENDPOINT",
        "DNSDESK_MAIL_FROM",
        "DNSDESK_MAIL_TIMEOUT_SECS",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("dnsdesk")]).expect("config should load")
    }

    fn cleared_except(overrides: &[(&'static str, &str)]) -> Vec<(&'static str, Option<String>)> {
        VARS.iter()
            .map(|name| {
                let value = overrides
                    .iter()
                    .find(|(key, _)| key == name)
                    .map(|(_, value)| (*value).to_owned());
                (*name, value)
            })
            .collect()
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(cleared_except(&[]));

        let settings = load_from_empty_args();

        assert_eq!(settings.bind_addr(), SocketAddr::from(DEFAULT_BIND_ADDR));
        assert!(settings.database_url.is_none());
        assert!(settings.postmark_token.is_none());
        assert_eq!(settings.pool_max_size, 10);
        assert_eq!(settings.soa_defaults(), SoaDefaults::default());
        assert_eq!(settings.mail_from(), DEFAULT_MAIL_FROM);
        assert_eq!(settings.mail_timeout(), Duration::from_secs(10));
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env(cleared_except(&[
            ("DNSDESK_BIND_ADDR", "127.0.0.1:9090"),
            ("DNSDESK_DATABASE_URL", "postgres://db/dnsdesk"),
            ("DNSDESK_POOL_MAX_SIZE", "3"),
            ("DNSDESK_SOA_NS", "ns.example.net"),
            ("DNSDESK_MAIL_FROM", "codes@example.net"),
            ("DNSDESK_MAIL_TIMEOUT_SECS", "3"),
        ]));

        let settings = load_from_empty_args();

        assert_eq!(settings.bind_addr(), SocketAddr::from(([127, 0, 0, 1], 9090)));
        assert_eq!(settings.database_url.as_deref(), Some("postgres://db/dnsdesk"));
        assert_eq!(settings.pool_max_size, 3);
        assert_eq!(
            settings.soa_defaults(),
            SoaDefaults::new("ns.example.net", SoaDefaults::default().mbox())
        );
        assert_eq!(settings.mail_from(), "codes@example.net");
        assert_eq!(settings.mail_timeout(), Duration::from_secs(3));
    }
}
