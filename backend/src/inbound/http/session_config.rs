//! Session signing-secret loading.
//!
//! The secret is read from a file named by `SESSION_SECRET_FILE`. Release
//! builds insist on a readable secret of at least
//! [`SESSION_SECRET_MIN_LEN`] bytes; debug builds fall back to a random
//! per-process secret, which invalidates every session on restart.

pub mod fingerprint;

use std::path::PathBuf;

use mockable::Env;
use rand::RngCore;
use rand::rngs::OsRng;
use tracing::warn;
use zeroize::Zeroize;

use crate::domain::{SESSION_SECRET_MIN_LEN, SessionSecret};

const SESSION_SECRET_DEFAULT_PATH: &str = "/var/run/secrets/session_secret";
const SECRET_FILE_ENV: &str = "SESSION_SECRET_FILE";
const ALLOW_EPHEMERAL_ENV: &str = "SESSION_ALLOW_EPHEMERAL";
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";

/// Build mode for secret validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate missing configuration and warn.
    Debug,
    /// Release builds require explicit, valid configuration.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    /// ```
    /// use dnsdesk::inbound::http::session_config::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// assert_eq!(mode == BuildMode::Debug, cfg!(debug_assertions));
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Errors raised while loading the session secret.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    /// A required environment variable is missing.
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    /// Reading the secret file failed.
    #[error("failed to read session secret at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The secret file is shorter than the release minimum.
    #[error("session secret at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    /// Release builds must not allow ephemeral secrets.
    #[error("SESSION_ALLOW_EPHEMERAL must be 0 in release builds")]
    EphemeralNotAllowed,
}

/// Load the session signing secret.
///
/// # Examples
/// ```
/// use dnsdesk::inbound::http::session_config::{BuildMode, session_secret_from_env};
/// use mockable::MockEnv;
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|_| None);
///
/// let secret = session_secret_from_env(&env, BuildMode::Debug).expect("ephemeral secret");
/// assert_eq!(secret.len(), 32);
/// ```
pub fn session_secret_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<SessionSecret, SessionConfigError> {
    let allow_ephemeral = allow_ephemeral_from_env(env, mode)?;
    let path = PathBuf::from(
        env.string(SECRET_FILE_ENV)
            .unwrap_or_else(|| SESSION_SECRET_DEFAULT_PATH.to_owned()),
    );

    match std::fs::read(&path) {
        Ok(bytes) if bytes.len() >= SESSION_SECRET_MIN_LEN => Ok(SessionSecret::new(bytes)),
        Ok(mut bytes) => {
            let length = bytes.len();
            bytes.zeroize();
            if mode.is_debug() {
                warn!(
                    path = %path.display(),
                    length,
                    "session secret too short; using temporary secret (dev only)"
                );
                Ok(ephemeral_secret())
            } else {
                Err(SessionConfigError::KeyTooShort {
                    path,
                    length,
                    min_len: SESSION_SECRET_MIN_LEN,
                })
            }
        }
        Err(error) if mode.is_debug() || allow_ephemeral => {
            warn!(
                path = %path.display(),
                %error,
                "using temporary session secret (dev only)"
            );
            Ok(ephemeral_secret())
        }
        Err(source) => Err(SessionConfigError::KeyRead { path, source }),
    }
}

fn ephemeral_secret() -> SessionSecret {
    let mut bytes = vec![0_u8; SESSION_SECRET_MIN_LEN];
    OsRng.fill_bytes(&mut bytes);
    SessionSecret::new(bytes)
}

fn allow_ephemeral_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<bool, SessionConfigError> {
    let Some(value) = env.string(ALLOW_EPHEMERAL_ENV) else {
        if mode.is_debug() {
            return Ok(false);
        }
        return Err(SessionConfigError::MissingEnv {
            name: ALLOW_EPHEMERAL_ENV,
        });
    };

    match (parse_bool(&value), mode) {
        (Some(true), BuildMode::Release) => Err(SessionConfigError::EphemeralNotAllowed),
        (Some(flag), _) => Ok(flag),
        (None, BuildMode::Debug) => {
            warn!(%value, "invalid SESSION_ALLOW_EPHEMERAL; defaulting to disabled");
            Ok(false)
        }
        (None, BuildMode::Release) => Err(SessionConfigError::InvalidEnv {
            name: ALLOW_EPHEMERAL_ENV,
            value,
            expected: BOOL_EXPECTED,
        }),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}
