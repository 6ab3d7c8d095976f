//! HS256 session tokens.
//!
//! Tokens use the JWS compact form `header.payload.signature`, each part
//! base64url without padding. Only `HS256` is accepted on verification; any
//! other `alg`, including `none`, is rejected before the signature is checked.

use std::fmt;
use std::sync::Arc;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::domain::EmailAddress;

type HmacSha256 = Hmac<Sha256>;

/// Session lifetime, in seconds.
pub const SESSION_TTL_SECS: i64 = 24 * 60 * 60;

/// Minimum signing secret length accepted in release builds.
pub const SESSION_SECRET_MIN_LEN: usize = 32;

const ALGORITHM: &str = "HS256";
const TOKEN_TYPE: &str = "JWT";

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Authenticated email address.
    pub email: String,
    /// Issued-at, seconds since the epoch.
    pub iat: i64,
    /// Not-before, seconds since the epoch.
    pub nbf: i64,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
}

impl SessionClaims {
    /// Claims for `email` valid from `issued_at` until `expires_at`.
    #[must_use]
    pub fn new(email: &EmailAddress, issued_at: DateTime<Utc>, expires_at: DateTime<Utc>) -> Self {
        Self {
            email: email.as_ref().to_owned(),
            iat: issued_at.timestamp(),
            nbf: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        }
    }
}

/// Reasons a token fails to mint or verify.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// The token is not three base64url JSON segments.
    #[error("session token is malformed")]
    Malformed,
    /// The header names an algorithm other than HS256.
    #[error("unsupported signing algorithm: {alg}")]
    UnsupportedAlgorithm {
        /// Algorithm named in the header.
        alg: String,
    },
    /// The MAC does not match.
    #[error("session token signature mismatch")]
    BadSignature,
    /// `exp` is not after the current time.
    #[error("session token expired")]
    Expired,
    /// `nbf` is after the current time.
    #[error("session token not yet valid")]
    NotYetValid,
    /// Serialising or keying failed while minting.
    #[error("session token encoding failed: {message}")]
    Encoding {
        /// Underlying failure.
        message: String,
    },
}

/// Signing secret for session tokens, zeroed on drop.
#[derive(Clone)]
pub struct SessionSecret(Zeroizing<Vec<u8>>);

impl SessionSecret {
    /// Wrap raw secret bytes.
    #[must_use]
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(Zeroizing::new(bytes))
    }

    /// Secret material.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_slice()
    }

    /// Length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the secret holds no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SessionSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionSecret")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Header {
    alg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    typ: Option<String>,
}

/// Mints and verifies HS256 session tokens.
///
/// # Examples
/// ```
/// use chrono::{TimeDelta, Utc};
/// use dnsdesk::domain::{EmailAddress, SessionClaims, SessionSecret, SessionTokenCodec};
///
/// let codec = SessionTokenCodec::new(SessionSecret::new(vec![7; 32]));
/// let email = EmailAddress::new("ops@example.com").expect("valid address");
/// let now = Utc::now();
/// let claims = SessionClaims::new(&email, now, now + TimeDelta::hours(1));
///
/// let token = codec.mint(&claims).expect("token minted");
/// assert_eq!(codec.verify(&token, now).expect("token verifies"), claims);
/// ```
#[derive(Debug, Clone)]
pub struct SessionTokenCodec {
    secret: Arc<SessionSecret>,
}

impl SessionTokenCodec {
    /// Build a codec around `secret`.
    #[must_use]
    pub fn new(secret: SessionSecret) -> Self {
        Self {
            secret: Arc::new(secret),
        }
    }

    /// Sign `claims` into a compact token.
    pub fn mint(&self, claims: &SessionClaims) -> Result<String, TokenError> {
        let header = Header {
            alg: ALGORITHM.to_owned(),
            typ: Some(TOKEN_TYPE.to_owned()),
        };
        let header = serde_json::to_vec(&header).map_err(encoding_error)?;
        let payload = serde_json::to_vec(claims).map_err(encoding_error)?;
        let signing_input = format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(header),
            URL_SAFE_NO_PAD.encode(payload)
        );

        let mut mac = self.mac()?;
        mac.update(signing_input.as_bytes());
        let signature = mac.finalize().into_bytes();

        Ok(format!("{signing_input}.{}", URL_SAFE_NO_PAD.encode(signature)))
    }

    /// Check the signature and validity window of `token` at `now`.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, TokenError> {
        let mut parts = token.split('.');
        let (Some(header), Some(payload), Some(signature), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(TokenError::Malformed);
        };

        let decoded_header: Header = decode_segment(header)?;
        if decoded_header.alg != ALGORITHM {
            return Err(TokenError::UnsupportedAlgorithm {
                alg: decoded_header.alg,
            });
        }

        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| TokenError::Malformed)?;
        let mut mac = self.mac()?;
        mac.update(header.as_bytes());
        mac.update(b".");
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| TokenError::BadSignature)?;

        let claims: SessionClaims = decode_segment(payload)?;
        let now = now.timestamp();
        if claims.exp <= now {
            return Err(TokenError::Expired);
        }
        if claims.nbf > now {
            return Err(TokenError::NotYetValid);
        }
        Ok(claims)
    }

    fn mac(&self) -> Result<HmacSha256, TokenError> {
        HmacSha256::new_from_slice(self.secret.as_bytes()).map_err(encoding_error)
    }
}

fn decode_segment<T: serde::de::DeserializeOwned>(segment: &str) -> Result<T, TokenError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|_| TokenError::Malformed)?;
    serde_json::from_slice(&bytes).map_err(|_| TokenError::Malformed)
}

fn encoding_error(err: impl fmt::Display) -> TokenError {
    TokenError::Encoding {
        message: err.to_string(),
    }
}
