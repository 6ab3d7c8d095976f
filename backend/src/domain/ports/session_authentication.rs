//! Driving port for passwordless sign-in.
//!
//! Inbound adapters call this port to issue login codes, exchange a code for
//! a session token and resolve a token back to the signed-in user.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{EmailAddress, Error, User, UserId};

/// A freshly minted session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedSession {
    /// Signed session token.
    pub token: String,
    /// Instant the token stops being accepted.
    pub expires_at: DateTime<Utc>,
    /// The account the session belongs to.
    pub user: User,
}

/// The signed-in caller, resolved from a session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    user_id: UserId,
    email: EmailAddress,
}

impl Identity {
    /// Build an identity.
    #[must_use]
    pub fn new(user_id: UserId, email: EmailAddress) -> Self {
        Self { user_id, email }
    }

    /// Account identifier used to scope record access.
    #[must_use]
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Login address.
    #[must_use]
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }
}

/// Domain use-case port for sign-in.
#[async_trait]
pub trait SessionAuthentication: Send + Sync {
    /// Issue and deliver a login code for `email`.
    async fn request_code(&self, email: &str) -> Result<(), Error>;

    /// Exchange a login code for a session.
    async fn verify_code(&self, email: &str, code: &str) -> Result<IssuedSession, Error>;

    /// Resolve a session token to the signed-in caller.
    async fn authenticate(&self, token: &str) -> Result<Identity, Error>;

    /// End a session.
    ///
    /// Sessions are stateless; the caller discards the token and it stays
    /// valid until it expires.
    fn logout(&self, identity: Option<&Identity>);
}
