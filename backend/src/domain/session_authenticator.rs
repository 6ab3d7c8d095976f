//! Passwordless sign-in service.
//!
//! Flow: `request_code` stores and mails a six digit code; `verify_code`
//! consumes it and mints an HS256 session token; `authenticate` resolves a
//! token to the caller on every protected request.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::TimeDelta;
use mockable::{Clock, DefaultClock};
use tracing::{debug, info, warn};

use crate::domain::ports::{
    CodeNotifier, Identity, IssuedSession, OneTimeCodeRepository, OneTimeCodeRepositoryError,
    SessionAuthentication, UserPersistenceError, UserRepository,
};
use crate::domain::session_token::{SESSION_TTL_SECS, SessionClaims, SessionTokenCodec};
use crate::domain::{
    EmailAddress, Error, FieldError, OneTimeCode, OsRngCodeGenerator, OtpCode, OtpCodeGenerator,
};

const INVALID_CODE: &str = "invalid or expired code";
const LOGIN_REQUIRED: &str = "login required";

/// When accounts are created for previously unseen email addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProvisioningPolicy {
    /// Only a successful code verification creates an account; a valid token
    /// for an unknown address is rejected.
    OnVerifyOnly,
    /// Code verification and token authentication both create the account
    /// when it is missing.
    #[default]
    OnVerifyAndAuthenticate,
}

/// Driven ports the authenticator depends on.
pub struct AuthenticatorPorts {
    /// Account storage.
    pub users: Arc<dyn UserRepository>,
    /// Login code storage.
    pub codes: Arc<dyn OneTimeCodeRepository>,
    /// Login code delivery.
    pub notifier: Arc<dyn CodeNotifier>,
}

/// Sign-in service implementing [`SessionAuthentication`].
pub struct SessionAuthenticator {
    users: Arc<dyn UserRepository>,
    codes: Arc<dyn OneTimeCodeRepository>,
    notifier: Arc<dyn CodeNotifier>,
    tokens: SessionTokenCodec,
    clock: Arc<dyn Clock>,
    generator: Arc<dyn OtpCodeGenerator>,
    provisioning: ProvisioningPolicy,
}

impl SessionAuthenticator {
    /// Build an authenticator using the system clock, the OS RNG and
    /// [`ProvisioningPolicy::OnVerifyAndAuthenticate`].
    #[must_use]
    pub fn new(ports: AuthenticatorPorts, tokens: SessionTokenCodec) -> Self {
        let AuthenticatorPorts {
            users,
            codes,
            notifier,
        } = ports;
        Self {
            users,
            codes,
            notifier,
            tokens,
            clock: Arc::new(DefaultClock),
            generator: Arc::new(OsRngCodeGenerator),
            provisioning: ProvisioningPolicy::default(),
        }
    }

    /// Replace the time source.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the code generator.
    #[must_use]
    pub fn with_code_generator(mut self, generator: Arc<dyn OtpCodeGenerator>) -> Self {
        self.generator = generator;
        self
    }

    /// Choose when accounts are provisioned.
    #[must_use]
    pub fn with_provisioning(mut self, provisioning: ProvisioningPolicy) -> Self {
        self.provisioning = provisioning;
        self
    }
}

fn map_code_error(error: OneTimeCodeRepositoryError) -> Error {
    match error {
        OneTimeCodeRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("login code store unavailable: {message}"))
        }
        OneTimeCodeRepositoryError::Query { message } => {
            Error::internal(format!("login code store error: {message}"))
        }
    }
}

fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user store unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user store error: {message}"))
        }
    }
}

#[async_trait]
impl SessionAuthentication for SessionAuthenticator {
    async fn request_code(&self, email: &str) -> Result<(), Error> {
        let email = EmailAddress::new(email)
            .map_err(|err| Error::validation(vec![FieldError::new("email", err.to_string())]))?;

        let issued = OneTimeCode::issue(email, self.generator.generate(), self.clock.utc());
        self.codes.store(&issued).await.map_err(map_code_error)?;

        if let Err(err) = self.notifier.send_code(issued.email(), issued.code()).await {
            warn!(error = %err, "login code stored but delivery failed");
            return Err(Error::service_unavailable("Failed to send login code"));
        }

        info!(expires_at = %issued.expires_at(), "login code issued");
        Ok(())
    }

    async fn verify_code(&self, email: &str, code: &str) -> Result<IssuedSession, Error> {
        let (Ok(email), Ok(code)) = (EmailAddress::new(email), OtpCode::new(code)) else {
            debug!("login code rejected: malformed input");
            return Err(Error::unauthorized(INVALID_CODE));
        };

        let now = self.clock.utc();
        let consumed = self
            .codes
            .consume(&email, &code, now)
            .await
            .map_err(map_code_error)?;
        if !consumed {
            debug!("login code rejected: no matching unexpired code");
            return Err(Error::unauthorized(INVALID_CODE));
        }

        let user = self
            .users
            .create_or_fetch(&email)
            .await
            .map_err(map_user_error)?;

        let expires_at = now + TimeDelta::seconds(SESSION_TTL_SECS);
        let claims = SessionClaims::new(&email, now, expires_at);
        let token = self
            .tokens
            .mint(&claims)
            .map_err(|err| Error::internal(format!("failed to mint session token: {err}")))?;

        info!(user_id = %user.id(), "session issued");
        Ok(IssuedSession {
            token,
            expires_at,
            user,
        })
    }

    async fn authenticate(&self, token: &str) -> Result<Identity, Error> {
        let claims = self
            .tokens
            .verify(token, self.clock.utc())
            .map_err(|err| {
                debug!(error = %err, "session token rejected");
                Error::unauthorized(LOGIN_REQUIRED)
            })?;
        let email = EmailAddress::new(&claims.email).map_err(|err| {
            debug!(error = %err, "session token carries an invalid email");
            Error::unauthorized(LOGIN_REQUIRED)
        })?;

        let known = self
            .users
            .find_by_email(&email)
            .await
            .map_err(map_user_error)?;
        let user = match (known, self.provisioning) {
            (Some(user), _) => user,
            (None, ProvisioningPolicy::OnVerifyAndAuthenticate) => {
                let user = self
                    .users
                    .create_or_fetch(&email)
                    .await
                    .map_err(map_user_error)?;
                info!(user_id = %user.id(), "user provisioned from session token");
                user
            }
            (None, ProvisioningPolicy::OnVerifyOnly) => {
                return Err(Error::unauthorized(LOGIN_REQUIRED));
            }
        };

        Ok(Identity::new(user.id().clone(), email))
    }

    fn logout(&self, identity: Option<&Identity>) {
        match identity {
            Some(identity) => info!(user_id = %identity.user_id(), "session cleared"),
            None => debug!("logout without an active session"),
        }
    }
}

#[cfg(test)]
#[path = "session_authenticator_tests.rs"]
mod tests;
