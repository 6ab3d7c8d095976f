//! Session cookie handling and the authenticated-user extractor.
//!
//! The cookie carries the signed session token and nothing else. Handlers
//! that need a caller take [`AuthenticatedUser`]; a missing or invalid token
//! fails extraction with `Unauthorized`, which renders as a redirect to the
//! login form.

use std::fmt;

use actix_web::cookie::time::OffsetDateTime;
use actix_web::cookie::{Cookie, Expiration, SameSite};
use actix_web::dev::Payload;
use actix_web::http::{StatusCode, header};
use actix_web::{FromRequest, HttpRequest, HttpResponse, ResponseError, web};
use chrono::{DateTime, Utc};
use futures_util::future::LocalBoxFuture;

use super::error::render_error;
use super::state::HttpState;
use crate::domain::ports::Identity;
use crate::domain::{Error, UserId};

/// Name of the cookie holding the session token.
pub const SESSION_COOKIE: &str = "dnsdesk_auth";

/// Path of the login form.
pub const LOGIN_PATH: &str = "/auth/login";

/// Caller resolved from the session cookie.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(Identity);

impl AuthenticatedUser {
    /// Identity behind the session.
    pub fn identity(&self) -> &Identity {
        &self.0
    }

    /// Shorthand for the caller's account id.
    pub fn user_id(&self) -> &UserId {
        self.0.user_id()
    }
}

/// Failure to resolve [`AuthenticatedUser`].
///
/// Remembers whether the request arrived over HTTPS so the cookie cleared by
/// the login redirect carries the same `Secure` flag it was issued with.
#[derive(Debug)]
pub struct SessionRejection {
    error: Error,
    secure: bool,
}

impl SessionRejection {
    /// Underlying domain error.
    pub fn error(&self) -> &Error {
        &self.error
    }
}

impl fmt::Display for SessionRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.error, f)
    }
}

impl ResponseError for SessionRejection {
    fn status_code(&self) -> StatusCode {
        self.error.status_code()
    }

    fn error_response(&self) -> HttpResponse {
        render_error(&self.error, self.secure)
    }
}

async fn resolve(
    state: Option<web::Data<HttpState>>,
    token: Option<String>,
) -> Result<Identity, Error> {
    let state = state.ok_or_else(|| Error::internal("HTTP state is not registered"))?;
    let token = token
        .filter(|value| !value.is_empty())
        .ok_or_else(|| Error::unauthorized("login required"))?;
    state.auth.authenticate(&token).await
}

impl FromRequest for AuthenticatedUser {
    type Error = SessionRejection;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        let token = req
            .cookie(SESSION_COOKIE)
            .map(|cookie| cookie.value().to_owned());
        let secure = is_secure(req);
        Box::pin(async move {
            resolve(state, token)
                .await
                .map(Self)
                .map_err(|error| SessionRejection { error, secure })
        })
    }
}

/// Whether cookies set on this request should carry the `Secure` flag.
pub fn is_secure(req: &HttpRequest) -> bool {
    req.connection_info().scheme().eq_ignore_ascii_case("https")
}

fn expiration(expires_at: DateTime<Utc>) -> Expiration {
    OffsetDateTime::from_unix_timestamp(expires_at.timestamp())
        .map_or(Expiration::Session, Expiration::DateTime)
}

/// Cookie carrying a freshly issued session token, expiring with it.
pub fn session_cookie(token: String, expires_at: DateTime<Utc>, secure: bool) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .expires(expiration(expires_at))
        .finish()
}

/// Cookie instructing the browser to drop the session.
pub fn removal_cookie(secure: bool) -> Cookie<'static> {
    let mut cookie = Cookie::build(SESSION_COOKIE, "")
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .finish();
    cookie.make_removal();
    cookie
}

/// `303 See Other` to `location`.
pub fn see_other(location: impl AsRef<str>) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location.as_ref()))
        .finish()
}
