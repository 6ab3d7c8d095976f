//! HTTP adapter mapping for domain errors.
//!
//! Domain failures become JSON bodies with a matching status code, except
//! `Unauthorized`, which sends the browser back to the login form and clears
//! the session cookie.

use actix_web::http::{StatusCode, header};
use actix_web::{HttpResponse, ResponseError};
use tracing::{error, warn};

use super::session::{LOGIN_PATH, removal_cookie};
use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

const REDACTED_MESSAGE: &str = "Internal server error";

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::SEE_OTHER,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn redact_if_internal(error: &Error) -> Error {
    if matches!(error.code(), ErrorCode::InternalError) {
        let redacted = Error::internal(REDACTED_MESSAGE);
        match error.trace_id() {
            Some(id) => redacted.with_trace_id(id),
            None => redacted,
        }
    } else {
        error.clone()
    }
}

fn log_server_side(error: &Error) {
    match error.code() {
        ErrorCode::InternalError => {
            error!(trace_id = ?error.trace_id(), message = %error.message(), "request failed");
        }
        ErrorCode::ServiceUnavailable => {
            warn!(trace_id = ?error.trace_id(), message = %error.message(), "dependency unavailable");
        }
        _ => {}
    }
}

/// Render `error`; `secure` sets the `Secure` flag on the removal cookie
/// sent with `Unauthorized` redirects.
pub(super) fn render_error(error: &Error, secure: bool) -> HttpResponse {
    log_server_side(error);

    let mut builder = HttpResponse::build(status_for(error.code()));
    if let Some(id) = error.trace_id() {
        builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
    }

    if error.code() == ErrorCode::Unauthorized {
        return builder
            .insert_header((header::LOCATION, LOGIN_PATH))
            .cookie(removal_cookie(secure))
            .finish();
    }

    builder.json(redact_if_internal(error))
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        render_error(self, false)
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to domain error");
        Error::internal(REDACTED_MESSAGE)
    }
}

#[cfg(test)]
mod tests;
