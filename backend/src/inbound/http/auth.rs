//! Sign-in endpoints.
//!
//! ```text
//! GET  /auth/login   email form
//! POST /auth/login   request a code, then 303 to /auth/verify
//! GET  /auth/verify  code form
//! POST /auth/verify  exchange the code for a session cookie
//! GET  /auth/logout  drop the session cookie
//! ```
//!
//! These routes speak to browsers, so failures become redirects back to the
//! relevant form with an `error` query parameter rather than JSON bodies.

use actix_web::{HttpRequest, HttpResponse, get, http::header, post, web};
use serde::Deserialize;
use tracing::warn;
use url::form_urlencoded;

use super::pages;
use super::session::{
    AuthenticatedUser, LOGIN_PATH, is_secure, removal_cookie, see_other, session_cookie,
};
use super::state::HttpState;
use crate::domain::{Error, ErrorCode};

const VERIFY_PATH: &str = "/auth/verify";
const INVALID_CODE: &str = "Invalid code";
const INVALID_REQUEST: &str = "Invalid request";
const SEND_FAILED: &str = "Failed to send email";
const SERVER_ERROR: &str = "Server error";

/// Query parameters accepted by the sign-in forms.
#[derive(Debug, Default, Deserialize)]
pub struct FormQuery {
    email: Option<String>,
    error: Option<String>,
}

/// `POST /auth/login` body.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    email: String,
}

/// `POST /auth/verify` body.
#[derive(Debug, Deserialize)]
pub struct VerifyForm {
    #[serde(default)]
    email: String,
    #[serde(default)]
    code: String,
}

fn with_query(path: &str, pairs: &[(&str, &str)]) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish();
    format!("{path}?{query}")
}

fn login_error(message: &str) -> HttpResponse {
    see_other(with_query(LOGIN_PATH, &[("error", message)]))
}

fn request_code_failure(error: &Error) -> HttpResponse {
    match error.code() {
        ErrorCode::InvalidRequest => {
            let message = error
                .errors()
                .first()
                .map_or(error.message(), |field| field.message());
            login_error(message)
        }
        ErrorCode::ServiceUnavailable => {
            warn!(message = %error.message(), "login code request failed");
            login_error(SEND_FAILED)
        }
        _ => {
            warn!(message = %error.message(), "login code request failed");
            login_error(SERVER_ERROR)
        }
    }
}

/// Render the email form.
#[get("/auth/login")]
pub async fn login_form(query: web::Query<FormQuery>) -> HttpResponse {
    pages::login_page(query.error.as_deref())
}

/// Issue a login code and move on to the code form.
#[post("/auth/login")]
pub async fn request_code(state: web::Data<HttpState>, form: web::Form<LoginForm>) -> HttpResponse {
    let email = form.email.trim();
    match state.auth.request_code(email).await {
        Ok(()) => see_other(with_query(VERIFY_PATH, &[("email", email)])),
        Err(error) => request_code_failure(&error),
    }
}

/// Render the code form; without an email there is nothing to verify.
#[get("/auth/verify")]
pub async fn verify_form(query: web::Query<FormQuery>) -> HttpResponse {
    match query.email.as_deref().map(str::trim) {
        Some(email) if !email.is_empty() => pages::verify_page(email, query.error.as_deref()),
        _ => see_other(LOGIN_PATH),
    }
}

/// Exchange a login code for a session cookie.
#[post("/auth/verify")]
pub async fn verify_code(
    req: HttpRequest,
    state: web::Data<HttpState>,
    form: web::Form<VerifyForm>,
) -> HttpResponse {
    let email = form.email.trim();
    let code = form.code.trim();
    if email.is_empty() || code.is_empty() {
        return login_error(INVALID_REQUEST);
    }

    match state.auth.verify_code(email, code).await {
        Ok(issued) => HttpResponse::SeeOther()
            .insert_header((header::LOCATION, "/"))
            .cookie(session_cookie(issued.token, issued.expires_at, is_secure(&req)))
            .finish(),
        Err(error) if error.code() == ErrorCode::Unauthorized => see_other(with_query(
            VERIFY_PATH,
            &[("email", email), ("error", INVALID_CODE)],
        )),
        Err(error) => {
            warn!(message = %error.message(), "login code verification failed");
            login_error(SERVER_ERROR)
        }
    }
}

/// Drop the session cookie. Tokens are stateless, so nothing is revoked
/// server-side.
#[get("/auth/logout")]
pub async fn logout(
    req: HttpRequest,
    state: web::Data<HttpState>,
    user: Option<AuthenticatedUser>,
) -> HttpResponse {
    state
        .auth
        .logout(user.as_ref().map(AuthenticatedUser::identity));
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, LOGIN_PATH))
        .cookie(removal_cookie(is_secure(&req)))
        .finish()
}
