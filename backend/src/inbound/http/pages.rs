//! Minimal HTML forms for the sign-in flow.
//!
//! Pages are askama templates under `backend/templates/`; interpolated values
//! are HTML-escaped by the template engine.

use actix_web::HttpResponse;
use actix_web::http::header::ContentType;
use askama::Template;
use tracing::error;

/// Email entry form.
#[derive(Template)]
#[template(path = "login.html")]
struct LoginPage<'a> {
    error: Option<&'a str>,
}

/// Code entry form for a pending address.
#[derive(Template)]
#[template(path = "verify.html")]
struct VerifyPage<'a> {
    email: &'a str,
    error: Option<&'a str>,
}

fn render(template: &impl Template) -> HttpResponse {
    match template.render() {
        Ok(html) => HttpResponse::Ok()
            .content_type(ContentType::html())
            .insert_header(("Cache-Control", "no-store"))
            .body(html),
        Err(err) => {
            error!(error = %err, "page rendering failed");
            HttpResponse::InternalServerError()
                .content_type(ContentType::plaintext())
                .body("Internal server error")
        }
    }
}

fn banner(error: Option<&str>) -> Option<&str> {
    error.filter(|message| !message.is_empty())
}

/// Email entry form.
pub fn login_page(error: Option<&str>) -> HttpResponse {
    render(&LoginPage {
        error: banner(error),
    })
}

/// Code entry form for `email`.
pub fn verify_page(email: &str, error: Option<&str>) -> HttpResponse {
    render(&VerifyPage {
        email,
        error: banner(error),
    })
}
