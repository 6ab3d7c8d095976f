//! HTTP inbound adapter.

pub mod auth;
pub mod error;
pub mod health;
mod pages;
pub mod records;
pub mod session;
pub mod session_config;
pub mod state;
mod validation;
pub mod zones;

use actix_web::{error::JsonPayloadError, web};
use tracing::debug;

pub use error::ApiResult;

use crate::domain::Error;

fn json_error_handler(err: JsonPayloadError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    debug!(error = %err, "rejected JSON payload");
    Error::invalid_request("Invalid JSON payload").into()
}

/// Register the sign-in, zone and record routes.
///
/// Health probes are registered separately because they depend on
/// [`health::HealthState`] rather than the domain ports.
///
/// # Examples
/// ```no_run
/// use actix_web::{App, web};
/// use dnsdesk::inbound::http::{configure, state::HttpState};
///
/// fn app(state: web::Data<HttpState>) {
///     let _app = App::new().app_data(state).configure(configure);
/// }
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .service(auth::login_form)
        .service(auth::request_code)
        .service(auth::verify_form)
        .service(auth::verify_code)
        .service(auth::logout)
        .service(zones::list_zones)
        .service(zones::create_zone)
        .service(zones::zone_detail)
        .service(records::create_record)
        .service(records::update_record)
        .service(records::confirm_delete)
        .service(records::delete_record);
}
