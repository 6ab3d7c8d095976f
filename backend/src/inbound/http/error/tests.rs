//! Tests for HTTP error mapping.

use super::*;
use crate::domain::FieldError;
use crate::inbound::http::session::SESSION_COOKIE;
use actix_web::body::to_bytes;
use rstest::{fixture, rstest};
use serde_json::Value;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

async fn body_json(response: HttpResponse) -> Value {
    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    serde_json::from_slice(&bytes).expect("error body is JSON")
}

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::unauthorized("login required"), StatusCode::SEE_OTHER)]
#[case(Error::forbidden("denied"), StatusCode::FORBIDDEN)]
#[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
#[case(Error::conflict("exists"), StatusCode::CONFLICT)]
#[case(Error::service_unavailable("db down"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] error: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&error), status);
}

#[rstest]
#[actix_web::test]
async fn internal_errors_are_redacted(expected_trace_id: String) {
    let error = Error::internal("connection string leaked").with_trace_id(expected_trace_id.clone());

    let response = ResponseError::error_response(&error);

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .expect("trace header set")
        .to_str()
        .expect("ascii header")
        .to_owned();
    assert_eq!(header, expected_trace_id);
    let body = body_json(response).await;
    assert_eq!(body["message"], REDACTED_MESSAGE);
    assert_eq!(body["code"], "internal_error");
    assert_eq!(body["traceId"], TRACE_ID);
}

#[rstest]
#[actix_web::test]
async fn validation_errors_list_every_field() {
    let error = Error::validation(vec![
        FieldError::new("name", "Name is required"),
        FieldError::new("ip", "Valid IP address is required"),
    ]);

    let response = ResponseError::error_response(&error);

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(response.headers().get(TRACE_ID_HEADER).is_none());
    let body = body_json(response).await;
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Validation failed");
    assert_eq!(body["errors"][0]["field"], "name");
    assert_eq!(body["errors"][1]["message"], "Valid IP address is required");
}

#[rstest]
fn unauthorised_errors_redirect_to_login_and_clear_the_cookie() {
    let response = ResponseError::error_response(&Error::unauthorized("login required"));

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).map(|v| v.as_bytes()),
        Some(LOGIN_PATH.as_bytes())
    );
    let cookie = response
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .expect("removal cookie set");
    assert_eq!(cookie.value(), "");
}

#[rstest]
fn redaction_preserves_non_internal_messages() {
    let error = Error::not_found("Record 4 not found");

    assert_eq!(redact_if_internal(&error).message(), "Record 4 not found");
}

#[test]
fn from_actix_error_is_redacted_internal_error() {
    let err: Error = actix_web::error::ErrorBadRequest("boom").into();

    assert_eq!(err.code(), ErrorCode::InternalError);
    assert_eq!(err.message(), REDACTED_MESSAGE);
    assert_eq!(err.trace_id(), None);
}
