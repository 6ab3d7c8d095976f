//! Tests for the domain error payload and its wire shape.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[rstest]
#[case(Error::invalid_request("bad"), ErrorCode::InvalidRequest)]
#[case(Error::unauthorized("no"), ErrorCode::Unauthorized)]
#[case(Error::forbidden("no"), ErrorCode::Forbidden)]
#[case(Error::not_found("gone"), ErrorCode::NotFound)]
#[case(Error::conflict("dup"), ErrorCode::Conflict)]
#[case(Error::service_unavailable("down"), ErrorCode::ServiceUnavailable)]
#[case(Error::internal("boom"), ErrorCode::InternalError)]
fn constructors_set_code(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
}

#[rstest]
fn try_new_rejects_empty_messages() {
    let result = Error::try_new(ErrorCode::InvalidRequest, "   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyMessage)));
}

#[rstest]
fn try_with_trace_id_rejects_blank_values() {
    let result = Error::invalid_request("bad").try_with_trace_id(" ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyTraceId)));
}

#[rstest]
fn trace_id_is_absent_outside_scope() {
    assert!(Error::internal("boom").trace_id().is_none());
}

#[rstest]
#[tokio::test]
async fn new_captures_trace_id_in_scope(expected_trace_id: String) {
    let trace_id: TraceId = expected_trace_id.parse().expect("fixture UUID parses");
    let error = TraceId::scope(trace_id, async move { Error::internal("boom") }).await;

    assert_eq!(error.trace_id(), Some(expected_trace_id.as_str()));
}

#[rstest]
fn validation_errors_serialise_field_list() {
    let error = Error::validation(vec![
        FieldError::new("ip", "Valid IP address is required"),
        FieldError::new("ttl", "TTL must be a positive number"),
    ]);

    let value = serde_json::to_value(&error).expect("error serialises");

    assert_eq!(
        value,
        json!({
            "status": "error",
            "code": "invalid_request",
            "message": "Validation failed",
            "errors": [
                {"field": "ip", "message": "Valid IP address is required"},
                {"field": "ttl", "message": "TTL must be a positive number"}
            ]
        })
    );
}

#[rstest]
fn plain_errors_omit_empty_field_list(expected_trace_id: String) {
    let error = Error::not_found("Record not found").with_trace_id(expected_trace_id.clone());

    let value = serde_json::to_value(&error).expect("error serialises");

    assert_eq!(value["traceId"], json!(expected_trace_id));
    assert!(value.get("errors").is_none());
}

#[rstest]
#[tokio::test]
async fn deserialising_ignores_ambient_trace(expected_trace_id: String) {
    let trace_id: TraceId = expected_trace_id.parse().expect("fixture UUID parses");
    let body = json!({"status": "error", "code": "conflict", "message": "dup"});

    let error = TraceId::scope(trace_id, async move {
        serde_json::from_value::<Error>(body).expect("payload deserialises")
    })
    .await;

    assert_eq!(error.code(), ErrorCode::Conflict);
    assert!(error.trace_id().is_none());
}

#[rstest]
fn deserialising_rejects_blank_message() {
    let body = json!({"code": "not_found", "message": " "});
    assert!(serde_json::from_value::<Error>(body).is_err());
}
