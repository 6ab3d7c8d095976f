//! End-to-end coverage of zone and record management over HTTP.
//!
//! Every request is signed in through the code flow first; the in-memory
//! store backs all ports.

#[expect(dead_code, reason = "notifier counters are only read by the login flow tests")]
mod support;

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use support::{Harness, init_app, location, sign_in};

const ZONE: &str = "example.com";

#[fixture]
fn harness() -> Harness {
    Harness::new()
}

async fn create_zone<S>(app: &S, cookie: &Cookie<'static>, zone: &str) -> ServiceResponse<BoxBody>
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let req = TestRequest::post()
        .uri("/new/zone")
        .cookie(cookie.clone())
        .set_form([("zone", zone)])
        .to_request();
    test::call_service(app, req).await
}

async fn post_json<S>(
    app: &S,
    cookie: &Cookie<'static>,
    uri: &str,
    body: Value,
) -> ServiceResponse<BoxBody>
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let req = TestRequest::post()
        .uri(uri)
        .cookie(cookie.clone())
        .set_json(body)
        .to_request();
    test::call_service(app, req).await
}

async fn get<S>(app: &S, cookie: &Cookie<'static>, uri: &str) -> ServiceResponse<BoxBody>
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let req = TestRequest::get()
        .uri(uri)
        .cookie(cookie.clone())
        .to_request();
    test::call_service(app, req).await
}

fn a_record(ip: &str) -> Value {
    json!({
        "name": "www",
        "ttl": 300,
        "record_type": "A",
        "content": {"ip": ip},
    })
}

fn error_fields(body: &Value) -> Vec<String> {
    body["errors"]
        .as_array()
        .map(|errors| {
            errors
                .iter()
                .filter_map(|error| error["field"].as_str().map(str::to_owned))
                .collect()
        })
        .unwrap_or_default()
}

#[rstest]
#[actix_web::test]
async fn creating_a_zone_writes_one_default_soa(harness: Harness) {
    let app = init_app(&harness).await;
    let alice = sign_in(&app, &harness, "alice@example.com").await;

    let created = create_zone(&app, &alice, ZONE).await;
    assert_eq!(created.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&created), "/zones/example.com");

    let detail: Value = test::read_body_json(get(&app, &alice, "/zones/example.com").await).await;
    assert_eq!(detail["zone"], ZONE);
    let records = detail["records"].as_array().expect("records array");
    assert_eq!(records.len(), 1);
    let soa = &records[0];
    assert_eq!(soa["record_type"], "SOA");
    assert_eq!(soa["name"], "@");
    assert_eq!(soa["ttl"], 3600);
    assert_eq!(soa["content"]["refresh"], 86_400);
    assert_eq!(soa["content"]["retry"], 7_200);
    assert_eq!(soa["content"]["expire"], 604_800);
    assert_eq!(soa["content"]["minttl"], 300);

    let zones: Value = test::read_body_json(get(&app, &alice, "/").await).await;
    assert_eq!(zones, json!({"zones": [ZONE]}));
}

#[rstest]
#[actix_web::test]
async fn creating_an_existing_zone_conflicts(harness: Harness) {
    let app = init_app(&harness).await;
    let alice = sign_in(&app, &harness, "alice@example.com").await;
    create_zone(&app, &alice, ZONE).await;

    let again = create_zone(&app, &alice, ZONE).await;

    assert_eq!(again.status(), StatusCode::CONFLICT);
}

#[rstest]
#[actix_web::test]
async fn concurrent_zone_creation_writes_one_soa(harness: Harness) {
    let app = init_app(&harness).await;
    let alice = sign_in(&app, &harness, "alice@example.com").await;

    let (first, second) = futures_util::join!(
        create_zone(&app, &alice, ZONE),
        create_zone(&app, &alice, ZONE)
    );

    let mut statuses = [first.status(), second.status()];
    statuses.sort_by_key(StatusCode::as_u16);
    assert_eq!(statuses, [StatusCode::SEE_OTHER, StatusCode::CONFLICT]);

    let detail: Value = test::read_body_json(get(&app, &alice, "/zones/example.com").await).await;
    let soa_count = detail["records"]
        .as_array()
        .expect("records array")
        .iter()
        .filter(|record| record["record_type"] == "SOA")
        .count();
    assert_eq!(soa_count, 1);
}

#[rstest]
#[actix_web::test]
async fn invalid_zone_names_are_field_errors(harness: Harness) {
    let app = init_app(&harness).await;
    let alice = sign_in(&app, &harness, "alice@example.com").await;

    let response = create_zone(&app, &alice, "bad zone!").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(error_fields(&body), ["zone"]);
}

#[rstest]
#[actix_web::test]
async fn records_can_be_created_updated_and_deleted(harness: Harness) {
    let app = init_app(&harness).await;
    let alice = sign_in(&app, &harness, "alice@example.com").await;
    create_zone(&app, &alice, ZONE).await;

    let created = post_json(
        &app,
        &alice,
        "/zones/example.com/records/create",
        a_record("192.0.2.10"),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(created).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["record"]["record_type"], "A");
    assert_eq!(body["record"]["content"], json!({"ip": "192.0.2.10"}));
    let id = body["record"]["id"].as_i64().expect("numeric id");

    let updated = post_json(
        &app,
        &alice,
        &format!("/zones/example.com/records/{id}/update"),
        a_record("192.0.2.20"),
    )
    .await;
    assert_eq!(updated.status(), StatusCode::OK);
    let body: Value = test::read_body_json(updated).await;
    assert_eq!(body["record"]["id"], id);
    assert_eq!(body["record"]["content"]["ip"], "192.0.2.20");

    let confirm_uri = format!("/zones/example.com/records/{id}/delete");
    let confirm: Value = test::read_body_json(get(&app, &alice, &confirm_uri).await).await;
    assert_eq!(confirm["zone"], ZONE);
    assert_eq!(confirm["record"]["content"]["ip"], "192.0.2.20");

    let req = TestRequest::post()
        .uri(&confirm_uri)
        .cookie(alice.clone())
        .to_request();
    let deleted = test::call_service(&app, req).await;
    assert_eq!(deleted.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&deleted), "/zones/example.com");

    let gone = get(&app, &alice, &confirm_uri).await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}

#[rstest]
#[actix_web::test]
async fn unparsable_addresses_are_reported_on_the_ip_field(harness: Harness) {
    let app = init_app(&harness).await;
    let alice = sign_in(&app, &harness, "alice@example.com").await;

    let response = post_json(
        &app,
        &alice,
        "/zones/example.com/records/create",
        a_record("999.1.1.1"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(error_fields(&body), ["ip"]);
}

#[rstest]
#[case("SOA")]
#[case("PTR")]
#[actix_web::test]
async fn unsupported_types_are_refused(harness: Harness, #[case] record_type: &str) {
    let app = init_app(&harness).await;
    let alice = sign_in(&app, &harness, "alice@example.com").await;

    let response = post_json(
        &app,
        &alice,
        "/zones/example.com/records/create",
        json!({"name": "@", "ttl": 3600, "record_type": record_type, "content": {}}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(error_fields(&body), ["record_type"]);
}

#[rstest]
#[actix_web::test]
async fn non_numeric_record_ids_are_rejected(harness: Harness) {
    let app = init_app(&harness).await;
    let alice = sign_in(&app, &harness, "alice@example.com").await;

    let response = get(&app, &alice, "/zones/example.com/records/abc/delete").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["message"], "Record ID is not a number");
}

#[rstest]
#[actix_web::test]
async fn records_are_invisible_to_other_users(harness: Harness) {
    let app = init_app(&harness).await;
    let alice = sign_in(&app, &harness, "alice@example.com").await;
    let bob = sign_in(&app, &harness, "bob@example.com").await;
    create_zone(&app, &alice, ZONE).await;
    let created: Value = test::read_body_json(
        post_json(
            &app,
            &alice,
            "/zones/example.com/records/create",
            a_record("192.0.2.10"),
        )
        .await,
    )
    .await;
    let id = created["record"]["id"].as_i64().expect("numeric id");

    let zones: Value = test::read_body_json(get(&app, &bob, "/").await).await;
    assert_eq!(zones, json!({"zones": []}));

    let detail: Value = test::read_body_json(get(&app, &bob, "/zones/example.com").await).await;
    assert_eq!(detail["records"], json!([]));

    let confirm_uri = format!("/zones/example.com/records/{id}/delete");
    let peek = get(&app, &bob, &confirm_uri).await;
    assert_eq!(peek.status(), StatusCode::NOT_FOUND);

    let req = TestRequest::post()
        .uri(&confirm_uri)
        .cookie(bob.clone())
        .to_request();
    let stolen = test::call_service(&app, req).await;
    assert_eq!(stolen.status(), StatusCode::NOT_FOUND);

    let still_there = get(&app, &alice, &confirm_uri).await;
    assert_eq!(still_there.status(), StatusCode::OK);
}
