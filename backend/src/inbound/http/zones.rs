//! Zone endpoints.
//!
//! ```text
//! GET  /               zones owned by the caller
//! POST /new/zone       create a zone (its SOA record)
//! GET  /zones/{zone}   records in a zone
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};

use super::ApiResult;
use super::records::RecordResponse;
use super::session::{AuthenticatedUser, see_other};
use super::state::HttpState;
use super::validation::parse_zone;
use url::form_urlencoded;

/// `GET /` response.
#[derive(Debug, Serialize)]
pub struct ZoneListResponse {
    zones: Vec<String>,
}

/// `GET /zones/{zone}` response.
#[derive(Debug, Serialize)]
pub struct ZoneDetailResponse {
    zone: String,
    records: Vec<RecordResponse>,
}

/// `POST /new/zone` body.
#[derive(Debug, Deserialize)]
pub struct NewZoneForm {
    #[serde(default)]
    zone: String,
}

pub(crate) fn zone_path(zone: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(zone.as_bytes()).collect();
    format!("/zones/{encoded}")
}

/// List the caller's zones.
#[get("/")]
pub async fn list_zones(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
) -> ApiResult<web::Json<ZoneListResponse>> {
    let zones = state.records.list_zones(user.user_id()).await?;
    Ok(web::Json(ZoneListResponse {
        zones: zones.into_iter().map(String::from).collect(),
    }))
}

/// Create a zone and redirect to it.
#[post("/new/zone")]
pub async fn create_zone(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    form: web::Form<NewZoneForm>,
) -> ApiResult<HttpResponse> {
    let zone = parse_zone(&form.zone)?;
    state.records.create_zone(user.user_id(), &zone).await?;
    Ok(see_other(zone_path(zone.as_ref())))
}

/// List the records in one of the caller's zones.
#[get("/zones/{zone}")]
pub async fn zone_detail(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<ZoneDetailResponse>> {
    let zone = parse_zone(&path.into_inner())?;
    let records = state
        .records
        .list_records_by_zone(user.user_id(), &zone)
        .await?;
    let records = records
        .iter()
        .map(RecordResponse::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(web::Json(ZoneDetailResponse {
        zone: zone.into(),
        records,
    }))
}
