//! Record endpoints.
//!
//! ```text
//! POST /zones/{zone}/records/create        create a record
//! POST /zones/{zone}/records/{id}/update   replace a record
//! GET  /zones/{zone}/records/{id}/delete   show the record to confirm deletion
//! POST /zones/{zone}/records/{id}/delete   delete a record
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ApiResult;
use super::session::{AuthenticatedUser, see_other};
use super::state::HttpState;
use super::validation::{parse_record_id, parse_submitted_type, parse_zone};
use super::zones::zone_path;
use crate::domain::Error;
use crate::domain::records::{Record, RecordContent, RecordDraft, ZoneName};

/// Record submitted by a client.
#[derive(Debug, Deserialize)]
pub struct RecordRequest {
    #[serde(default)]
    name: String,
    #[serde(default)]
    ttl: Option<i64>,
    #[serde(default)]
    record_type: String,
    #[serde(default)]
    content: Value,
}

impl RecordRequest {
    fn into_draft(self, zone: ZoneName) -> Result<RecordDraft, Error> {
        let record_type = parse_submitted_type(self.record_type.trim())?;
        let content = RecordContent::parse(record_type, self.content).map_err(|err| {
            Error::invalid_request(format!("invalid {record_type} record content: {err}"))
        })?;
        RecordDraft::from_content(zone, &self.name, self.ttl, content).map_err(Error::validation)
    }
}

/// Record as returned to clients.
#[derive(Debug, Serialize)]
pub struct RecordResponse {
    id: i64,
    zone: String,
    name: String,
    ttl: i32,
    record_type: String,
    content: Value,
}

impl TryFrom<&Record> for RecordResponse {
    type Error = Error;

    fn try_from(record: &Record) -> Result<Self, Self::Error> {
        let content = record.data().to_value().map_err(|err| {
            Error::internal(format!("failed to encode record {}: {err}", record.id()))
        })?;
        Ok(Self {
            id: record.id().get(),
            zone: record.zone().to_string(),
            name: record.name().to_owned(),
            ttl: record.ttl().get(),
            record_type: record.record_type().as_str().to_owned(),
            content,
        })
    }
}

/// Successful create/update body.
#[derive(Debug, Serialize)]
pub struct RecordEnvelope {
    status: &'static str,
    record: RecordResponse,
}

impl RecordEnvelope {
    fn success(record: &Record) -> Result<Self, Error> {
        Ok(Self {
            status: "success",
            record: RecordResponse::try_from(record)?,
        })
    }
}

/// Delete confirmation body.
#[derive(Debug, Serialize)]
pub struct DeleteConfirmation {
    zone: String,
    record: RecordResponse,
}

/// Create a record in the caller's zone.
#[post("/zones/{zone}/records/create")]
pub async fn create_record(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<RecordRequest>,
) -> ApiResult<HttpResponse> {
    let zone = parse_zone(&path.into_inner())?;
    let draft = payload.into_inner().into_draft(zone)?;
    let record = state.records.create_record(user.user_id(), draft).await?;
    Ok(HttpResponse::Created().json(RecordEnvelope::success(&record)?))
}

/// Replace a record in the caller's zone.
#[post("/zones/{zone}/records/{id}/update")]
pub async fn update_record(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<(String, String)>,
    payload: web::Json<RecordRequest>,
) -> ApiResult<HttpResponse> {
    let (zone, id) = path.into_inner();
    let zone = parse_zone(&zone)?;
    let id = parse_record_id(&id)?;
    let draft = payload.into_inner().into_draft(zone)?;
    let record = state
        .records
        .update_record(user.user_id(), id, draft)
        .await?;
    Ok(HttpResponse::Ok().json(RecordEnvelope::success(&record)?))
}

/// Show a record before it is deleted.
#[get("/zones/{zone}/records/{id}/delete")]
pub async fn confirm_delete(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<DeleteConfirmation>> {
    let (zone, id) = path.into_inner();
    let zone = parse_zone(&zone)?;
    let id = parse_record_id(&id)?;
    let record = state.records.get_record(user.user_id(), &zone, id).await?;
    Ok(web::Json(DeleteConfirmation {
        zone: zone.into(),
        record: RecordResponse::try_from(&record)?,
    }))
}

/// Delete a record and return to its zone.
#[post("/zones/{zone}/records/{id}/delete")]
pub async fn delete_record(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<(String, String)>,
) -> ApiResult<HttpResponse> {
    let (zone, id) = path.into_inner();
    let zone = parse_zone(&zone)?;
    let id = parse_record_id(&id)?;
    state.records.delete_record(user.user_id(), &zone, id).await?;
    Ok(see_other(zone_path(zone.as_ref())))
}
