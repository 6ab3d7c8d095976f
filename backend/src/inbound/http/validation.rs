//! Shared parsing helpers for path and form input.

use crate::domain::records::{RecordId, RecordType, ZoneName, validation};
use crate::domain::{Error, FieldError};

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

pub(crate) const ZONE_FIELD: FieldName = FieldName::new("zone");
pub(crate) const RECORD_TYPE_FIELD: FieldName = FieldName::new("record_type");

fn field_error(field: FieldName, message: impl Into<String>) -> Error {
    Error::validation(vec![FieldError::new(field.as_str(), message)])
}

pub(crate) fn parse_zone(raw: &str) -> Result<ZoneName, Error> {
    ZoneName::new(raw).map_err(|err| field_error(ZONE_FIELD, err.to_string()))
}

pub(crate) fn parse_record_id(raw: &str) -> Result<RecordId, Error> {
    raw.trim()
        .parse::<i64>()
        .map(RecordId::new)
        .map_err(|_| Error::invalid_request("Record ID is not a number"))
}

/// Parse a client-submitted record type. SOA records are only ever created
/// with their zone, so they are refused here like any unknown tag.
pub(crate) fn parse_submitted_type(raw: &str) -> Result<RecordType, Error> {
    let unsupported = || Error::validation(vec![validation::unsupported_type(raw)]);
    match raw.parse::<RecordType>() {
        Ok(RecordType::Soa) | Err(_) => Err(unsupported()),
        Ok(record_type) => Ok(record_type),
    }
}
