//! Per-type record validation.
//!
//! Validation never fails outright; it returns the list of field errors, and
//! an empty list means the record may be stored. Errors come back in a fixed
//! order: `name`, `ttl`, then the type-specific fields.

use std::net::IpAddr;

use super::content::RecordContent;
use super::record::{RecordDraft, Ttl};
use crate::domain::FieldError;

/// Longest accepted owner name, in characters.
pub const RECORD_NAME_MAX: usize = 253;

/// Field error for a missing or non-positive TTL.
#[must_use]
pub fn ttl_error() -> FieldError {
    FieldError::new("ttl", "TTL must be a positive number")
}

/// Field error for a type tag outside the supported set.
#[must_use]
pub fn unsupported_type(tag: &str) -> FieldError {
    FieldError::new("record_type", format!("Unsupported record type: {tag}"))
}

/// Validate loosely typed client content.
///
/// # Examples
/// ```
/// use dnsdesk::domain::records::{RecordContent, validation::validate_content};
///
/// let content = RecordContent::A { ip: None };
/// let errors = validate_content("www", Some(300), &content);
/// assert_eq!(errors[0].field(), "ip");
/// assert_eq!(errors[0].message(), "Valid IP address is required");
/// ```
#[must_use]
pub fn validate_content(name: &str, ttl: Option<i64>, content: &RecordContent) -> Vec<FieldError> {
    let mut errors = Vec::new();

    let name = name.trim();
    if name.is_empty() {
        errors.push(FieldError::new("name", "Name is required"));
    } else if name.chars().count() > RECORD_NAME_MAX {
        errors.push(FieldError::new(
            "name",
            format!("Name must be at most {RECORD_NAME_MAX} characters"),
        ));
    }
    if ttl.and_then(Ttl::new).is_none() {
        errors.push(ttl_error());
    }

    match content {
        RecordContent::A { ip } => match ip {
            None => errors.push(FieldError::new("ip", "Valid IP address is required")),
            Some(IpAddr::V6(_)) => {
                errors.push(FieldError::new("ip", "IP must be a valid IPv4 address"));
            }
            Some(IpAddr::V4(_)) => {}
        },
        RecordContent::Aaaa { ip } => match ip {
            None => errors.push(FieldError::new("ip", "Valid IP address is required")),
            Some(IpAddr::V4(_)) => {
                errors.push(FieldError::new("ip", "IP must be a valid IPv6 address"));
            }
            Some(IpAddr::V6(_)) => {}
        },
        RecordContent::Cname { host } | RecordContent::Ns { host } => {
            require(&mut errors, "host", host, "Target host is required");
        }
        RecordContent::Mx { host, .. } => {
            require(&mut errors, "host", host, "Mail server is required");
        }
        RecordContent::Txt { text } => {
            require(&mut errors, "text", text, "Text value is required");
        }
        RecordContent::Srv { target, .. } => {
            require(&mut errors, "target", target, "Target host is required");
        }
        RecordContent::Caa { tag, value, .. } => {
            require(&mut errors, "tag", tag, "Tag is required");
            require(&mut errors, "value", value, "Value is required");
        }
        // Generated by the zone service with fixed defaults.
        RecordContent::Soa(_) => {}
    }

    errors
}

/// Validate a typed draft before persisting it.
#[must_use]
pub fn validate_draft(draft: &RecordDraft) -> Vec<FieldError> {
    validate_content(
        draft.name(),
        Some(i64::from(draft.ttl().get())),
        &RecordContent::from(draft.data()),
    )
}

fn require(errors: &mut Vec<FieldError>, field: &str, value: &str, message: &str) {
    if value.trim().is_empty() {
        errors.push(FieldError::new(field, message));
    }
}
