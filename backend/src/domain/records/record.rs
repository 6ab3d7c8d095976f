//! Record identity, zone naming and the record aggregate.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::content::RecordContent;
use super::data::{RecordData, RecordType};
use super::validation;
use crate::domain::{FieldError, UserId};

/// Longest zone name accepted, in characters.
pub const ZONE_NAME_MAX: usize = 253;
/// Longest single label accepted, in characters.
pub const ZONE_LABEL_MAX: usize = 63;

/// Storage-assigned record identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(i64);

impl RecordId {
    /// Wrap a raw identifier.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Raw identifier.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Positive time-to-live in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ttl(i32);

impl Ttl {
    /// One hour, used for zone SOA records.
    pub const ONE_HOUR: Self = Self(3600);

    /// Accepts values in `1..=i32::MAX`.
    #[must_use]
    pub fn new(seconds: i64) -> Option<Self> {
        i32::try_from(seconds).ok().filter(|s| *s > 0).map(Self)
    }

    /// Seconds.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

/// Validation errors for zone names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZoneNameError {
    /// The name was empty after normalisation.
    Empty,
    /// The name exceeded [`ZONE_NAME_MAX`].
    TooLong {
        /// Maximum accepted length.
        max: usize,
    },
    /// A label was empty, too long or contained a forbidden character.
    InvalidLabel {
        /// The offending label.
        label: String,
    },
}

impl fmt::Display for ZoneNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Zone is required"),
            Self::TooLong { max } => write!(f, "Zone must be at most {max} characters"),
            Self::InvalidLabel { label } => write!(f, "Zone label '{label}' is not valid"),
        }
    }
}

impl std::error::Error for ZoneNameError {}

/// Normalised zone name: trimmed, lower-cased, without the trailing dot.
///
/// # Examples
/// ```
/// use dnsdesk::domain::records::ZoneName;
///
/// let zone = ZoneName::new(" Example.COM. ").expect("valid zone");
/// assert_eq!(zone.as_ref(), "example.com");
/// assert!(ZoneName::new("-bad.example").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ZoneName(String);

impl ZoneName {
    /// Validate and normalise a zone name.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ZoneNameError> {
        let trimmed = raw.as_ref().trim();
        let normalised = trimmed
            .strip_suffix('.')
            .unwrap_or(trimmed)
            .to_ascii_lowercase();
        if normalised.is_empty() {
            return Err(ZoneNameError::Empty);
        }
        if normalised.chars().count() > ZONE_NAME_MAX {
            return Err(ZoneNameError::TooLong {
                max: ZONE_NAME_MAX,
            });
        }
        if let Some(label) = normalised.split('.').find(|label| !is_valid_label(label)) {
            return Err(ZoneNameError::InvalidLabel {
                label: label.to_owned(),
            });
        }
        Ok(Self(normalised))
    }

    /// Borrow the normalised name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

fn is_valid_label(label: &str) -> bool {
    !label.is_empty()
        && label.len() <= ZONE_LABEL_MAX
        && !label.starts_with('-')
        && !label.ends_with('-')
        && label
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

impl AsRef<str> for ZoneName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ZoneName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<ZoneName> for String {
    fn from(value: ZoneName) -> Self {
        value.0
    }
}

impl TryFrom<String> for ZoneName {
    type Error = ZoneNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A record ready to be persisted, without identity or owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDraft {
    zone: ZoneName,
    name: String,
    ttl: Ttl,
    data: RecordData,
}

impl RecordDraft {
    /// Assemble a draft from typed parts.
    ///
    /// No validation runs here; the record manager validates before
    /// persisting.
    #[must_use]
    pub fn new(zone: ZoneName, name: impl Into<String>, ttl: Ttl, data: RecordData) -> Self {
        Self {
            zone,
            name: name.into(),
            ttl,
            data,
        }
    }

    /// Build a draft from loosely typed client input.
    ///
    /// Returns every field error found; an empty list never comes back as
    /// `Err`.
    pub fn from_content(
        zone: ZoneName,
        name: &str,
        ttl: Option<i64>,
        content: RecordContent,
    ) -> Result<Self, Vec<FieldError>> {
        let name = name.trim();
        let errors = validation::validate_content(name, ttl, &content);
        if !errors.is_empty() {
            return Err(errors);
        }

        let record_type = content.record_type();
        match (ttl.and_then(Ttl::new), content.into_data()) {
            (Some(ttl), Some(data)) => Ok(Self::new(zone, name, ttl, data)),
            (None, _) => Err(vec![validation::ttl_error()]),
            (_, None) => Err(vec![FieldError::new(
                "content",
                format!("{record_type} record content is incomplete"),
            )]),
        }
    }

    /// Zone the record belongs to.
    #[must_use]
    pub fn zone(&self) -> &ZoneName {
        &self.zone
    }

    /// Owner name within the zone, e.g. `www` or `@`.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Time-to-live.
    #[must_use]
    pub fn ttl(&self) -> Ttl {
        self.ttl
    }

    /// Typed payload.
    #[must_use]
    pub fn data(&self) -> &RecordData {
        &self.data
    }

    /// Type tag of the payload.
    #[must_use]
    pub fn record_type(&self) -> RecordType {
        self.data.record_type()
    }
}

/// A persisted record owned by one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    id: RecordId,
    owner: UserId,
    draft: RecordDraft,
}

impl Record {
    /// Attach identity and ownership to a draft.
    #[must_use]
    pub fn new(id: RecordId, owner: UserId, draft: RecordDraft) -> Self {
        Self { id, owner, draft }
    }

    /// Storage identifier.
    #[must_use]
    pub fn id(&self) -> RecordId {
        self.id
    }

    /// Owning user.
    #[must_use]
    pub fn owner(&self) -> &UserId {
        &self.owner
    }

    /// Zone the record belongs to.
    #[must_use]
    pub fn zone(&self) -> &ZoneName {
        self.draft.zone()
    }

    /// Owner name within the zone.
    #[must_use]
    pub fn name(&self) -> &str {
        self.draft.name()
    }

    /// Time-to-live.
    #[must_use]
    pub fn ttl(&self) -> Ttl {
        self.draft.ttl()
    }

    /// Typed payload.
    #[must_use]
    pub fn data(&self) -> &RecordData {
        self.draft.data()
    }

    /// Type tag of the payload.
    #[must_use]
    pub fn record_type(&self) -> RecordType {
        self.draft.record_type()
    }
}
