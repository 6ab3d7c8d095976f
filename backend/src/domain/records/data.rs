//! Typed record payloads and their stored JSON form.

use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;

/// Supported DNS record types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordType {
    /// IPv4 address.
    A,
    /// IPv6 address.
    Aaaa,
    /// Canonical name alias.
    Cname,
    /// Delegated name server.
    Ns,
    /// Mail exchanger.
    Mx,
    /// Free-form text.
    Txt,
    /// Service locator.
    Srv,
    /// Start of authority.
    Soa,
    /// Certification authority authorisation.
    Caa,
}

impl RecordType {
    /// Every supported type, in display order.
    pub const ALL: [Self; 9] = [
        Self::A,
        Self::Aaaa,
        Self::Cname,
        Self::Ns,
        Self::Mx,
        Self::Txt,
        Self::Srv,
        Self::Soa,
        Self::Caa,
    ];

    /// Upper-case tag used on the wire and in storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Cname => "CNAME",
            Self::Ns => "NS",
            Self::Mx => "MX",
            Self::Txt => "TXT",
            Self::Srv => "SRV",
            Self::Soa => "SOA",
            Self::Caa => "CAA",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised for a type tag outside [`RecordType::ALL`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unsupported record type: {tag}")]
pub struct UnknownRecordType {
    /// The rejected tag.
    pub tag: String,
}

impl FromStr for RecordType {
    type Err = UnknownRecordType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.as_str() == s)
            .ok_or_else(|| UnknownRecordType { tag: s.to_owned() })
    }
}

/// `A` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AData {
    /// IPv4 address.
    pub ip: Ipv4Addr,
}

/// `AAAA` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AaaaData {
    /// IPv6 address.
    pub ip: Ipv6Addr,
}

/// `CNAME` and `NS` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostData {
    /// Target host name.
    pub host: String,
}

/// `MX` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MxData {
    /// Mail server host name.
    pub host: String,
    /// Lower values are preferred.
    pub preference: u16,
}

/// `TXT` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxtData {
    /// Text value.
    pub text: String,
}

/// `SRV` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SrvData {
    /// Lower values are tried first.
    pub priority: u16,
    /// Relative weight among equal priorities.
    pub weight: u16,
    /// Service port.
    pub port: u16,
    /// Target host name.
    pub target: String,
}

/// `SOA` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoaData {
    /// Primary name server.
    pub ns: String,
    /// Responsible mailbox, dotted form.
    pub mbox: String,
    /// Secondary refresh interval, seconds.
    pub refresh: u32,
    /// Retry interval after a failed refresh, seconds.
    pub retry: u32,
    /// Upper bound before secondaries stop answering, seconds.
    pub expire: u32,
    /// Negative caching TTL, seconds.
    pub minttl: u32,
}

/// `CAA` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaaData {
    /// Flags byte; 128 marks the property critical.
    pub flag: u8,
    /// Property tag such as `issue` or `iodef`.
    pub tag: String,
    /// Property value.
    pub value: String,
}

/// Type-specific record payload.
///
/// The stored form is the JSON object of the variant's fields, tagged
/// separately by [`RecordType`].
///
/// # Examples
/// ```
/// use std::net::Ipv4Addr;
/// use dnsdesk::domain::records::{AData, RecordData, RecordType};
///
/// let data = RecordData::A(AData { ip: Ipv4Addr::new(192, 0, 2, 1) });
/// let content = data.to_content().expect("payload serialises");
/// assert_eq!(content, r#"{"ip":"192.0.2.1"}"#);
/// assert_eq!(RecordData::from_content(RecordType::A, &content).expect("parses"), data);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordData {
    /// IPv4 address record.
    A(AData),
    /// IPv6 address record.
    Aaaa(AaaaData),
    /// Alias record.
    Cname(HostData),
    /// Delegation record.
    Ns(HostData),
    /// Mail exchanger record.
    Mx(MxData),
    /// Text record.
    Txt(TxtData),
    /// Service record.
    Srv(SrvData),
    /// Zone authority record.
    Soa(SoaData),
    /// CA authorisation record.
    Caa(CaaData),
}

impl RecordData {
    /// Type tag for this payload.
    #[must_use]
    pub const fn record_type(&self) -> RecordType {
        match self {
            Self::A(_) => RecordType::A,
            Self::Aaaa(_) => RecordType::Aaaa,
            Self::Cname(_) => RecordType::Cname,
            Self::Ns(_) => RecordType::Ns,
            Self::Mx(_) => RecordType::Mx,
            Self::Txt(_) => RecordType::Txt,
            Self::Srv(_) => RecordType::Srv,
            Self::Soa(_) => RecordType::Soa,
            Self::Caa(_) => RecordType::Caa,
        }
    }

    /// Payload as a JSON value.
    pub fn to_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        match self {
            Self::A(data) => serde_json::to_value(data),
            Self::Aaaa(data) => serde_json::to_value(data),
            Self::Cname(data) | Self::Ns(data) => serde_json::to_value(data),
            Self::Mx(data) => serde_json::to_value(data),
            Self::Txt(data) => serde_json::to_value(data),
            Self::Srv(data) => serde_json::to_value(data),
            Self::Soa(data) => serde_json::to_value(data),
            Self::Caa(data) => serde_json::to_value(data),
        }
    }

    /// Payload as stored JSON text.
    pub fn to_content(&self) -> Result<String, serde_json::Error> {
        self.to_value().map(|value| value.to_string())
    }

    /// Parse stored JSON text for `record_type`.
    pub fn from_content(record_type: RecordType, content: &str) -> Result<Self, serde_json::Error> {
        Ok(match record_type {
            RecordType::A => Self::A(parse(content)?),
            RecordType::Aaaa => Self::Aaaa(parse(content)?),
            RecordType::Cname => Self::Cname(parse(content)?),
            RecordType::Ns => Self::Ns(parse(content)?),
            RecordType::Mx => Self::Mx(parse(content)?),
            RecordType::Txt => Self::Txt(parse(content)?),
            RecordType::Srv => Self::Srv(parse(content)?),
            RecordType::Soa => Self::Soa(parse(content)?),
            RecordType::Caa => Self::Caa(parse(content)?),
        })
    }
}

fn parse<T: DeserializeOwned>(content: &str) -> Result<T, serde_json::Error> {
    serde_json::from_str(content)
}
