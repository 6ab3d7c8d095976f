//! Loosely typed record content as submitted by clients.
//!
//! Client JSON is first read into [`RecordContent`], where every field has a
//! lenient default and IP addresses may be missing or of the wrong family.
//! Validation then reports problems per field before the content is narrowed
//! into [`RecordData`].

use std::net::IpAddr;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::data::{
    AData, AaaaData, CaaData, HostData, MxData, RecordData, RecordType, SoaData, SrvData,
    TxtData,
};

/// Client-supplied payload, one variant per record type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordContent {
    /// `A`; `ip` is `None` when missing or unparsable.
    A {
        /// Parsed address of either family.
        ip: Option<IpAddr>,
    },
    /// `AAAA`; `ip` is `None` when missing or unparsable.
    Aaaa {
        /// Parsed address of either family.
        ip: Option<IpAddr>,
    },
    /// `CNAME`.
    Cname {
        /// Target host.
        host: String,
    },
    /// `NS`.
    Ns {
        /// Name server host.
        host: String,
    },
    /// `MX`.
    Mx {
        /// Mail server host.
        host: String,
        /// Preference value.
        preference: u16,
    },
    /// `TXT`.
    Txt {
        /// Text value.
        text: String,
    },
    /// `SRV`.
    Srv {
        /// Priority.
        priority: u16,
        /// Weight.
        weight: u16,
        /// Port.
        port: u16,
        /// Target host.
        target: String,
    },
    /// `SOA`, only ever produced internally.
    Soa(SoaData),
    /// `CAA`.
    Caa {
        /// Flags byte.
        flag: u8,
        /// Property tag.
        tag: String,
        /// Property value.
        value: String,
    },
}

#[derive(Deserialize)]
struct IpInput {
    #[serde(default)]
    ip: String,
}

#[derive(Deserialize)]
struct HostInput {
    #[serde(default)]
    host: String,
}

#[derive(Deserialize)]
struct MxInput {
    #[serde(default)]
    host: String,
    #[serde(default)]
    preference: u16,
}

#[derive(Deserialize)]
struct TxtInput {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct SrvInput {
    #[serde(default)]
    priority: u16,
    #[serde(default)]
    weight: u16,
    #[serde(default)]
    port: u16,
    #[serde(default)]
    target: String,
}

#[derive(Deserialize)]
struct CaaInput {
    #[serde(default)]
    flag: u8,
    #[serde(default)]
    tag: String,
    #[serde(default)]
    value: String,
}

impl RecordContent {
    /// Read client JSON for `record_type`.
    ///
    /// Missing fields default to empty values so validation can name them;
    /// values of the wrong JSON type or out of range fail here. `null` is read
    /// as an empty object. String fields are trimmed.
    pub fn parse(record_type: RecordType, content: Value) -> Result<Self, serde_json::Error> {
        let content = if content.is_null() {
            Value::Object(serde_json::Map::new())
        } else {
            content
        };

        Ok(match record_type {
            RecordType::A => Self::A {
                ip: parse_ip(&read::<IpInput>(content)?.ip),
            },
            RecordType::Aaaa => Self::Aaaa {
                ip: parse_ip(&read::<IpInput>(content)?.ip),
            },
            RecordType::Cname => Self::Cname {
                host: trimmed(read::<HostInput>(content)?.host),
            },
            RecordType::Ns => Self::Ns {
                host: trimmed(read::<HostInput>(content)?.host),
            },
            RecordType::Mx => {
                let input: MxInput = read(content)?;
                Self::Mx {
                    host: trimmed(input.host),
                    preference: input.preference,
                }
            }
            RecordType::Txt => Self::Txt {
                text: trimmed(read::<TxtInput>(content)?.text),
            },
            RecordType::Srv => {
                let input: SrvInput = read(content)?;
                Self::Srv {
                    priority: input.priority,
                    weight: input.weight,
                    port: input.port,
                    target: trimmed(input.target),
                }
            }
            RecordType::Soa => Self::Soa(read(content)?),
            RecordType::Caa => {
                let input: CaaInput = read(content)?;
                Self::Caa {
                    flag: input.flag,
                    tag: trimmed(input.tag),
                    value: trimmed(input.value),
                }
            }
        })
    }

    /// Type tag for this content.
    #[must_use]
    pub const fn record_type(&self) -> RecordType {
        match self {
            Self::A { .. } => RecordType::A,
            Self::Aaaa { .. } => RecordType::Aaaa,
            Self::Cname { .. } => RecordType::Cname,
            Self::Ns { .. } => RecordType::Ns,
            Self::Mx { .. } => RecordType::Mx,
            Self::Txt { .. } => RecordType::Txt,
            Self::Srv { .. } => RecordType::Srv,
            Self::Soa(_) => RecordType::Soa,
            Self::Caa { .. } => RecordType::Caa,
        }
    }

    /// Narrow into a typed payload.
    ///
    /// Returns `None` when an address is missing or of the wrong family.
    #[must_use]
    pub fn into_data(self) -> Option<RecordData> {
        Some(match self {
            Self::A {
                ip: Some(IpAddr::V4(ip)),
            } => RecordData::A(AData { ip }),
            Self::Aaaa {
                ip: Some(IpAddr::V6(ip)),
            } => RecordData::Aaaa(AaaaData { ip }),
            Self::A { .. } | Self::Aaaa { .. } => return None,
            Self::Cname { host } => RecordData::Cname(HostData { host }),
            Self::Ns { host } => RecordData::Ns(HostData { host }),
            Self::Mx { host, preference } => RecordData::Mx(MxData { host, preference }),
            Self::Txt { text } => RecordData::Txt(TxtData { text }),
            Self::Srv {
                priority,
                weight,
                port,
                target,
            } => RecordData::Srv(SrvData {
                priority,
                weight,
                port,
                target,
            }),
            Self::Soa(data) => RecordData::Soa(data),
            Self::Caa { flag, tag, value } => RecordData::Caa(CaaData { flag, tag, value }),
        })
    }
}

impl From<&RecordData> for RecordContent {
    fn from(data: &RecordData) -> Self {
        match data {
            RecordData::A(a) => Self::A {
                ip: Some(IpAddr::V4(a.ip)),
            },
            RecordData::Aaaa(aaaa) => Self::Aaaa {
                ip: Some(IpAddr::V6(aaaa.ip)),
            },
            RecordData::Cname(cname) => Self::Cname {
                host: cname.host.clone(),
            },
            RecordData::Ns(ns) => Self::Ns {
                host: ns.host.clone(),
            },
            RecordData::Mx(mx) => Self::Mx {
                host: mx.host.clone(),
                preference: mx.preference,
            },
            RecordData::Txt(txt) => Self::Txt {
                text: txt.text.clone(),
            },
            RecordData::Srv(srv) => Self::Srv {
                priority: srv.priority,
                weight: srv.weight,
                port: srv.port,
                target: srv.target.clone(),
            },
            RecordData::Soa(soa) => Self::Soa(soa.clone()),
            RecordData::Caa(caa) => Self::Caa {
                flag: caa.flag,
                tag: caa.tag.clone(),
                value: caa.value.clone(),
            },
        }
    }
}

fn read<T: DeserializeOwned>(content: Value) -> Result<T, serde_json::Error> {
    serde_json::from_value(content)
}

fn parse_ip(raw: &str) -> Option<IpAddr> {
    raw.trim().parse().ok()
}

fn trimmed(value: String) -> String {
    value.trim().to_owned()
}
