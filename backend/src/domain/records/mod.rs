//! DNS records: typed payloads, client content, validation and the record
//! management service.

mod content;
mod data;
mod manager;
mod record;
pub mod validation;
mod zone;

pub use content::RecordContent;
pub use data::{
    AData, AaaaData, CaaData, HostData, MxData, RecordData, RecordType, SoaData, SrvData,
    TxtData, UnknownRecordType,
};
pub use manager::RecordManager;
pub use record::{
    Record, RecordDraft, RecordId, Ttl, ZONE_LABEL_MAX, ZONE_NAME_MAX, ZoneName, ZoneNameError,
};
pub use zone::{SOA_NAME, SoaDefaults};
