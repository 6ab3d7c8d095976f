//! Zone bootstrap: the SOA record written when a zone is created.

use super::data::{RecordData, SoaData};
use super::record::{RecordDraft, Ttl, ZoneName};

/// Owner name of the generated SOA record.
pub const SOA_NAME: &str = "@";

/// Values used for the SOA record of a newly created zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoaDefaults {
    ns: String,
    mbox: String,
}

impl Default for SoaDefaults {
    fn default() -> Self {
        Self {
            ns: "ns1.dnsdesk.net".to_owned(),
            mbox: "hostmaster.dnsdesk.net".to_owned(),
        }
    }
}

impl SoaDefaults {
    /// Override the primary name server and responsible mailbox.
    pub fn new(ns: impl Into<String>, mbox: impl Into<String>) -> Self {
        Self {
            ns: ns.into(),
            mbox: mbox.into(),
        }
    }

    /// Primary name server.
    #[must_use]
    pub fn ns(&self) -> &str {
        self.ns.as_str()
    }

    /// Responsible mailbox.
    #[must_use]
    pub fn mbox(&self) -> &str {
        self.mbox.as_str()
    }

    /// SOA draft for `zone`.
    ///
    /// # Examples
    /// ```
    /// use dnsdesk::domain::records::{RecordData, SoaDefaults, ZoneName};
    ///
    /// let zone = ZoneName::new("example.com").expect("valid zone");
    /// let draft = SoaDefaults::default().draft_for(zone);
    /// assert_eq!(draft.name(), "@");
    /// let RecordData::Soa(soa) = draft.data() else { panic!("soa payload") };
    /// assert_eq!((soa.refresh, soa.retry, soa.expire, soa.minttl), (86400, 7200, 604800, 300));
    /// ```
    #[must_use]
    pub fn draft_for(&self, zone: ZoneName) -> RecordDraft {
        let data = RecordData::Soa(SoaData {
            ns: self.ns.clone(),
            mbox: self.mbox.clone(),
            refresh: 86_400,
            retry: 7_200,
            expire: 604_800,
            minttl: 300,
        });
        RecordDraft::new(zone, SOA_NAME, Ttl::ONE_HOUR, data)
    }
}
