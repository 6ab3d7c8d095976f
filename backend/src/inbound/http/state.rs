//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only ever talk to the
//! driving ports, so they can be exercised against in-memory adapters.

use std::sync::Arc;

use crate::domain::ports::{RecordManagement, SessionAuthentication};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Sign-in and token checks.
    pub auth: Arc<dyn SessionAuthentication>,
    /// Zone and record use-cases.
    pub records: Arc<dyn RecordManagement>,
}

impl HttpState {
    /// Bundle the driving ports.
    pub fn new(auth: Arc<dyn SessionAuthentication>, records: Arc<dyn RecordManagement>) -> Self {
        Self { auth, records }
    }
}
