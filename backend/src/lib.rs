//! DNS zone and record administration backend.
//!
//! Users sign in with a one-time code sent by mail, receive an HS256 session
//! cookie and manage the zones and typed DNS records they own. The domain is
//! reached through driving ports from the HTTP adapter in [`inbound`] and
//! reaches storage and mail through the driven ports implemented in
//! [`outbound`].

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

pub use domain::TraceId;
pub use middleware::Trace;
