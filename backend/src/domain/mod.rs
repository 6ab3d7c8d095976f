//! Domain primitives, services and ports.
//!
//! Purpose: hold the sign-in and record management rules independently of
//! HTTP and storage. Adapters reach the domain through the driving ports in
//! [`ports`] and are reached through its driven ports.
//!
//! Public surface:
//! - Error / ErrorCode / FieldError: transport-agnostic failures.
//! - User / UserId / EmailAddress: account identity.
//! - OtpCode / OneTimeCode: login codes.
//! - SessionTokenCodec / SessionAuthenticator: sessions.
//! - records: typed DNS records and the record manager.

pub mod auth;
pub mod error;
pub mod ports;
pub mod records;
pub mod session_authenticator;
pub mod session_token;
pub mod trace_id;
pub mod user;

pub use self::auth::{
    OTP_LENGTH, OTP_TTL_SECS, OneTimeCode, OsRngCodeGenerator, OtpCode, OtpCodeError,
    OtpCodeGenerator,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError, FieldError};
pub use self::session_authenticator::{
    AuthenticatorPorts, ProvisioningPolicy, SessionAuthenticator,
};
pub use self::session_token::{
    SESSION_SECRET_MIN_LEN, SESSION_TTL_SECS, SessionClaims, SessionSecret, SessionTokenCodec,
    TokenError,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{EMAIL_MAX, EmailAddress, User, UserId, UserValidationError};
