//! One-time login codes.
//!
//! A code is six decimal digits drawn from the operating system RNG. It is
//! bound to one email address, expires ten minutes after issue and can be
//! consumed exactly once.

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use rand::{Rng, rngs::OsRng};

use crate::domain::EmailAddress;

/// Number of digits in a login code.
pub const OTP_LENGTH: usize = 6;

/// Lifetime of a login code, in seconds.
pub const OTP_TTL_SECS: i64 = 10 * 60;

/// Validation errors for submitted login codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpCodeError {
    /// The code was not exactly [`OTP_LENGTH`] ASCII digits.
    Malformed,
}

impl fmt::Display for OtpCodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed => write!(f, "login code must be {OTP_LENGTH} digits"),
        }
    }
}

impl std::error::Error for OtpCodeError {}

/// A six digit login code.
///
/// `Debug` output is masked so codes never reach logs.
///
/// # Examples
/// ```
/// use dnsdesk::domain::OtpCode;
///
/// let code = OtpCode::new(" 012345 ").expect("six digits");
/// assert_eq!(code.as_str(), "012345");
/// assert_eq!(format!("{code:?}"), "OtpCode(******)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct OtpCode(String);

impl OtpCode {
    /// Parse a submitted code, trimming surrounding whitespace.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, OtpCodeError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.len() != OTP_LENGTH || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(OtpCodeError::Malformed);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// The digits as text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for OtpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OtpCode({})", "*".repeat(self.0.len()))
    }
}

/// Source of fresh login codes.
pub trait OtpCodeGenerator: Send + Sync {
    /// Produce a new code.
    fn generate(&self) -> OtpCode;
}

/// Draws each digit uniformly from the operating system RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsRngCodeGenerator;

impl OtpCodeGenerator for OsRngCodeGenerator {
    fn generate(&self) -> OtpCode {
        let mut rng = OsRng;
        let digits = (0..OTP_LENGTH)
            .map(|_| char::from(b'0' + rng.gen_range(0..10_u8)))
            .collect();
        OtpCode(digits)
    }
}

/// An issued login code awaiting verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneTimeCode {
    email: EmailAddress,
    code: OtpCode,
    expires_at: DateTime<Utc>,
    consumed: bool,
}

impl OneTimeCode {
    /// Issue `code` for `email` at `now`, expiring after [`OTP_TTL_SECS`].
    #[must_use]
    pub fn issue(email: EmailAddress, code: OtpCode, now: DateTime<Utc>) -> Self {
        Self {
            email,
            code,
            expires_at: now + TimeDelta::seconds(OTP_TTL_SECS),
            consumed: false,
        }
    }

    /// Address the code was sent to.
    #[must_use]
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// The code itself.
    #[must_use]
    pub fn code(&self) -> &OtpCode {
        &self.code
    }

    /// Instant after which the code is rejected.
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Whether the code has already been used.
    #[must_use]
    pub fn is_consumed(&self) -> bool {
        self.consumed
    }

    /// True when `email` and `code` match, the code is unused and `now` is
    /// strictly before expiry.
    #[must_use]
    pub fn redeemable_by(&self, email: &EmailAddress, code: &OtpCode, now: DateTime<Utc>) -> bool {
        !self.consumed && &self.email == email && &self.code == code && now < self.expires_at
    }

    /// True once the code can never be redeemed again.
    #[must_use]
    pub fn is_spent(&self, now: DateTime<Utc>) -> bool {
        self.consumed || now >= self.expires_at
    }

    /// Mark the code as used.
    pub fn consume(&mut self) {
        self.consumed = true;
    }
}
