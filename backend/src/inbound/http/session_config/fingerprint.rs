//! Session secret fingerprinting.
//!
//! A truncated SHA-256 digest lets operators tell which secret is active from
//! the startup log without exposing the secret.

use sha2::{Digest, Sha256};

use crate::domain::SessionSecret;

const FINGERPRINT_BYTES: usize = 8;

/// First eight bytes of the SHA-256 digest of `secret`, hex encoded.
///
/// # Examples
/// ```
/// use dnsdesk::domain::SessionSecret;
/// use dnsdesk::inbound::http::session_config::fingerprint::secret_fingerprint;
///
/// let fp = secret_fingerprint(&SessionSecret::new(vec![b'a'; 32]));
/// assert_eq!(fp.len(), 16);
/// ```
#[must_use]
pub fn secret_fingerprint(secret: &SessionSecret) -> String {
    let digest = Sha256::digest(secret.as_bytes());
    hex::encode(&digest[..FINGERPRINT_BYTES])
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn fingerprint_is_stable_lowercase_hex() {
        let secret = SessionSecret::new(vec![b'a'; 32]);

        let first = secret_fingerprint(&secret);

        assert_eq!(first, secret_fingerprint(&secret));
        assert_eq!(first.len(), FINGERPRINT_BYTES * 2);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[rstest]
    fn different_secrets_differ() {
        let a = secret_fingerprint(&SessionSecret::new(vec![b'a'; 32]));
        let b = secret_fingerprint(&SessionSecret::new(vec![b'b'; 32]));

        assert_ne!(a, b);
    }
}
