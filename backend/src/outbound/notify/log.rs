//! Notifier that writes login codes to the log instead of sending mail.
//!
//! Selected when no Postmark token is configured so local sign-in works
//! without outbound mail.

use async_trait::async_trait;
use tracing::warn;

use crate::domain::ports::{CodeNotifier, NotifierError};
use crate::domain::{EmailAddress, OtpCode};

/// Logs each code at `warn` level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl CodeNotifier for LogNotifier {
    async fn send_code(&self, email: &EmailAddress, code: &OtpCode) -> Result<(), NotifierError> {
        warn!(%email, code = code.as_str(), "mail delivery disabled; login code logged");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn delivery_always_succeeds() {
        let email = EmailAddress::new("dev@example.com").expect("valid email");
        let code = OtpCode::new("000111").expect("valid code");

        LogNotifier
            .send_code(&email, &code)
            .await
            .expect("logging never fails");
    }
}
