//! Port for delivering login codes to users.
use async_trait::async_trait;

use crate::domain::{EmailAddress, OtpCode};

use super::define_port_error;

define_port_error! {
    /// Errors raised while delivering a login code.
    pub enum NotifierError {
        /// The delivery channel refused or failed the message.
        Delivery { message: String } => "login code delivery failed: {message}",
    }
}

/// Sends login codes out of band.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CodeNotifier: Send + Sync {
    /// Deliver `code` to `email`.
    async fn send_code(&self, email: &EmailAddress, code: &OtpCode) -> Result<(), NotifierError>;
}
