//! Login code delivery adapters.

mod log;
mod postmark;

pub use log::LogNotifier;
pub use postmark::{POSTMARK_EMAIL_ENDPOINT, PostmarkNotifier};
