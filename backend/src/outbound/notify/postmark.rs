//! Reqwest-backed Postmark adapter for login code mail.
//!
//! Sends a single message per code through the Postmark `/email` endpoint.
//! Owns transport only: payload shape, authentication header and mapping of
//! transport or status failures to [`NotifierError`].

use std::time::Duration;

use async_trait::async_trait;
use chrono::TimeDelta;
use reqwest::{Client, StatusCode, Url};
use serde::Serialize;
use tracing::debug;

use crate::domain::ports::{CodeNotifier, NotifierError};
use crate::domain::{EmailAddress, OTP_TTL_SECS, OtpCode};

/// Production endpoint for single-message sends.
pub const POSTMARK_EMAIL_ENDPOINT: &str = "https://api.postmarkapp.com/email";
const SERVER_TOKEN_HEADER: &str = "X-Postmark-Server-Token";
const SUBJECT: &str = "Your dnsdesk verification code";
const BODY_PREVIEW_LIMIT: usize = 160;

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct PostmarkMessage<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text_body: String,
    html_body: String,
    track_opens: bool,
}

impl<'a> PostmarkMessage<'a> {
    fn login_code(from: &'a str, to: &'a EmailAddress, code: &OtpCode) -> Self {
        let minutes = TimeDelta::seconds(OTP_TTL_SECS).num_minutes();
        let code = code.as_str();
        Self {
            from,
            to: to.as_str(),
            subject: SUBJECT,
            text_body: format!(
                "Your verification code is: {code}\nThis code will expire in {minutes} minutes."
            ),
            html_body: format!(
                "<h2>Your dnsdesk verification code</h2>\
                 <p>Your verification code is: <strong>{code}</strong></p>\
                 <p>This code will expire in {minutes} minutes.</p>"
            ),
            track_opens: true,
        }
    }
}

/// Delivers login codes through Postmark.
pub struct PostmarkNotifier {
    client: Client,
    endpoint: Url,
    server_token: String,
    from: String,
}

impl PostmarkNotifier {
    /// Build a notifier posting to `endpoint`, normally
    /// [`POSTMARK_EMAIL_ENDPOINT`], with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        endpoint: Url,
        server_token: impl Into<String>,
        from: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            server_token: server_token.into(),
            from: from.into(),
        })
    }
}

#[async_trait]
impl CodeNotifier for PostmarkNotifier {
    async fn send_code(&self, email: &EmailAddress, code: &OtpCode) -> Result<(), NotifierError> {
        let message = PostmarkMessage::login_code(&self.from, email, code);
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(SERVER_TOKEN_HEADER, self.server_token.as_str())
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&message)
            .send()
            .await
            .map_err(|err| NotifierError::delivery(err.to_string()))?;

        let status = response.status();
        if status.is_success() {
            debug!(status = status.as_u16(), "login code handed to postmark");
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(map_status_error(status, &body))
    }
}

fn map_status_error(status: StatusCode, body: &str) -> NotifierError {
    let preview: String = body
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(BODY_PREVIEW_LIMIT)
        .collect();
    if preview.is_empty() {
        NotifierError::delivery(format!("postmark returned status {}", status.as_u16()))
    } else {
        NotifierError::delivery(format!(
            "postmark returned status {}: {preview}",
            status.as_u16()
        ))
    }
}
