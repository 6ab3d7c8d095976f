//! Shared harness for HTTP integration tests.
//!
//! Builds the real router over the in-memory store with a notifier that
//! records every code it is asked to send, so tests can complete sign-in.

use std::sync::{Arc, Mutex};

use actix_http::Request;
use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{StatusCode, header};
use actix_web::test::{self, TestRequest};
use actix_web::{App, body::BoxBody, web};
use async_trait::async_trait;

use dnsdesk::Trace;
use dnsdesk::domain::ports::{CodeNotifier, NotifierError};
use dnsdesk::domain::records::RecordManager;
use dnsdesk::domain::{
    AuthenticatorPorts, EmailAddress, OtpCode, SessionAuthenticator, SessionSecret,
    SessionTokenCodec,
};
use dnsdesk::inbound::http::configure;
use dnsdesk::inbound::http::session::SESSION_COOKIE;
use dnsdesk::inbound::http::state::HttpState;
use dnsdesk::outbound::memory::InMemoryStore;

/// Captures `(email, code)` pairs instead of sending mail.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    /// Most recent code sent to `email`.
    pub fn last_code_for(&self, email: &str) -> Option<String> {
        self.sent
            .lock()
            .expect("notifier lock")
            .iter()
            .rev()
            .find(|(to, _)| to == email)
            .map(|(_, code)| code.clone())
    }

    /// Number of codes sent so far.
    pub fn sent_count(&self) -> usize {
        self.sent.lock().expect("notifier lock").len()
    }
}

#[async_trait]
impl CodeNotifier for RecordingNotifier {
    async fn send_code(&self, email: &EmailAddress, code: &OtpCode) -> Result<(), NotifierError> {
        self.sent
            .lock()
            .expect("notifier lock")
            .push((email.as_str().to_owned(), code.as_str().to_owned()));
        Ok(())
    }
}

/// Router dependencies retained by the test for inspection.
pub struct Harness {
    pub notifier: Arc<RecordingNotifier>,
    pub state: web::Data<HttpState>,
}

impl Harness {
    /// Fresh store, fresh notifier and a fixed signing secret.
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let notifier = Arc::new(RecordingNotifier::default());
        let auth = SessionAuthenticator::new(
            AuthenticatorPorts {
                users: store.clone(),
                codes: store.clone(),
                notifier: notifier.clone(),
            },
            SessionTokenCodec::new(SessionSecret::new(vec![42; 32])),
        );
        let records = RecordManager::new(store);
        let state = web::Data::new(HttpState::new(Arc::new(auth), Arc::new(records)));
        Self { notifier, state }
    }
}

/// Initialise the full router for `harness`.
pub async fn init_app(
    harness: &Harness,
) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error> {
    test::init_service(
        App::new()
            .app_data(harness.state.clone())
            .wrap(Trace)
            .configure(configure),
    )
    .await
}

/// `Location` header of a redirect.
pub fn location<B>(response: &ServiceResponse<B>) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .expect("location header")
        .to_owned()
}

/// Session cookie set on `response`, if any.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .map(Cookie::into_owned)
}

/// POST the login form for `email`.
pub async fn request_code<S>(app: &S, email: &str) -> ServiceResponse<BoxBody>
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let req = TestRequest::post()
        .uri("/auth/login")
        .set_form([("email", email)])
        .to_request();
    test::call_service(app, req).await
}

/// POST the verification form.
pub async fn verify_code<S>(app: &S, email: &str, code: &str) -> ServiceResponse<BoxBody>
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let req = TestRequest::post()
        .uri("/auth/verify")
        .set_form([("email", email), ("code", code)])
        .to_request();
    test::call_service(app, req).await
}

/// Complete the code sign-in for `email` and return the session cookie.
pub async fn sign_in<S>(app: &S, harness: &Harness, email: &str) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let requested = request_code(app, email).await;
    assert_eq!(requested.status(), StatusCode::SEE_OTHER);
    let code = harness
        .notifier
        .last_code_for(email)
        .expect("code delivered");

    let verified = verify_code(app, email, &code).await;
    assert_eq!(verified.status(), StatusCode::SEE_OTHER);
    session_cookie(&verified).expect("session cookie issued")
}
