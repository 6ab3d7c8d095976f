//! Tests for the sign-in service.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, Local, TimeZone, Utc};
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{MockCodeNotifier, NotifierError};
use crate::domain::session_token::SessionSecret;
use crate::domain::{ErrorCode, OTP_TTL_SECS, User, UserId};

struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    fn advance_seconds(&self, seconds: i64) {
        *self.0.lock().expect("clock mutex") += TimeDelta::seconds(seconds);
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.0.lock().expect("clock mutex")
    }
}

struct FixedGenerator(&'static str);

impl OtpCodeGenerator for FixedGenerator {
    fn generate(&self) -> OtpCode {
        OtpCode::new(self.0).expect("fixture code is six digits")
    }
}

#[derive(Default)]
struct StubStore {
    users: Mutex<Vec<User>>,
    codes: Mutex<Vec<OneTimeCode>>,
    creates: AtomicUsize,
    provision_calls: AtomicUsize,
}

impl StubStore {
    fn with_user(email: &str) -> Self {
        let store = Self::default();
        let email = EmailAddress::new(email).expect("valid email");
        store
            .users
            .lock()
            .expect("users mutex")
            .push(User::new(UserId::random(), email));
        store
    }

    fn stored_codes(&self) -> Vec<OneTimeCode> {
        self.codes.lock().expect("codes mutex").clone()
    }
}

#[async_trait]
impl UserRepository for StubStore {
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        let users = self.users.lock().expect("users mutex");
        Ok(users.iter().find(|user| user.email() == email).cloned())
    }

    async fn create_or_fetch(&self, email: &EmailAddress) -> Result<User, UserPersistenceError> {
        self.provision_calls.fetch_add(1, Ordering::SeqCst);
        let mut users = self.users.lock().expect("users mutex");
        if let Some(user) = users.iter().find(|user| user.email() == email) {
            return Ok(user.clone());
        }
        self.creates.fetch_add(1, Ordering::SeqCst);
        let user = User::new(UserId::random(), email.clone());
        users.push(user.clone());
        Ok(user)
    }
}

#[async_trait]
impl OneTimeCodeRepository for StubStore {
    async fn store(&self, code: &OneTimeCode) -> Result<(), OneTimeCodeRepositoryError> {
        self.codes.lock().expect("codes mutex").push(code.clone());
        Ok(())
    }

    async fn consume(
        &self,
        email: &EmailAddress,
        code: &OtpCode,
        now: DateTime<Utc>,
    ) -> Result<bool, OneTimeCodeRepositoryError> {
        let mut codes = self.codes.lock().expect("codes mutex");
        match codes
            .iter_mut()
            .find(|issued| issued.redeemable_by(email, code, now))
        {
            Some(issued) => {
                issued.consume();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[derive(Default)]
struct RecordingNotifier {
    sent: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl CodeNotifier for RecordingNotifier {
    async fn send_code(&self, email: &EmailAddress, code: &OtpCode) -> Result<(), NotifierError> {
        self.sent
            .lock()
            .expect("sent mutex")
            .push((email.to_string(), code.as_str().to_owned()));
        Ok(())
    }
}

#[fixture]
fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

fn codec() -> SessionTokenCodec {
    SessionTokenCodec::new(SessionSecret::new(vec![b's'; 32]))
}

struct Harness {
    store: Arc<StubStore>,
    notifier: Arc<RecordingNotifier>,
    clock: Arc<MutableClock>,
    service: SessionAuthenticator,
}

fn harness_with(store: StubStore, now: DateTime<Utc>, policy: ProvisioningPolicy) -> Harness {
    let store = Arc::new(store);
    let notifier = Arc::new(RecordingNotifier::default());
    let clock = Arc::new(MutableClock::new(now));
    let service = SessionAuthenticator::new(
        AuthenticatorPorts {
            users: store.clone(),
            codes: store.clone(),
            notifier: notifier.clone(),
        },
        codec(),
    )
    .with_clock(clock.clone())
    .with_code_generator(Arc::new(FixedGenerator("123456")))
    .with_provisioning(policy);
    Harness {
        store,
        notifier,
        clock,
        service,
    }
}

fn harness(now: DateTime<Utc>) -> Harness {
    harness_with(
        StubStore::default(),
        now,
        ProvisioningPolicy::OnVerifyAndAuthenticate,
    )
}

#[rstest]
#[tokio::test]
async fn request_code_stores_and_sends(start: DateTime<Utc>) {
    let h = harness(start);

    h.service
        .request_code(" Ops@Example.com ")
        .await
        .expect("code requested");

    let stored = h.store.stored_codes();
    assert_eq!(stored.len(), 1);
    let issued = stored.first().expect("one code");
    assert_eq!(issued.email().as_ref(), "ops@example.com");
    assert_eq!(
        issued.expires_at(),
        start + TimeDelta::seconds(OTP_TTL_SECS)
    );
    assert_eq!(
        *h.notifier.sent.lock().expect("sent mutex"),
        vec![("ops@example.com".to_owned(), "123456".to_owned())]
    );
}

#[rstest]
#[case("")]
#[case("   ")]
#[case("not-an-email")]
#[tokio::test]
async fn request_code_rejects_bad_email(start: DateTime<Utc>, #[case] email: &str) {
    let h = harness(start);

    let err = h
        .service
        .request_code(email)
        .await
        .expect_err("email rejected");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.errors().first().map(FieldError::field), Some("email"));
    assert!(h.store.stored_codes().is_empty());
}

#[rstest]
#[tokio::test]
async fn delivery_failure_keeps_the_stored_code(start: DateTime<Utc>) {
    let store = Arc::new(StubStore::default());
    let mut notifier = MockCodeNotifier::new();
    notifier
        .expect_send_code()
        .times(1)
        .returning(|_, _| Err(NotifierError::delivery("relay down")));
    let service = SessionAuthenticator::new(
        AuthenticatorPorts {
            users: store.clone(),
            codes: store.clone(),
            notifier: Arc::new(notifier),
        },
        codec(),
    )
    .with_clock(Arc::new(MutableClock::new(start)))
    .with_code_generator(Arc::new(FixedGenerator("654321")));

    let err = service
        .request_code("ops@example.com")
        .await
        .expect_err("delivery fails");

    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    assert_eq!(store.stored_codes().len(), 1);
    service
        .verify_code("ops@example.com", "654321")
        .await
        .expect("stored code still verifies");
}

#[rstest]
#[tokio::test]
async fn code_verifies_exactly_once(start: DateTime<Utc>) {
    let h = harness(start);
    h.service
        .request_code("ops@example.com")
        .await
        .expect("code requested");

    let session = h
        .service
        .verify_code("ops@example.com", "123456")
        .await
        .expect("first verification succeeds");
    let replay = h
        .service
        .verify_code("ops@example.com", "123456")
        .await
        .expect_err("second verification fails");

    assert_eq!(session.user.email().as_ref(), "ops@example.com");
    assert_eq!(
        session.expires_at,
        start + TimeDelta::seconds(SESSION_TTL_SECS)
    );
    assert_eq!(replay.code(), ErrorCode::Unauthorized);
}

#[rstest]
#[tokio::test]
async fn expired_code_is_rejected(start: DateTime<Utc>) {
    let h = harness(start);
    h.service
        .request_code("ops@example.com")
        .await
        .expect("code requested");
    h.clock.advance_seconds(OTP_TTL_SECS + 60);

    let err = h
        .service
        .verify_code("ops@example.com", "123456")
        .await
        .expect_err("expired code fails");

    assert_eq!(err.code(), ErrorCode::Unauthorized);
    assert_eq!(err.message(), INVALID_CODE);
}

#[rstest]
#[case("ops@example.com", "000000")]
#[case("other@example.com", "123456")]
#[case("ops@example.com", "12345")]
#[case("", "123456")]
#[tokio::test]
async fn mismatched_codes_share_one_message(
    start: DateTime<Utc>,
    #[case] email: &str,
    #[case] code: &str,
) {
    let h = harness(start);
    h.service
        .request_code("ops@example.com")
        .await
        .expect("code requested");

    let err = h
        .service
        .verify_code(email, code)
        .await
        .expect_err("verification fails");

    assert_eq!(err.code(), ErrorCode::Unauthorized);
    assert_eq!(err.message(), INVALID_CODE);
}

#[rstest]
#[tokio::test]
async fn issued_token_authenticates_until_expiry(start: DateTime<Utc>) {
    let h = harness(start);
    h.service
        .request_code("ops@example.com")
        .await
        .expect("code requested");
    let session = h
        .service
        .verify_code("ops@example.com", "123456")
        .await
        .expect("verified");

    let identity = h
        .service
        .authenticate(&session.token)
        .await
        .expect("token accepted");
    assert_eq!(identity.user_id(), session.user.id());

    h.clock.advance_seconds(SESSION_TTL_SECS);
    let err = h
        .service
        .authenticate(&session.token)
        .await
        .expect_err("token expired");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
}

#[rstest]
#[tokio::test]
async fn tokens_from_another_secret_are_rejected(start: DateTime<Utc>) {
    let h = harness(start);
    let foreign = SessionTokenCodec::new(SessionSecret::new(vec![b'z'; 32]));
    let email = EmailAddress::new("ops@example.com").expect("valid email");
    let token = foreign
        .mint(&SessionClaims::new(
            &email,
            start,
            start + TimeDelta::hours(1),
        ))
        .expect("token minted");

    let err = h
        .service
        .authenticate(&token)
        .await
        .expect_err("foreign token rejected");

    assert_eq!(err.code(), ErrorCode::Unauthorized);
}

#[rstest]
#[tokio::test]
async fn authenticate_provisions_unknown_users_by_default(start: DateTime<Utc>) {
    let h = harness(start);
    let email = EmailAddress::new("new@example.com").expect("valid email");
    let token = codec()
        .mint(&SessionClaims::new(
            &email,
            start,
            start + TimeDelta::hours(1),
        ))
        .expect("token minted");

    let identity = h
        .service
        .authenticate(&token)
        .await
        .expect("token accepted");

    assert_eq!(identity.email(), &email);
    assert_eq!(h.store.creates.load(Ordering::SeqCst), 1);
    assert_eq!(h.store.provision_calls.load(Ordering::SeqCst), 1);
}

#[rstest]
#[tokio::test]
async fn known_users_authenticate_without_provisioning(start: DateTime<Utc>) {
    let h = harness_with(
        StubStore::with_user("known@example.com"),
        start,
        ProvisioningPolicy::OnVerifyAndAuthenticate,
    );
    let email = EmailAddress::new("known@example.com").expect("valid email");
    let token = codec()
        .mint(&SessionClaims::new(
            &email,
            start,
            start + TimeDelta::hours(1),
        ))
        .expect("token minted");

    for _ in 0..3 {
        h.service
            .authenticate(&token)
            .await
            .expect("token accepted");
    }

    assert_eq!(h.store.provision_calls.load(Ordering::SeqCst), 0);
}

#[rstest]
#[tokio::test]
async fn verify_only_policy_rejects_unknown_users(start: DateTime<Utc>) {
    let h = harness_with(
        StubStore::with_user("known@example.com"),
        start,
        ProvisioningPolicy::OnVerifyOnly,
    );
    let mint = |address: &str| {
        let email = EmailAddress::new(address).expect("valid email");
        codec()
            .mint(&SessionClaims::new(
                &email,
                start,
                start + TimeDelta::hours(1),
            ))
            .expect("token minted")
    };

    h.service
        .authenticate(&mint("known@example.com"))
        .await
        .expect("known user accepted");
    let err = h
        .service
        .authenticate(&mint("stranger@example.com"))
        .await
        .expect_err("unknown user rejected");

    assert_eq!(err.code(), ErrorCode::Unauthorized);
    assert_eq!(h.store.creates.load(Ordering::SeqCst), 0);
}

#[rstest]
#[tokio::test]
async fn concurrent_requests_yield_independent_codes(start: DateTime<Utc>) {
    let store = Arc::new(StubStore::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let service = SessionAuthenticator::new(
        AuthenticatorPorts {
            users: store.clone(),
            codes: store.clone(),
            notifier: notifier.clone(),
        },
        codec(),
    )
    .with_clock(Arc::new(MutableClock::new(start)));

    let (first, second) = tokio::join!(
        service.request_code("ops@example.com"),
        service.request_code("ops@example.com"),
    );
    first.expect("first request");
    second.expect("second request");

    let sent = notifier.sent.lock().expect("sent mutex").clone();
    assert_eq!(sent.len(), 2);
    for (email, code) in sent {
        service
            .verify_code(&email, &code)
            .await
            .expect("each delivered code verifies");
    }
}
