//! Test utilities for the authgate crate.
//!
//! Shared by unit tests in `src/` and integration tests in `tests/`. Only
//! compiled for tests or with the `test-support` feature.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;

use crate::domain::{CredentialService, SessionGate};
use crate::inbound::http::state::HttpState;
use crate::outbound::{BcryptPasswordHasher, InMemoryUserRepository, JwtSessionCodec};

/// Secret used by [`InMemoryStack`].
pub const TEST_SECRET: &[u8] = b"test-only-secret-test-only-secret!!";
/// Lowest bcrypt cost the crate accepts; keeps tests fast.
pub const TEST_BCRYPT_COST: u32 = 4;

/// Clock whose time only moves when a test says so.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    /// Clock frozen at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// Move time forward by `seconds`; negative values move it back.
    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    /// Jump to `now`.
    pub fn set(&self, now: DateTime<Utc>) {
        *self.lock_clock() = now;
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// Fixed starting instant for deterministic tests.
pub fn fixed_now() -> DateTime<Utc> {
    match Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).single() {
        Some(now) => now,
        None => panic!("fixed timestamp is valid"),
    }
}

/// Real services over in-memory storage, a fast hasher, and a test clock.
///
/// # Examples
/// ```
/// use chrono::TimeDelta;
/// use authgate::test_support::InMemoryStack;
///
/// let stack = InMemoryStack::new(TimeDelta::hours(6));
/// assert!(stack.repo.is_empty());
/// ```
pub struct InMemoryStack {
    pub repo: Arc<InMemoryUserRepository>,
    pub clock: Arc<MutableClock>,
    pub gate: Arc<SessionGate>,
    pub credentials: Arc<CredentialService>,
}

impl InMemoryStack {
    /// Fresh stack with an empty repository and tokens valid for `ttl`.
    pub fn new(ttl: TimeDelta) -> Self {
        let repo = Arc::new(InMemoryUserRepository::default());
        let clock = Arc::new(MutableClock::new(fixed_now()));
        let gate = Arc::new(SessionGate::new(
            repo.clone(),
            Arc::new(JwtSessionCodec::from_secret(TEST_SECRET)),
            clock.clone(),
            ttl,
        ));
        let credentials = Arc::new(CredentialService::new(
            repo.clone(),
            Arc::new(BcryptPasswordHasher::new(TEST_BCRYPT_COST)),
            gate.clone(),
            clock.clone(),
        ));
        Self {
            repo,
            clock,
            gate,
            credentials,
        }
    }

    /// HTTP state backed by this stack.
    pub fn http_state(&self) -> HttpState {
        HttpState::from_services(self.credentials.clone(), self.gate.clone())
    }
}
