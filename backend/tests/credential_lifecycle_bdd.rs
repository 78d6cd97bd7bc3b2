//! Behaviour tests for registration, login, and token verification.
//!
//! Scenarios drive the real services over the in-memory repository, a
//! low-cost bcrypt hasher, and a clock the steps can move.
//
// rstest-bdd generates guard variables with double underscores, which trips
// the non_snake_case lint under -D warnings.
#![allow(non_snake_case)]

use std::cell::RefCell;

use authgate::domain::ports::UserRepository;
use authgate::domain::{
    AuthenticatedSession, EmailAddress, Error, LoginCredentials, User, validate_registration,
};
use authgate::test_support::InMemoryStack;
use chrono::TimeDelta;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tokio::runtime::Runtime;

struct CredentialWorld {
    runtime: Runtime,
    stack: InMemoryStack,
    outcome: RefCell<Option<Result<AuthenticatedSession, Error>>>,
    token: RefCell<Option<String>>,
}

impl CredentialWorld {
    fn new() -> Self {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("tokio runtime");
        Self {
            runtime,
            stack: InMemoryStack::new(TimeDelta::hours(6)),
            outcome: RefCell::new(None),
            token: RefCell::new(None),
        }
    }

    fn register(&self, email: &str, password: &str, confirm: &str) -> Result<AuthenticatedSession, Error> {
        let registration =
            validate_registration(email, "Test User", password, confirm).map_err(Error::from)?;
        self.runtime
            .block_on(self.stack.credentials.register(registration))
    }

    fn login(&self, email: &str, password: &str) -> Result<AuthenticatedSession, Error> {
        let credentials = LoginCredentials::try_from_parts(email, password).map_err(Error::from)?;
        self.runtime.block_on(self.stack.credentials.login(&credentials))
    }

    fn record(&self, outcome: Result<AuthenticatedSession, Error>) {
        if let Ok(session) = &outcome {
            *self.token.borrow_mut() = Some(session.token.as_str().to_owned());
        }
        *self.outcome.borrow_mut() = Some(outcome);
    }

    fn verify_current_token(&self) -> Result<User, Error> {
        let token = self.token.borrow().clone().expect("a token was issued");
        self.runtime.block_on(self.stack.gate.verify(Some(&token)))
    }

    fn with_error<F>(&self, f: F)
    where
        F: FnOnce(&Error),
    {
        let outcome = self.outcome.borrow();
        match outcome.as_ref().expect("an outcome was recorded") {
            Ok(_) => panic!("expected the request to fail"),
            Err(error) => f(error),
        }
    }
}

#[fixture]
fn world() -> CredentialWorld {
    CredentialWorld::new()
}

#[given("an empty user directory")]
fn an_empty_user_directory(world: &CredentialWorld) {
    assert!(world.stack.repo.is_empty());
}

#[given("a registered user \"{email}\" with password \"{password}\"")]
fn a_registered_user(world: &CredentialWorld, email: String, password: String) {
    world
        .register(&email, &password, &password)
        .expect("seed registration succeeds");
}

#[given("\"{email}\" has logged in with password \"{password}\"")]
fn has_logged_in(world: &CredentialWorld, email: String, password: String) {
    let outcome = world.login(&email, &password);
    assert!(outcome.is_ok(), "seed login succeeds");
    world.record(outcome);
}

#[when("\"{email}\" registers with password \"{password}\" confirmed as \"{confirm}\"")]
fn registers(world: &CredentialWorld, email: String, password: String, confirm: String) {
    let outcome = world.register(&email, &password, &confirm);
    world.record(outcome);
}

#[when("\"{email}\" logs in with password \"{password}\"")]
fn logs_in(world: &CredentialWorld, email: String, password: String) {
    let outcome = world.login(&email, &password);
    world.record(outcome);
}

#[when("the clock moves forward {seconds} seconds")]
fn the_clock_moves_forward(world: &CredentialWorld, seconds: i64) {
    world.stack.clock.advance_seconds(seconds);
}

#[when("the account \"{email}\" is deactivated")]
fn the_account_is_deactivated(world: &CredentialWorld, email: String) {
    let email = EmailAddress::new(&email).expect("valid email");
    let record = world
        .runtime
        .block_on(world.stack.repo.find_by_email(&email))
        .expect("lookup succeeds")
        .expect("user exists");
    let updated = world
        .runtime
        .block_on(world.stack.credentials.set_active(record.user().id(), false))
        .expect("deactivation succeeds");
    assert!(!updated.is_active());
}

#[then("a session token is returned")]
fn a_session_token_is_returned(world: &CredentialWorld) {
    let outcome = world.outcome.borrow();
    let session = outcome
        .as_ref()
        .expect("an outcome was recorded")
        .as_ref()
        .expect("request succeeded");
    assert_eq!(session.token.as_str().split('.').count(), 3);
}

#[then("the token resolves to \"{email}\"")]
fn the_token_resolves_to(world: &CredentialWorld, email: String) {
    let user = world.verify_current_token().expect("token verifies");
    assert_eq!(user.email().as_ref(), email);
}

#[then("the token is rejected")]
fn the_token_is_rejected(world: &CredentialWorld) {
    let err = world.verify_current_token().expect_err("token rejected");
    assert_eq!(err.message(), "unauthorized");
}

#[then("the request fails with code \"{code}\"")]
fn the_request_fails_with_code(world: &CredentialWorld, code: String) {
    world.with_error(|error| {
        let actual = serde_json::to_value(error.code()).expect("code serialises");
        assert_eq!(actual, serde_json::Value::String(code));
    });
}

#[then("the request fails with message \"{message}\"")]
fn the_request_fails_with_message(world: &CredentialWorld, message: String) {
    world.with_error(|error| assert_eq!(error.message(), message));
}

#[then("no user is stored")]
fn no_user_is_stored(world: &CredentialWorld) {
    assert!(world.stack.repo.is_empty());
}

#[scenario(path = "tests/features/credential_lifecycle.feature", index = 0)]
fn registration_signs_the_new_user_in(world: CredentialWorld) {
    drop(world);
}

#[scenario(path = "tests/features/credential_lifecycle.feature", index = 1)]
fn registering_a_taken_email_is_a_conflict(world: CredentialWorld) {
    drop(world);
}

#[scenario(path = "tests/features/credential_lifecycle.feature", index = 2)]
fn mismatched_confirmation_stores_nothing(world: CredentialWorld) {
    drop(world);
}

#[scenario(path = "tests/features/credential_lifecycle.feature", index = 3)]
fn login_ignores_email_case(world: CredentialWorld) {
    drop(world);
}

#[scenario(path = "tests/features/credential_lifecycle.feature", index = 4)]
fn wrong_password_and_unknown_email_fail_alike(world: CredentialWorld) {
    drop(world);
}

#[scenario(path = "tests/features/credential_lifecycle.feature", index = 5)]
fn tokens_stop_working_once_they_expire(world: CredentialWorld) {
    drop(world);
}

#[scenario(path = "tests/features/credential_lifecycle.feature", index = 6)]
fn tokens_keep_working_until_expiry(world: CredentialWorld) {
    drop(world);
}

#[scenario(path = "tests/features/credential_lifecycle.feature", index = 7)]
fn deactivated_users_are_locked_out(world: CredentialWorld) {
    drop(world);
}
