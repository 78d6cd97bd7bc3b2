//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use crate::domain::ports::{
    MockLoginService, MockRegistrationService, MockUsersQuery, SessionVerifier,
};
use crate::domain::{
    AuthenticatedSession, DisplayName, EmailAddress, Error, SessionToken, UNAUTHORIZED_MESSAGE,
    User, UserId, UserParts,
};

use super::state::HttpState;

/// The only token [`StubVerifier`] accepts.
pub const VALID_TOKEN: &str = "valid.session.token";
/// Token handed out by [`StubVerifier::renew`].
pub const RENEWED_TOKEN: &str = "renewed.session.token";

/// Active user with a fixed id and creation time.
pub fn sample_user(email: &str) -> User {
    User::new(UserParts {
        id: UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("fixture id"),
        email: EmailAddress::new(email).expect("fixture email"),
        name: DisplayName::new("Ada Lovelace").expect("fixture name"),
        is_active: true,
        created_at: Utc
            .with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
            .single()
            .expect("fixture timestamp"),
    })
}

/// `SessionVerifier` that accepts [`VALID_TOKEN`] for one fixed user.
pub struct StubVerifier {
    pub user: User,
}

impl Default for StubVerifier {
    fn default() -> Self {
        Self {
            user: sample_user("ada@example.com"),
        }
    }
}

#[async_trait]
impl SessionVerifier for StubVerifier {
    async fn verify(&self, token: Option<&str>) -> Result<User, Error> {
        match token {
            Some(VALID_TOKEN) => Ok(self.user.clone()),
            _ => Err(Error::unauthorized(UNAUTHORIZED_MESSAGE)),
        }
    }

    async fn renew(&self, user: &User) -> Result<AuthenticatedSession, Error> {
        Ok(AuthenticatedSession {
            token: SessionToken::new(RENEWED_TOKEN),
            user: user.clone(),
        })
    }
}

/// Mock-backed ports handed to [`state_from`].
#[derive(Default)]
pub struct MockPorts {
    pub login: MockLoginService,
    pub registration: MockRegistrationService,
    pub users: MockUsersQuery,
}

/// State with unexpected-call mocks for every driving port except sessions.
pub fn stub_state(verifier: StubVerifier) -> HttpState {
    state_from(MockPorts::default(), verifier)
}

/// State wiring the given mocks and verifier.
pub fn state_from(ports: MockPorts, verifier: StubVerifier) -> HttpState {
    HttpState::new(
        Arc::new(ports.login),
        Arc::new(ports.registration),
        Arc::new(ports.users),
        Arc::new(verifier),
    )
}
