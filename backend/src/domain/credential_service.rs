//! Credential manager: user creation, registration, login, and lookup.
//!
//! Implements the `LoginService`, `RegistrationService`, and `UsersQuery`
//! driving ports on top of the user repository and password hasher.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info, warn};

use crate::domain::auth::password_mismatch;
use crate::domain::ports::{
    LoginService, PasswordHasher, RegistrationService, UserPersistenceError, UserRepository,
    UsersQuery,
};
use crate::domain::{
    AuthenticatedSession, Error, LoginCredentials, NewUser, PasswordHash, Registration,
    SessionGate, User, UserId, UserParts, UserRecord, ValidationErrors,
};

/// Message shared by every failed login.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "invalid credentials";

/// Well-formed cost-10 bcrypt hash that no password is expected to match.
/// Unknown emails are checked against it so both login failures pay for one
/// hash comparison.
pub(crate) const UNKNOWN_USER_HASH: &str =
    "$2b$10$CCCCCCCCCCCCCCCCCCCCC.E5YPO9kmyuRGyh0XouQYb4YMJKvyOeW";

/// Message for write failures that are not a duplicate email.
const CREATE_FAILED_MESSAGE: &str = "bad request";

/// Map a failed insert: duplicates become `Conflict` naming the email, any
/// other store failure is reported as a bad request.
fn map_create_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::DuplicateEmail { email } => {
            Error::conflict(format!("{email} already exists"))
        }
        other => {
            warn!(error = %other, "user insert failed");
            Error::invalid_request(CREATE_FAILED_MESSAGE)
        }
    }
}

/// Map a failed read on a path where the caller is not being authenticated.
fn map_read_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            warn!(%message, "user repository unavailable");
            Error::service_unavailable("user store is unavailable")
        }
        other => {
            warn!(error = %other, "user repository query failed");
            Error::internal("failed to read users")
        }
    }
}

/// Domain service owning user accounts and their credentials.
#[derive(Clone)]
pub struct CredentialService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    gate: Arc<SessionGate>,
    clock: Arc<dyn Clock>,
}

impl CredentialService {
    /// Wire the service to its collaborators.
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        gate: Arc<SessionGate>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            hasher,
            gate,
            clock,
        }
    }

    /// Hash the password and persist a new, active user.
    ///
    /// Fails with `Conflict` when the email is taken.
    pub async fn create_user(&self, new_user: NewUser) -> Result<User, Error> {
        let hash = self.hasher.hash(new_user.password()).await.map_err(|err| {
            warn!(error = %err, "password hashing failed");
            Error::internal("failed to hash password")
        })?;

        let user = User::new(UserParts {
            id: UserId::random(),
            email: new_user.email().clone(),
            name: new_user.name().clone(),
            is_active: true,
            created_at: self.clock.utc(),
        });
        let record = UserRecord::new(user, hash);
        self.users.create(&record).await.map_err(map_create_error)?;

        info!(user_id = %record.user().id(), "user created");
        Ok(record.into_user())
    }

    /// Create a user from a registration form and sign them in.
    ///
    /// A password confirmation mismatch is rejected before anything is
    /// hashed or stored.
    pub async fn register(&self, registration: Registration) -> Result<AuthenticatedSession, Error> {
        if !registration.passwords_match() {
            return Err(ValidationErrors::from(password_mismatch()).into());
        }
        let user = self.create_user(registration.into_new_user()).await?;
        let token = self.gate.issue(user.id())?;
        Ok(AuthenticatedSession { token, user })
    }

    /// Verify credentials and issue a session.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<AuthenticatedSession, Error> {
        let record = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(map_read_error)?;

        let Some(record) = record else {
            self.burn_unknown_user_check(credentials.password()).await;
            return Err(Error::unauthorized(INVALID_CREDENTIALS_MESSAGE));
        };

        let matches = self
            .hasher
            .verify(credentials.password(), record.password_hash())
            .await
            .map_err(|err| {
                warn!(error = %err, "stored password hash could not be checked");
                Error::internal("failed to verify credentials")
            })?;
        if !matches {
            return Err(Error::unauthorized(INVALID_CREDENTIALS_MESSAGE));
        }

        let user = record.into_user();
        let token = self.gate.issue(user.id())?;
        Ok(AuthenticatedSession { token, user })
    }

    async fn burn_unknown_user_check(&self, password: &str) {
        let Ok(dummy) = PasswordHash::new(UNKNOWN_USER_HASH) else {
            return;
        };
        if let Err(err) = self.hasher.verify(password, &dummy).await {
            debug!(error = %err, "unknown-user hash comparison failed");
        }
    }

    /// Look a user up by id, without the password hash.
    pub async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, Error> {
        let record = self.users.find_by_id(id).await.map_err(map_read_error)?;
        Ok(record.map(UserRecord::into_user))
    }

    /// Every user, without password hashes.
    pub async fn list_all(&self) -> Result<Vec<User>, Error> {
        let records = self.users.find_all().await.map_err(map_read_error)?;
        Ok(records.into_iter().map(UserRecord::into_user).collect())
    }

    /// Activate or deactivate an account.
    ///
    /// A deactivated user keeps any token already issued, but the gate
    /// rejects it on the next request.
    pub async fn set_active(&self, id: &UserId, is_active: bool) -> Result<User, Error> {
        let record = self
            .users
            .set_active(id, is_active)
            .await
            .map_err(map_read_error)?
            .ok_or_else(|| Error::not_found(format!("user {id} not found")))?;
        info!(user_id = %id, is_active, "user active flag updated");
        Ok(record.into_user())
    }
}

#[async_trait]
impl LoginService for CredentialService {
    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthenticatedSession, Error> {
        CredentialService::login(self, credentials).await
    }
}

#[async_trait]
impl RegistrationService for CredentialService {
    async fn register(&self, registration: Registration) -> Result<AuthenticatedSession, Error> {
        CredentialService::register(self, registration).await
    }
}

#[async_trait]
impl UsersQuery for CredentialService {
    async fn list_users(&self) -> Result<Vec<User>, Error> {
        self.list_all().await
    }
}

#[cfg(test)]
#[path = "credential_service_tests.rs"]
mod tests;
