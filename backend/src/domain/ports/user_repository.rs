//! Driven port for user persistence.
//!
//! Adapters store [`UserRecord`]s, hash included. Uniqueness of the email
//! address is the adapter's job and must be atomic with the insert; a
//! violation is reported as [`UserPersistenceError::DuplicateEmail`].

use async_trait::async_trait;

use crate::domain::{EmailAddress, UserId, UserRecord};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another user already owns this email address.
        DuplicateEmail { email: String } => "{email} already exists",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user. Fails with `DuplicateEmail` if the email is taken.
    async fn create(&self, record: &UserRecord) -> Result<(), UserPersistenceError>;

    /// Fetch a user by normalised email.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserRecord>, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserRecord>, UserPersistenceError>;

    /// Every stored user, oldest first.
    async fn find_all(&self) -> Result<Vec<UserRecord>, UserPersistenceError>;

    /// Set the active flag and return the updated record, or `None` when the
    /// id is unknown.
    async fn set_active(
        &self,
        id: &UserId,
        is_active: bool,
    ) -> Result<Option<UserRecord>, UserPersistenceError>;
}
