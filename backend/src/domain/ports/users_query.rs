//! Driving port for user listings.

use async_trait::async_trait;

use crate::domain::{Error, User};

/// Read-only access to the user directory.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Every registered user, without password hashes.
    async fn list_users(&self) -> Result<Vec<User>, Error>;
}
