//! Driving port for self-service registration.

use async_trait::async_trait;

use crate::domain::{AuthenticatedSession, Error, Registration};

/// Create an account and sign the new user in.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrationService: Send + Sync {
    /// Register a user and return a session for them.
    async fn register(&self, registration: Registration) -> Result<AuthenticatedSession, Error>;
}
