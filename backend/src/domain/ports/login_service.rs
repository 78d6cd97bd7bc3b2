//! Driving port for the login use-case.
//!
//! Inbound adapters call this to exchange credentials for a session without
//! knowing which hasher, store, or token format sits behind it.

use async_trait::async_trait;

use crate::domain::{AuthenticatedSession, Error, LoginCredentials};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Check credentials and issue a session.
    ///
    /// An unknown email and a wrong password fail identically with
    /// `Unauthorized`.
    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthenticatedSession, Error>;
}
