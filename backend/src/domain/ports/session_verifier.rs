//! Driving port for per-request bearer-token checks.
//!
//! The HTTP extractor hands the raw token (or its absence) to this port and
//! receives the resolved user back. Every rejection is the same
//! `Unauthorized` error, whatever the cause.

use async_trait::async_trait;

use crate::domain::{AuthenticatedSession, Error, User};

#[async_trait]
pub trait SessionVerifier: Send + Sync {
    /// Resolve the active user behind `token`.
    async fn verify(&self, token: Option<&str>) -> Result<User, Error>;

    /// Issue a fresh token for a user that has already been verified.
    async fn renew(&self, user: &User) -> Result<AuthenticatedSession, Error>;
}
