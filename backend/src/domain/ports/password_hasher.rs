//! Driven port for one-way password hashing.

use async_trait::async_trait;

use crate::domain::PasswordHash;

use super::define_port_error;

define_port_error! {
    /// Failures raised by password hashers.
    pub enum PasswordHashError {
        /// Hashing the plaintext failed.
        Hash { message: String } => "password hashing failed: {message}",
        /// The stored hash could not be parsed or compared.
        Verify { message: String } => "password verification failed: {message}",
    }
}

/// Salted, slow hashing of plaintext passwords.
///
/// Implementations must keep CPU-heavy work off the async executor.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Hash `password` with a fresh salt.
    async fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHashError>;

    /// Compare `password` against `hash`. A mismatch is `Ok(false)`.
    async fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, PasswordHashError>;
}
