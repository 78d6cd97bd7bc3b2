//! Driven port that signs and checks session tokens.

use crate::domain::{SessionClaims, SessionToken};

use super::define_port_error;

define_port_error! {
    /// Reasons a token could not be produced or accepted.
    pub enum TokenCodecError {
        /// The token is not structurally valid or its claims do not parse.
        Malformed { message: String } => "malformed token: {message}",
        /// The signature does not match the signing key.
        InvalidSignature => "token signature is invalid",
        /// Signing a new token failed.
        Signing { message: String } => "token signing failed: {message}",
    }
}

/// Signs claims into a token and verifies presented tokens.
///
/// `decode` checks the signature and claim shape only. Expiry is judged by the
/// caller against its own clock.
#[cfg_attr(test, mockall::automock)]
pub trait SessionTokenCodec: Send + Sync {
    /// Sign `claims` into a compact token.
    fn encode(&self, claims: &SessionClaims) -> Result<SessionToken, TokenCodecError>;

    /// Verify `token` and return its claims.
    fn decode(&self, token: &str) -> Result<SessionClaims, TokenCodecError>;
}
