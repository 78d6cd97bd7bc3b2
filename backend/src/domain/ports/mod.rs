//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`LoginService`, `RegistrationService`, `UsersQuery`,
//! `SessionVerifier`) are what inbound adapters call. Driven ports
//! (`UserRepository`, `PasswordHasher`, `SessionTokenCodec`) are what the
//! domain services call out through.

mod macros;
pub(crate) use macros::define_port_error;

mod login_service;
mod password_hasher;
mod registration_service;
mod session_token_codec;
mod session_verifier;
mod user_repository;
mod users_query;

#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::LoginService;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use registration_service::MockRegistrationService;
pub use registration_service::RegistrationService;
#[cfg(test)]
pub use session_token_codec::MockSessionTokenCodec;
pub use session_token_codec::{SessionTokenCodec, TokenCodecError};
pub use session_verifier::SessionVerifier;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
#[cfg(test)]
pub use users_query::MockUsersQuery;
pub use users_query::UsersQuery;
