//! Domain primitives, ports, and services.
//!
//! Purpose: define the strongly typed account model, the error taxonomy,
//! and the two services that own authentication. Nothing here knows about
//! HTTP, SQL, bcrypt, or JWT; those live behind the traits in [`ports`].
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - User / UserRecord: account without and with its password hash.
//! - LoginCredentials / Registration / NewUser: validated inputs.
//! - CredentialService: create, register, login, and look up users.
//! - SessionGate: issue and verify stateless session tokens.

pub mod auth;
pub mod credential_service;
pub mod error;
pub mod ports;
pub mod session;
pub mod session_gate;
pub mod trace_id;
pub mod user;

pub use self::auth::{
    FieldError, FieldErrorCode, LoginCredentials, NewUser, PASSWORD_MAX_BYTES, PASSWORD_MIN_CHARS,
    Registration, ValidationErrors, validate_registration,
};
pub use self::credential_service::{CredentialService, INVALID_CREDENTIALS_MESSAGE};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::session::{AuthenticatedSession, SessionClaims, SessionToken};
pub use self::session_gate::{SessionGate, UNAUTHORIZED_MESSAGE};
pub use self::trace_id::TraceId;
pub use self::user::{
    DISPLAY_NAME_MAX, DisplayName, EMAIL_MAX, EmailAddress, PasswordHash, User, UserId, UserParts,
    UserRecord, UserValidationError,
};

