//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on driving ports and stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{LoginService, RegistrationService, SessionVerifier, UsersQuery};
use crate::domain::{CredentialService, SessionGate};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub registration: Arc<dyn RegistrationService>,
    pub users: Arc<dyn UsersQuery>,
    pub sessions: Arc<dyn SessionVerifier>,
}

impl HttpState {
    /// Bundle the port implementations.
    pub fn new(
        login: Arc<dyn LoginService>,
        registration: Arc<dyn RegistrationService>,
        users: Arc<dyn UsersQuery>,
        sessions: Arc<dyn SessionVerifier>,
    ) -> Self {
        Self {
            login,
            registration,
            users,
            sessions,
        }
    }

    /// Wire both domain services into every port they implement.
    pub fn from_services(credentials: Arc<CredentialService>, gate: Arc<SessionGate>) -> Self {
        Self::new(credentials.clone(), credentials.clone(), credentials, gate)
    }
}
