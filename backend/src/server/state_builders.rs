//! Assemble domain services and HTTP state from a [`ServerConfig`].

use std::sync::Arc;

use authgate::domain::ports::UserRepository;
use authgate::domain::{CredentialService, SessionGate};
use authgate::inbound::http::state::HttpState;
use authgate::outbound::persistence::DieselUserRepository;
use authgate::outbound::{BcryptPasswordHasher, InMemoryUserRepository, JwtSessionCodec};
use mockable::DefaultClock;
use tracing::{info, warn};

use super::ServerConfig;

fn build_user_repository(config: &ServerConfig) -> Arc<dyn UserRepository> {
    match &config.db_pool {
        Some(pool) => {
            info!("using PostgreSQL user repository");
            Arc::new(DieselUserRepository::new(pool.clone()))
        }
        None => {
            warn!("no database configured; users are kept in memory and lost on exit");
            Arc::new(InMemoryUserRepository::default())
        }
    }
}

/// Build the handler state. The signing key bytes are copied into the codec
/// once; the config keeps (and later wipes) its own copy.
pub(super) fn build_http_state(config: &ServerConfig) -> HttpState {
    let users = build_user_repository(config);
    let clock = Arc::new(DefaultClock);
    let codec = Arc::new(JwtSessionCodec::from_secret(config.signing_key.as_bytes()));
    let gate = Arc::new(SessionGate::new(
        users.clone(),
        codec,
        clock.clone(),
        config.token_ttl,
    ));
    let credentials = Arc::new(CredentialService::new(
        users,
        Arc::new(BcryptPasswordHasher::new(config.bcrypt_cost)),
        gate.clone(),
        clock,
    ));
    HttpState::from_services(credentials, gate)
}
