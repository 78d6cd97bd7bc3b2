//! HTTP server configuration object.

use std::net::SocketAddr;

use authgate::config::SigningKey;
use authgate::outbound::persistence::DbPool;
use chrono::TimeDelta;

/// Everything `create_server` needs, resolved before the listener starts.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) signing_key: SigningKey,
    pub(crate) token_ttl: TimeDelta,
    pub(crate) bcrypt_cost: u32,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(
        bind_addr: SocketAddr,
        signing_key: SigningKey,
        token_ttl: TimeDelta,
        bcrypt_cost: u32,
    ) -> Self {
        Self {
            bind_addr,
            signing_key,
            token_ttl,
            bcrypt_cost,
            db_pool: None,
        }
    }

    /// Store users in PostgreSQL instead of process memory.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }
}
