//! Session token gate: issues tokens and checks them on every request.
//!
//! The gate is stateless. Each request re-verifies the signature and expiry,
//! then re-reads the user so that deactivation takes effect on the very next
//! call.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::TimeDelta;
use mockable::Clock;
use tracing::{debug, warn};

use crate::domain::ports::{SessionTokenCodec, SessionVerifier, TokenCodecError, UserRepository};
use crate::domain::{AuthenticatedSession, Error, SessionClaims, SessionToken, User, UserId};

/// Message returned for every rejected request.
pub const UNAUTHORIZED_MESSAGE: &str = "unauthorized";

/// Why a request was turned away. Logged, never returned.
#[derive(Debug)]
enum Rejection {
    NoToken,
    Codec(TokenCodecError),
    Expired { exp: i64, now: i64 },
    UserMissing,
    UserInactive,
    Store(String),
}

impl Rejection {
    fn into_error(self) -> Error {
        match self {
            Self::NoToken => debug!("session rejected: no token"),
            Self::Codec(err) => debug!(error = %err, "session rejected: token not accepted"),
            Self::Expired { exp, now } => debug!(exp, now, "session rejected: token expired"),
            Self::UserMissing => debug!("session rejected: user not found"),
            Self::UserInactive => debug!("session rejected: user inactive"),
            Self::Store(message) => warn!(reason = %message, "session lookup failed"),
        }
        Error::unauthorized(UNAUTHORIZED_MESSAGE)
    }
}

/// Issues and verifies signed session tokens.
#[derive(Clone)]
pub struct SessionGate {
    users: Arc<dyn UserRepository>,
    codec: Arc<dyn SessionTokenCodec>,
    clock: Arc<dyn Clock>,
    ttl: TimeDelta,
}

impl SessionGate {
    /// Build a gate that signs tokens valid for `ttl`.
    ///
    /// # Examples
    /// ```no_run
    /// # use std::sync::Arc;
    /// # use chrono::TimeDelta;
    /// # use mockable::DefaultClock;
    /// # use authgate::domain::SessionGate;
    /// # use authgate::outbound::{InMemoryUserRepository, JwtSessionCodec};
    /// let gate = SessionGate::new(
    ///     Arc::new(InMemoryUserRepository::default()),
    ///     Arc::new(JwtSessionCodec::from_secret(b"0123456789abcdef0123456789abcdef")),
    ///     Arc::new(DefaultClock),
    ///     TimeDelta::hours(6),
    /// );
    /// # let _ = gate;
    /// ```
    pub fn new(
        users: Arc<dyn UserRepository>,
        codec: Arc<dyn SessionTokenCodec>,
        clock: Arc<dyn Clock>,
        ttl: TimeDelta,
    ) -> Self {
        Self {
            users,
            codec,
            clock,
            ttl,
        }
    }

    /// Sign a token for `user_id`, valid from now until now + ttl.
    pub fn issue(&self, user_id: &UserId) -> Result<SessionToken, Error> {
        let now = self.clock.utc().timestamp();
        let claims = SessionClaims {
            id: user_id.clone(),
            iat: now,
            exp: now.saturating_add(self.ttl.num_seconds()),
        };
        self.codec.encode(&claims).map_err(|err| {
            warn!(error = %err, "failed to sign session token");
            Error::internal("failed to issue session token")
        })
    }

    /// Resolve the active user behind a presented token.
    pub async fn verify(&self, token: Option<&str>) -> Result<User, Error> {
        self.resolve(token).await.map_err(Rejection::into_error)
    }

    async fn resolve(&self, token: Option<&str>) -> Result<User, Rejection> {
        let token = token.ok_or(Rejection::NoToken)?;
        let claims = self.codec.decode(token).map_err(Rejection::Codec)?;

        let now = self.clock.utc().timestamp();
        if claims.exp <= now {
            return Err(Rejection::Expired {
                exp: claims.exp,
                now,
            });
        }

        let record = self
            .users
            .find_by_id(&claims.id)
            .await
            .map_err(|err| Rejection::Store(err.to_string()))?
            .ok_or(Rejection::UserMissing)?;
        let user = record.into_user();
        if !user.is_active() {
            return Err(Rejection::UserInactive);
        }
        Ok(user)
    }

    /// Issue a fresh session for an already-verified user.
    pub fn renew(&self, user: &User) -> Result<AuthenticatedSession, Error> {
        let token = self.issue(user.id())?;
        Ok(AuthenticatedSession {
            token,
            user: user.clone(),
        })
    }
}

#[async_trait]
impl SessionVerifier for SessionGate {
    async fn verify(&self, token: Option<&str>) -> Result<User, Error> {
        SessionGate::verify(self, token).await
    }

    async fn renew(&self, user: &User) -> Result<AuthenticatedSession, Error> {
        SessionGate::renew(self, user)
    }
}

#[cfg(test)]
#[path = "session_gate_tests.rs"]
mod tests;
