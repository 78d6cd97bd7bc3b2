//! Session token types.
//!
//! Tokens are stateless: everything the gate needs is in the signed claims,
//! and nothing is stored server-side.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{User, UserId};

/// Opaque signed bearer token.
///
/// `Debug` shows only a prefix so tokens do not end up whole in logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String, example = "eyJhbGciOiJIUzI1NiJ9.eyJpZCI6IjNmYTg1ZjY0In0.c2ln")]
pub struct SessionToken(String);

impl SessionToken {
    /// Wrap a token string produced by a codec or presented by a client.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Raw token string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix: String = self.0.chars().take(8).collect();
        write!(f, "SessionToken({prefix}…)")
    }
}

/// Claims carried inside a [`SessionToken`].
///
/// `iat` and `exp` are seconds since the Unix epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub id: UserId,
    pub iat: i64,
    pub exp: i64,
}

/// Token plus the user it was issued for; the result of register, login and
/// renew.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedSession {
    pub token: SessionToken,
    pub user: User,
}
