//! Bearer-token authentication for HTTP handlers.
//!
//! Handlers that need a signed-in caller take an [`AuthenticatedUser`]
//! parameter. The extractor pulls the token out of `Authorization`, runs it
//! through the [`SessionVerifier`](crate::domain::ports::SessionVerifier)
//! port, and hands the resolved user to the handler. Nothing is stashed on
//! the request.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;
use tracing::error;

use crate::domain::{Error, User};

use super::state::HttpState;

const BEARER_PREFIX: &str = "Bearer ";

/// Extract the token from an `Authorization` header value.
///
/// Only `Bearer <token>` with the exact scheme, one space, and a non-empty
/// token without further whitespace is accepted.
///
/// # Examples
/// ```
/// use authgate::inbound::http::auth::parse_bearer;
///
/// assert_eq!(parse_bearer("Bearer abc.def.ghi"), Some("abc.def.ghi"));
/// assert_eq!(parse_bearer("bearer abc"), None);
/// assert_eq!(parse_bearer("Bearer "), None);
/// ```
pub fn parse_bearer(value: &str) -> Option<&str> {
    let token = value.strip_prefix(BEARER_PREFIX)?;
    if token.is_empty() || token.chars().any(char::is_whitespace) {
        return None;
    }
    Some(token)
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
    let header = req.headers().get(AUTHORIZATION)?;
    let value = header.to_str().ok()?;
    parse_bearer(value).map(str::to_owned)
}

/// The user behind a verified bearer token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

impl AuthenticatedUser {
    /// Unwrap the resolved user.
    pub fn into_inner(self) -> User {
        self.0
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = bearer_token(req);
        let sessions = req
            .app_data::<web::Data<HttpState>>()
            .map(|state| state.sessions.clone());
        Box::pin(async move {
            let Some(sessions) = sessions else {
                error!("HttpState missing from app data");
                return Err(Error::internal("authentication is not configured"));
            };
            sessions.verify(token.as_deref()).await.map(Self)
        })
    }
}
