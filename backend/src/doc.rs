//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every handler in [`crate::inbound::http::users`], the
//! request/response schemas, and the bearer-token security scheme. Debug
//! builds serve it through Swagger UI at `/docs`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{AuthenticatedSession, Error, ErrorCode, User};
use crate::inbound::http::users::{LoginRequest, RegisterRequest};

/// Name of the bearer security scheme referenced by protected paths.
pub const BEARER_SCHEME: &str = "bearer";

/// Add the `Authorization: Bearer` security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        let scheme = HttpBuilder::new()
            .scheme(HttpAuthScheme::Bearer)
            .bearer_format("JWT")
            .description(Some(
                "Session token returned by POST /register, POST /login, or GET /check-token.",
            ))
            .build();
        components.add_security_scheme(BEARER_SCHEME, SecurityScheme::Http(scheme));
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "authgate API",
        description = "User registration, login, and bearer-token session checks."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::current_user,
        crate::inbound::http::users::check_token,
    ),
    components(schemas(
        User,
        Error,
        ErrorCode,
        AuthenticatedSession,
        RegisterRequest,
        LoginRequest
    )),
    tags(
        (name = "users", description = "Accounts and sessions")
    )
)]
pub struct ApiDoc;
