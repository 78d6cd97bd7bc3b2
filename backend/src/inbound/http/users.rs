//! Account and session handlers.
//!
//! ```text
//! POST /register {"email":"ada@example.com","name":"Ada","password":"secret1","passwordConfirm":"secret1"}
//! POST /login {"email":"ada@example.com","password":"secret1"}
//! GET /users           (Authorization: Bearer <token>)
//! GET /users/me        (Authorization: Bearer <token>)
//! GET /check-token     (Authorization: Bearer <token>)
//! ```

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use zeroize::Zeroizing;

use crate::domain::{AuthenticatedSession, Error, LoginCredentials, User, validate_registration};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::state::HttpState;

/// Request body for `POST /register`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    #[schema(value_type = String, example = "secret1")]
    pub password: Zeroizing<String>,
    #[schema(value_type = String, example = "secret1")]
    pub password_confirm: Zeroizing<String>,
}

/// Request body for `POST /login`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(value_type = String, example = "secret1")]
    pub password: Zeroizing<String>,
}

/// Create an account and return a session for it.
#[utoipa::path(
    post,
    path = "/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Registered and signed in", body = AuthenticatedSession),
        (status = 400, description = "Invalid input, mismatched passwords, or email taken", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<web::Json<AuthenticatedSession>> {
    let body = payload.into_inner();
    let registration =
        validate_registration(&body.email, &body.name, &body.password, &body.password_confirm)?;
    let session = state.registration.register(registration).await?;
    info!(user_id = %session.user.id(), "user registered");
    Ok(web::Json(session))
}

/// Exchange credentials for a session.
///
/// Unknown emails and wrong passwords fail with the same `401` body.
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = AuthenticatedSession),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 503, description = "User store unavailable", body = Error)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<AuthenticatedSession>> {
    let body = payload.into_inner();
    let credentials = LoginCredentials::try_from_parts(&body.email, &body.password)?;
    let session = state.login.login(&credentials).await?;
    Ok(web::Json(session))
}

/// List every registered user. Password hashes are never included.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use authgate::inbound::http::users::list_users;
///
/// let app = App::new().service(list_users);
/// ```
#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "Users", body = [User]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "User store unavailable", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUsers",
    security(("bearer" = []))
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    _caller: AuthenticatedUser,
) -> ApiResult<web::Json<Vec<User>>> {
    let users = state.users.list_users().await?;
    Ok(web::Json(users))
}

/// The user behind the presented token.
#[utoipa::path(
    get,
    path = "/users/me",
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["users"],
    operation_id = "currentUser",
    security(("bearer" = []))
)]
#[get("/users/me")]
pub async fn current_user(caller: AuthenticatedUser) -> web::Json<User> {
    web::Json(caller.into_inner())
}

/// Confirm a token is still good and hand back a fresh one.
#[utoipa::path(
    get,
    path = "/check-token",
    responses(
        (status = 200, description = "Token valid; renewed session", body = AuthenticatedSession),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["users"],
    operation_id = "checkToken",
    security(("bearer" = []))
)]
#[get("/check-token")]
pub async fn check_token(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
) -> ApiResult<web::Json<AuthenticatedSession>> {
    let session = state.sessions.renew(&caller.into_inner()).await?;
    Ok(web::Json(session))
}
