//! HTTP inbound adapter exposing the REST endpoints.

use actix_web::web;

pub mod auth;
pub mod error;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;

pub use error::ApiResult;

/// Register every route plus the JSON body error handler.
///
/// Callers still provide [`state::HttpState`] as `web::Data` and wrap the app
/// in [`crate::Trace`].
///
/// # Examples
/// ```
/// use actix_web::App;
/// use authgate::inbound::http::configure;
///
/// let _app = App::new().configure(configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .service(users::register)
        .service(users::login)
        .service(users::current_user)
        .service(users::list_users)
        .service(users::check_token);
}
