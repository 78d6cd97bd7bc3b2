//! authgate: user registration, credential checks, and stateless bearer
//! sessions behind an Actix Web API.

pub mod config;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
