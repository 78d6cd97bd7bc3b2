//! PostgreSQL persistence adapter using Diesel ORM.
//!
//! Thin translation between the `users` table and the domain's
//! [`UserRecord`](crate::domain::UserRecord); no business rules live here.
//! Connections come from a `bb8` pool through `diesel-async`.
//!
//! The adapter expects the schema in `backend/migrations/` to be applied by
//! whoever provisions the database.
//!
//! # Example
//!
//! ```no_run
//! use authgate::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! # async fn example() -> Result<(), authgate::outbound::persistence::PoolError> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/authgate")).await?;
//! let repo = DieselUserRepository::new(pool);
//! # let _ = repo;
//! # Ok(())
//! # }
//! ```

mod diesel_user_repository;
mod models;
mod pool;
mod schema;

pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
