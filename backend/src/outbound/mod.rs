//! Outbound adapters implementing the domain's driven ports.
//!
//! - **persistence**: PostgreSQL user repository (Diesel, `diesel-async`, bb8)
//! - **memory**: in-process user repository for database-less runs and tests
//! - **password**: bcrypt password hasher
//! - **token**: HS256 JWT session token codec
//!
//! Adapters translate between domain types and infrastructure formats and
//! contain no business rules.

pub mod memory;
pub mod password;
pub mod persistence;
pub mod token;

pub use memory::InMemoryUserRepository;
pub use password::{BcryptPasswordHasher, DEFAULT_BCRYPT_COST};
pub use token::JwtSessionCodec;
