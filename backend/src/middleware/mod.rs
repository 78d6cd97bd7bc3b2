//! Request middleware.
//!
//! Purpose: request lifecycle concerns that sit outside the handlers. Today
//! that is trace correlation and request logging.

pub mod trace;

pub use trace::Trace;
