//! Local persistence for the SalonBooker client.
//!
//! Owns the per-user SQLite file that survives restarts and the operations
//! on it: opening and migrating the database (`db`) and saving, loading,
//! and clearing the signed-in session (`session`).

mod db;
mod error;
mod session;

pub use db::*;
pub use error::{DbError, DbResult};
pub use sb_types::state::{DbHandle, DbLocation};
pub use session::*;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

#[cfg(test)]
mod db_tests;
