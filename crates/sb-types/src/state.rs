//! Handle types for the client state database.
//!
//! Kept here rather than in the state-store crate so downstream code can
//! pass connections around without pulling in the store internals.

use std::path::PathBuf;

#[cfg(feature = "sqlx")]
use sqlx::SqlitePool;

/// A pooled SQLite connection together with where it came from.
#[cfg(feature = "sqlx")]
#[derive(Clone, Debug)]
pub struct DbHandle {
    /// Pool shared by every caller in the process.
    pub pool: SqlitePool,
    /// URL the pool was opened with (`sqlite://...` or `sqlite::memory:`).
    pub url: String,
    /// Backing file, when there is one.
    pub path: Option<PathBuf>,
    /// Whether opening the handle created the database.
    pub freshly_created: bool,
}

/// A resolved database location, before any connection is made.
#[derive(Clone, Debug)]
pub struct DbLocation {
    /// URL to hand to the pool.
    pub url: String,
    /// Backing file, when there is one.
    pub path: Option<PathBuf>,
    /// Whether resolving the location created the file.
    pub freshly_created: bool,
}
