use std::path::PathBuf;

use thiserror::Error;

/// Failures raised by the client state store.
#[derive(Error, Debug)]
pub enum DbError {
    /// The SQLite file could not be opened or pooled.
    #[error("cannot open state database {path}: {source}")]
    ConnectionFailed {
        path: String,
        #[source]
        source: sqlx::Error,
    },

    /// Embedded migrations failed to apply.
    #[error("state database migration failed: {0}")]
    MigrationFailed(#[from] sqlx::migrate::MigrateError),

    /// A query against the state database failed.
    #[error("state database query failed: {0}")]
    Query(#[from] sqlx::Error),

    /// Filesystem error while locating or preparing the database file.
    #[error("state store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The resolved database path cannot be expressed as a file URL.
    #[error("not a usable sqlite path: {0}")]
    InvalidPath(PathBuf),

    /// The parent directory for the database could not be created.
    #[error("cannot create state directory {path}: {source}")]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The database file itself could not be created.
    #[error("cannot create state database file {path}: {source}")]
    FileCreationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A blocking helper task died before reporting back.
    #[error("blocking task failed: {0}")]
    TaskPanicked(String),

    /// A stored value failed to encode or decode as JSON.
    #[error("{context}: {source}")]
    JsonSerialization {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Result alias for state-store operations.
pub type DbResult<T> = Result<T, DbError>;
