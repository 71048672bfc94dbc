use thiserror::Error;

/// Errors surfaced by client-core operations.
///
/// Every variant carries a message fit for direct display; nothing here is
/// fatal and nothing is retried. `Auth` is the one variant the session
/// context reacts to structurally (by logging out).
#[derive(Error, Debug)]
pub enum ApiError {
    /// The server rejected the credential (401/403), or no credential was
    /// available for a protected call.
    #[error("authentication failed: {message}")]
    Auth { message: String },

    /// Another 4xx carrying a server-provided detail. No state change.
    #[error("{message}")]
    Validation { message: String },

    /// Network-level failure, no response received. No state change.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Anything else: 5xx, or a 2xx whose body did not parse.
    #[error("unexpected server response ({status}): {message}")]
    Unexpected { status: u16, message: String },

    /// Client-side persistence failure.
    #[error("state store error: {0}")]
    Store(#[from] state_store::DbError),
}

impl ApiError {
    /// Convenience constructor for authentication failures.
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth { message: message.into() }
    }

    /// Convenience constructor for validation failures.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation { message: message.into() }
    }

    /// Convenience constructor for unexpected responses.
    pub fn unexpected(status: u16, message: impl Into<String>) -> Self {
        Self::Unexpected {
            status,
            message: message.into(),
        }
    }

    /// True when the failure must tear the session down.
    pub fn is_auth(&self) -> bool {
        matches!(self, ApiError::Auth { .. })
    }
}

/// Result type alias for client-core operations.
pub type ApiResult<T> = Result<T, ApiError>;
