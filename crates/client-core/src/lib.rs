//! Session-aware client SDK for the salon booking API.
//!
//! The public surface is deliberately small: [`SessionContext`] owns the
//! authentication lifecycle and cached collections, [`ApiClient`] speaks the
//! wire protocol, and [`decide`] answers routing questions from session
//! state alone.

mod api;
pub mod error;
mod guard;
mod session;

use std::time::Duration;

pub use api::{ApiClient, BookingApi, encode_basic_credential};
pub use error::{ApiError, ApiResult};
pub use guard::{RouteDecision, decide};
pub use session::{SessionContext, SessionPhase};

/// Connection settings for [`ApiClient`].
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Base URL of the booking API, e.g. `http://localhost:8000`.
    pub base_url: reqwest::Url,
    /// Per-request timeout. `None` keeps reqwest's defaults.
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(base_url: reqwest::Url) -> Self {
        Self {
            base_url,
            timeout: None,
        }
    }
}
