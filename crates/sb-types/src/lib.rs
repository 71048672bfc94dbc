//! Shared type definitions for SalonBooker
//!
//! This crate contains lightweight type definitions shared across the
//! SalonBooker client SDK: wire DTOs mirroring the booking API's JSON
//! shapes, the route model, and persistence handle types.

use serde::{Deserialize, Serialize};

pub mod analytics;
pub mod auth;
pub mod bookings;
pub mod rooms;
pub mod routes;
pub mod services;
pub mod staff;
pub mod state;

/// Body returned by the create endpoints (`201` + `{"id": ..., "message": ...}`).
///
/// The human-readable message is dropped; callers only need the new id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Created {
    pub id: i64,
}
