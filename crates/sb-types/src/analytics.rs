//! Dashboard report shapes returned by the analytics endpoints.
//!
//! Reports are fetched on demand for the admin dashboard and are not cached
//! by the session context.

use serde::{Deserialize, Serialize};

/// Revenue series over a report window.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RevenueReport {
    /// Chart labels, one per bucket (day or month depending on the window).
    pub labels: Vec<String>,
    /// Revenue per bucket, aligned with `labels`.
    pub values: Vec<f64>,
    /// Total revenue over the window.
    pub total: f64,
    /// Percent change versus the preceding window.
    pub growth_pct: f64,
}

/// Occupied/vacant split across the room inventory.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OccupancyReport {
    pub occupied: u32,
    pub vacant: u32,
    /// Occupancy as a percentage of all rooms.
    pub rate_pct: f64,
}

/// Usage count for a single service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceUsage {
    pub name: String,
    pub count: u64,
}

/// Per-service booking counts over a report window.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceUsageReport {
    pub services: Vec<ServiceUsage>,
    /// Name of the most-booked service, when any bookings exist.
    pub top_service: Option<String>,
}
