use serde::{Deserialize, Serialize};

/// Availability state of a room.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    Available,
    Occupied,
    Maintenance,
}

impl RoomStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomStatus::Available => "available",
            RoomStatus::Occupied => "occupied",
            RoomStatus::Maintenance => "maintenance",
        }
    }
}

impl std::fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Hotel room as returned by the rooms endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Room {
    /// Stable room identifier.
    pub id: i64,
    /// Door label, e.g. `"101"`.
    pub room_number: String,
    /// Room category, e.g. `"Single"` or `"Suite"`. Free-form server value.
    #[serde(rename = "type")]
    pub room_type: String,
    /// Nightly rate in the site currency.
    pub price_per_night: f64,
    /// Availability state.
    pub status: RoomStatus,
}

/// Body of a room status update (admin).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomStatusUpdate {
    pub status: RoomStatus,
}
