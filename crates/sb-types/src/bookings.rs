use serde::{Deserialize, Serialize};

/// Lifecycle state of a booking.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    /// Server-side default for freshly created bookings.
    #[default]
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Booking as returned by the bookings list endpoint.
///
/// The list endpoint joins display columns from the service and user rows;
/// those fields are absent on other responses, hence the `Option`s.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    /// Stable booking identifier.
    pub id: i64,
    /// Booked service.
    pub service_id: i64,
    /// Owning user.
    pub user_id: i64,
    /// Booking date as sent by the server (`YYYY-MM-DD`).
    pub date: String,
    /// Booking time as sent by the server (`HH:MM`).
    pub time: String,
    /// Lifecycle state.
    pub status: BookingStatus,
    /// Joined service name, list endpoint only.
    pub service_name: Option<String>,
    /// Joined service price, list endpoint only.
    pub service_price: Option<f64>,
    /// Joined owner email, list endpoint only.
    pub user_email: Option<String>,
    /// Joined owner display name, list endpoint only.
    pub user_full_name: Option<String>,
}

/// Payload for creating a booking.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBooking {
    pub service_id: i64,
    /// `YYYY-MM-DD`, passed through to the server untouched.
    pub date: String,
    /// `HH:MM`, passed through to the server untouched.
    pub time: String,
}

/// Body of a booking status update (admin).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingStatusUpdate {
    pub status: BookingStatus,
}
