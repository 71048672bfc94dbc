use serde::{Deserialize, Serialize};

/// Staff member as returned by the staff endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffMember {
    /// Stable staff identifier.
    pub id: i64,
    /// Display name.
    pub full_name: String,
    /// Specialty shown in the staff list, e.g. `"Massage"`.
    pub specialty: String,
}

/// Payload for adding a staff member (admin).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStaffMember {
    pub full_name: String,
    pub specialty: String,
}
