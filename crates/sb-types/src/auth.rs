use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// Authenticated user profile returned by the login and `/users/me` endpoints.
pub struct Identity {
    /// Stable user identifier.
    pub id: i64,
    /// Account email address.
    pub email: String,
    /// Display name.
    pub full_name: String,
    /// Administrator flag. Only the login endpoint includes it; `/users/me`
    /// omits the field, so absent deserializes as `false`.
    #[serde(rename = "isAdmin", default)]
    pub is_admin: bool,
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.email)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// Registration payload submitted to the signup endpoint.
pub struct SignupRequest {
    /// Email address for the new account.
    pub email: String,
    /// Plaintext password submitted by the client.
    pub password: String,
    /// Display name for the new account.
    pub full_name: String,
}
