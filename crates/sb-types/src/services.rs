use serde::{Deserialize, Serialize};

/// Lifecycle state of a bookable service.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    #[default]
    Active,
    Maintenance,
}

impl ServiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceStatus::Active => "active",
            ServiceStatus::Maintenance => "maintenance",
        }
    }
}

impl std::fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Bookable service as returned by the services endpoints.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Service {
    /// Stable service identifier.
    pub id: i64,
    /// Service name shown in listings.
    pub name: String,
    /// Longer description shown on the services page.
    pub description: String,
    /// Price in the site currency.
    pub price: f64,
    /// Lifecycle state. Older server data predates the column, so absent
    /// deserializes as `active`.
    #[serde(default)]
    pub status: ServiceStatus,
}

/// Payload for creating a service (admin).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewService {
    pub name: String,
    pub description: String,
    pub price: f64,
}

/// Body of a service status update (admin).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceStatusUpdate {
    pub status: ServiceStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_defaults_to_active_when_absent() {
        let json = r#"{"id":1,"name":"Haircut","description":"Classic cut","price":25.0}"#;
        let service: Service = serde_json::from_str(json).unwrap();
        assert_eq!(service.status, ServiceStatus::Active);
    }

    #[test]
    fn status_uses_lowercase_wire_values() {
        let json = serde_json::to_string(&ServiceStatusUpdate {
            status: ServiceStatus::Maintenance,
        })
        .unwrap();
        assert_eq!(json, r#"{"status":"maintenance"}"#);
    }
}
