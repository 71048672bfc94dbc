//! HTTP access to the booking API.
//!
//! `ApiClient` is a thin typed wrapper over reqwest: one place attaches the
//! Basic credential header, and one place classifies non-success responses
//! into the [`ApiError`] taxonomy. The server reports failures as
//! `{"detail": ...}` bodies; classification is a pure function so it is
//! testable without a socket.

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use reqwest::{Method, RequestBuilder, Response, StatusCode, header};
use sb_types::{
    Created,
    analytics::{OccupancyReport, RevenueReport, ServiceUsageReport},
    auth::{Identity, SignupRequest},
    bookings::{Booking, BookingStatus, BookingStatusUpdate, NewBooking},
    rooms::{Room, RoomStatus, RoomStatusUpdate},
    services::{NewService, Service, ServiceStatus, ServiceStatusUpdate},
    staff::{NewStaffMember, StaffMember},
};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::ClientConfig;
use crate::error::{ApiError, ApiResult};

/// Encode `email:password` for the Basic scheme. The encoded form is the
/// opaque credential the rest of the SDK carries around; it is attached to
/// requests and persisted, never parsed.
pub fn encode_basic_credential(email: &str, password: &SecretString) -> SecretString {
    let raw = format!("{}:{}", email, password.expose_secret());
    SecretString::from(STANDARD.encode(raw))
}

/// Typed surface of the booking REST API.
///
/// Implemented by [`ApiClient`] for real traffic and by scripted in-memory
/// backends in tests. Protected operations take the credential explicitly;
/// the session context owns it.
#[async_trait]
pub trait BookingApi: Send + Sync {
    /// `POST /login`. The Basic header is the whole request.
    async fn login(&self, credential: &SecretString) -> ApiResult<Identity>;
    /// `POST /users/`. Unauthenticated.
    async fn signup(&self, request: &SignupRequest) -> ApiResult<()>;
    /// `GET /users/me`.
    async fn current_user(&self, credential: &SecretString) -> ApiResult<Identity>;

    /// `GET /services/`. Public, but a credential rides along when present.
    async fn list_services(
        &self,
        credential: Option<&SecretString>,
        status: Option<ServiceStatus>,
    ) -> ApiResult<Vec<Service>>;
    /// `POST /services/` (admin).
    async fn create_service(&self, credential: &SecretString, service: &NewService) -> ApiResult<Created>;
    /// `PUT /services/{id}` (admin).
    async fn update_service_status(
        &self,
        credential: &SecretString,
        service_id: i64,
        status: ServiceStatus,
    ) -> ApiResult<()>;

    /// `GET /bookings/`.
    async fn list_bookings(&self, credential: &SecretString) -> ApiResult<Vec<Booking>>;
    /// `POST /bookings/`.
    async fn create_booking(&self, credential: &SecretString, booking: &NewBooking) -> ApiResult<Created>;
    /// `PUT /bookings/{id}` (admin).
    async fn update_booking_status(
        &self,
        credential: &SecretString,
        booking_id: i64,
        status: BookingStatus,
    ) -> ApiResult<()>;

    /// `GET /rooms/`.
    async fn list_rooms(&self, credential: &SecretString) -> ApiResult<Vec<Room>>;
    /// `PUT /rooms/{id}/status` (admin).
    async fn update_room_status(
        &self,
        credential: &SecretString,
        room_id: i64,
        status: RoomStatus,
    ) -> ApiResult<()>;

    /// `GET /staff/`.
    async fn list_staff(&self, credential: &SecretString) -> ApiResult<Vec<StaffMember>>;
    /// `POST /staff/` (admin).
    async fn add_staff(&self, credential: &SecretString, member: &NewStaffMember) -> ApiResult<Created>;

    /// `GET /analytics/revenue?days=N` (admin).
    async fn revenue_report(&self, credential: &SecretString, days: u32) -> ApiResult<RevenueReport>;
    /// `GET /analytics/occupancy` (admin).
    async fn occupancy_report(&self, credential: &SecretString) -> ApiResult<OccupancyReport>;
    /// `GET /analytics/services?days=N` (admin).
    async fn service_usage_report(&self, credential: &SecretString, days: u32) -> ApiResult<ServiceUsageReport>;
}

/// reqwest-backed [`BookingApi`] implementation.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: String,
}

impl ApiClient {
    /// Build a client for the configured base URL.
    pub fn new(config: &ClientConfig) -> ApiResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;
        let base = config.base_url.as_str().trim_end_matches('/').to_string();
        Ok(Self { http, base })
    }

    fn request(&self, method: Method, path: &str, credential: Option<&SecretString>) -> RequestBuilder {
        let mut request = self.http.request(method, format!("{}{}", self.base, path));
        if let Some(credential) = credential {
            request = request.header(
                header::AUTHORIZATION,
                format!("Basic {}", credential.expose_secret()),
            );
        }
        request
    }

    /// Send and split success from classified failure. Any 2xx passes
    /// through (a 204 simply has no body to read); everything else is read
    /// for its detail payload.
    async fn send(&self, request: RequestBuilder) -> ApiResult<Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        debug!(status = status.as_u16(), "api request failed");
        Err(classify_error(status, &body))
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let response = self.send(request).await?;
        let status = response.status();
        response
            .json()
            .await
            .map_err(|e| ApiError::unexpected(status.as_u16(), format!("malformed response body: {e}")))
    }

    async fn send_unit(&self, request: RequestBuilder) -> ApiResult<()> {
        self.send(request).await?;
        Ok(())
    }
}

#[async_trait]
impl BookingApi for ApiClient {
    async fn login(&self, credential: &SecretString) -> ApiResult<Identity> {
        self.send_json(self.request(Method::POST, "/login", Some(credential))).await
    }

    async fn signup(&self, request: &SignupRequest) -> ApiResult<()> {
        self.send_unit(self.request(Method::POST, "/users/", None).json(request)).await
    }

    async fn current_user(&self, credential: &SecretString) -> ApiResult<Identity> {
        self.send_json(self.request(Method::GET, "/users/me", Some(credential))).await
    }

    async fn list_services(
        &self,
        credential: Option<&SecretString>,
        status: Option<ServiceStatus>,
    ) -> ApiResult<Vec<Service>> {
        let mut request = self.request(Method::GET, "/services/", credential);
        if let Some(status) = status {
            request = request.query(&[("status", status.as_str())]);
        }
        self.send_json(request).await
    }

    async fn create_service(&self, credential: &SecretString, service: &NewService) -> ApiResult<Created> {
        self.send_json(self.request(Method::POST, "/services/", Some(credential)).json(service))
            .await
    }

    async fn update_service_status(
        &self,
        credential: &SecretString,
        service_id: i64,
        status: ServiceStatus,
    ) -> ApiResult<()> {
        let path = format!("/services/{service_id}");
        let body = ServiceStatusUpdate { status };
        self.send_unit(self.request(Method::PUT, &path, Some(credential)).json(&body)).await
    }

    async fn list_bookings(&self, credential: &SecretString) -> ApiResult<Vec<Booking>> {
        self.send_json(self.request(Method::GET, "/bookings/", Some(credential))).await
    }

    async fn create_booking(&self, credential: &SecretString, booking: &NewBooking) -> ApiResult<Created> {
        self.send_json(self.request(Method::POST, "/bookings/", Some(credential)).json(booking))
            .await
    }

    async fn update_booking_status(
        &self,
        credential: &SecretString,
        booking_id: i64,
        status: BookingStatus,
    ) -> ApiResult<()> {
        let path = format!("/bookings/{booking_id}");
        let body = BookingStatusUpdate { status };
        self.send_unit(self.request(Method::PUT, &path, Some(credential)).json(&body)).await
    }

    async fn list_rooms(&self, credential: &SecretString) -> ApiResult<Vec<Room>> {
        self.send_json(self.request(Method::GET, "/rooms/", Some(credential))).await
    }

    async fn update_room_status(
        &self,
        credential: &SecretString,
        room_id: i64,
        status: RoomStatus,
    ) -> ApiResult<()> {
        let path = format!("/rooms/{room_id}/status");
        let body = RoomStatusUpdate { status };
        self.send_unit(self.request(Method::PUT, &path, Some(credential)).json(&body)).await
    }

    async fn list_staff(&self, credential: &SecretString) -> ApiResult<Vec<StaffMember>> {
        self.send_json(self.request(Method::GET, "/staff/", Some(credential))).await
    }

    async fn add_staff(&self, credential: &SecretString, member: &NewStaffMember) -> ApiResult<Created> {
        self.send_json(self.request(Method::POST, "/staff/", Some(credential)).json(member))
            .await
    }

    async fn revenue_report(&self, credential: &SecretString, days: u32) -> ApiResult<RevenueReport> {
        let request = self
            .request(Method::GET, "/analytics/revenue", Some(credential))
            .query(&[("days", days)]);
        self.send_json(request).await
    }

    async fn occupancy_report(&self, credential: &SecretString) -> ApiResult<OccupancyReport> {
        self.send_json(self.request(Method::GET, "/analytics/occupancy", Some(credential)))
            .await
    }

    async fn service_usage_report(&self, credential: &SecretString, days: u32) -> ApiResult<ServiceUsageReport> {
        let request = self
            .request(Method::GET, "/analytics/services", Some(credential))
            .query(&[("days", days)]);
        self.send_json(request).await
    }
}

/// Classify a non-2xx status + raw body into the error taxonomy.
///
/// 401 and 403 are authentication failures regardless of body. Other 4xx
/// become validation failures carrying the server's `detail`; everything
/// else is unexpected. When the body has no usable detail the canonical
/// status reason stands in.
fn classify_error(status: StatusCode, body: &str) -> ApiError {
    let message = extract_detail(body).unwrap_or_else(|| canonical_reason(status));
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        ApiError::Auth { message }
    } else if status.is_client_error() {
        ApiError::Validation { message }
    } else {
        ApiError::Unexpected {
            status: status.as_u16(),
            message,
        }
    }
}

/// Pull the `detail` field out of an error body. `detail` is usually a
/// string, but validation failures can carry structured payloads, which are
/// surfaced compactly serialized.
fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}

fn canonical_reason(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("unknown error")
        .to_string()
}
