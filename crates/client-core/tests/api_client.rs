//! Wire-level tests for `ApiClient` against a local axum stub of the API.
//!
//! The stub reproduces the server's response shapes, including the quirks
//! the client has to tolerate: `detail` error bodies, create responses with
//! a trailing message, service rows predating the status column, and a
//! bare 204 on room updates.

use std::{collections::HashMap, time::Duration};

use anyhow::Result;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use client_core::{ApiClient, ApiError, BookingApi, ClientConfig, encode_basic_credential};
use sb_types::{
    auth::SignupRequest,
    bookings::{BookingStatus, NewBooking},
    rooms::RoomStatus,
    services::ServiceStatus,
};
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tokio::net::TcpListener;

const EMAIL: &str = "maria@example.com";
const PASSWORD: &str = "hunter2";

#[tokio::test]
async fn login_sends_exact_basic_header_and_decodes_identity() -> Result<()> {
    let (client, credential) = spawn_client().await?;
    let identity = client.login(&credential).await?;
    assert_eq!(identity.email, EMAIL);
    assert!(identity.is_admin);
    Ok(())
}

#[tokio::test]
async fn rejected_login_surfaces_server_detail() -> Result<()> {
    let (client, _credential) = spawn_client().await?;
    let wrong = encode_basic_credential(EMAIL, &SecretString::from("wrong".to_string()));
    let error = client.login(&wrong).await.unwrap_err();
    assert!(error.is_auth());
    assert!(error.to_string().contains("Invalid email or password"), "got: {error}");
    Ok(())
}

#[tokio::test]
async fn service_rows_without_status_default_to_active() -> Result<()> {
    let (client, _credential) = spawn_client().await?;
    let services = client.list_services(None, None).await?;
    assert_eq!(services.len(), 2);
    assert_eq!(services[1].name, "Classic Manicure");
    assert_eq!(services[1].status, ServiceStatus::Active);
    Ok(())
}

#[tokio::test]
async fn service_status_filter_is_sent_as_query() -> Result<()> {
    let (client, _credential) = spawn_client().await?;
    let services = client.list_services(None, Some(ServiceStatus::Maintenance)).await?;
    assert_eq!(services.len(), 1);
    assert_eq!(services[0].status, ServiceStatus::Maintenance);
    Ok(())
}

#[tokio::test]
async fn created_response_carries_new_id() -> Result<()> {
    let (client, credential) = spawn_client().await?;
    let request = NewBooking {
        service_id: 1,
        date: "2025-07-01".into(),
        time: "14:30".into(),
    };
    let created = client.create_booking(&credential, &request).await?;
    assert_eq!(created.id, 7);
    Ok(())
}

#[tokio::test]
async fn forbidden_and_missing_updates_classify_separately() -> Result<()> {
    let (client, credential) = spawn_client().await?;

    let forbidden = client
        .update_booking_status(&credential, 1, BookingStatus::Confirmed)
        .await
        .unwrap_err();
    assert!(forbidden.is_auth());

    let missing = client
        .update_booking_status(&credential, 2, BookingStatus::Confirmed)
        .await
        .unwrap_err();
    assert!(matches!(missing, ApiError::Validation { .. }));
    assert_eq!(missing.to_string(), "Booking not found");
    Ok(())
}

#[tokio::test]
async fn no_content_response_counts_as_success() -> Result<()> {
    let (client, credential) = spawn_client().await?;
    client.update_room_status(&credential, 4, RoomStatus::Maintenance).await?;
    Ok(())
}

#[tokio::test]
async fn non_json_server_error_keeps_status_reason() -> Result<()> {
    let (client, credential) = spawn_client().await?;
    let error = client.list_staff(&credential).await.unwrap_err();
    assert!(matches!(error, ApiError::Unexpected { status: 500, .. }));
    assert_eq!(
        error.to_string(),
        "unexpected server response (500): Internal Server Error"
    );
    Ok(())
}

#[tokio::test]
async fn structured_validation_detail_is_readable() -> Result<()> {
    let (client, _credential) = spawn_client().await?;
    let request = SignupRequest {
        email: String::new(),
        password: "x".into(),
        full_name: String::new(),
    };
    let error = client.signup(&request).await.unwrap_err();
    assert!(matches!(error, ApiError::Validation { .. }));
    assert!(error.to_string().contains("field required"), "got: {error}");
    Ok(())
}

#[tokio::test]
async fn revenue_report_sends_window_and_decodes() -> Result<()> {
    let (client, credential) = spawn_client().await?;
    let report = client.revenue_report(&credential, 30).await?;
    assert_eq!(report.total, 2100.0);
    assert_eq!(report.labels.len(), report.values.len());
    Ok(())
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() -> Result<()> {
    let config = ClientConfig {
        base_url: reqwest::Url::parse("http://127.0.0.1:9")?,
        timeout: Some(Duration::from_millis(500)),
    };
    let client = ApiClient::new(&config)?;
    let credential = encode_basic_credential(EMAIL, &SecretString::from(PASSWORD.to_string()));
    let error = client.login(&credential).await.unwrap_err();
    assert!(matches!(error, ApiError::Transport(_)));
    Ok(())
}

/// Bind the stub on an ephemeral port and return a client pointed at it
/// together with the credential the stub accepts.
async fn spawn_client() -> Result<(ApiClient, SecretString)> {
    let credential = encode_basic_credential(EMAIL, &SecretString::from(PASSWORD.to_string()));
    let state = StubState {
        authorization: format!("Basic {}", credential.expose_secret()),
    };
    let app = Router::new()
        .route("/login", post(login))
        .route("/users/", post(signup))
        .route("/services/", get(list_services))
        .route("/bookings/", post(create_booking))
        .route("/bookings/{id}", put(update_booking))
        .route("/rooms/{id}/status", put(update_room))
        .route("/staff/", get(list_staff))
        .route("/analytics/revenue", get(revenue))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let config = ClientConfig::new(reqwest::Url::parse(&format!("http://{addr}"))?);
    let client = ApiClient::new(&config)?;
    Ok((client, credential))
}

#[derive(Clone)]
struct StubState {
    authorization: String,
}

fn authorized(state: &StubState, headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        == Some(state.authorization.as_str())
}

async fn login(State(state): State<StubState>, headers: HeaderMap) -> Response {
    if authorized(&state, &headers) {
        Json(json!({
            "id": 7,
            "email": EMAIL,
            "full_name": "Maria Lopez",
            "isAdmin": true,
        }))
        .into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Invalid email or password"})),
        )
            .into_response()
    }
}

async fn signup() -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({
            "detail": [{"loc": ["body", "email"], "msg": "field required", "type": "value_error.missing"}]
        })),
    )
        .into_response()
}

async fn list_services(Query(params): Query<HashMap<String, String>>) -> Response {
    match params.get("status").map(String::as_str) {
        Some("maintenance") => Json(json!([
            {"id": 3, "name": "Sauna", "description": "Closed for repairs", "price": 30.0, "status": "maintenance"}
        ]))
        .into_response(),
        Some(_) => (
            StatusCode::BAD_REQUEST,
            Json(json!({"detail": "unknown status filter"})),
        )
            .into_response(),
        // The second row predates the status column.
        None => Json(json!([
            {"id": 1, "name": "Deluxe Haircut", "description": "Cut and style", "price": 45.0, "status": "active"},
            {"id": 2, "name": "Classic Manicure", "description": "Shape and polish", "price": 25.0}
        ]))
        .into_response(),
    }
}

async fn create_booking(State(state): State<StubState>, headers: HeaderMap) -> Response {
    if !authorized(&state, &headers) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Invalid authentication credentials"})),
        )
            .into_response();
    }
    (
        StatusCode::CREATED,
        Json(json!({"id": 7, "message": "Booking created successfully"})),
    )
        .into_response()
}

async fn update_booking(Path(id): Path<i64>) -> Response {
    match id {
        1 => (
            StatusCode::FORBIDDEN,
            Json(json!({"detail": "Not authorized to update booking status"})),
        )
            .into_response(),
        2 => (
            StatusCode::NOT_FOUND,
            Json(json!({"detail": "Booking not found"})),
        )
            .into_response(),
        _ => Json(json!({"message": "Booking status updated successfully"})).into_response(),
    }
}

async fn update_room(Path(_id): Path<i64>) -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn list_staff() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "wham").into_response()
}

async fn revenue(Query(params): Query<HashMap<String, String>>) -> Response {
    if params.get("days").map(String::as_str) != Some("30") {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"detail": "missing days window"})),
        )
            .into_response();
    }
    Json(json!({
        "labels": ["Jul", "Aug"],
        "values": [900.0, 1200.0],
        "total": 2100.0,
        "growth_pct": 33.3,
    }))
    .into_response()
}
