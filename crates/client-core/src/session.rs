//! Session lifecycle and cached API data.
//!
//! [`SessionContext`] is the single owner of the credential, the verified
//! identity, and the cached collections the UI renders from. Every login,
//! logout, and credential rejection bumps a generation counter; responses
//! that complete after the bump are discarded instead of committed, so a
//! slow fetch can never write data from a session that no longer exists.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use sb_types::{
    analytics::{OccupancyReport, RevenueReport, ServiceUsageReport},
    auth::{Identity, SignupRequest},
    bookings::{Booking, BookingStatus, NewBooking},
    rooms::{Room, RoomStatus},
    services::{NewService, Service, ServiceStatus},
    staff::{NewStaffMember, StaffMember},
};
use secrecy::{ExposeSecret, SecretString};
use state_store::{DbHandle, clear_session, client_db, load_session, migrate_client, save_session};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::ClientConfig;
use crate::api::{ApiClient, BookingApi, encode_basic_credential};
use crate::error::{ApiError, ApiResult};

/// Authentication lifecycle of a [`SessionContext`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SessionPhase {
    /// No credential; only public data is reachable.
    #[default]
    Anonymous,
    /// A login attempt is in flight.
    Authenticating,
    /// Server-verified identity with a live credential.
    Authenticated(Identity),
}

impl SessionPhase {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionPhase::Authenticated(_))
    }

    pub fn identity(&self) -> Option<&Identity> {
        match self {
            SessionPhase::Authenticated(identity) => Some(identity),
            _ => None,
        }
    }
}

#[derive(Default)]
struct SessionState {
    phase: SessionPhase,
    credential: Option<SecretString>,
    services: Vec<Service>,
    bookings: Vec<Booking>,
    rooms: Vec<Room>,
    staff: Vec<StaffMember>,
}

/// Shared handle to the session and its cached collections.
///
/// Cheap to clone; every clone observes the same state. All methods are
/// safe to call concurrently.
#[derive(Clone)]
pub struct SessionContext {
    api: Arc<dyn BookingApi>,
    store: DbHandle,
    state: Arc<RwLock<SessionState>>,
    generation: Arc<AtomicU64>,
}

impl SessionContext {
    /// Wrap an API backend and an already-opened state store.
    pub fn new(api: Arc<dyn BookingApi>, store: DbHandle) -> Self {
        Self {
            api,
            store,
            state: Arc::new(RwLock::new(SessionState::default())),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Open the default state store, migrate it, and stand up an
    /// [`ApiClient`] for `config`.
    pub async fn open(config: &ClientConfig) -> ApiResult<Self> {
        let store = client_db().await?;
        migrate_client(&store).await?;
        let api = ApiClient::new(config)?;
        Ok(Self::new(Arc::new(api), store))
    }

    /// Restore the persisted session, if any, and warm the caches.
    ///
    /// A stored pair is trusted optimistically so callers can render a
    /// signed-in view immediately; the startup fetches then confirm it. If
    /// the server rejects the credential the session is evicted, leaving
    /// the store clean and the phase `Anonymous`. The public service
    /// catalog is loaded either way. Returns the phase the session settled
    /// in.
    pub async fn bootstrap(&self) -> SessionPhase {
        let restored = match load_session(&self.store).await {
            Ok(restored) => restored,
            Err(error) => {
                warn!(%error, "failed to read persisted session");
                None
            }
        };
        match restored {
            Some(session) => {
                let generation = {
                    let mut state = self.state.write().await;
                    state.phase = SessionPhase::Authenticated(session.identity.clone());
                    state.credential = Some(SecretString::from(session.credential));
                    self.generation.load(Ordering::SeqCst)
                };
                info!(user = %session.identity, "restored persisted session");
                self.warm_caches(generation).await;
            }
            None => {
                if let Err(error) = self.refresh_services().await {
                    warn!(%error, "failed to load services");
                }
            }
        }
        self.phase().await
    }

    /// Exchange credentials for a verified identity.
    ///
    /// On success the pair is persisted for the next launch and the caches
    /// are refreshed. On rejection the session returns to `Anonymous` and
    /// the server's message is handed back.
    pub async fn login(&self, email: &str, password: &SecretString) -> ApiResult<Identity> {
        {
            let mut state = self.state.write().await;
            state.phase = SessionPhase::Authenticating;
        }
        let credential = encode_basic_credential(email, password);
        let identity = match self.api.login(&credential).await {
            Ok(identity) => identity,
            Err(error) => {
                {
                    let mut state = self.state.write().await;
                    state.phase = SessionPhase::Anonymous;
                }
                warn!(%error, "login rejected");
                return Err(error);
            }
        };

        let generation = {
            let mut state = self.state.write().await;
            let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            state.phase = SessionPhase::Authenticated(identity.clone());
            state.credential = Some(credential.clone());
            generation
        };
        // The session is live in memory even if persistence fails; the user
        // just has to sign in again next launch.
        if let Err(error) = save_session(&self.store, credential.expose_secret(), &identity).await {
            warn!(%error, "failed to persist session");
        }
        info!(user = %identity, "signed in");
        self.warm_caches(generation).await;
        Ok(identity)
    }

    /// Drop the session: forget the credential and identity, clear every
    /// cached collection, and remove the persisted pair. Safe to call when
    /// already anonymous.
    pub async fn logout(&self) -> ApiResult<()> {
        {
            let mut state = self.state.write().await;
            self.generation.fetch_add(1, Ordering::SeqCst);
            state.phase = SessionPhase::Anonymous;
            state.credential = None;
            state.services.clear();
            state.bookings.clear();
            state.rooms.clear();
            state.staff.clear();
        }
        clear_session(&self.store).await?;
        info!("signed out");
        Ok(())
    }

    /// Register a new account. The session is untouched; callers sign in
    /// separately afterwards.
    pub async fn signup(&self, request: &SignupRequest) -> ApiResult<()> {
        self.api.signup(request).await?;
        info!(email = %request.email, "account created");
        Ok(())
    }

    /// Fetch the profile for the live credential. The payload omits the
    /// admin flag, so the cached login identity is left as-is.
    pub async fn current_user(&self) -> ApiResult<Identity> {
        let credential = self.require_credential().await?;
        self.intercept(self.api.current_user(&credential).await).await
    }

    /// Refetch the public service catalog into the cache. Sends the
    /// credential when one is held.
    pub async fn refresh_services(&self) -> ApiResult<Vec<Service>> {
        let generation = self.generation.load(Ordering::SeqCst);
        let credential = self.credential().await;
        let services = self
            .intercept(self.api.list_services(credential.as_ref(), None).await)
            .await?;
        self.commit(generation, |state| state.services = services.clone()).await;
        Ok(services)
    }

    /// Refetch the caller's bookings into the cache.
    pub async fn refresh_bookings(&self) -> ApiResult<Vec<Booking>> {
        let generation = self.generation.load(Ordering::SeqCst);
        let credential = self.require_credential().await?;
        let bookings = self.intercept(self.api.list_bookings(&credential).await).await?;
        self.commit(generation, |state| state.bookings = bookings.clone()).await;
        Ok(bookings)
    }

    /// Refetch the room inventory into the cache.
    pub async fn refresh_rooms(&self) -> ApiResult<Vec<Room>> {
        let generation = self.generation.load(Ordering::SeqCst);
        let credential = self.require_credential().await?;
        let rooms = self.intercept(self.api.list_rooms(&credential).await).await?;
        self.commit(generation, |state| state.rooms = rooms.clone()).await;
        Ok(rooms)
    }

    /// Refetch the staff roster into the cache.
    pub async fn refresh_staff(&self) -> ApiResult<Vec<StaffMember>> {
        let generation = self.generation.load(Ordering::SeqCst);
        let credential = self.require_credential().await?;
        let staff = self.intercept(self.api.list_staff(&credential).await).await?;
        self.commit(generation, |state| state.staff = staff.clone()).await;
        Ok(staff)
    }

    /// Book a service. The booking list is refetched afterwards so the
    /// cache carries the server's joined fields.
    pub async fn create_booking(&self, booking: &NewBooking) -> ApiResult<i64> {
        let credential = self.require_credential().await?;
        let created = self
            .intercept(self.api.create_booking(&credential, booking).await)
            .await?;
        info!(booking = created.id, "booking created");
        if let Err(error) = self.refresh_bookings().await {
            warn!(%error, "booking list refresh failed");
        }
        Ok(created.id)
    }

    /// Change a booking's status (admin).
    pub async fn update_booking_status(&self, booking_id: i64, status: BookingStatus) -> ApiResult<()> {
        let credential = self.require_credential().await?;
        self.intercept(self.api.update_booking_status(&credential, booking_id, status).await)
            .await?;
        info!(booking = booking_id, status = %status, "booking status updated");
        if let Err(error) = self.refresh_bookings().await {
            warn!(%error, "booking list refresh failed");
        }
        Ok(())
    }

    /// Change a room's status (admin).
    pub async fn update_room_status(&self, room_id: i64, status: RoomStatus) -> ApiResult<()> {
        let credential = self.require_credential().await?;
        self.intercept(self.api.update_room_status(&credential, room_id, status).await)
            .await?;
        info!(room = room_id, status = %status, "room status updated");
        if let Err(error) = self.refresh_rooms().await {
            warn!(%error, "room list refresh failed");
        }
        Ok(())
    }

    /// Add a staff member (admin).
    pub async fn add_staff(&self, member: &NewStaffMember) -> ApiResult<i64> {
        let credential = self.require_credential().await?;
        let created = self.intercept(self.api.add_staff(&credential, member).await).await?;
        info!(staff = created.id, "staff member added");
        if let Err(error) = self.refresh_staff().await {
            warn!(%error, "staff list refresh failed");
        }
        Ok(created.id)
    }

    /// Create a service (admin).
    pub async fn create_service(&self, service: &NewService) -> ApiResult<i64> {
        let credential = self.require_credential().await?;
        let created = self
            .intercept(self.api.create_service(&credential, service).await)
            .await?;
        info!(service = created.id, "service created");
        if let Err(error) = self.refresh_services().await {
            warn!(%error, "service list refresh failed");
        }
        Ok(created.id)
    }

    /// Change a service's status (admin).
    pub async fn update_service_status(&self, service_id: i64, status: ServiceStatus) -> ApiResult<()> {
        let credential = self.require_credential().await?;
        self.intercept(self.api.update_service_status(&credential, service_id, status).await)
            .await?;
        info!(service = service_id, status = %status, "service status updated");
        if let Err(error) = self.refresh_services().await {
            warn!(%error, "service list refresh failed");
        }
        Ok(())
    }

    /// Revenue over the trailing `days` days (admin). Not cached.
    pub async fn revenue_report(&self, days: u32) -> ApiResult<RevenueReport> {
        let credential = self.require_credential().await?;
        self.intercept(self.api.revenue_report(&credential, days).await).await
    }

    /// Current room occupancy (admin). Not cached.
    pub async fn occupancy_report(&self) -> ApiResult<OccupancyReport> {
        let credential = self.require_credential().await?;
        self.intercept(self.api.occupancy_report(&credential).await).await
    }

    /// Service usage over the trailing `days` days (admin). Not cached.
    pub async fn service_usage_report(&self, days: u32) -> ApiResult<ServiceUsageReport> {
        let credential = self.require_credential().await?;
        self.intercept(self.api.service_usage_report(&credential, days).await).await
    }

    pub async fn phase(&self) -> SessionPhase {
        self.state.read().await.phase.clone()
    }

    pub async fn identity(&self) -> Option<Identity> {
        self.state.read().await.phase.identity().cloned()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.phase.is_authenticated()
    }

    pub async fn services(&self) -> Vec<Service> {
        self.state.read().await.services.clone()
    }

    pub async fn bookings(&self) -> Vec<Booking> {
        self.state.read().await.bookings.clone()
    }

    pub async fn rooms(&self) -> Vec<Room> {
        self.state.read().await.rooms.clone()
    }

    pub async fn staff(&self) -> Vec<StaffMember> {
        self.state.read().await.staff.clone()
    }

    async fn credential(&self) -> Option<SecretString> {
        self.state.read().await.credential.clone()
    }

    async fn require_credential(&self) -> ApiResult<SecretString> {
        self.credential()
            .await
            .ok_or_else(|| ApiError::auth("not authenticated"))
    }

    /// Populate every cache for a freshly live session. Failures are
    /// logged rather than surfaced; the session itself stays valid unless
    /// an authentication failure evicts it mid-refresh.
    async fn warm_caches(&self, generation: u64) {
        if let Err(error) = self.refresh_protected(generation).await {
            warn!(%error, "data refresh incomplete");
        }
        if let Err(error) = self.refresh_services().await {
            warn!(%error, "failed to load services");
        }
    }

    /// Fetch the protected collections in parallel and commit whatever
    /// succeeded. An authentication failure on any of them evicts the
    /// session and commits nothing.
    async fn refresh_protected(&self, generation: u64) -> ApiResult<()> {
        let Some(credential) = self.credential().await else {
            return Ok(());
        };
        let (bookings, rooms, staff) = tokio::join!(
            self.api.list_bookings(&credential),
            self.api.list_rooms(&credential),
            self.api.list_staff(&credential),
        );

        let mut first_error = None;
        let bookings = stash(bookings, &mut first_error);
        let rooms = stash(rooms, &mut first_error);
        let staff = stash(staff, &mut first_error);

        match first_error {
            Some(error) if error.is_auth() => Err(self.react(error).await),
            leftover => {
                self.commit(generation, |state| {
                    if let Some(list) = bookings {
                        state.bookings = list;
                    }
                    if let Some(list) = rooms {
                        state.rooms = list;
                    }
                    if let Some(list) = staff {
                        state.staff = list;
                    }
                })
                .await;
                match leftover {
                    Some(error) => Err(error),
                    None => Ok(()),
                }
            }
        }
    }

    /// Apply a cache mutation only if the session generation is unchanged
    /// since `generation` was sampled. Returns whether the mutation landed.
    async fn commit(&self, generation: u64, apply: impl FnOnce(&mut SessionState)) -> bool {
        let mut state = self.state.write().await;
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!("dropping completion from a superseded session");
            return false;
        }
        apply(&mut state);
        true
    }

    /// Session bookkeeping for a failed call: when the server stops
    /// honoring the credential, the session is evicted before the error is
    /// handed back.
    async fn react(&self, error: ApiError) -> ApiError {
        if error.is_auth() {
            warn!(%error, "credential rejected, clearing session");
            if let Err(store_error) = self.logout().await {
                warn!(%store_error, "failed to clear rejected session");
            }
        }
        error
    }

    async fn intercept<T>(&self, result: ApiResult<T>) -> ApiResult<T> {
        match result {
            Ok(value) => Ok(value),
            Err(error) => Err(self.react(error).await),
        }
    }
}

/// Keep the success and record the most relevant failure: authentication
/// failures outrank everything else, otherwise the first error stands.
fn stash<T>(result: ApiResult<T>, slot: &mut Option<ApiError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(error) => {
            let outranks = match slot {
                None => true,
                Some(held) => error.is_auth() && !held.is_auth(),
            };
            if outranks {
                *slot = Some(error);
            }
            None
        }
    }
}
