//! Domain store
//!
//! [`AppState`] composes one state value per resource slice. Every change
//! goes through [`Store::dispatch`], which routes an [`Action`] to exactly
//! one slice reducer and publishes the new snapshot to subscribers.
//!
//! Slice operations (for example [`Store::itineraries`]) follow one
//! lifecycle: a pending action is reduced before the request is sent, and
//! the outcome is reduced as exactly one fulfilled or rejected action.
//! Local records change only from server responses.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tripkit_core::{ApiClient, Config, MemoryCredentialStore, PageQuery, Store};
//!
//! # async fn example() -> tripkit_core::Result<()> {
//! let config = Config::load(None)?;
//! let api = ApiClient::from_config(&config, Arc::new(MemoryCredentialStore::new()))?;
//! let store = Store::new(Arc::new(api));
//!
//! store.itineraries().fetch_all(PageQuery::default()).await?;
//! let titles = store.select(|state| {
//!     state.itineraries.list.items.iter().map(|i| i.title.clone()).collect::<Vec<_>>()
//! });
//! # Ok(())
//! # }
//! ```

pub mod alerts;
pub mod auth;
pub mod bookings;
pub mod catalog;
pub mod collection;
pub mod itineraries;
pub mod notifications;
pub mod payments;
pub mod profile;
pub mod reviews;
mod thunk;

use std::sync::Arc;

use tokio::sync::watch;

use crate::http::ApiClient;
use crate::types::{Alert, Booking, Guide, Location, Payment, Vehicle};

pub use auth::{AuthAction, AuthState};
pub use collection::{Collection, CollectionAction, Status};
pub use itineraries::{ItinerariesAction, ItinerariesState};
pub use notifications::{NotificationsAction, NotificationsState};
pub use profile::{ProfileAction, ProfileState};
pub use reviews::{ReviewsAction, ReviewsState};

/// Snapshot of every slice
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub auth: AuthState,
    pub itineraries: ItinerariesState,
    pub reviews: ReviewsState,
    pub alerts: Collection<Alert>,
    pub notifications: NotificationsState,
    pub bookings: Collection<Booking>,
    pub guides: Collection<Guide>,
    pub vehicles: Collection<Vehicle>,
    pub locations: Collection<Location>,
    pub payments: Collection<Payment>,
    pub profile: ProfileState,
}

/// Root action; each variant targets one slice
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Auth(AuthAction),
    Itineraries(ItinerariesAction),
    Reviews(ReviewsAction),
    Alerts(CollectionAction<Alert>),
    Notifications(NotificationsAction),
    Bookings(CollectionAction<Booking>),
    Guides(CollectionAction<Guide>),
    Vehicles(CollectionAction<Vehicle>),
    Locations(CollectionAction<Location>),
    Payments(CollectionAction<Payment>),
    Profile(ProfileAction),
    /// Back to the initial state, used on logout
    Reset,
}

/// Pure root reducer
pub fn reduce(state: &mut AppState, action: Action) {
    match action {
        Action::Auth(action) => auth::reduce(&mut state.auth, action),
        Action::Itineraries(action) => itineraries::reduce(&mut state.itineraries, action),
        Action::Reviews(action) => reviews::reduce(&mut state.reviews, action),
        Action::Alerts(action) => state.alerts.apply(action),
        Action::Notifications(action) => notifications::reduce(&mut state.notifications, action),
        Action::Bookings(action) => state.bookings.apply(action),
        Action::Guides(action) => state.guides.apply(action),
        Action::Vehicles(action) => state.vehicles.apply(action),
        Action::Locations(action) => state.locations.apply(action),
        Action::Payments(action) => state.payments.apply(action),
        Action::Profile(action) => profile::reduce(&mut state.profile, action),
        Action::Reset => *state = AppState::default(),
    }
}

/// Observable state container bound to one API client
#[derive(Clone)]
pub struct Store {
    state: Arc<watch::Sender<AppState>>,
    api: Arc<ApiClient>,
}

impl Store {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self::with_state(api, AppState::default())
    }

    pub fn with_state(api: Arc<ApiClient>, state: AppState) -> Self {
        let (sender, _) = watch::channel(state);
        Self {
            state: Arc::new(sender),
            api,
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Reduce `action` synchronously and notify subscribers
    pub fn dispatch(&self, action: Action) {
        tracing::trace!(action = ?action, "Dispatch");
        self.state.send_modify(|state| reduce(state, action));
    }

    /// Clone of the current snapshot
    pub fn state(&self) -> AppState {
        self.state.borrow().clone()
    }

    /// Read part of the current snapshot without cloning all of it
    pub fn select<R>(&self, selector: impl FnOnce(&AppState) -> R) -> R {
        selector(&self.state.borrow())
    }

    /// Receiver that observes every published snapshot
    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.state.subscribe()
    }

    pub fn auth(&self) -> auth::AuthOps<'_> {
        auth::AuthOps::new(self)
    }

    pub fn itineraries(&self) -> itineraries::ItineraryOps<'_> {
        itineraries::ItineraryOps::new(self)
    }

    pub fn reviews(&self) -> reviews::ReviewOps<'_> {
        reviews::ReviewOps::new(self)
    }

    pub fn alerts(&self) -> alerts::AlertOps<'_> {
        alerts::AlertOps::new(self)
    }

    pub fn notifications(&self) -> notifications::NotificationOps<'_> {
        notifications::NotificationOps::new(self)
    }

    pub fn bookings(&self) -> bookings::BookingOps<'_> {
        bookings::BookingOps::new(self)
    }

    pub fn guides(&self) -> catalog::GuideOps<'_> {
        catalog::GuideOps::guides(self)
    }

    pub fn vehicles(&self) -> catalog::VehicleOps<'_> {
        catalog::VehicleOps::vehicles(self)
    }

    pub fn locations(&self) -> catalog::LocationOps<'_> {
        catalog::LocationOps::locations(self)
    }

    pub fn payments(&self) -> payments::PaymentOps<'_> {
        payments::PaymentOps::new(self)
    }

    pub fn profile(&self) -> profile::ProfileOps<'_> {
        profile::ProfileOps::new(self)
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("api", &self.api)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::http::testing::FakeTransport;
    use crate::http::{MemoryCredentialStore, TimeoutConfig};

    pub const BASE: &str = "https://api.test/api";

    /// Store over a scripted transport with a signed-in session
    pub fn store(transport: Arc<FakeTransport>) -> Store {
        let credentials = Arc::new(MemoryCredentialStore::with_tokens(Some("token"), Some("refresh")));
        let api = ApiClient::with_timeouts(BASE, transport, credentials, TimeoutConfig::fast());
        Store::new(Arc::new(api))
    }
}
