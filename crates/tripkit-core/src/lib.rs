//! Tripkit Core - client library for the Tripkit travel-planning backend
//!
//! This crate provides the client side of the Tripkit API: an
//! authenticating HTTP pipeline that transparently refreshes expired
//! sessions, typed API functions per resource, and a domain store that
//! mirrors server collections with a uniform async lifecycle.
//!
//! # Main Components
//!
//! - **HTTP Pipeline** ([`http`]): bearer injection, failure classification,
//!   single-flight token refresh with one retry per request
//! - **Resource API** ([`api`]): endpoint catalogue per environment and
//!   typed functions for itineraries, reviews, alerts, bookings and more
//! - **Domain Store** ([`store`]): composed slice state with typed actions,
//!   pure reducers and observable snapshots
//! - **Configuration** ([`config`]): environment selection, timeouts, retry
//!   policy and credential location
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tripkit_core::{api, ApiClient, Config, FileCredentialStore, LoginRequest};
//!
//! # async fn example() -> tripkit_core::Result<()> {
//! let config = Config::load(None)?;
//! let credentials = Arc::new(FileCredentialStore::new(config.credentials_file()?));
//! let client = ApiClient::from_config(&config, credentials)?;
//!
//! api::auth::login(
//!     &client,
//!     &LoginRequest {
//!         email: "traveller@example.com".to_string(),
//!         password: "secret".to_string(),
//!     },
//! )
//! .await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod http;
pub mod store;
pub mod types;

// Re-export main types for convenience
pub use api::{Environment, FileUpload, Forecast, WeatherService};
pub use config::Config;
pub use error::{Error, Result};
pub use http::{
    ApiClient, ApiError, CredentialStore, ErrorKind, FileCredentialStore, MemoryCredentialStore,
    RetryPolicy, TimeoutConfig,
};
pub use store::{Action, AppState, Store};
pub use types::{
    // Records
    Alert, AlertSeverity, Booking, BookingStatus, Guide, Itinerary, ItineraryItem, Location,
    Notification, Payment, Profile, Record, Review, User, Vehicle,

    // Lists
    ListResponse, Page, PageQuery, Pagination,

    // Payloads
    AuthSession, BookingDraft, ItineraryDraft, ItineraryItemDraft, LoginRequest, PaymentDraft,
    ProfileDraft, RegisterRequest, ReviewDraft,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_api_error_converts_into_crate_error() {
        let err: Error = ApiError::session_expired().into();
        assert_eq!(err.to_string(), "Session expired. Please login again.");
    }
}
