//! Backend environments and endpoint paths

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Deployment the client talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Staging,
    Production,
}

impl Environment {
    pub fn base_url(&self) -> &'static str {
        match self {
            Environment::Development => "http://localhost:5000/api",
            Environment::Staging => "https://staging-api.tripkit.app/api",
            Environment::Production => "https://api.tripkit.app/api",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" | "local" => Ok(Environment::Development),
            "staging" | "stage" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(Error::configuration(format!("Unknown environment: {}", other))),
        }
    }
}

/// Path templates, relative to the environment base URL
pub mod paths {
    pub const REFRESH_TOKEN: &str = "/auth/refresh-token";
    pub const LOGIN: &str = "/auth/login";
    pub const REGISTER: &str = "/auth/register";
    pub const LOGOUT: &str = "/auth/logout";
    pub const ME: &str = "/auth/me";

    pub const ITINERARIES: &str = "/itineraries";
    pub const REVIEWS: &str = "/reviews";
    pub const ALERTS: &str = "/alerts";
    pub const NOTIFICATIONS: &str = "/notifications";
    pub const NOTIFICATIONS_READ_ALL: &str = "/notifications/read-all";
    pub const BOOKINGS: &str = "/bookings";
    pub const GUIDES: &str = "/guides";
    pub const VEHICLES: &str = "/vehicles";
    pub const LOCATIONS: &str = "/locations";
    pub const PAYMENTS: &str = "/payments";
    pub const PROFILE: &str = "/profile";
    pub const PROFILE_AVATAR: &str = "/profile/avatar";
    pub const WEATHER: &str = "/weather";

    /// `<collection>/<id>`
    pub fn record(collection: &str, id: &str) -> String {
        format!("{}/{}", collection, id)
    }

    pub fn itinerary_items(itinerary_id: &str) -> String {
        format!("{}/{}/items", ITINERARIES, itinerary_id)
    }

    pub fn itinerary_item(itinerary_id: &str, item_id: &str) -> String {
        format!("{}/{}/items/{}", ITINERARIES, itinerary_id, item_id)
    }

    pub fn itinerary_cover(itinerary_id: &str) -> String {
        format!("{}/{}/cover", ITINERARIES, itinerary_id)
    }

    pub fn review_helpful(review_id: &str) -> String {
        format!("{}/{}/helpful", REVIEWS, review_id)
    }

    pub fn alert_dismiss(alert_id: &str) -> String {
        format!("{}/{}/dismiss", ALERTS, alert_id)
    }

    pub fn notification_read(notification_id: &str) -> String {
        format!("{}/{}/read", NOTIFICATIONS, notification_id)
    }

    pub fn booking_cancel(booking_id: &str) -> String {
        format!("{}/{}/cancel", BOOKINGS, booking_id)
    }
}
