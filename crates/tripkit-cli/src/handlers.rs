//! Command handlers for CLI subcommands
//!
//! Every handler runs against a [`Session`]: one API client backed by the
//! credentials file, and a store over that client.

mod activity;
mod auth;
mod config;
mod itineraries;
mod weather;

pub use activity::{handle_alerts, handle_bookings, handle_notifications, handle_reviews};
pub use auth::{handle_login, handle_logout, handle_register, handle_whoami};
pub use config::handle_config;
pub use itineraries::handle_itineraries;
pub use weather::handle_weather;

use crate::error::{Error, Result};
use crate::output::OutputWriter;
use std::future::Future;
use std::sync::Arc;
use tripkit_core::{ApiClient, Config, CredentialStore, FileCredentialStore, Store};

/// Client and store for one invocation
pub struct Session {
    pub api: Arc<ApiClient>,
    pub store: Store,
}

impl Session {
    /// Open a session over the configured credentials file
    pub fn open(config: &Config) -> Result<Self> {
        let path = config.credentials_file()?;
        tracing::debug!(path = %path.display(), "Using credentials file");
        Self::with_credentials(config, Arc::new(FileCredentialStore::new(path)))
    }

    pub fn with_credentials(config: &Config, credentials: Arc<dyn CredentialStore>) -> Result<Self> {
        let api = Arc::new(ApiClient::from_config(config, credentials)?);
        Ok(Self {
            store: Store::new(api.clone()),
            api,
        })
    }

    /// Fail early when no token is stored
    pub fn require_sign_in(&self) -> Result<()> {
        if self.api.has_session() {
            Ok(())
        } else {
            Err(Error::NotSignedIn)
        }
    }
}

/// Await `operation` behind a spinner when attached to a terminal
pub async fn with_spinner<F: Future>(output: &OutputWriter, message: &str, operation: F) -> F::Output {
    let spinner = output.spinner(message);
    let result = operation.await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    result
}
