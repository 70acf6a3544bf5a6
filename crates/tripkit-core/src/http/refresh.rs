//! Access token refresh
//!
//! Exchanges the stored refresh token for a new token pair. The exchange goes
//! straight to the transport so the expired access token is never attached.
//! Refreshes are single-flight: callers queue on one lock, and a caller that
//! finds the access token already replaced reuses it.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::http::credentials::{CredentialStore, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
use crate::http::error::ApiError;
use crate::http::request::{join_url, PreparedRequest, RequestBody, ACCEPT, CONTENT_TYPE, JSON_CONTENT_TYPE};
use crate::http::transport::Transport;

#[derive(Serialize)]
struct RefreshRequest<'a> {
    #[serde(rename = "refreshToken")]
    refresh_token: &'a str,
}

/// Token pair returned by the refresh endpoint
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TokenPair {
    pub token: String,
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
}

pub struct TokenRefresher {
    transport: Arc<dyn Transport>,
    credentials: Arc<dyn CredentialStore>,
    base_url: String,
    path: String,
    timeout: Duration,
    lock: Mutex<()>,
}

impl TokenRefresher {
    pub fn new(
        transport: Arc<dyn Transport>,
        credentials: Arc<dyn CredentialStore>,
        base_url: impl Into<String>,
        path: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            transport,
            credentials,
            base_url: base_url.into(),
            path: path.into(),
            timeout,
            lock: Mutex::new(()),
        }
    }

    /// Obtain a usable access token after `rejected` was answered with 401.
    ///
    /// Returns the fresh access token, or `SessionExpired` when no refresh
    /// token is stored, or `AuthenticationFailed` when the exchange fails.
    /// Both failures purge the credentials they describe.
    pub async fn refresh(&self, rejected: Option<&str>) -> Result<String, ApiError> {
        let _flight = self.lock.lock().await;

        if let Some(current) = self.read(ACCESS_TOKEN_KEY) {
            if Some(current.as_str()) != rejected {
                tracing::debug!("Access token already refreshed by a concurrent request");
                return Ok(current);
            }
        }

        let Some(refresh_token) = self.read(REFRESH_TOKEN_KEY) else {
            tracing::info!("No refresh token stored, session expired");
            self.purge(&[ACCESS_TOKEN_KEY]);
            return Err(ApiError::session_expired());
        };

        tracing::info!("Refreshing access token");

        let pair = match self.exchange(&refresh_token).await {
            Ok(pair) => pair,
            Err(reason) => {
                tracing::warn!(reason = %reason, "Token refresh failed");
                self.purge(&[ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY]);
                return Err(ApiError::authentication_failed());
            }
        };

        if let Err(e) = self
            .credentials
            .set(ACCESS_TOKEN_KEY, &pair.token)
            .and_then(|_| self.credentials.set(REFRESH_TOKEN_KEY, &pair.refresh_token))
        {
            tracing::warn!(error = %e, "Failed to persist refreshed tokens");
            self.purge(&[ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY]);
            return Err(ApiError::authentication_failed());
        }

        tracing::info!("Access token refreshed");
        Ok(pair.token)
    }

    async fn exchange(&self, refresh_token: &str) -> Result<TokenPair, String> {
        let url = join_url(&self.base_url, &self.path, &[]).map_err(|e| e.to_string())?;
        let body = serde_json::to_value(RefreshRequest { refresh_token }).map_err(|e| e.to_string())?;

        let mut request = PreparedRequest {
            method: reqwest::Method::POST,
            url,
            headers: Default::default(),
            body: RequestBody::Json(body),
            timeout: self.timeout,
        };
        request
            .headers
            .insert(CONTENT_TYPE.to_string(), JSON_CONTENT_TYPE.to_string());
        request
            .headers
            .insert(ACCEPT.to_string(), JSON_CONTENT_TYPE.to_string());

        let response = match tokio::time::timeout(self.timeout, self.transport.send(request)).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => return Err(e.to_string()),
            Err(_) => return Err(format!("refresh timed out after {:?}", self.timeout)),
        };

        if !response.is_success() {
            return Err(format!("refresh endpoint answered {}", response.status));
        }

        response
            .json::<TokenPair>()
            .map_err(|e| format!("invalid refresh response: {}", e))
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.credentials.get(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "Failed to read credential");
                None
            }
        }
    }

    fn purge(&self, keys: &[&str]) {
        for key in keys {
            if let Err(e) = self.credentials.remove(key) {
                tracing::warn!(key, error = %e, "Failed to remove credential");
            }
        }
    }
}

impl std::fmt::Debug for TokenRefresher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenRefresher")
            .field("base_url", &self.base_url)
            .field("path", &self.path)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
