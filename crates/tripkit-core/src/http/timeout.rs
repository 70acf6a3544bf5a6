//! Timeout configuration for pipeline requests
//!
//! Regular requests use `request_timeout`; requests carrying a multipart body
//! use the longer `upload_timeout`. A timeout counts as a network failure.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::http::request::RequestBody;

/// Timeout configuration for the client pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeoutConfig {
    /// Time to establish a connection
    pub connect_timeout: Duration,
    /// Total time for a regular request
    pub request_timeout: Duration,
    /// Total time for a file upload
    pub upload_timeout: Duration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(60),
            upload_timeout: Duration::from_secs(120),
        }
    }
}

impl TimeoutConfig {
    pub fn new(connect_timeout: Duration, request_timeout: Duration, upload_timeout: Duration) -> Self {
        Self {
            connect_timeout,
            request_timeout,
            upload_timeout,
        }
    }

    /// Short timeouts for tests and local development
    pub fn fast() -> Self {
        Self {
            connect_timeout: Duration::from_secs(2),
            request_timeout: Duration::from_secs(5),
            upload_timeout: Duration::from_secs(10),
        }
    }

    /// Default timeout for a body of the given kind
    pub fn for_body(&self, body: &RequestBody) -> Duration {
        if body.is_multipart() {
            self.upload_timeout
        } else {
            self.request_timeout
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.connect_timeout.is_zero() {
            return Err("Connect timeout cannot be zero".to_string());
        }

        if self.request_timeout.is_zero() {
            return Err("Request timeout cannot be zero".to_string());
        }

        if self.request_timeout < self.connect_timeout {
            return Err("Request timeout should be >= connect timeout".to_string());
        }

        if self.upload_timeout < self.request_timeout {
            return Err("Upload timeout should be >= request timeout".to_string());
        }

        Ok(())
    }
}

/// Bound a future by `duration`
pub async fn with_timeout<F, T>(future: F, duration: Duration) -> Result<T, tokio::time::error::Elapsed>
where
    F: Future<Output = T>,
{
    tokio::time::timeout(duration, future).await
}
