//! HTTP client pipeline for the Tripkit API
//!
//! This module provides:
//! - Replayable request descriptors with JSON and multipart bodies
//! - Bearer token injection from an injected credential store
//! - Failure classification into four error kinds
//! - Single-flight token refresh with one retry per request
//! - Timeouts, with a longer budget for uploads
//! - Retry with exponential backoff for services that opt in

pub mod client;
pub mod credentials;
pub mod error;
pub mod refresh;
pub mod request;
pub mod retry;
pub mod timeout;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use client::ApiClient;
pub use credentials::{
    CredentialStore, FileCredentialStore, MemoryCredentialStore, StorageError, ACCESS_TOKEN_KEY,
    REFRESH_TOKEN_KEY,
};
pub use error::{ApiError, ErrorKind};
pub use refresh::{TokenPair, TokenRefresher};
pub use request::{FormField, MultipartForm, PreparedRequest, RequestBody, RequestDescriptor};
pub use retry::{execute_with_retry, RetryDecision, RetryPolicy};
pub use timeout::TimeoutConfig;
pub use transport::{ApiResponse, ReqwestTransport, Transport, TransportError};

pub use reqwest::Method;
