//! Failure classification for the client pipeline
//!
//! Every failure leaving the pipeline is normalized into one [`ApiError`]
//! carrying a single user-facing message. Callers above the pipeline never
//! see raw transport errors.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::http::transport::ApiResponse;

/// Message used for every request that never received a response
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please check your internet connection.";

/// Message used when a 401 arrives and no refresh token is stored
pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired. Please login again.";

/// Message used when the refresh exchange itself fails
pub const AUTHENTICATION_FAILED_MESSAGE: &str = "Authentication failed. Please login again.";

/// Last entry of the server message priority chain
pub const FALLBACK_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Message used when a 2xx body cannot be decoded into the expected type
pub const INVALID_RESPONSE_MESSAGE: &str = "Invalid response from server";

/// The four failure kinds a request can end in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// No response was received
    Network,
    /// 401 with no refresh token available
    SessionExpired,
    /// 401 and the refresh exchange failed
    AuthenticationFailed,
    /// Any other non-2xx response
    Server,
}

/// Normalized pipeline failure
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("{message}")]
    Network { message: String },

    #[error("{message}")]
    SessionExpired { message: String },

    #[error("{message}")]
    AuthenticationFailed { message: String },

    #[error("{message}")]
    Server {
        /// HTTP status when a response was received
        status: Option<u16>,
        message: String,
        /// Parsed response body, if it was JSON
        details: Option<Value>,
    },
}

impl ApiError {
    pub fn network() -> Self {
        Self::Network {
            message: NETWORK_ERROR_MESSAGE.to_string(),
        }
    }

    pub fn session_expired() -> Self {
        Self::SessionExpired {
            message: SESSION_EXPIRED_MESSAGE.to_string(),
        }
    }

    pub fn authentication_failed() -> Self {
        Self::AuthenticationFailed {
            message: AUTHENTICATION_FAILED_MESSAGE.to_string(),
        }
    }

    /// A 2xx response whose body did not match the expected shape
    pub fn invalid_response(status: u16) -> Self {
        Self::Server {
            status: Some(status),
            message: INVALID_RESPONSE_MESSAGE.to_string(),
            details: None,
        }
    }

    /// A request that could not be built locally
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::Server {
            status: None,
            message: message.into(),
            details: None,
        }
    }

    /// Classify a non-2xx response
    pub fn from_response(response: &ApiResponse) -> Self {
        let details = response.json_value();
        let message = extract_message(details.as_ref(), response.status_message().as_deref());

        Self::Server {
            status: Some(response.status),
            message,
            details,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Network { .. } => ErrorKind::Network,
            Self::SessionExpired { .. } => ErrorKind::SessionExpired,
            Self::AuthenticationFailed { .. } => ErrorKind::AuthenticationFailed,
            Self::Server { .. } => ErrorKind::Server,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Network { message }
            | Self::SessionExpired { message }
            | Self::AuthenticationFailed { message }
            | Self::Server { message, .. } => message,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => *status,
            _ => None,
        }
    }

    /// Transient failures: no response at all, or a 5xx
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network { .. } => true,
            Self::Server {
                status: Some(status),
                ..
            } => (500..=599).contains(status),
            _ => false,
        }
    }

    /// Whether the failure means the local session is gone
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            Self::SessionExpired { .. } | Self::AuthenticationFailed { .. }
        )
    }
}

/// Resolve a server error message.
///
/// Priority: structured `error` (a string, or an object with `message`),
/// then a top-level `message`, then the transport status message, then the
/// fallback string.
fn extract_message(details: Option<&Value>, transport_message: Option<&str>) -> String {
    if let Some(json) = details {
        match json.get("error") {
            Some(Value::String(message)) if !message.is_empty() => return message.clone(),
            Some(Value::Object(error)) => {
                if let Some(message) = error.get("message").and_then(Value::as_str) {
                    if !message.is_empty() {
                        return message.to_string();
                    }
                }
            }
            _ => {}
        }

        if let Some(message) = json.get("message").and_then(Value::as_str) {
            if !message.is_empty() {
                return message.to_string();
            }
        }
    }

    match transport_message {
        Some(message) if !message.is_empty() => message.to_string(),
        _ => FALLBACK_ERROR_MESSAGE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(status: u16, body: &str) -> ApiResponse {
        ApiResponse::new(status, body.as_bytes().to_vec())
    }

    #[test]
    fn test_structured_error_wins() {
        let body = json!({
            "error": { "message": "Itinerary not found" },
            "message": "Not Found"
        });
        let error = ApiError::from_response(&response(404, &body.to_string()));

        assert_eq!(error.message(), "Itinerary not found");
        assert_eq!(error.status(), Some(404));
        assert_eq!(error.kind(), ErrorKind::Server);
    }

    #[test]
    fn test_error_string_field() {
        let body = json!({ "error": "Title is required" });
        let error = ApiError::from_response(&response(422, &body.to_string()));
        assert_eq!(error.message(), "Title is required");
    }

    #[test]
    fn test_generic_message_second() {
        let body = json!({ "message": "Booking already cancelled" });
        let error = ApiError::from_response(&response(409, &body.to_string()));
        assert_eq!(error.message(), "Booking already cancelled");
    }

    #[test]
    fn test_transport_message_third() {
        let error = ApiError::from_response(&response(500, "<html>oops</html>"));
        assert_eq!(error.message(), "Request failed with status code 500");
        assert!(error.is_transient());
    }

    #[test]
    fn test_fallback_last() {
        assert_eq!(extract_message(None, None), FALLBACK_ERROR_MESSAGE);
        assert_eq!(
            extract_message(Some(&json!({ "error": "" })), Some("")),
            FALLBACK_ERROR_MESSAGE
        );
    }

    #[test]
    fn test_fixed_messages() {
        assert_eq!(ApiError::network().to_string(), NETWORK_ERROR_MESSAGE);
        assert_eq!(ApiError::session_expired().to_string(), SESSION_EXPIRED_MESSAGE);
        assert_eq!(
            ApiError::authentication_failed().to_string(),
            AUTHENTICATION_FAILED_MESSAGE
        );
        assert!(ApiError::session_expired().is_auth_failure());
        assert!(!ApiError::network().is_auth_failure());
    }

    #[test]
    fn test_client_errors_not_transient() {
        let error = ApiError::from_response(&response(400, "{}"));
        assert!(!error.is_transient());
    }
}
