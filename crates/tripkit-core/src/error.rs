//! Error types for the Tripkit core library
//!
//! Request failures are [`ApiError`] values produced by the pipeline. This
//! module wraps them together with setup-time failures (configuration,
//! storage, IO) into one crate-level [`Error`].

use thiserror::Error;

use crate::http::{ApiError, StorageError};

/// Main error type for Tripkit operations
#[derive(Error, Debug)]
pub enum Error {
    /// A request failed in the client pipeline
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Credential storage errors
    #[error("Credential storage error: {0}")]
    Storage(#[from] StorageError),

    /// JSON parsing and serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// YAML parsing errors
    #[error("YAML error: {message}")]
    Yaml {
        message: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// The pipeline error, if this is one
    pub fn as_api(&self) -> Option<&ApiError> {
        match self {
            Error::Api(error) => Some(error),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Yaml {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io {
            message: err.to_string(),
            source: err,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_is_transparent() {
        let err = Error::from(ApiError::network());
        assert_eq!(
            err.to_string(),
            "Network error. Please check your internet connection."
        );
        assert!(err.as_api().is_some());
    }

    #[test]
    fn test_configuration_display() {
        let err = Error::configuration("Unknown environment: moon");
        assert_eq!(err.to_string(), "Configuration error: Unknown environment: moon");
        assert!(err.as_api().is_none());
    }
}
