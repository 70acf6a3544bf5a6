//! Error types and handling for the CLI

use std::io;
use tripkit_core::ErrorKind;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for CLI operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error (terminal output, etc.)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Error from tripkit-core
    #[error(transparent)]
    Core(#[from] tripkit_core::Error),

    /// Command needs a stored session
    #[error("Not signed in. Run 'tripkit login' first.")]
    NotSignedIn,

    /// Invalid argument combination
    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Generic error with context
    #[error("{message}")]
    Other { message: String },
}

impl From<tripkit_core::ApiError> for Error {
    fn from(error: tripkit_core::ApiError) -> Self {
        Self::Core(error.into())
    }
}

impl Error {
    /// Create an invalid arguments error
    pub fn invalid_args(message: impl Into<String>) -> Self {
        Self::InvalidArgs(message.into())
    }

    /// Create a generic error with message
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Io(_) => 1,
            Self::Core(core) => match core.as_api().map(|api| api.kind()) {
                Some(ErrorKind::Network) => 10,
                Some(ErrorKind::SessionExpired) | Some(ErrorKind::AuthenticationFailed) => 11,
                Some(ErrorKind::Server) => 12,
                None => match core {
                    tripkit_core::Error::Configuration { .. } => 5,
                    _ => 2,
                },
            },
            Self::NotSignedIn => 11,
            Self::InvalidArgs(_) => 6,
            Self::Json(_) => 13,
            Self::Yaml(_) => 14,
            Self::Other { .. } => 99,
        }
    }

    /// Check if this error should display usage help
    pub fn should_show_help(&self) -> bool {
        matches!(self, Self::InvalidArgs(_))
    }
}

/// Format an error for display to the user
pub fn format_error(error: &Error, use_color: bool) -> String {
    if use_color {
        use colored::Colorize;
        format!("{} {}", "Error:".red().bold(), error)
    } else {
        format!("Error: {}", error)
    }
}
