//! Error classification
//!
//! Every failure that reaches the refresh controller is folded into an
//! [`ErrorKind`], which decides the message shown in the error panel.

use serde::Serialize;

use crate::fetch::FetchError;
use crate::render::RenderError;

/// Message shown when a request exceeds its time bound
pub const TIMEOUT_MESSAGE: &str = "Request timed out. Please try again.";
/// Message shown when the data document does not exist yet
pub const NOT_FOUND_MESSAGE: &str =
    "Data file not found. The screener may be running for the first time.";
/// Message shown for connectivity failures
pub const NETWORK_MESSAGE: &str = "Network error. Please check your connection and try again.";
/// Message shown when the view reports loss of connectivity
pub const OFFLINE_MESSAGE: &str =
    "You are currently offline. Data will refresh when connection is restored.";
/// Message shown when a document fails shape validation
pub const INVALID_FORMAT_MESSAGE: &str = "Error displaying data. Please refresh the page.";
/// Fallback for failures that carry no message of their own
pub const GENERIC_MESSAGE: &str = "An unexpected error occurred.";

/// User-facing classification of a failed refresh
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum ErrorKind {
    /// The fetch exceeded its time bound
    Timeout,
    /// HTTP 404 or a missing data file
    NotFound,
    /// Connectivity, DNS or refused connection
    Network,
    /// The view reported that it went offline
    Offline,
    /// The document failed shape validation
    InvalidFormat,
    /// Anything else, carrying the underlying message
    Other(String),
}

impl ErrorKind {
    /// Classify a fetch failure
    pub fn from_fetch(error: &FetchError) -> Self {
        match error {
            FetchError::Timeout(_) => ErrorKind::Timeout,
            FetchError::NotFound(_) => ErrorKind::NotFound,
            FetchError::HttpStatus { status: 404, .. } => ErrorKind::NotFound,
            FetchError::Network(_) => ErrorKind::Network,
            FetchError::HttpStatus { .. } | FetchError::Parse(_) => {
                ErrorKind::Other(error.to_string())
            }
        }
    }

    /// Classify a render failure
    pub fn from_render(error: &RenderError) -> Self {
        match error {
            RenderError::InvalidFormat(_) => ErrorKind::InvalidFormat,
        }
    }

    /// The message placed in the error panel
    pub fn user_message(&self) -> String {
        match self {
            ErrorKind::Timeout => TIMEOUT_MESSAGE.to_string(),
            ErrorKind::NotFound => NOT_FOUND_MESSAGE.to_string(),
            ErrorKind::Network => NETWORK_MESSAGE.to_string(),
            ErrorKind::Offline => OFFLINE_MESSAGE.to_string(),
            ErrorKind::InvalidFormat => INVALID_FORMAT_MESSAGE.to_string(),
            ErrorKind::Other(message) if message.trim().is_empty() => GENERIC_MESSAGE.to_string(),
            ErrorKind::Other(message) => message.clone(),
        }
    }
}

impl From<&FetchError> for ErrorKind {
    fn from(error: &FetchError) -> Self {
        ErrorKind::from_fetch(error)
    }
}

impl From<&RenderError> for ErrorKind {
    fn from(error: &RenderError) -> Self {
        ErrorKind::from_render(error)
    }
}
