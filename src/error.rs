//! Error types for the Artificial Agency client

use std::fmt;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Error type reported for every synthesized failure.
pub(crate) const SERVER_ERROR: &str = "server_error";

pub(crate) const TIMEOUT_MESSAGE: &str = "Request timed out.";
pub(crate) const UNPARSEABLE_ERROR_MESSAGE: &str = "The server returned an unexpected response.";
pub(crate) const VALIDATION_MESSAGE: &str = "Server returned data in an unexpected format.";

/// A classified failure reported by (or synthesized for) the API.
///
/// Only the client creates these; callers inspect them through the getters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status_code: u16,
    error_type: String,
    message: String,
}

impl ApiError {
    pub(crate) fn new(
        status_code: u16,
        error_type: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            status_code,
            error_type: error_type.into(),
            message: message.into(),
        }
    }

    /// HTTP status code (500 for synthesized timeout/validation failures).
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// Categorical error type, e.g. `"invalid_request"` or `"server_error"`.
    pub fn error_type(&self) -> &str {
        &self.error_type
    }

    /// Human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} {})",
            self.message, self.status_code, self.error_type
        )
    }
}

/// Main error type for the client
#[derive(Error, Debug)]
pub enum Error {
    /// Non-200 response from the API
    #[error("API error: {0}")]
    Api(ApiError),

    /// The transport exceeded the configured timeout
    #[error("Request timeout: {0}")]
    Timeout(ApiError),

    /// A 200 response whose body did not match the expected shape
    #[error("Response validation failed: {0}")]
    ResponseValidation(ApiError),

    /// Invalid client configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Transport failure other than a timeout (DNS, connection refused, TLS, ...)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A request body could not be serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a new config error
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    pub(crate) fn api(status_code: u16, error_type: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Api(ApiError::new(status_code, error_type, message))
    }

    pub(crate) fn timeout() -> Self {
        Error::Timeout(ApiError::new(500, SERVER_ERROR, TIMEOUT_MESSAGE))
    }

    pub(crate) fn response_validation() -> Self {
        Error::ResponseValidation(ApiError::new(500, SERVER_ERROR, VALIDATION_MESSAGE))
    }

    /// The API error record, for the three API-classified kinds.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Error::Api(e) | Error::Timeout(e) | Error::ResponseValidation(e) => Some(e),
            _ => None,
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        self.api_error().map(ApiError::status_code)
    }

    pub fn error_type(&self) -> Option<&str> {
        self.api_error().map(ApiError::error_type)
    }

    /// The API-level message; falls back to the display text for other kinds.
    pub fn message(&self) -> String {
        match self.api_error() {
            Some(e) => e.message().to_string(),
            None => self.to_string(),
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout(_))
    }
}
