//! API error types for the Robinhood crypto client.

use thiserror::Error;

/// Error type for every operation of the crypto client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP/network error from reqwest
    #[cfg(feature = "http")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Missing or invalid credentials (401)
    #[error("Unauthorized: {0}")]
    Unauthorized(ErrorResponse),

    /// Permission denied (403)
    #[error("Permission denied: {0}")]
    Forbidden(ErrorResponse),

    /// Resource not found (404)
    #[error("Not found: {0}")]
    NotFound(ErrorResponse),

    /// Invalid request parameters (400)
    #[error("Bad request: {0}")]
    BadRequest(ErrorResponse),

    /// Duplicate submission or state conflict (409)
    #[error("Conflict: {0}")]
    Conflict(ErrorResponse),

    /// Too many requests (429)
    #[error("Rate limited: {0}")]
    RateLimited(ErrorResponse),

    /// Server-side error (5xx)
    #[error("Server error: {0}")]
    ServerError(ErrorResponse),

    /// Unexpected HTTP status code
    #[error("Unexpected status {0}: {1}")]
    UnexpectedStatus(u16, ErrorResponse),

    /// Request payload could not be serialized
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Response body could not be decoded
    #[error("Deserialization error: {0}")]
    Deserialize(String),

    /// Invalid parameter provided
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The service answered but refused the operation
    #[error("Rejected: {0}")]
    Rejected(String),

    /// The order has no client attached to issue follow-up requests with
    #[error("No client attached to order; use `with_client` or `cancel_with`")]
    NoClient,
}

impl ApiError {
    /// HTTP status code behind this error, if it came from a response.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Unauthorized(_) => Some(401),
            Self::Forbidden(_) => Some(403),
            Self::NotFound(_) => Some(404),
            Self::BadRequest(_) => Some(400),
            Self::Conflict(_) => Some(409),
            Self::RateLimited(_) => Some(429),
            Self::ServerError(_) => Some(500),
            Self::UnexpectedStatus(code, _) => Some(*code),
            _ => None,
        }
    }

    /// The parsed error body, for errors built from an HTTP response.
    pub fn error_response(&self) -> Option<&ErrorResponse> {
        match self {
            Self::Unauthorized(r)
            | Self::Forbidden(r)
            | Self::NotFound(r)
            | Self::BadRequest(r)
            | Self::Conflict(r)
            | Self::RateLimited(r)
            | Self::ServerError(r)
            | Self::UnexpectedStatus(_, r) => Some(r),
            _ => None,
        }
    }
}

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Error body returned by the service on non-2xx responses.
///
/// The API answers with `{"detail": "..."}` for most failures and with
/// `{"non_field_errors": [...]}` for payload validation failures.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    #[serde(default, alias = "detail", alias = "error")]
    pub message: Option<String>,
    /// Validation errors not tied to a single field
    #[serde(default)]
    pub non_field_errors: Vec<String>,
}

impl ErrorResponse {
    /// Wrap a raw body that was not a JSON error object.
    pub fn from_text(text: String) -> Self {
        Self {
            message: Some(text),
            non_field_errors: Vec::new(),
        }
    }
}

impl std::fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.message, self.non_field_errors.is_empty()) {
            (Some(msg), true) => write!(f, "{}", msg),
            (Some(msg), false) => write!(f, "{}: {}", msg, self.non_field_errors.join("; ")),
            (None, false) => write!(f, "{}", self.non_field_errors.join("; ")),
            (None, true) => write!(f, "Unknown error"),
        }
    }
}
