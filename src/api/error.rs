//! Typed errors for API operations
//!
//! Provides structured error types so callers can distinguish common
//! failure modes (validation, auth, transport) without string matching.

use thiserror::Error;

/// API operation errors with typed variants
///
/// Enables callers to distinguish between different failure modes:
/// - `Validation` - client-side rejection; no network call was made
/// - `Unauthorized` (401/403) - missing/expired token or wrong role
/// - `BadRequest` (400) - malformed request; caller error
/// - `ServiceError` (5xx) - server-side issue
/// - `Network` - connection/timeout
/// - `Other` - catch-all for unhandled errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// Input failed client-side validation; nothing was sent over the wire.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Authentication/authorization failure (HTTP 401/403)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Malformed request (HTTP 400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Server-side error (HTTP 5xx)
    #[error("Service error: {0}")]
    ServiceError(String),

    /// Network connectivity issue (connection refused, timeout, etc.)
    #[error("Network error: {0}")]
    Network(String),

    /// Other errors not fitting the above categories
    ///
    /// Wraps `anyhow::Error` for compatibility with the application boundary.
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// Check if this error indicates an auth problem the user can fix by
    /// logging in again.
    pub fn is_auth(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_))
    }

    /// Check if this error is transient (a later attempt may succeed).
    ///
    /// The client never retries automatically; this only informs the
    /// message shown to the user.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ApiError::ServiceError(_) | ApiError::Network(_))
    }

    /// Check if this error was raised before any network call.
    pub fn is_validation(&self) -> bool {
        matches!(self, ApiError::Validation(_))
    }

    /// Convert HTTP status code and error text into a typed ApiError
    pub fn from_http_status(status: reqwest::StatusCode, error_text: String) -> Self {
        match status.as_u16() {
            401 | 403 => ApiError::Unauthorized(error_text),
            400 => ApiError::BadRequest(error_text),
            500..=599 => ApiError::ServiceError(error_text),
            _ => ApiError::Other(anyhow::anyhow!("HTTP {}: {}", status, error_text)),
        }
    }

    /// Convert network/connection errors into a typed ApiError
    pub fn from_network_error(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ApiError::Network(format!("Request timeout: {}", e))
        } else if e.is_connect() {
            ApiError::Network(format!("Connection failed: {}", e))
        } else if let Some(status) = e.status() {
            Self::from_http_status(status, e.to_string())
        } else {
            ApiError::Other(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_is_auth() {
        let err = ApiError::Unauthorized("token expired".to_string());
        assert!(err.is_auth());
        assert!(!err.is_retryable());
        assert!(!err.is_validation());
    }

    #[test]
    fn test_validation_not_retryable() {
        let err = ApiError::Validation("phone must be 10 digits".to_string());
        assert!(err.is_validation());
        assert!(!err.is_retryable());
        assert!(!err.is_auth());
    }

    #[test]
    fn test_network_is_retryable() {
        let err = ApiError::Network("connection refused".to_string());
        assert!(err.is_retryable());
    }

    #[test]
    fn test_from_http_status() {
        let err = ApiError::from_http_status(
            reqwest::StatusCode::UNAUTHORIZED,
            "Invalid token".to_string(),
        );
        assert!(matches!(err, ApiError::Unauthorized(_)));

        let err =
            ApiError::from_http_status(reqwest::StatusCode::FORBIDDEN, "Wrong role".to_string());
        assert!(matches!(err, ApiError::Unauthorized(_)));

        let err =
            ApiError::from_http_status(reqwest::StatusCode::BAD_REQUEST, "Bad body".to_string());
        assert!(matches!(err, ApiError::BadRequest(_)));

        let err = ApiError::from_http_status(
            reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            "Server error".to_string(),
        );
        assert!(matches!(err, ApiError::ServiceError(_)));
    }

    #[test]
    fn test_error_display() {
        let err = ApiError::Validation("phone must be 10 digits".to_string());
        assert_eq!(err.to_string(), "Validation failed: phone must be 10 digits");

        let err = ApiError::Unauthorized("token expired".to_string());
        assert_eq!(err.to_string(), "Unauthorized: token expired");
    }

    #[test]
    fn test_convert_to_anyhow() {
        let api_err = ApiError::Unauthorized("test".to_string());
        let anyhow_err: anyhow::Error = api_err.into();
        assert!(anyhow_err.to_string().contains("Unauthorized"));
    }
}
