//! Sirr client error types using thiserror 2.0.
//!
//! Every non-2xx response is turned into [`SirrError::Api`] by
//! [`crate::transport::handle_response`]. Transport failures are passed
//! through unchanged as [`SirrError::Http`].

use thiserror::Error;

/// Sirr client errors.
#[derive(Error, Debug)]
pub enum SirrError {
    /// The vault answered with a non-2xx status
    #[error("Sirr API error {status}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Message taken from the `error` field of the body, or the raw body
        message: String,
    },

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A successful response body did not have the expected shape
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A secret cannot be stored in the process environment
    #[error("Cannot set environment variable {key:?}: {reason}")]
    InvalidEnv {
        /// Secret key that was rejected
        key: String,
        /// Why the OS cannot hold it
        reason: &'static str,
    },
}

/// Result type for Sirr operations.
pub type SirrResult<T> = Result<T, SirrError>;

impl SirrError {
    /// Create an API error from a status code and message.
    #[must_use]
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// HTTP status carried by the error, if the vault produced one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            Self::Decode(_) | Self::InvalidConfig(_) | Self::InvalidEnv { .. } => None,
        }
    }

    /// Check if error is retryable.
    ///
    /// Classification only; the client never retries on its own.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Api { status, .. } => *status == 429 || *status >= 500,
            Self::Http(_) => true,
            Self::Decode(_) | Self::InvalidConfig(_) | Self::InvalidEnv { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SirrError::api(500, "boom");
        assert_eq!(err.to_string(), "Sirr API error 500: boom");
    }

    #[test]
    fn test_status() {
        assert_eq!(SirrError::api(403, "forbidden").status(), Some(403));
        assert_eq!(SirrError::invalid_config("bad token").status(), None);
    }

    #[test]
    fn test_retryable_errors() {
        assert!(SirrError::api(503, "unavailable").is_retryable());
        assert!(SirrError::api(429, "slow down").is_retryable());
        assert!(!SirrError::api(404, "not found").is_retryable());
        assert!(!SirrError::api(410, "sealed").is_retryable());
        assert!(!SirrError::invalid_config("x").is_retryable());
    }

    #[test]
    fn test_invalid_env_display() {
        let err = SirrError::InvalidEnv {
            key: "a=b".to_string(),
            reason: "name contains '='",
        };
        assert_eq!(
            err.to_string(),
            "Cannot set environment variable \"a=b\": name contains '='"
        );
        assert_eq!(err.status(), None);
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_from_serde_error() {
        let serde_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: SirrError = serde_err.into();
        assert!(matches!(err, SirrError::Decode(_)));
    }
}
