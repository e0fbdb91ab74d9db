//! HTTP client construction.
//!
//! Both builders apply the same settings from [`SirrConfig`]: rustls TLS,
//! the fixed header set from [`build_headers`], the user agent and the
//! optional timeouts. Connection pooling stays with reqwest.

use crate::config::SirrConfig;
use crate::error::SirrResult;
use crate::transport::build_headers;
use secrecy::ExposeSecret;

/// Build the async reqwest client for a configuration.
///
/// # Errors
///
/// Returns an error if the token is not a valid header value or the client
/// cannot be built (e.g., TLS initialization fails).
pub fn build_http_client(config: &SirrConfig) -> SirrResult<reqwest::Client> {
    let mut builder = reqwest::Client::builder()
        .default_headers(build_headers(config.token.expose_secret())?)
        .user_agent(&config.user_agent)
        .use_rustls_tls();
    if let Some(timeout) = config.timeout {
        builder = builder.timeout(timeout);
    }
    if let Some(timeout) = config.connect_timeout {
        builder = builder.connect_timeout(timeout);
    }
    Ok(builder.build()?)
}

/// Build the blocking reqwest client for a configuration.
///
/// Must not be called from within an async runtime.
///
/// # Errors
///
/// Returns an error if the token is not a valid header value or the client
/// cannot be built.
#[cfg(feature = "blocking")]
pub fn build_blocking_http_client(config: &SirrConfig) -> SirrResult<reqwest::blocking::Client> {
    let mut builder = reqwest::blocking::Client::builder()
        .default_headers(build_headers(config.token.expose_secret())?)
        .user_agent(&config.user_agent)
        .use_rustls_tls();
    if let Some(timeout) = config.timeout {
        builder = builder.timeout(timeout);
    }
    if let Some(timeout) = config.connect_timeout {
        builder = builder.connect_timeout(timeout);
    }
    Ok(builder.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SirrError;
    use std::time::Duration;

    #[test]
    fn test_build_client() {
        let config = SirrConfig::new("https://v.test", "t").with_timeout(Duration::from_secs(5));
        assert!(build_http_client(&config).is_ok());
    }

    #[test]
    fn test_build_client_rejects_bad_token() {
        let config = SirrConfig::new("https://v.test", "bad\r\ntoken");
        let err = build_http_client(&config).unwrap_err();
        assert!(matches!(err, SirrError::InvalidConfig(_)));
    }
}
