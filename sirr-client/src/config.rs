//! Sirr client configuration.

use crate::error::{SirrError, SirrResult};
use secrecy::SecretString;
use std::time::Duration;

/// Environment variable holding the vault base URL.
pub const SERVER_ENV: &str = "SIRR_SERVER";
/// Environment variable holding the bearer token.
pub const TOKEN_ENV: &str = "SIRR_TOKEN";
/// Base URL used when `SIRR_SERVER` is unset.
pub const DEFAULT_SERVER: &str = "http://localhost:8080";

/// Sirr client configuration.
#[derive(Debug, Clone)]
pub struct SirrConfig {
    /// Vault base URL; trailing slashes are stripped by the client
    pub server: String,
    /// Bearer token presented on every request
    pub token: SecretString,
    /// Request timeout (`None` keeps the HTTP stack default)
    pub timeout: Option<Duration>,
    /// Connection timeout (`None` keeps the HTTP stack default)
    pub connect_timeout: Option<Duration>,
    /// User agent string
    pub user_agent: String,
    /// Upper bound on concurrent gets in the async `pull_all` (`None` is unbounded)
    pub max_concurrency: Option<usize>,
}

impl SirrConfig {
    /// Create a new configuration.
    #[must_use]
    pub fn new(server: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            token: SecretString::from(token.into()),
            timeout: None,
            connect_timeout: None,
            user_agent: concat!("sirr-client/", env!("CARGO_PKG_VERSION")).to_string(),
            max_concurrency: None,
        }
    }

    /// Build a configuration from `SIRR_SERVER` and `SIRR_TOKEN`.
    ///
    /// # Errors
    ///
    /// Returns [`SirrError::InvalidConfig`] when `SIRR_TOKEN` is unset.
    pub fn from_env() -> SirrResult<Self> {
        let server = std::env::var(SERVER_ENV).unwrap_or_else(|_| DEFAULT_SERVER.to_string());
        let token = std::env::var(TOKEN_ENV)
            .map_err(|_| SirrError::invalid_config(format!("{TOKEN_ENV} is required")))?;
        Ok(Self::new(server, token))
    }

    /// Set request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set connection timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Cap concurrent gets issued by the async `pull_all` (clamped to at least 1).
    #[must_use]
    pub fn with_max_concurrency(mut self, limit: usize) -> Self {
        self.max_concurrency = Some(limit.max(1));
        self
    }
}
