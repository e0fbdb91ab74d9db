//! Blocking Sirr client.
//!
//! Same operations as [`crate::SirrClient`], executed one request at a time
//! on the calling thread. Must not be used from inside an async runtime.

use crate::{
    api::{self, Endpoint},
    config::SirrConfig,
    env::EnvGuard,
    error::SirrResult,
    http::build_blocking_http_client,
    model::{HealthResponse, PruneResponse, PushRequest, SecretList, SecretMeta, SecretValue},
    transport::{handle_response, parse_server},
};
use reqwest::blocking::Client;
use serde::de::{DeserializeOwned, IgnoredAny};
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Blocking client for the Sirr ephemeral secret vault.
#[derive(Debug)]
pub struct SirrClient {
    base: String,
    http: Client,
}

impl SirrClient {
    /// Create a client for `server` authenticating with `token`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SirrError::InvalidConfig`] if the server is not an
    /// http(s) URL or the token is not a valid header value, and
    /// [`crate::SirrError::Http`] if the HTTP client cannot be built.
    pub fn new(server: impl Into<String>, token: impl Into<String>) -> SirrResult<Self> {
        Self::with_config(SirrConfig::new(server, token))
    }

    /// Create a client from a full configuration. `max_concurrency` is
    /// ignored; this client never fans out.
    ///
    /// # Errors
    ///
    /// See [`SirrClient::new`].
    pub fn with_config(config: SirrConfig) -> SirrResult<Self> {
        let base = parse_server(&config.server)?;
        let http = build_blocking_http_client(&config)?;
        Ok(Self {
            base,
            http,
        })
    }

    /// Normalized base URL.
    #[must_use]
    pub fn server(&self) -> &str {
        &self.base
    }

    /// Release the underlying connection pool.
    pub fn close(self) {
        debug!(server = %self.base, "closing client");
    }

    fn send<T: DeserializeOwned>(&self, endpoint: &Endpoint<'_>) -> SirrResult<Option<T>> {
        let mut request = self
            .http
            .request(endpoint.method(), endpoint.url(&self.base));
        if let Some(body) = endpoint.body() {
            request = request.json(body);
        }

        let response = request.send()?;
        let status = response.status();
        debug!(method = %endpoint.method(), path = %endpoint.path(), %status, "vault response");
        let text = response.text()?;
        handle_response(status, &text, endpoint.allow_404())
    }

    /// Create or overwrite a secret.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SirrError::Api`] on any non-2xx response.
    #[instrument(skip(self, value))]
    pub fn push(&self, key: &str, value: &str, ttl: Option<u64>, reads: Option<u32>) -> SirrResult<()> {
        let endpoint = Endpoint::Push(PushRequest {
            key,
            value,
            ttl_seconds: ttl,
            max_reads: reads,
        });
        self.send::<IgnoredAny>(&endpoint)?;
        Ok(())
    }

    /// Fetch a secret's value; `None` if it does not exist (or is gone).
    ///
    /// # Errors
    ///
    /// Returns [`crate::SirrError::Api`] on a non-2xx response other than 404.
    #[instrument(skip(self))]
    pub fn get(&self, key: &str) -> SirrResult<Option<String>> {
        let secret: Option<SecretValue> = self.send(&Endpoint::Get(key))?;
        Ok(secret.map(|s| s.value))
    }

    /// Delete a secret. Deleting a missing secret is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SirrError::Api`] on a non-2xx response other than 404.
    #[instrument(skip(self))]
    pub fn delete(&self, key: &str) -> SirrResult<()> {
        self.send::<IgnoredAny>(&Endpoint::Delete(key))?;
        Ok(())
    }

    /// List metadata for all stored secrets, in server order.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SirrError::Api`] on any non-2xx response.
    #[instrument(skip(self))]
    pub fn list(&self) -> SirrResult<Vec<SecretMeta>> {
        let endpoint = Endpoint::List;
        let list: SecretList = api::required(self.send(&endpoint)?, &endpoint)?;
        Ok(list.secrets)
    }

    /// Fetch every listed secret, one after another.
    ///
    /// # Errors
    ///
    /// Propagates the first error from `list` or any `get`.
    #[instrument(skip(self))]
    pub fn pull_all(&self) -> SirrResult<HashMap<String, String>> {
        let metas = self.list()?;
        let listed = metas.len();
        let mut pairs = Vec::with_capacity(listed);
        for meta in metas {
            let value = self.get(&meta.key)?;
            pairs.push((meta.key, value));
        }
        Ok(api::collect_present(listed, pairs))
    }

    /// Trigger server-side pruning; returns how many secrets were removed.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SirrError::Api`] on any non-2xx response.
    #[instrument(skip(self))]
    pub fn prune(&self) -> SirrResult<u64> {
        let endpoint = Endpoint::Prune;
        let response: PruneResponse = api::required(self.send(&endpoint)?, &endpoint)?;
        debug!(pruned = response.pruned, "prune complete");
        Ok(response.pruned)
    }

    /// Check whether the vault reports itself healthy.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SirrError::Api`] on any non-2xx response.
    #[instrument(skip(self))]
    pub fn health(&self) -> SirrResult<bool> {
        let endpoint = Endpoint::Health;
        let response: HealthResponse = api::required(self.send(&endpoint)?, &endpoint)?;
        Ok(response.status == "ok")
    }

    /// URL a recipient can fetch `key` from. No request is made.
    #[must_use]
    pub fn share_url(&self, key: &str) -> String {
        format!("{}{}", self.base, api::secret_path(key))
    }

    /// Pull all secrets and set them as environment variables until the
    /// returned guard is dropped.
    ///
    /// # Errors
    ///
    /// Propagates any `pull_all` error, and returns
    /// [`crate::SirrError::InvalidEnv`] if a secret cannot be held in the
    /// environment. Nothing is injected in either case.
    pub fn env(&self) -> SirrResult<EnvGuard> {
        EnvGuard::inject(self.pull_all()?)
    }

    /// Run `f` with all secrets set as environment variables.
    ///
    /// The environment is restored before this returns, and also if `f`
    /// panics.
    ///
    /// # Errors
    ///
    /// Propagates any [`SirrClient::env`] error; `f` is not run in that case.
    pub fn with_env<F, R>(&self, f: F) -> SirrResult<R>
    where
        F: FnOnce() -> R,
    {
        let _guard = self.env()?;
        Ok(f())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SirrError;

    #[test]
    fn test_new_rejects_unparsable_server() {
        let err = SirrClient::new("not a url", "t").unwrap_err();
        assert!(matches!(err, SirrError::InvalidConfig(_)));
    }

    #[test]
    fn test_share_url_needs_no_runtime() {
        let client = SirrClient::new("http://v.test/", "t").unwrap();
        assert_eq!(client.share_url("a/b"), "http://v.test/secrets/a%2Fb");
    }
}
