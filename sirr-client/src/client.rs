//! Async Sirr client. `pull_all` fetches every listed secret concurrently.

use crate::{
    api::{self, Endpoint},
    config::SirrConfig,
    env::EnvGuard,
    error::SirrResult,
    http::build_http_client,
    model::{HealthResponse, PruneResponse, PushRequest, SecretList, SecretMeta, SecretValue},
    transport::{handle_response, parse_server},
};
use futures::{StreamExt, TryStreamExt, stream};
use reqwest::Client;
use serde::de::{DeserializeOwned, IgnoredAny};
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Async client for the Sirr ephemeral secret vault.
///
/// Dropping the client (or calling [`SirrClient::close`]) releases its
/// connection pool.
#[derive(Debug)]
pub struct SirrClient {
    base: String,
    http: Client,
    max_concurrency: Option<usize>,
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

    /// Create a client from a full configuration.
    ///
    /// # Errors
    ///
    /// See [`SirrClient::new`].
    pub fn with_config(config: SirrConfig) -> SirrResult<Self> {
        let base = parse_server(&config.server)?;
        let http = build_http_client(&config)?;
        Ok(Self {
            base,
            http,
            max_concurrency: config.max_concurrency,
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

    async fn send<T: DeserializeOwned>(&self, endpoint: &Endpoint<'_>) -> SirrResult<Option<T>> {
        let mut request = self
            .http
            .request(endpoint.method(), endpoint.url(&self.base));
        if let Some(body) = endpoint.body() {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        debug!(method = %endpoint.method(), path = %endpoint.path(), %status, "vault response");
        let text = response.text().await?;
        handle_response(status, &text, endpoint.allow_404())
    }

    /// Create or overwrite a secret.
    ///
    /// `ttl` (seconds) and `reads` are only sent when set.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SirrError::Api`] on any non-2xx response.
    #[instrument(skip(self, value))]
    pub async fn push(
        &self,
        key: &str,
        value: &str,
        ttl: Option<u64>,
        reads: Option<u32>,
    ) -> SirrResult<()> {
        let endpoint = Endpoint::Push(PushRequest {
            key,
            value,
            ttl_seconds: ttl,
            max_reads: reads,
        });
        self.send::<IgnoredAny>(&endpoint).await?;
        Ok(())
    }

    /// Fetch a secret's value; `None` if it does not exist (or is gone).
    ///
    /// Each successful get consumes one read on the server.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SirrError::Api`] on a non-2xx response other than 404.
    #[instrument(skip(self))]
    pub async fn get(&self, key: &str) -> SirrResult<Option<String>> {
        let secret: Option<SecretValue> = self.send(&Endpoint::Get(key)).await?;
        Ok(secret.map(|s| s.value))
    }

    /// Delete a secret. Deleting a missing secret is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SirrError::Api`] on a non-2xx response other than 404.
    #[instrument(skip(self))]
    pub async fn delete(&self, key: &str) -> SirrResult<()> {
        self.send::<IgnoredAny>(&Endpoint::Delete(key)).await?;
        Ok(())
    }

    /// List metadata for all stored secrets, in server order.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SirrError::Api`] on any non-2xx response.
    #[instrument(skip(self))]
    pub async fn list(&self) -> SirrResult<Vec<SecretMeta>> {
        let endpoint = Endpoint::List;
        let list: SecretList = api::required(self.send(&endpoint).await?, &endpoint)?;
        Ok(list.secrets)
    }

    /// Fetch every listed secret concurrently.
    ///
    /// Secrets that disappear between listing and fetching are left out.
    /// Any other failure aborts the whole call and drops the in-flight gets.
    ///
    /// # Errors
    ///
    /// Propagates the first error from `list` or any `get`.
    #[instrument(skip(self))]
    pub async fn pull_all(&self) -> SirrResult<HashMap<String, String>> {
        let metas = self.list().await?;
        let listed = metas.len();
        let limit = self.max_concurrency.unwrap_or(listed).max(1);

        let pairs: Vec<(String, Option<String>)> = stream::iter(metas)
            .map(|meta| async move {
                let value = self.get(&meta.key).await?;
                Ok::<_, crate::SirrError>((meta.key, value))
            })
            .buffer_unordered(limit)
            .try_collect()
            .await?;

        Ok(api::collect_present(listed, pairs))
    }

    /// Trigger server-side pruning; returns how many secrets were removed.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SirrError::Api`] on any non-2xx response.
    #[instrument(skip(self))]
    pub async fn prune(&self) -> SirrResult<u64> {
        let endpoint = Endpoint::Prune;
        let response: PruneResponse = api::required(self.send(&endpoint).await?, &endpoint)?;
        debug!(pruned = response.pruned, "prune complete");
        Ok(response.pruned)
    }

    /// Check whether the vault reports itself healthy.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SirrError::Api`] on any non-2xx response.
    #[instrument(skip(self))]
    pub async fn health(&self) -> SirrResult<bool> {
        let endpoint = Endpoint::Health;
        let response: HealthResponse = api::required(self.send(&endpoint).await?, &endpoint)?;
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
    /// Entering consumes one read of every listed secret. See
    /// [`crate::env`] for the concurrency caveats.
    ///
    /// # Errors
    ///
    /// Propagates any `pull_all` error, and returns
    /// [`crate::SirrError::InvalidEnv`] if a secret cannot be held in the
    /// environment. Nothing is injected in either case.
    pub async fn env(&self) -> SirrResult<EnvGuard> {
        EnvGuard::inject(self.pull_all().await?)
    }
}
