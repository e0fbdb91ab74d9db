//! Rust client for the Sirr ephemeral secret vault.
//!
//! Store secrets with an optional TTL and read limit, fetch them by key,
//! list their metadata, delete or prune them, and inject them into the
//! process environment for the length of a scope.
//!
//! [`SirrClient`] is async and fetches secrets concurrently in `pull_all`.
//! [`blocking::SirrClient`] runs every request sequentially on the calling
//! thread. Both share request shaping and response handling.
//!
//! ```no_run
//! # async fn run() -> sirr_client::SirrResult<()> {
//! let client = sirr_client::SirrClient::new("https://vault.example.com", "token")?;
//! client.push("DB_PASSWORD", "hunter2", Some(3600), Some(1)).await?;
//! let value = client.get("DB_PASSWORD").await?;
//! assert_eq!(value.as_deref(), Some("hunter2"));
//! # Ok(())
//! # }
//! ```

mod api;
#[cfg(feature = "blocking")]
pub mod blocking;
pub mod client;
pub mod config;
pub mod env;
pub mod error;
pub mod http;
pub mod model;
pub mod transport;

pub use client::SirrClient;
pub use config::SirrConfig;
pub use env::EnvGuard;
pub use error::{SirrError, SirrResult};
pub use model::SecretMeta;
