//! Shared test utilities for sirr-client.
//!
//! This crate provides:
//! - JSON fixtures shaped like vault responses
//! - Proptest generators for keys, URLs and metadata
//! - A wiremock-backed mock vault
//! - Test tracing initialization

#![forbid(unsafe_code)]

pub mod fixtures;
pub mod generators;
pub mod mocks;

pub use generators::*;

use tracing_subscriber::EnvFilter;

/// Install a test-writer tracing subscriber filtered by `RUST_LOG`.
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_test_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
