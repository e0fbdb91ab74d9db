//! Request shaping shared by both clients.
//!
//! An [`Endpoint`] describes one call: method, URL, body and whether a 404
//! means "absent". The async and blocking clients only differ in how they
//! send it; payload decoding lives here as well.

use crate::error::{SirrError, SirrResult};
use crate::model::PushRequest;
use crate::transport::encode_key;
use reqwest::Method;
use std::collections::HashMap;

/// One call against the vault API.
#[derive(Debug)]
pub(crate) enum Endpoint<'a> {
    Push(PushRequest<'a>),
    Get(&'a str),
    Delete(&'a str),
    List,
    Prune,
    Health,
}

impl Endpoint<'_> {
    pub(crate) fn method(&self) -> Method {
        match self {
            Self::Push(_) | Self::Prune => Method::POST,
            Self::Get(_) | Self::List | Self::Health => Method::GET,
            Self::Delete(_) => Method::DELETE,
        }
    }

    /// Path relative to the normalized base URL.
    pub(crate) fn path(&self) -> String {
        match self {
            Self::Push(_) | Self::List => "/secrets".to_string(),
            Self::Get(key) | Self::Delete(key) => secret_path(key),
            Self::Prune => "/prune".to_string(),
            Self::Health => "/health".to_string(),
        }
    }

    pub(crate) fn url(&self, base: &str) -> String {
        format!("{base}{}", self.path())
    }

    /// `get` and `delete` treat a 404 as absence; nothing else does.
    pub(crate) const fn allow_404(&self) -> bool {
        matches!(self, Self::Get(_) | Self::Delete(_))
    }

    pub(crate) fn body(&self) -> Option<&PushRequest<'_>> {
        match self {
            Self::Push(body) => Some(body),
            _ => None,
        }
    }
}

pub(crate) fn secret_path(key: &str) -> String {
    format!("/secrets/{}", encode_key(key))
}

/// Assemble `pull_all` output, dropping secrets that vanished before fetch.
pub(crate) fn collect_present<I>(listed: usize, pairs: I) -> HashMap<String, String>
where
    I: IntoIterator<Item = (String, Option<String>)>,
{
    let mut out = HashMap::with_capacity(listed);
    for (key, value) in pairs {
        match value {
            Some(value) => {
                out.insert(key, value);
            }
            None => tracing::debug!(key = %key, "secret gone before fetch, skipping"),
        }
    }
    tracing::debug!(listed, fetched = out.len(), "pulled secrets");
    out
}

/// Unwrap the payload of an endpoint that has no 404 allowance.
///
/// `handle_response` only yields `None` for an allowed 404, so a missing
/// payload here is reported as a decode failure, never as a status.
pub(crate) fn required<T>(payload: Option<T>, endpoint: &Endpoint<'_>) -> SirrResult<T> {
    payload.ok_or_else(|| {
        SirrError::Decode(serde::de::Error::custom(format!(
            "missing payload for {} {}",
            endpoint.method(),
            endpoint.path()
        )))
    })
}
