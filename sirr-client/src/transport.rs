//! Transport helpers shared by the async and blocking clients.
//!
//! [`handle_response`] is the only place a response status is judged.

use crate::error::{SirrError, SirrResult};
use reqwest::{StatusCode, Url};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;

/// Build the fixed header set sent with every request.
///
/// # Errors
///
/// Returns [`SirrError::InvalidConfig`] if the token contains bytes that
/// cannot appear in an HTTP header value.
pub fn build_headers(token: &str) -> SirrResult<HeaderMap> {
    let mut auth = HeaderValue::from_str(&format!("Bearer {token}"))
        .map_err(|_| SirrError::invalid_config("token is not a valid header value"))?;
    auth.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, auth);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok(headers)
}

/// Strip trailing slashes from a base URL.
#[must_use]
pub fn normalize_server(server: &str) -> String {
    server.trim_end_matches('/').to_string()
}

/// Normalize `server` and check that it is an absolute http(s) URL.
///
/// # Errors
///
/// Returns [`SirrError::InvalidConfig`] if the URL does not parse or uses
/// another scheme.
pub fn parse_server(server: &str) -> SirrResult<String> {
    let base = normalize_server(server);
    let url = Url::parse(&base)
        .map_err(|e| SirrError::invalid_config(format!("server URL {base:?}: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(SirrError::invalid_config(format!(
            "server URL {base:?}: unsupported scheme {}",
            url.scheme()
        )));
    }
    Ok(base)
}

/// Percent-encode a key as a single path segment, `/` included.
#[must_use]
pub fn encode_key(key: &str) -> String {
    urlencoding::encode(key).into_owned()
}

/// Interpret a response.
///
/// Returns `Ok(None)` for a 404 when `allow_404` is set, `Err(SirrError::Api)`
/// for any other non-2xx status, and the decoded body otherwise. An empty
/// success body decodes as JSON `null`.
///
/// # Errors
///
/// [`SirrError::Api`] on a rejected status, [`SirrError::Decode`] when a
/// success body does not match `T`.
pub fn handle_response<T: DeserializeOwned>(
    status: StatusCode,
    body: &str,
    allow_404: bool,
) -> SirrResult<Option<T>> {
    if allow_404 && status == StatusCode::NOT_FOUND {
        return Ok(None);
    }
    if !status.is_success() {
        return Err(SirrError::api(status.as_u16(), error_message(body)));
    }
    let body = if body.trim().is_empty() { "null" } else { body };
    Ok(Some(serde_json::from_str(body)?))
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_owned))
        .unwrap_or_else(|| body.to_string())
}
