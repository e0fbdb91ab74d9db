//! Response bodies shaped like the vault's.

use serde_json::{Value, json};

/// Test bearer token.
pub const TOKEN: &str = "test-token-abc";

/// Minimal metadata entry with no expiry and unlimited reads.
#[must_use]
pub fn meta(key: &str, created_at: i64, read_count: u32) -> Value {
    json!({"key": key, "created_at": created_at, "read_count": read_count})
}

/// Metadata entry carrying both limits.
#[must_use]
pub fn meta_limited(
    key: &str,
    created_at: i64,
    read_count: u32,
    expires_at: i64,
    max_reads: u32,
) -> Value {
    json!({
        "key": key,
        "created_at": created_at,
        "read_count": read_count,
        "expires_at": expires_at,
        "max_reads": max_reads,
    })
}

/// `GET /secrets` body.
#[must_use]
pub fn secret_list(metas: Vec<Value>) -> Value {
    json!({"secrets": metas})
}

/// `GET /secrets` body listing `keys` with default metadata.
#[must_use]
pub fn secret_list_of(keys: &[&str]) -> Value {
    secret_list(
        keys.iter()
            .zip(1_i64..)
            .map(|(key, created_at)| meta(key, created_at, 0))
            .collect(),
    )
}

/// The two-entry listing used by the decoding tests: `A` with both limits,
/// `B` with neither.
#[must_use]
pub fn sample_list() -> Value {
    secret_list(vec![
        meta_limited("A", 1000, 0, 2000, 5),
        meta("B", 1100, 3),
    ])
}

/// `GET /secrets/{key}` body.
#[must_use]
pub fn secret_value(key: &str, value: &str) -> Value {
    json!({"key": key, "value": value})
}

/// Error body as the vault sends it.
#[must_use]
pub fn error_body(message: &str) -> Value {
    json!({"error": message})
}

/// `POST /prune` body.
#[must_use]
pub fn pruned(count: u64) -> Value {
    json!({"pruned": count})
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_list_of_assigns_timestamps() {
        let list = secret_list_of(&["X", "Y"]);
        assert_eq!(list["secrets"][0]["key"], "X");
        assert_eq!(list["secrets"][1]["created_at"], 2);
    }

    #[test]
    fn test_sample_list_shape() {
        let list = sample_list();
        assert_eq!(list["secrets"][0]["max_reads"], 5);
        assert!(list["secrets"][1].get("expires_at").is_none());
    }
}
