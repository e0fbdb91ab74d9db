//! Wire types for the Sirr HTTP API.

use serde::{Deserialize, Serialize};

/// Metadata for a stored secret. Never carries the value.
///
/// Timestamps are passed through exactly as the server reports them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SecretMeta {
    /// Secret key
    pub key: String,
    /// Creation timestamp
    pub created_at: i64,
    /// Reads already consumed
    pub read_count: u32,
    /// Expiry timestamp, absent when the secret has no TTL
    #[serde(default)]
    pub expires_at: Option<i64>,
    /// Read limit, absent when reads are unlimited
    #[serde(default)]
    pub max_reads: Option<u32>,
}

impl SecretMeta {
    /// Reads left before the secret is exhausted, `None` when unlimited.
    #[must_use]
    pub fn reads_remaining(&self) -> Option<u32> {
        self.max_reads.map(|max| max.saturating_sub(self.read_count))
    }

    /// Whether the secret carries an expiry.
    #[must_use]
    pub const fn has_expiry(&self) -> bool {
        self.expires_at.is_some()
    }
}

/// `POST /secrets` body. Unset limits are omitted entirely.
#[derive(Debug, Serialize)]
pub(crate) struct PushRequest<'a> {
    pub key: &'a str,
    pub value: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl_seconds: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_reads: Option<u32>,
}

/// `GET /secrets/{key}` response.
#[derive(Debug, Deserialize)]
pub(crate) struct SecretValue {
    pub value: String,
}

/// `GET /secrets` response.
#[derive(Debug, Deserialize)]
pub(crate) struct SecretList {
    pub secrets: Vec<SecretMeta>,
}

/// `POST /prune` response.
#[derive(Debug, Deserialize)]
pub(crate) struct PruneResponse {
    pub pruned: u64,
}

/// `GET /health` response.
#[derive(Debug, Deserialize)]
pub(crate) struct HealthResponse {
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_meta_full() {
        let meta: SecretMeta = serde_json::from_value(json!({
            "key": "MY_KEY",
            "created_at": 1_700_000_000,
            "read_count": 2,
            "expires_at": 1_700_003_600,
            "max_reads": 5
        }))
        .unwrap();

        assert_eq!(meta.key, "MY_KEY");
        assert_eq!(meta.created_at, 1_700_000_000);
        assert_eq!(meta.read_count, 2);
        assert_eq!(meta.expires_at, Some(1_700_003_600));
        assert_eq!(meta.max_reads, Some(5));
        assert_eq!(meta.reads_remaining(), Some(3));
        assert!(meta.has_expiry());
    }

    #[test]
    fn test_meta_optional_fields() {
        let meta: SecretMeta = serde_json::from_value(json!({
            "key": "K",
            "created_at": 100,
            "read_count": 0
        }))
        .unwrap();

        assert_eq!(meta.expires_at, None);
        assert_eq!(meta.max_reads, None);
        assert_eq!(meta.reads_remaining(), None);
        assert!(!meta.has_expiry());
    }

    #[test]
    fn test_meta_explicit_nulls() {
        let meta: SecretMeta = serde_json::from_value(json!({
            "key": "K",
            "created_at": 100,
            "read_count": 0,
            "expires_at": null,
            "max_reads": null
        }))
        .unwrap();
        assert_eq!(meta.expires_at, None);
        assert_eq!(meta.max_reads, None);
    }

    #[test]
    fn test_meta_missing_required_field() {
        let result = serde_json::from_value::<SecretMeta>(json!({"key": "K", "read_count": 0}));
        assert!(result.is_err());
    }

    #[test]
    fn test_reads_remaining_saturates() {
        let meta = SecretMeta {
            key: "K".into(),
            created_at: 1,
            read_count: 7,
            expires_at: None,
            max_reads: Some(5),
        };
        assert_eq!(meta.reads_remaining(), Some(0));
    }

    #[test]
    fn test_push_request_omits_unset_limits() {
        let body = serde_json::to_value(PushRequest {
            key: "K",
            value: "v",
            ttl_seconds: None,
            max_reads: None,
        })
        .unwrap();
        assert_eq!(body, json!({"key": "K", "value": "v"}));
    }

    #[test]
    fn test_push_request_includes_set_limits() {
        let body = serde_json::to_value(PushRequest {
            key: "K",
            value: "v",
            ttl_seconds: Some(600),
            max_reads: Some(1),
        })
        .unwrap();
        assert_eq!(
            body,
            json!({"key": "K", "value": "v", "ttl_seconds": 600, "max_reads": 1})
        );
    }

    mod props {
        use crate::model::PushRequest;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(200))]

            /// Each limit is on the wire exactly when it is set.
            #[test]
            fn prop_push_limits_present_only_when_set(
                ttl in any::<Option<u64>>(),
                reads in any::<Option<u32>>(),
            ) {
                let body = serde_json::to_value(PushRequest {
                    key: "K",
                    value: "v",
                    ttl_seconds: ttl,
                    max_reads: reads,
                })
                .unwrap();

                prop_assert_eq!(body.get("ttl_seconds").and_then(serde_json::Value::as_u64), ttl);
                prop_assert_eq!(
                    body.get("max_reads").and_then(serde_json::Value::as_u64),
                    reads.map(u64::from)
                );
                let expected = 2 + usize::from(ttl.is_some()) + usize::from(reads.is_some());
                prop_assert_eq!(body.as_object().unwrap().len(), expected);
            }
        }
    }
}
