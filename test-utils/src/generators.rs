//! Shared proptest generators.

use proptest::prelude::*;
use serde_json::{Value, json};

/// Secret keys, including characters that must be percent-encoded.
pub fn key_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[A-Z][A-Z0-9_]{0,30}",
        "[a-z]{1,8}(/[a-z]{1,8}){1,3}",
        "[ -~]{1,40}",
        "\\PC{1,20}",
    ]
}

/// Secret values.
pub fn value_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9!@#$%^&*=+ ]{1,64}"
}

/// Base URLs with zero or more trailing slashes.
pub fn server_strategy() -> impl Strategy<Value = String> {
    (
        prop_oneof![Just("http"), Just("https")],
        "[a-z]{3,12}",
        prop::option::of(1024_u16..65535),
        prop::option::of("[a-z]{1,8}"),
        0_usize..4,
    )
        .prop_map(|(scheme, host, port, prefix, slashes)| {
            let mut url = format!("{scheme}://{host}.test");
            if let Some(port) = port {
                url.push_str(&format!(":{port}"));
            }
            if let Some(prefix) = prefix {
                url.push('/');
                url.push_str(&prefix);
            }
            url.push_str(&"/".repeat(slashes));
            url
        })
}

/// Metadata JSON objects, with each optional field independently present.
pub fn meta_json_strategy() -> impl Strategy<Value = Value> {
    (
        key_strategy(),
        0_i64..4_000_000_000,
        0_u32..1000,
        prop::option::of(0_i64..4_000_000_000),
        prop::option::of(1_u32..1000),
    )
        .prop_map(|(key, created_at, read_count, expires_at, max_reads)| {
            let mut meta = json!({
                "key": key,
                "created_at": created_at,
                "read_count": read_count,
            });
            if let Some(expires_at) = expires_at {
                meta["expires_at"] = json!(expires_at);
            }
            if let Some(max_reads) = max_reads {
                meta["max_reads"] = json!(max_reads);
            }
            meta
        })
}
