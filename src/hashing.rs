//! Hashing System - SHA-256 for Cable Identity
//!
//! Cable ids and report hashes are derived from content, so the same booth
//! always cables to the same ids.

use serde::Serialize;
use serde_json::{json, to_string, Value};
use sha2::{Digest, Sha256};

/// Length of the hex prefix used in cable ids.
const CABLE_ID_HEX_LEN: usize = 16;

/// Compute SHA-256 hash of bytes, return hex string
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Convert to canonical JSON (sorted keys, no whitespace)
pub fn canonical_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let v: Value = serde_json::to_value(value)?;
    to_string(&sort_value(&v))
}

fn sort_value(v: &Value) -> Value {
    match v {
        Value::Object(map) => {
            let mut sorted: Vec<_> = map.iter().collect();
            sorted.sort_by(|a, b| a.0.cmp(b.0));
            Value::Object(sorted.into_iter().map(|(k, v)| (k.clone(), sort_value(v))).collect())
        }
        Value::Array(arr) => Value::Array(arr.iter().map(sort_value).collect()),
        _ => v.clone(),
    }
}

/// Deterministic cable id.
///
/// id = "cab-" + sha256(canonical(sequence + connection))[..16]
pub fn cable_id<T: Serialize>(sequence: usize, connection: &T) -> String {
    match canonical_json(&json!({ "seq": sequence, "connection": connection })) {
        Ok(canonical) => format!("cab-{}", &sha256_hex(canonical.as_bytes())[..CABLE_ID_HEX_LEN]),
        Err(_) => format!("cab-{:04}", sequence),
    }
}

/// Hash of a generated cabling result, used to detect unchanged output.
pub fn compute_content_hash<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let canonical = canonical_json(value)?;
    Ok(sha256_hex(canonical.as_bytes()))
}

mod hex {
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        bytes.as_ref().iter().map(|b| format!("{:02x}", b)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_json_sorted() {
        let obj = json!({"z": 1, "a": 2, "m": 3});
        assert_eq!(canonical_json(&obj).unwrap(), r#"{"a":2,"m":3,"z":1}"#);
    }

    #[test]
    fn test_cable_id_deterministic() {
        let conn = json!({"from": ["dev-1", "rca"], "to": ["dev-2", "rca-in-1"]});
        assert_eq!(cable_id(0, &conn), cable_id(0, &conn));
        assert!(cable_id(0, &conn).starts_with("cab-"));
        assert_eq!(cable_id(0, &conn).len(), 4 + CABLE_ID_HEX_LEN);
    }

    #[test]
    fn test_cable_id_depends_on_sequence() {
        let conn = json!({"from": ["dev-1", "ac"]});
        assert_ne!(cable_id(0, &conn), cable_id(1, &conn));
    }

    #[test]
    fn test_content_hash_ignores_key_order() {
        let a = json!({"b": 1, "a": [1, 2]});
        let b = json!({"a": [1, 2], "b": 1});
        assert_eq!(compute_content_hash(&a).unwrap(), compute_content_hash(&b).unwrap());
    }
}
