//! Known-log descriptors
//!
//! `LogDescriptor` is the immutable identity of one log, supplied at
//! construction from an externally loaded log list. Parsing the published
//! log-list schema itself is a collaborator's job; this type only has to be
//! easy to embed in fixtures, so it carries serde derives with the key
//! base64-encoded.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::sct::base64_bytes;

/// Identity and metadata of one certificate-transparency log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogDescriptor {
    /// Submission URL; the unique key for this log everywhere in the crate
    pub url: String,

    /// Human-readable name
    pub description: String,

    /// DER-encoded public key (SubjectPublicKeyInfo)
    #[serde(with = "base64_bytes")]
    pub key: Vec<u8>,

    /// Maximum merge delay the log commits to, in seconds
    pub maximum_merge_delay: u64,

    /// Names of the operators running this log
    #[serde(default)]
    pub operated_by: Vec<String>,
}

impl LogDescriptor {
    /// RFC 6962 log ID: SHA-256 over the log's public key
    pub fn log_id(&self) -> [u8; 32] {
        Sha256::digest(&self.key).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor() -> LogDescriptor {
        LogDescriptor {
            url: "https://ct.example.com/2025/".into(),
            description: "Example 2025".into(),
            key: b"not a real key".to_vec(),
            maximum_merge_delay: 86400,
            operated_by: vec!["Example Org".into()],
        }
    }

    #[test]
    fn log_id_is_sha256_of_key() {
        let log = descriptor();
        assert_eq!(log.log_id(), <[u8; 32]>::from(Sha256::digest(&log.key)));
    }

    #[test]
    fn descriptor_roundtrips_with_base64_key() {
        let log = descriptor();
        let json = serde_json::to_string(&log).unwrap();
        assert!(json.contains(r#""key":"bm90IGEgcmVhbCBrZXk="#));
        let back: LogDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, log);
    }

    #[test]
    fn operated_by_defaults_to_empty() {
        let json = r#"{
            "url": "https://ct.example.com/",
            "description": "Example",
            "key": "",
            "maximum_merge_delay": 86400
        }"#;
        let log: LogDescriptor = serde_json::from_str(json).unwrap();
        assert!(log.operated_by.is_empty());
    }
}
