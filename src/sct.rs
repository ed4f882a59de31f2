//! Signed certificate timestamp types
//!
//! `SignedCertificateTimestamp` doubles as the RFC 6962 §4.1 JSON wire form
//! (`sct_version`, `id`, `timestamp`, `extensions`, `signature`, binary
//! fields base64-encoded), so the HTTP client deserializes straight into it.

use serde::{Deserialize, Serialize};

/// Serde adapter for base64-encoded byte fields
pub(crate) mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        STANDARD.decode(s).map_err(serde::de::Error::custom)
    }
}

/// A signed proof of inclusion issued by one log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedCertificateTimestamp {
    /// SCT version (0 = v1)
    pub sct_version: u8,

    /// Log ID: SHA-256 of the log's public key
    #[serde(rename = "id", with = "base64_bytes")]
    pub log_id: Vec<u8>,

    /// Issuance time, milliseconds since the Unix epoch
    pub timestamp: u64,

    /// CT extensions, usually empty
    #[serde(with = "base64_bytes")]
    pub extensions: Vec<u8>,

    /// Digitally-signed struct over the (pre)certificate entry
    #[serde(with = "base64_bytes")]
    pub signature: Vec<u8>,
}

/// The externally visible success unit: which log issued which SCT
///
/// A submission response holds at most one of these per log URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignedSct {
    /// URL of the issuing log
    pub log_url: String,

    /// The SCT it returned
    pub sct: SignedCertificateTimestamp,
}
