//! RFC 6962 HTTP log client
//!
//! Speaks the v1 JSON API of one log: `add-chain`, `add-pre-chain` and
//! `get-roots` under `<base>/ct/v1/`. Certificates travel base64-encoded in
//! JSON bodies. Log-list URLs routinely omit the scheme; this client assumes
//! HTTPS for those.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::ClientError;
use crate::loglist::LogDescriptor;
use crate::sct::SignedCertificateTimestamp;
use crate::traits::LogClient;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Serialize)]
struct AddChainRequest {
    chain: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct GetRootsResponse {
    certificates: Vec<String>,
}

/// HTTP client bound to one log's base URL
#[derive(Debug)]
pub struct HttpLogClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpLogClient {
    /// Create a client for the given log with the default request timeout
    pub fn new(log: &LogDescriptor) -> Result<Self, ClientError> {
        Self::with_timeout(log, DEFAULT_TIMEOUT)
    }

    /// Create a client with an explicit per-request timeout
    pub fn with_timeout(log: &LogDescriptor, timeout: Duration) -> Result<Self, ClientError> {
        if log.url.is_empty() {
            return Err(ClientError::Build("log URL is empty".into()));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Build(e.to_string()))?;

        Ok(Self {
            base_url: normalize_base_url(&log.url),
            client,
        })
    }

    /// The normalized base URL this client submits to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn add(
        &self,
        endpoint: &str,
        chain: &[Vec<u8>],
    ) -> Result<SignedCertificateTimestamp, ClientError> {
        let body = AddChainRequest {
            chain: chain.iter().map(|der| STANDARD.encode(der)).collect(),
        };

        let response = self
            .client
            .post(format!("{}/ct/v1/{}", self.base_url, endpoint))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        response
            .json::<SignedCertificateTimestamp>()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl LogClient for HttpLogClient {
    async fn submit_chain(
        &self,
        chain: &[Vec<u8>],
    ) -> Result<SignedCertificateTimestamp, ClientError> {
        self.add("add-chain", chain).await
    }

    async fn submit_pre_chain(
        &self,
        chain: &[Vec<u8>],
    ) -> Result<SignedCertificateTimestamp, ClientError> {
        self.add("add-pre-chain", chain).await
    }

    async fn get_accepted_roots(&self) -> Result<Vec<Vec<u8>>, ClientError> {
        let response = self
            .client
            .get(format!("{}/ct/v1/get-roots", self.base_url))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let roots = response
            .json::<GetRootsResponse>()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;

        roots
            .certificates
            .iter()
            .map(|b64| {
                STANDARD
                    .decode(b64)
                    .map_err(|e| ClientError::InvalidResponse(format!("bad root encoding: {}", e)))
            })
            .collect()
    }
}

/// The production factory: one `HttpLogClient` per descriptor
pub fn build_http_client(log: &LogDescriptor) -> Result<Arc<dyn LogClient>, ClientError> {
    Ok(Arc::new(HttpLogClient::new(log)?))
}

fn normalize_base_url(url: &str) -> String {
    let with_scheme = if url.contains("://") {
        url.to_string()
    } else {
        format!("https://{}", url)
    };
    with_scheme.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log(url: &str) -> LogDescriptor {
        LogDescriptor {
            url: url.into(),
            description: "test log".into(),
            key: vec![0u8; 4],
            maximum_merge_delay: 86400,
            operated_by: vec![],
        }
    }

    #[test]
    fn client_creation() {
        assert!(HttpLogClient::new(&log("https://ct.example.com/log/")).is_ok());
    }

    #[test]
    fn empty_url_is_rejected() {
        let err = HttpLogClient::new(&log("")).unwrap_err();
        assert!(matches!(err, ClientError::Build(_)));
    }

    #[test]
    fn schemeless_url_gets_https() {
        let client = HttpLogClient::new(&log("ct.example.com/log/")).unwrap();
        assert_eq!(client.base_url(), "https://ct.example.com/log");
    }

    #[test]
    fn explicit_scheme_is_kept() {
        let client = HttpLogClient::new(&log("http://localhost:8080/log/")).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080/log");
    }

    #[test]
    fn add_chain_body_is_base64() {
        let body = AddChainRequest {
            chain: vec![STANDARD.encode([1u8, 2, 3])],
        };
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(json, r#"{"chain":["AQID"]}"#);
    }

    #[test]
    fn get_roots_response_parses() {
        let json = r#"{"certificates":["AQID",""]}"#;
        let parsed: GetRootsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.certificates.len(), 2);
    }

    #[tokio::test]
    #[ignore] // Requires network
    async fn get_roots_against_live_log() {
        let client = HttpLogClient::new(&log("https://ct.googleapis.com/logs/argon2025h1/")).unwrap();
        let roots = client.get_accepted_roots().await.unwrap();
        assert!(!roots.is_empty());
    }
}
