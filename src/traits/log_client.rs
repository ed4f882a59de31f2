//! Log client capability
//!
//! One implementation is bound to one specific log service. The distributor
//! owns one client per log whose construction succeeded and drives all wire
//! traffic through this trait; the production RFC 6962 implementation lives
//! in [`crate::client`].

use async_trait::async_trait;

use crate::error::ClientError;
use crate::sct::SignedCertificateTimestamp;

/// Operations a certificate-transparency log exposes to submitters
///
/// Chains are raw DER certificates, leaf first. Implementations are expected
/// to enforce their own request deadlines; callers additionally bound each
/// call with the configured submission timeout.
#[async_trait]
pub trait LogClient: Send + Sync {
    /// Submit a final certificate chain, returning the log's SCT
    async fn submit_chain(
        &self,
        chain: &[Vec<u8>],
    ) -> Result<SignedCertificateTimestamp, ClientError>;

    /// Submit a precertificate chain, returning the log's SCT
    async fn submit_pre_chain(
        &self,
        chain: &[Vec<u8>],
    ) -> Result<SignedCertificateTimestamp, ClientError>;

    /// Fetch the root certificates the log currently accepts, as raw DER
    async fn get_accepted_roots(&self) -> Result<Vec<Vec<u8>>, ClientError>;
}
