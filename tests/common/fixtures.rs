//! Test fixtures: stub clients, stub policies and a generated PKI corpus

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use rcgen::{BasicConstraints, CertificateParams, DnType, IsCa, KeyPair};

use ct_distributor::{
    base_group_for, ClientError, LogClient, LogDescriptor, LogPolicyData, PolicyEngine,
    PolicyError, PolicyGroup, SignedCertificateTimestamp,
};

/// A throwaway certificate authority that can issue leaves
pub struct TestCa {
    cert: rcgen::Certificate,
    key: KeyPair,
}

impl TestCa {
    /// Generate a self-signed CA with the given common name
    pub fn new(cn: &str) -> Self {
        let key = KeyPair::generate().unwrap();
        let mut params = CertificateParams::new(Vec::new()).unwrap();
        params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
        params.distinguished_name.push(DnType::CommonName, cn);
        let cert = params.self_signed(&key).unwrap();
        Self { cert, key }
    }

    /// DER encoding of the CA certificate
    pub fn der(&self) -> Vec<u8> {
        self.cert.der().as_ref().to_vec()
    }

    /// Issue an end-entity certificate, returning its DER encoding
    pub fn issue_leaf(&self, san: &str) -> Vec<u8> {
        let key = KeyPair::generate().unwrap();
        let mut params = CertificateParams::new(vec![san.to_string()]).unwrap();
        params.distinguished_name.push(DnType::CommonName, san);
        let cert = params.signed_by(&key, &self.cert, &self.key).unwrap();
        cert.der().as_ref().to_vec()
    }
}

/// Deterministic SCT for a given log URL (log id derived from the URL)
pub fn test_sct(log_url: &str) -> SignedCertificateTimestamp {
    let mut log_id = [0u8; 32];
    let bytes = log_url.as_bytes();
    let n = bytes.len().min(32);
    log_id[..n].copy_from_slice(&bytes[..n]);

    SignedCertificateTimestamp {
        sct_version: 0,
        log_id: log_id.to_vec(),
        timestamp: 1234,
        extensions: Vec::new(),
        signature: vec![4, 3, 0, 0],
    }
}

/// Descriptor for a fake log
pub fn descriptor(url: &str) -> LogDescriptor {
    LogDescriptor {
        url: url.to_string(),
        description: format!("stub log at {}", url),
        key: url.as_bytes().to_vec(),
        maximum_merge_delay: 86400,
        operated_by: vec!["Test Operator".to_string()],
    }
}

/// Stub log client with configurable roots and failure modes
pub struct StubLogClient {
    log_url: String,
    roots: Vec<Vec<u8>>,
    fail_get_roots: AtomicBool,
    fail_submit: bool,
    submit_calls: AtomicUsize,
}

impl StubLogClient {
    pub fn new(log_url: &str, roots: Vec<Vec<u8>>) -> Self {
        Self {
            log_url: log_url.to_string(),
            roots,
            fail_get_roots: AtomicBool::new(false),
            fail_submit: false,
            submit_calls: AtomicUsize::new(0),
        }
    }

    /// A client whose get-roots call always errors
    pub fn uncollectable(log_url: &str) -> Self {
        let client = Self::new(log_url, Vec::new());
        client.set_fail_get_roots(true);
        client
    }

    /// A client whose submissions always error
    pub fn refusing(log_url: &str, roots: Vec<Vec<u8>>) -> Self {
        Self {
            fail_submit: true,
            ..Self::new(log_url, roots)
        }
    }

    /// Make subsequent get-roots calls fail (or succeed again)
    pub fn set_fail_get_roots(&self, fail: bool) {
        self.fail_get_roots.store(fail, Ordering::SeqCst);
    }

    pub fn submit_calls(&self) -> usize {
        self.submit_calls.load(Ordering::SeqCst)
    }

    fn submit(&self) -> Result<SignedCertificateTimestamp, ClientError> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_submit {
            return Err(ClientError::Network("stub submit failure".into()));
        }
        Ok(test_sct(&self.log_url))
    }
}

#[async_trait]
impl LogClient for StubLogClient {
    async fn submit_chain(
        &self,
        _chain: &[Vec<u8>],
    ) -> Result<SignedCertificateTimestamp, ClientError> {
        self.submit()
    }

    async fn submit_pre_chain(
        &self,
        _chain: &[Vec<u8>],
    ) -> Result<SignedCertificateTimestamp, ClientError> {
        self.submit()
    }

    async fn get_accepted_roots(&self) -> Result<Vec<Vec<u8>>, ClientError> {
        if self.fail_get_roots.load(Ordering::SeqCst) {
            return Err(ClientError::Network("stub get-roots failure".into()));
        }
        Ok(self.roots.clone())
    }
}

/// Map from log URL to the raw root blobs its stub client serves
pub type RootsMap = HashMap<String, Vec<Vec<u8>>>;

/// Factory building `StubLogClient`s from a roots map
///
/// Logs absent from the map get a client that errors on get-roots.
pub fn stub_client_factory(
    roots: RootsMap,
) -> impl Fn(&LogDescriptor) -> Result<Arc<dyn LogClient>, ClientError> {
    move |log: &LogDescriptor| {
        let client: Arc<dyn LogClient> = match roots.get(&log.url) {
            Some(certs) => Arc::new(StubLogClient::new(&log.url, certs.clone())),
            None => Arc::new(StubLogClient::uncollectable(&log.url)),
        };
        Ok(client)
    }
}

/// Factory that always fails, for construction-error tests
pub fn failing_client_factory(
    _log: &LogDescriptor,
) -> Result<Arc<dyn LogClient>, ClientError> {
    Err(ClientError::Build("bad client builder".into()))
}

/// Policy requiring `base_num` SCTs from the all-logs base group
pub struct StubPolicy {
    base_num: usize,
    fail: AtomicBool,
}

impl StubPolicy {
    pub fn new(base_num: usize) -> Self {
        Self {
            base_num,
            fail: AtomicBool::new(false),
        }
    }

    /// A policy engine that errors on every request
    pub fn broken() -> Self {
        Self {
            base_num: 1,
            fail: AtomicBool::new(true),
        }
    }
}

impl PolicyEngine for StubPolicy {
    fn groups_for(
        &self,
        _leaf_der: &[u8],
        approved: &[LogDescriptor],
    ) -> Result<LogPolicyData, PolicyError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(PolicyError::Internal("stub policy failure".into()));
        }
        let group = base_group_for(approved, self.base_num)?;
        Ok(HashMap::from([(group.name.clone(), group)]))
    }
}

/// Policy returning a fixed set of groups, for multi-group tests
pub struct GroupedPolicy {
    groups: LogPolicyData,
}

impl GroupedPolicy {
    pub fn new(groups: Vec<PolicyGroup>) -> Self {
        Self {
            groups: groups.into_iter().map(|g| (g.name.clone(), g)).collect(),
        }
    }
}

impl PolicyEngine for GroupedPolicy {
    fn groups_for(
        &self,
        _leaf_der: &[u8],
        _approved: &[LogDescriptor],
    ) -> Result<LogPolicyData, PolicyError> {
        Ok(self.groups.clone())
    }
}
