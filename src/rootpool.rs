//! Per-log trusted-root pools and their snapshot store
//!
//! A [`RootPool`] is built wholesale from one get-roots response and never
//! edited afterwards. The [`RootPoolStore`] maps log URL to the latest pool
//! behind a `parking_lot::RwLock`; writers swap whole `Arc` entries, readers
//! clone the `Arc` out, so no reader ever observes a partially built pool and
//! no lock is ever held across I/O.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::RwLock;
use sha2::{Digest, Sha256};
use x509_parser::prelude::*;

/// One trusted root certificate accepted by a log
#[derive(Debug, Clone)]
pub struct RootEntry {
    raw: Vec<u8>,
    subject: Vec<u8>,
    fingerprint: [u8; 32],
}

impl RootEntry {
    /// Raw DER bytes
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    /// Raw DER of the subject name
    pub fn subject(&self) -> &[u8] {
        &self.subject
    }

    /// SHA-256 over the DER encoding
    pub fn fingerprint(&self) -> &[u8; 32] {
        &self.fingerprint
    }
}

/// The set of trusted roots for one log
#[derive(Debug, Default)]
pub struct RootPool {
    entries: Vec<RootEntry>,
    fingerprints: HashSet<[u8; 32]>,
}

impl RootPool {
    /// Build a pool from raw DER certificates
    ///
    /// Blobs that do not parse as X.509 certificates are skipped; duplicates
    /// (by DER fingerprint) are kept once. An empty iterator yields an empty
    /// pool, which is still a valid, present pool.
    pub fn from_der_certs(certs: impl Iterator<Item = Vec<u8>>) -> Self {
        let mut pool = RootPool::default();

        for (index, der) in certs.enumerate() {
            let subject = match X509Certificate::from_der(&der) {
                Ok((_, cert)) => cert.subject().as_raw().to_vec(),
                Err(e) => {
                    tracing::debug!(index, error = %e, "skipping unparsable root certificate");
                    continue;
                }
            };

            let fingerprint: [u8; 32] = Sha256::digest(&der).into();
            if !pool.fingerprints.insert(fingerprint) {
                continue;
            }

            pool.entries.push(RootEntry {
                raw: der,
                subject,
                fingerprint,
            });
        }

        pool
    }

    /// Number of distinct roots in the pool
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the pool holds no roots
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether this exact certificate (by fingerprint) is trusted
    pub fn contains_raw(&self, der: &[u8]) -> bool {
        let fingerprint: [u8; 32] = Sha256::digest(der).into();
        self.fingerprints.contains(&fingerprint)
    }

    /// All trusted roots whose subject name matches `subject` (raw DER)
    pub fn roots_with_subject<'a>(
        &'a self,
        subject: &'a [u8],
    ) -> impl Iterator<Item = &'a RootEntry> {
        self.entries.iter().filter(move |e| e.subject == subject)
    }

    /// The raw DER of every root in the pool
    pub fn raw_certificates(&self) -> Vec<Vec<u8>> {
        self.entries.iter().map(|e| e.raw.clone()).collect()
    }
}

/// Latest-known root pools, keyed by log URL
///
/// Single writer (the refresh loop), many concurrent readers (submission
/// coordinators). Absence of an entry means that log has never completed a
/// successful refresh.
#[derive(Debug, Default)]
pub struct RootPoolStore {
    pools: RwLock<HashMap<String, Arc<RootPool>>>,
}

impl RootPoolStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// The latest pool snapshot for a log, if one was ever installed
    pub fn get(&self, log_url: &str) -> Option<Arc<RootPool>> {
        self.pools.read().get(log_url).cloned()
    }

    /// Atomically install a freshly built pool for a log
    ///
    /// The previous entry (if any) stays visible to readers that already
    /// cloned it out; new readers see only the replacement.
    pub fn replace(&self, log_url: &str, pool: RootPool) {
        self.pools
            .write()
            .insert(log_url.to_string(), Arc::new(pool));
    }

    /// Whether any log has ever completed a successful refresh
    pub fn is_initialized(&self) -> bool {
        !self.pools.read().is_empty()
    }

    /// Number of logs with an installed pool
    pub fn len(&self) -> usize {
        self.pools.read().len()
    }

    /// Whether no log has an installed pool
    pub fn is_empty(&self) -> bool {
        self.pools.read().is_empty()
    }
}
