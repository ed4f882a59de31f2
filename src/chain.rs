//! Submission-chain parsing and trust-path construction
//!
//! A submission chain arrives as raw DER blobs, leaf first. Parsing happens
//! once per request; path construction happens once per targeted log, against
//! that log's [`RootPool`]. X.509 parsing uses the `x509-parser` crate; names
//! are compared by their raw DER encoding, never by display string.

use x509_parser::prelude::*;

use crate::error::ChainError;
use crate::rootpool::RootPool;

/// One parsed element of a submission chain
///
/// Keeps the raw bytes plus the DER encodings of subject and issuer, which is
/// all path construction needs. The borrowed `X509Certificate` never leaves
/// the parse call.
#[derive(Debug, Clone)]
pub struct ChainLink {
    raw: Vec<u8>,
    subject: Vec<u8>,
    issuer: Vec<u8>,
}

impl ChainLink {
    fn parse(index: usize, der: &[u8]) -> Result<Self, ChainError> {
        let (_, cert) = X509Certificate::from_der(der).map_err(|e| ChainError::Parse {
            index,
            reason: e.to_string(),
        })?;

        Ok(Self {
            raw: der.to_vec(),
            subject: cert.subject().as_raw().to_vec(),
            issuer: cert.issuer().as_raw().to_vec(),
        })
    }

    /// Raw DER bytes of this certificate
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    /// Raw DER of the subject name
    pub fn subject(&self) -> &[u8] {
        &self.subject
    }

    /// Raw DER of the issuer name
    pub fn issuer(&self) -> &[u8] {
        &self.issuer
    }

    /// Whether subject and issuer are the same name
    pub fn is_self_issued(&self) -> bool {
        self.subject == self.issuer
    }
}

/// A parsed, leaf-first submission chain
#[derive(Debug, Clone)]
pub struct CertChain {
    links: Vec<ChainLink>,
}

impl CertChain {
    /// Parse raw DER blobs into a chain
    ///
    /// Every element must parse as an X.509 certificate and every element
    /// must be issued by its successor. An empty input, an unparsable blob,
    /// or a misordered chain is malformed — a property of the input, checked
    /// once per request and independent of any log.
    pub fn parse(raw_chain: &[Vec<u8>]) -> Result<Self, ChainError> {
        if raw_chain.is_empty() {
            return Err(ChainError::Empty);
        }

        let links = raw_chain
            .iter()
            .enumerate()
            .map(|(i, der)| ChainLink::parse(i, der))
            .collect::<Result<Vec<_>, _>>()?;

        for (i, pair) in links.windows(2).enumerate() {
            if pair[0].issuer != pair[1].subject {
                return Err(ChainError::Misordered { index: i });
            }
        }

        Ok(Self { links })
    }

    /// The end-entity certificate
    pub fn leaf(&self) -> &ChainLink {
        &self.links[0]
    }

    /// Number of certificates in the chain
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Whether the chain is empty (never true for a parsed chain)
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// The chain as raw DER blobs, leaf first
    pub fn raw_chain(&self) -> Vec<Vec<u8>> {
        self.links.iter().map(|l| l.raw.clone()).collect()
    }

    /// Construct every candidate path from this chain to a root the pool trusts
    ///
    /// A path is the submission chain with the anchoring root appended, or the
    /// chain as-is when its last element already is a trusted root. A pool
    /// trusting several variants of the same root name yields several paths.
    /// An empty result means the chain does not verify against this pool.
    pub fn paths_to_roots(&self, pool: &RootPool) -> Vec<Vec<Vec<u8>>> {
        let last = self.links.last().expect("parsed chain is non-empty");
        let mut paths = Vec::new();

        if pool.contains_raw(last.raw()) {
            paths.push(self.raw_chain());
        }

        for root in pool.roots_with_subject(last.issuer()) {
            if root.raw() == last.raw() {
                continue;
            }
            let mut path = self.raw_chain();
            path.push(root.raw().to_vec());
            paths.push(path);
        }

        paths
    }
}
