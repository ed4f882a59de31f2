//! Submission fan-out and quorum aggregation
//!
//! Each request validates the chain once, asks the policy engine which
//! groups must be satisfied, launches one independent attempt per targeted
//! log, and folds the outcomes into per-group quorum accounting. Per-log
//! failures are absorbed; a request fails only with one of the classified
//! request-level errors.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use futures::stream::{FuturesUnordered, StreamExt};

use super::Distributor;
use crate::chain::CertChain;
use crate::error::{
    ClientError, DistributorError, DistributorResult, GroupShortfall, PolicyShortfall, SubmitError,
};
use crate::sct::{AssignedSct, SignedCertificateTimestamp};
use crate::traits::LogClient;

/// Which submission endpoint a request targets
#[derive(Debug, Clone, Copy)]
enum ChainKind {
    Certificate,
    Precertificate,
}

/// Result of one log's processed submission attempt
struct SubmissionOutcome {
    log_url: String,
    result: Result<SignedCertificateTimestamp, SubmitError>,
}

/// Quorum accounting for one policy group
struct GroupProgress {
    required: usize,
    eligible: usize,
    successes: HashSet<String>,
}

impl GroupProgress {
    fn satisfied(&self) -> bool {
        self.successes.len() >= self.required
    }
}

impl Distributor {
    /// Submit a final certificate chain to every policy-required log
    ///
    /// On success returns every SCT obtained, at most one per log URL. On
    /// failure returns exactly one classified error and no SCTs; see
    /// [`DistributorError`] for the taxonomy. Malformed input is rejected
    /// before any policy or network work, an uninitialized root store right
    /// after.
    pub async fn add_chain(&self, raw_chain: &[Vec<u8>]) -> DistributorResult<Vec<AssignedSct>> {
        self.submit(raw_chain, ChainKind::Certificate).await
    }

    /// Submit a precertificate chain to every policy-required log
    ///
    /// Same contract as [`Distributor::add_chain`].
    pub async fn add_pre_chain(
        &self,
        raw_chain: &[Vec<u8>],
    ) -> DistributorResult<Vec<AssignedSct>> {
        self.submit(raw_chain, ChainKind::Precertificate).await
    }

    async fn submit(
        &self,
        raw_chain: &[Vec<u8>],
        kind: ChainKind,
    ) -> DistributorResult<Vec<AssignedSct>> {
        let chain = CertChain::parse(raw_chain)?;

        if !self.store.is_initialized() {
            return Err(DistributorError::NotInitialized);
        }

        let groups = self.policy.groups_for(chain.leaf().raw(), &self.approved)?;

        // Union of group members we hold clients for, and the reverse map
        // from log to the groups its outcome must be counted against.
        let mut targets: Vec<String> = Vec::new();
        let mut memberships: HashMap<String, Vec<String>> = HashMap::new();
        for (name, group) in &groups {
            for url in &group.log_urls {
                if !self.clients.contains_key(url) {
                    continue;
                }
                let entry = memberships.entry(url.clone()).or_insert_with(|| {
                    targets.push(url.clone());
                    Vec::new()
                });
                if !entry.contains(name) {
                    entry.push(name.clone());
                }
            }
        }

        let mut progress: HashMap<String, GroupProgress> = groups
            .iter()
            .map(|(name, group)| {
                let eligible: HashSet<&str> = group
                    .log_urls
                    .iter()
                    .filter(|u| self.clients.contains_key(*u))
                    .map(String::as_str)
                    .collect();
                (
                    name.clone(),
                    GroupProgress {
                        required: group.min_inclusions,
                        eligible: eligible.len(),
                        successes: HashSet::new(),
                    },
                )
            })
            .collect();

        // A group with a quorum but no eligible members can never be
        // satisfied; fail before any network work instead of waiting out
        // the attempts of the other groups.
        let mut doomed: Vec<GroupShortfall> = progress
            .iter()
            .filter(|(_, g)| g.eligible == 0 && !g.satisfied())
            .map(|(name, g)| GroupShortfall {
                group: name.clone(),
                collected: 0,
                required: g.required,
            })
            .collect();
        if !doomed.is_empty() {
            doomed.sort_by(|a, b| a.group.cmp(&b.group));
            return Err(DistributorError::InsufficientScts(PolicyShortfall(doomed)));
        }

        let mut outcomes: FuturesUnordered<_> = targets
            .iter()
            .map(|url| {
                let client = Arc::clone(&self.clients[url]);
                let url = url.clone();
                let chain = &chain;
                async move {
                    let result = self.attempt(client, &url, chain, kind).await;
                    SubmissionOutcome {
                        log_url: url,
                        result,
                    }
                }
            })
            .collect();

        let mut collected: HashMap<String, SignedCertificateTimestamp> = HashMap::new();

        // The request completes as soon as every group reached quorum;
        // remaining in-flight attempts are dropped, not awaited. On the
        // failure path all attempts are drained first so the shortfall
        // diagnostic reflects final counts.
        loop {
            if progress.values().all(GroupProgress::satisfied) {
                break;
            }

            match outcomes.next().await {
                Some(outcome) => {
                    let groups_of = memberships
                        .get(&outcome.log_url)
                        .map(Vec::as_slice)
                        .unwrap_or_default();
                    match outcome.result {
                        Ok(sct) => {
                            for name in groups_of {
                                if let Some(g) = progress.get_mut(name) {
                                    g.successes.insert(outcome.log_url.clone());
                                }
                            }
                            collected.insert(outcome.log_url, sct);
                        }
                        Err(e) => {
                            tracing::debug!(log = %outcome.log_url, error = %e, "submission attempt failed");
                        }
                    }
                }
                None => break,
            }
        }

        let mut shortfalls: Vec<GroupShortfall> = progress
            .iter()
            .filter(|(_, g)| !g.satisfied())
            .map(|(name, g)| GroupShortfall {
                group: name.clone(),
                collected: g.successes.len(),
                required: g.required,
            })
            .collect();

        if !shortfalls.is_empty() {
            shortfalls.sort_by(|a, b| a.group.cmp(&b.group));
            return Err(DistributorError::InsufficientScts(PolicyShortfall(
                shortfalls,
            )));
        }

        Ok(collected
            .into_iter()
            .map(|(log_url, sct)| AssignedSct { log_url, sct })
            .collect())
    }

    /// One per-log attempt: validate against the log's roots, then submit
    ///
    /// Never retries; tries each candidate trust path at most once until one
    /// submission succeeds, each call bounded by the configured deadline.
    async fn attempt(
        &self,
        client: Arc<dyn LogClient>,
        log_url: &str,
        chain: &CertChain,
        kind: ChainKind,
    ) -> Result<SignedCertificateTimestamp, SubmitError> {
        let pool = self
            .store
            .get(log_url)
            .ok_or_else(|| SubmitError::NoRoots(log_url.to_string()))?;

        let paths = chain.paths_to_roots(&pool);
        if paths.is_empty() {
            return Err(SubmitError::ChainNotVerified(log_url.to_string()));
        }

        let timeout = self.config.submission_timeout();
        let mut last_err = None;

        for path in &paths {
            let call = async {
                match kind {
                    ChainKind::Certificate => client.submit_chain(path).await,
                    ChainKind::Precertificate => client.submit_pre_chain(path).await,
                }
            };
            match tokio::time::timeout(timeout, call).await {
                Ok(Ok(sct)) => return Ok(sct),
                Ok(Err(e)) => {
                    tracing::debug!(log = %log_url, error = %e, "submission path rejected, trying next");
                    last_err = Some(SubmitError::Client(e));
                }
                Err(_) => {
                    last_err = Some(SubmitError::Client(ClientError::Timeout(
                        self.config.submission_timeout_ms,
                    )));
                }
            }
        }

        Err(last_err.unwrap_or_else(|| SubmitError::ChainNotVerified(log_url.to_string())))
    }
}
