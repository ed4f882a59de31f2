//! Submission distributor facade
//!
//! Owns one client per known log, the root-pool store the background refresh
//! keeps current, and the fan-out/aggregation logic for submission requests.
//! Construction is infallible per log: a factory failure removes that log
//! from all subsequent operations instead of aborting the build, unless no
//! usable client remains at all.

mod refresh;
mod submit;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::config::DistributorConfig;
use crate::error::{ClientError, DistributorError, DistributorResult};
use crate::loglist::LogDescriptor;
use crate::rootpool::{RootPool, RootPoolStore};
use crate::traits::{LogClient, PolicyEngine};

/// Fans submissions out to every policy-required log and aggregates SCTs
pub struct Distributor {
    /// One client per log that built successfully; read-only after construction
    clients: HashMap<String, Arc<dyn LogClient>>,

    /// Descriptors of the logs backing `clients`, for policy computation
    approved: Vec<LogDescriptor>,

    policy: Arc<dyn PolicyEngine>,
    store: RootPoolStore,
    config: DistributorConfig,
}

impl fmt::Debug for Distributor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Distributor")
            .field("clients", &self.clients.keys().collect::<Vec<_>>())
            .field("approved", &self.approved)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Distributor {
    /// Build a distributor with the default configuration
    pub fn new(
        logs: &[LogDescriptor],
        policy: Arc<dyn PolicyEngine>,
        build_client: impl Fn(&LogDescriptor) -> Result<Arc<dyn LogClient>, ClientError>,
    ) -> DistributorResult<Self> {
        Self::with_config(logs, policy, build_client, DistributorConfig::default())
    }

    /// Build a distributor, invoking the factory once per descriptor
    ///
    /// Factory failures are logged and the log skipped. Succeeds for an empty
    /// log list; fails only when the list is non-empty and every build failed.
    pub fn with_config(
        logs: &[LogDescriptor],
        policy: Arc<dyn PolicyEngine>,
        build_client: impl Fn(&LogDescriptor) -> Result<Arc<dyn LogClient>, ClientError>,
        config: DistributorConfig,
    ) -> DistributorResult<Self> {
        let mut clients: HashMap<String, Arc<dyn LogClient>> = HashMap::new();
        let mut approved = Vec::new();

        for log in logs {
            if clients.contains_key(&log.url) {
                tracing::warn!(log = %log.url, "duplicate log URL in log list; keeping first");
                continue;
            }
            match build_client(log) {
                Ok(client) => {
                    tracing::debug!(
                        log = %log.url,
                        log_id = %hex::encode(log.log_id()),
                        "registered log client"
                    );
                    clients.insert(log.url.clone(), client);
                    approved.push(log.clone());
                }
                Err(e) => {
                    tracing::warn!(log = %log.url, error = %e, "failed to build log client; skipping");
                }
            }
        }

        if !logs.is_empty() && clients.is_empty() {
            return Err(DistributorError::NoUsableClients {
                attempted: logs.len(),
            });
        }

        tracing::info!(
            usable = clients.len(),
            attempted = logs.len(),
            "distributor constructed"
        );

        Ok(Self {
            clients,
            approved,
            policy,
            store: RootPoolStore::new(),
            config,
        })
    }

    /// Logs the distributor holds a usable client for
    pub fn approved_logs(&self) -> &[LogDescriptor] {
        &self.approved
    }

    /// Number of usable log clients
    pub fn client_count(&self) -> usize {
        self.clients.len()
    }

    /// Latest root-pool snapshot for a log
    ///
    /// `None` means that log has never completed a successful refresh.
    pub fn root_pool(&self, log_url: &str) -> Option<Arc<RootPool>> {
        self.store.get(log_url)
    }
}
