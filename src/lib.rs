//! Certificate-transparency submission distributor
//!
//! Fans a certificate (pre)chain out to a configurable set of CT logs,
//! validates the chain against each log's background-refreshed trusted-root
//! pool before sending, and aggregates the returned SCTs against a pluggable
//! quorum policy.
//!
//! ```no_run
//! use std::sync::Arc;
//! use ct_distributor::{build_http_client, Distributor};
//! # use ct_distributor::{DistributorResult, LogDescriptor, PolicyEngine};
//! # fn example(logs: Vec<LogDescriptor>, policy: Arc<dyn PolicyEngine>) -> DistributorResult<()> {
//! let distributor = Arc::new(Distributor::new(&logs, policy, build_http_client)?);
//!
//! let (shutdown_tx, shutdown_rx) = tokio::sync::broadcast::channel(1);
//! let refresher = Arc::clone(&distributor);
//! tokio::spawn(async move { refresher.run(shutdown_rx).await });
//! # Ok(())
//! # }
//! ```

pub mod chain;
pub mod client;
pub mod config;
pub mod distributor;
pub mod error;
pub mod loglist;
pub mod rootpool;
pub mod sct;
pub mod traits;

// Re-exports
pub use chain::CertChain;
pub use client::{build_http_client, HttpLogClient};
pub use config::DistributorConfig;
pub use distributor::Distributor;
pub use error::{
    ChainError, ClientError, DistributorError, DistributorResult, GroupShortfall, PolicyError,
    PolicyShortfall, SubmitError,
};
pub use loglist::LogDescriptor;
pub use rootpool::{RootPool, RootPoolStore};
pub use sct::{AssignedSct, SignedCertificateTimestamp};
pub use traits::{base_group_for, LogClient, LogPolicyData, PolicyEngine, PolicyGroup};
