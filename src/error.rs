//! Distributor error types
//!
//! Errors are layered the way the components are: `ClientError` for the
//! transport edge, `ChainError` for input parsing, `SubmitError` for one
//! per-log attempt (absorbed into quorum accounting, never fatal to the
//! request), and `DistributorError` for everything the caller sees.

use thiserror::Error;

/// Errors from a log client (transport layer)
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network-level failure (connect, DNS, TLS, ...)
    #[error("network error: {0}")]
    Network(String),

    /// Request exceeded its deadline
    #[error("request timed out after {0}ms")]
    Timeout(u64),

    /// Log answered with a non-success HTTP status
    #[error("log returned status {status}: {message}")]
    Status { status: u16, message: String },

    /// Log answered 2xx but the body was not usable
    #[error("invalid response from log: {0}")]
    InvalidResponse(String),

    /// Client could not be constructed for this log
    #[error("failed to build client: {0}")]
    Build(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ClientError::Timeout(0)
        } else if e.is_connect() {
            ClientError::Network(format!("connection failed: {}", e))
        } else if e.is_decode() {
            ClientError::InvalidResponse(e.to_string())
        } else {
            ClientError::Network(e.to_string())
        }
    }
}

/// Errors raised while parsing a submission chain or building trust paths
#[derive(Debug, Error)]
pub enum ChainError {
    /// Chain contained no certificates
    #[error("empty chain")]
    Empty,

    /// One element of the chain is not a DER certificate
    #[error("certificate {index} does not parse: {reason}")]
    Parse { index: usize, reason: String },

    /// Adjacent certificates do not chain (leaf-first order required)
    #[error("certificate {} is not issued by certificate {}", .index, .index + 1)]
    Misordered { index: usize },
}

/// Outcome classification for one per-log submission attempt
///
/// These never abort the request; the aggregator counts the log as a
/// non-contributor and moves on.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The root store has no pool for this log yet
    #[error("no roots available for log {0}")]
    NoRoots(String),

    /// No path from the chain to any of the log's trusted roots
    #[error("chain does not verify against roots of log {0}")]
    ChainNotVerified(String),

    /// The log client call itself failed
    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Errors from a policy engine
#[derive(Debug, Error)]
pub enum PolicyError {
    /// Fewer approved logs than the policy needs
    #[error("policy wants {requested} logs but only {available} are approved")]
    NotEnoughLogs { available: usize, requested: usize },

    /// Anything else the engine wants to surface
    #[error("{0}")]
    Internal(String),
}

/// One group that missed its quorum
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupShortfall {
    /// Policy group name
    pub group: String,
    /// Distinct successful logs collected for the group
    pub collected: usize,
    /// Quorum the group required
    pub required: usize,
}

impl std::fmt::Display for GroupShortfall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "group {:?} got {} of {} required SCTs",
            self.group, self.collected, self.required
        )
    }
}

/// Every group that fell short, for the `InsufficientScts` diagnostic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyShortfall(pub Vec<GroupShortfall>);

impl std::fmt::Display for PolicyShortfall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, s) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", s)?;
        }
        Ok(())
    }
}

/// Request- and construction-level errors returned to callers
///
/// Exactly one variant classifies a failing call. A failing call always
/// carries an empty SCT collection; diagnostic detail lives inside the
/// variant.
#[derive(Debug, Error)]
pub enum DistributorError {
    /// Every client build failed for a non-empty log list
    #[error("failed to create log client: all {attempted} attempted logs failed")]
    NoUsableClients { attempted: usize },

    /// The input bytes are not a usable chain; retrying is pointless
    #[error("malformed chain: {0}")]
    MalformedChain(#[from] ChainError),

    /// No log has root material yet; the refresh loop has not succeeded once
    #[error("distributor not initialized: no log roots have been fetched yet")]
    NotInitialized,

    /// The policy engine refused the request
    #[error("policy engine error: {0}")]
    Policy(#[from] PolicyError),

    /// Not enough distinct logs cooperated; retrying may succeed
    #[error("insufficient SCTs for policy: {0}")]
    InsufficientScts(PolicyShortfall),
}

impl DistributorError {
    /// Stable machine-readable code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            DistributorError::NoUsableClients { .. } => "NO_USABLE_CLIENTS",
            DistributorError::MalformedChain(_) => "MALFORMED_CHAIN",
            DistributorError::NotInitialized => "NOT_INITIALIZED",
            DistributorError::Policy(_) => "POLICY_ENGINE_FAILURE",
            DistributorError::InsufficientScts(_) => "INSUFFICIENT_SCTS",
        }
    }

    /// Whether an immediate retry of the same request can succeed
    ///
    /// Only a quorum miss is transient; a malformed chain will never parse
    /// and an uninitialized distributor needs a refresh cycle, not a retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, DistributorError::InsufficientScts(_))
    }
}

/// Distributor result type alias
pub type DistributorResult<T> = Result<T, DistributorError>;
