//! Policy engine capability and quorum-group types

use std::collections::HashMap;

use crate::error::PolicyError;
use crate::loglist::LogDescriptor;

/// Name of the group covering every approved log
pub const BASE_GROUP_NAME: &str = "All-logs";

/// A named set of logs plus the quorum it must contribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyGroup {
    /// Group name, unique within one policy result
    pub name: String,

    /// URLs of the member logs
    pub log_urls: Vec<String>,

    /// Minimum number of distinct member logs that must return an SCT
    pub min_inclusions: usize,
}

impl PolicyGroup {
    /// Whether a log belongs to this group
    pub fn contains(&self, log_url: &str) -> bool {
        self.log_urls.iter().any(|u| u == log_url)
    }
}

/// The grouping a policy engine computes for one certificate
pub type LogPolicyData = HashMap<String, PolicyGroup>;

/// Decides which quorum groups a submission must satisfy
///
/// Concrete production policies live outside this crate; the distributor only
/// needs the grouping decision.
pub trait PolicyEngine: Send + Sync {
    /// Group the approved logs into named quorum groups for this certificate
    ///
    /// `leaf_der` is the DER-encoded end-entity certificate of the submission
    /// chain; `approved` are the logs the distributor holds usable clients
    /// for. Errors are fatal to the request.
    fn groups_for(
        &self,
        leaf_der: &[u8],
        approved: &[LogDescriptor],
    ) -> Result<LogPolicyData, PolicyError>;
}

/// Build the base group spanning every approved log
///
/// The common building block for simple policies: all logs, one quorum.
/// Fails when the quorum exceeds the number of approved logs, since such a
/// group could never be satisfied.
pub fn base_group_for(
    approved: &[LogDescriptor],
    min_inclusions: usize,
) -> Result<PolicyGroup, PolicyError> {
    if approved.len() < min_inclusions {
        return Err(PolicyError::NotEnoughLogs {
            available: approved.len(),
            requested: min_inclusions,
        });
    }

    Ok(PolicyGroup {
        name: BASE_GROUP_NAME.to_string(),
        log_urls: approved.iter().map(|l| l.url.clone()).collect(),
        min_inclusions,
    })
}
