//! Capability contracts consumed by the distributor
//!
//! The distributor talks to the outside world through two traits: one log
//! client per known log, and one policy engine per distributor. Test doubles
//! implement the same contracts.

pub mod log_client;
pub mod policy;

pub use log_client::LogClient;
pub use policy::{base_group_for, LogPolicyData, PolicyEngine, PolicyGroup, BASE_GROUP_NAME};
