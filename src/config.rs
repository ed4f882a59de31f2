//! Distributor configuration

/// Timing knobs for the distributor
///
/// All durations are plain integers so the struct stays trivially cloneable
/// and env-overridable. Defaults suit a production log set; tests shrink them.
#[derive(Debug, Clone)]
pub struct DistributorConfig {
    /// Seconds between root refresh cycles
    pub root_refresh_interval_secs: u64,

    /// Timeout per get-roots call during a refresh cycle, in milliseconds
    pub get_roots_timeout_ms: u64,

    /// Timeout per add-chain / add-pre-chain call, in milliseconds
    pub submission_timeout_ms: u64,
}

impl Default for DistributorConfig {
    fn default() -> Self {
        Self {
            root_refresh_interval_secs: 3600,
            get_roots_timeout_ms: 10_000,
            submission_timeout_ms: 30_000,
        }
    }
}

impl DistributorConfig {
    /// Load configuration from environment variables
    ///
    /// Unset or unparsable variables fall back to the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            root_refresh_interval_secs: std::env::var("CT_DIST_REFRESH_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.root_refresh_interval_secs),
            get_roots_timeout_ms: std::env::var("CT_DIST_GET_ROOTS_TIMEOUT_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.get_roots_timeout_ms),
            submission_timeout_ms: std::env::var("CT_DIST_SUBMISSION_TIMEOUT_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.submission_timeout_ms),
        }
    }

    /// Refresh interval as a `Duration`
    pub fn refresh_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.root_refresh_interval_secs)
    }

    /// Per-call get-roots deadline as a `Duration`
    pub fn get_roots_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.get_roots_timeout_ms)
    }

    /// Per-call submission deadline as a `Duration`
    pub fn submission_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.submission_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = DistributorConfig::default();
        assert_eq!(config.root_refresh_interval_secs, 3600);
        assert!(config.submission_timeout_ms > config.get_roots_timeout_ms / 10);
    }

    #[test]
    fn duration_accessors_match_fields() {
        let config = DistributorConfig {
            root_refresh_interval_secs: 2,
            get_roots_timeout_ms: 250,
            submission_timeout_ms: 500,
        };
        assert_eq!(config.refresh_interval().as_secs(), 2);
        assert_eq!(config.get_roots_timeout().as_millis(), 250);
        assert_eq!(config.submission_timeout().as_millis(), 500);
    }
}
