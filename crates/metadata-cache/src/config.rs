//! Cache configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How long entries stay valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Entries at most this old are served without asking the backend.
    pub refresh_after_secs: u64,

    /// Extra age tolerated when the backend cannot be reached.
    pub stale_if_error_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            refresh_after_secs: 300,
            stale_if_error_secs: 0,
        }
    }
}

impl CacheConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("MDCACHE_REFRESH_AFTER_SECS") {
            if let Ok(secs) = val.parse() {
                config.refresh_after_secs = secs;
            }
        }

        if let Ok(val) = std::env::var("MDCACHE_STALE_IF_ERROR_SECS") {
            if let Ok(secs) = val.parse() {
                config.stale_if_error_secs = secs;
            }
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self
            .refresh_after_secs
            .checked_add(self.stale_if_error_secs)
            .is_none()
        {
            return Err("refresh window plus stale grace overflows".to_string());
        }
        Ok(())
    }

    pub fn refresh_after(&self) -> Duration {
        Duration::from_secs(self.refresh_after_secs)
    }

    /// Maximum age of an entry served while the backend is failing.
    pub fn max_stale_age(&self) -> Duration {
        Duration::from_secs(self.refresh_after_secs.saturating_add(self.stale_if_error_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = CacheConfig::default();
        assert_eq!(c.refresh_after(), Duration::from_secs(300));
        assert_eq!(c.max_stale_age(), c.refresh_after());
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_overflowing_grace_is_rejected() {
        let c = CacheConfig {
            refresh_after_secs: u64::MAX,
            stale_if_error_secs: 1,
        };
        assert!(c.validate().is_err());
    }
}
