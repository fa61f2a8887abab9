//! Scenario configuration
//!
//! The harness recognizes a single knob: the overall scenario timeout. The
//! default is finite so no run can hang a test suite.

use core::time::Duration;
use serde::{Deserialize, Serialize};

/// Configuration for one dual-peer scenario run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Overall bound on the scenario: both scripts must finish within this
    /// duration or the run is reported as a timeout failure.
    pub timeout: Duration,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30), // generous for real engines over real networks
        }
    }
}

impl ScenarioConfig {
    /// Create a configuration with an explicit timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Create a tight configuration for in-memory engines in tests.
    pub fn quick() -> Self {
        Self {
            timeout: Duration::from_secs(5),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_timeout_is_finite() {
        let config = ScenarioConfig::default();
        assert!(config.timeout > Duration::ZERO);
        assert!(config.timeout < Duration::from_secs(600));
    }

    #[test]
    fn quick_is_tighter_than_default() {
        assert!(ScenarioConfig::quick().timeout < ScenarioConfig::default().timeout);
    }
}
