//! Coordinator configuration

use std::time::Duration;
use tracing::debug;

/// Default delay between a completed round and the next readiness signal
pub const DEFAULT_PACING_DELAY: Duration = Duration::from_millis(500);

/// Coordinator configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinatorConfig {
    /// Pause after logging a completion before starting the next round
    pub pacing_delay: Duration,

    /// Stop on our own after this many completed rounds
    pub max_rounds: Option<u64>,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        debug!("CoordinatorConfig::default: called");
        Self {
            pacing_delay: DEFAULT_PACING_DELAY,
            max_rounds: None,
        }
    }
}

impl CoordinatorConfig {
    /// Whether `rounds` completed rounds exhaust the configured limit
    pub fn limit_reached(&self, rounds: u64) -> bool {
        self.max_rounds.is_some_and(|limit| rounds >= limit)
    }
}
