//! Configuration for the history ranker.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{HistoryError, Result};

/// Number of clipboard items kept when nothing else is configured.
pub const DEFAULT_MAX_HISTORY: usize = 10;

/// Configuration for a [`HistoryRanker`](crate::HistoryRanker).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum number of entries kept; older entries are evicted first.
    pub max_history: usize,

    /// Upper bound on a single provider call, in milliseconds.
    ///
    /// `None` waits for the provider indefinitely.
    pub embed_timeout_ms: Option<u64>,
}

impl HistoryConfig {
    /// Create a configuration with the given capacity.
    pub fn new(max_history: usize) -> Self {
        Self {
            max_history,
            ..Self::default()
        }
    }

    /// Bound every provider call by `timeout`.
    pub fn with_embed_timeout(mut self, timeout: Duration) -> Self {
        self.embed_timeout_ms = Some(timeout.as_millis().try_into().unwrap_or(u64::MAX));
        self
    }

    /// The provider timeout, if one is configured.
    pub fn embed_timeout(&self) -> Option<Duration> {
        self.embed_timeout_ms.map(Duration::from_millis)
    }

    /// Check the configuration before a ranker is built from it.
    pub fn validate(&self) -> Result<()> {
        if self.max_history == 0 {
            return Err(HistoryError::InvalidConfig(
                "max_history must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_history: DEFAULT_MAX_HISTORY,
            embed_timeout_ms: None,
        }
    }
}
