// src/config/options.rs
use std::time::Duration;

use super::consts::*;
use crate::error::Result;
use crate::shard::ShardAssignment;

/// Runtime knobs for one scrape run. CLI flags map onto these.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScrapeOptions {
    /// Most recent activities taken per athlete.
    pub per_athlete: usize,
    /// Upper bound for the post-navigation URL wait.
    pub wait: Duration,
    /// Fixed pause after navigation, before the first DOM read.
    pub settle: Duration,
    /// Enable the network-capture strategy.
    pub use_cdp: bool,
    pub cdp_timeout: Duration,
    pub cdp_poll: Duration,
    pub scroll_rounds: usize,
    pub scroll_pause: Duration,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            per_athlete: DEFAULT_PER_ATHLETE,
            wait: PAGE_WAIT,
            settle: SETTLE_DELAY,
            use_cdp: false,
            cdp_timeout: CDP_TIMEOUT,
            cdp_poll: CDP_POLL,
            scroll_rounds: SCROLL_ROUNDS,
            scroll_pause: SCROLL_PAUSE,
        }
    }
}

impl ScrapeOptions {
    /// No sleeps anywhere. For saved pages and tests.
    pub fn offline() -> Self {
        Self {
            wait: Duration::ZERO,
            settle: Duration::ZERO,
            cdp_timeout: Duration::ZERO,
            cdp_poll: Duration::ZERO,
            scroll_pause: Duration::ZERO,
            ..Self::default()
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShardOptions {
    pub total_shards: usize,
    pub shard_id: usize,
}

impl Default for ShardOptions {
    fn default() -> Self {
        Self { total_shards: 1, shard_id: 1 }
    }
}

impl ShardOptions {
    pub fn assignment(&self) -> Result<ShardAssignment> {
        ShardAssignment::new(self.shard_id, self.total_shards)
    }
}
