// src/shard.rs
// Contiguous, deterministic split of an ordered id list across T workers.
// Remainder ids go to the earliest shards, so sizes differ by at most one.
use std::ops::Range;

use crate::error::{Result, ScrapeError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShardAssignment {
    shard_id: usize,     // 1-indexed
    total_shards: usize,
}

impl ShardAssignment {
    pub fn new(shard_id: usize, total_shards: usize) -> Result<Self> {
        if shard_id < 1 || shard_id > total_shards {
            return Err(ScrapeError::InvalidShard { shard_id, total_shards });
        }
        Ok(Self { shard_id, total_shards })
    }

    /// Single shard covering everything.
    pub fn whole() -> Self {
        Self { shard_id: 1, total_shards: 1 }
    }

    pub fn shard_id(&self) -> usize { self.shard_id }
    pub fn total_shards(&self) -> usize { self.total_shards }

    /// Half-open index range of this shard over a list of `len` ids.
    pub fn range(&self, len: usize) -> Range<usize> {
        let chunk = len / self.total_shards;
        let remainder = len % self.total_shards;
        let before = self.shard_id - 1;

        let start = before * chunk + before.min(remainder);
        let extra = if self.shard_id <= remainder { 1 } else { 0 };
        start..start + chunk + extra
    }

    pub fn slice<'a, T>(&self, ids: &'a [T]) -> &'a [T] {
        &ids[self.range(ids.len())]
    }
}
