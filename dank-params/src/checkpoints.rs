//! Blockchain checkpoints and sync progress estimation
//!
//! A checkpoint pins the block hash at a height. Any chain that disagrees at
//! or before the last checkpoint is rejected without full validation.

use crate::hash::Hash256;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Weight of post-checkpoint work, where signatures must be checked
pub const SIGCHECK_VERIFICATION_FACTOR: f64 = 5.0;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Per-network checkpoint table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckpointData {
    /// Height to expected block hash
    checkpoints: BTreeMap<u32, Hash256>,
    /// Timestamp (unix seconds) of the last checkpoint block
    pub time_last_checkpoint: i64,
    /// Transactions between genesis and the last checkpoint
    pub transactions_last_checkpoint: u64,
    /// Estimated transactions per day after the last checkpoint
    pub transactions_per_day: f64,
}

/// The part of a chain tip that progress estimation looks at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainTip {
    /// Transactions from genesis up to and including the tip
    pub chain_tx: u64,
    /// Tip block time (unix seconds)
    pub time: i64,
}

fn days_between(from: i64, to: i64) -> f64 {
    to.saturating_sub(from).max(0) as f64 / SECONDS_PER_DAY
}

impl CheckpointData {
    /// Build a checkpoint table from `(height, hash)` literals.
    ///
    /// Heights must be strictly increasing; an empty table is valid.
    pub fn new(
        entries: &[(u32, &str)],
        time_last_checkpoint: i64,
        transactions_last_checkpoint: u64,
        transactions_per_day: f64,
    ) -> Result<Self> {
        let mut checkpoints = BTreeMap::new();
        let mut previous: Option<u32> = None;

        for (height, hash) in entries {
            if let Some(prev) = previous {
                if *height <= prev {
                    return Err(Error::CheckpointOrder {
                        previous: prev,
                        height: *height,
                    });
                }
            }
            checkpoints.insert(*height, hash.parse()?);
            previous = Some(*height);
        }

        Ok(Self {
            checkpoints,
            time_last_checkpoint,
            transactions_last_checkpoint,
            transactions_per_day,
        })
    }

    /// Expected hash at `height`, if it is a checkpoint
    pub fn hash_at(&self, height: u32) -> Option<&Hash256> {
        self.checkpoints.get(&height)
    }

    /// False only if `height` is a checkpoint and `hash` disagrees with it
    pub fn check_block(&self, height: u32, hash: &Hash256) -> bool {
        match self.checkpoints.get(&height) {
            Some(expected) => expected == hash,
            None => true,
        }
    }

    /// Height of the last checkpoint, or 0 without any
    pub fn total_blocks_estimate(&self) -> u32 {
        self.checkpoints.keys().next_back().copied().unwrap_or(0)
    }

    /// Highest checkpoint whose block the caller already knows
    pub fn last_checkpoint<F>(&self, is_known: F) -> Option<(u32, &Hash256)>
    where
        F: Fn(&Hash256) -> bool,
    {
        self.checkpoints
            .iter()
            .rev()
            .find(|(_, hash)| is_known(hash))
            .map(|(height, hash)| (*height, hash))
    }

    /// Iterate checkpoints in height order
    pub fn iter(&self) -> impl Iterator<Item = (u32, &Hash256)> {
        self.checkpoints.iter().map(|(height, hash)| (*height, hash))
    }

    /// Number of checkpoints
    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }

    /// Guess how far verification has progressed, in `[0, 1]`.
    ///
    /// Work before the last checkpoint is cheap; work after it is weighted by
    /// [`SIGCHECK_VERIFICATION_FACTOR`] when `sigchecks` is set.
    pub fn guess_verification_progress(&self, tip: ChainTip, now: i64, sigchecks: bool) -> f64 {
        let factor = if sigchecks { SIGCHECK_VERIFICATION_FACTOR } else { 1.0 };
        let last_tx = self.transactions_last_checkpoint as f64;

        let (work_before, work_after) = if tip.chain_tx <= self.transactions_last_checkpoint {
            let cheap_before = tip.chain_tx as f64;
            let cheap_after = last_tx - cheap_before;
            let expensive_after = days_between(self.time_last_checkpoint, now) * self.transactions_per_day;
            (cheap_before, cheap_after + expensive_after * factor)
        } else {
            let expensive_before = (tip.chain_tx - self.transactions_last_checkpoint) as f64;
            let expensive_after = days_between(tip.time, now) * self.transactions_per_day;
            (last_tx + expensive_before * factor, expensive_after * factor)
        };

        let total = work_before + work_after;
        if total <= 0.0 {
            return 1.0;
        }
        (work_before / total).clamp(0.0, 1.0)
    }

    /// Estimate progress from a height alone.
    ///
    /// Up to the last checkpoint the transaction count is interpolated
    /// linearly; past it, block times advance by `target_spacing` and
    /// transactions accrue at the declared daily rate.
    pub fn estimate_progress(&self, height: u32, now: i64, target_spacing: u64) -> f64 {
        let last_height = self.total_blocks_estimate();

        let tip = if height <= last_height {
            let chain_tx = if last_height == 0 {
                self.transactions_last_checkpoint
            } else {
                (self.transactions_last_checkpoint as u128 * height as u128 / last_height as u128) as u64
            };
            ChainTip {
                chain_tx,
                time: self.time_last_checkpoint,
            }
        } else {
            let blocks_past = i64::from(height - last_height);
            let spacing = i64::try_from(target_spacing).unwrap_or(i64::MAX);
            let tip_time = self
                .time_last_checkpoint
                .saturating_add(blocks_past.saturating_mul(spacing));
            let accrued = days_between(self.time_last_checkpoint, tip_time) * self.transactions_per_day;
            ChainTip {
                chain_tx: self.transactions_last_checkpoint.saturating_add(accrued as u64),
                time: tip_time.min(now),
            }
        };

        self.guess_verification_progress(tip, now, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GENESIS: &str = "ace489e89e9b99dc4e83076aafbd8d7b91101d735f6f4d2857166b3e53e01b30";
    const BLOCK_1: &str = "faee446cd46a9802b01aba659240186cc4ce3b46f59949d0305f8ba5ef439f16";
    const BLOCK_95: &str = "ae26a1e76046676745271672488b10c920018f214c727c5c80c4be5fa7135179";

    fn sample() -> CheckpointData {
        CheckpointData::new(&[(0, GENESIS), (1, BLOCK_1), (95, BLOCK_95)], 1447561485, 95, 5500.0).unwrap()
    }

    #[test]
    fn test_hash_at() {
        let data = sample();
        assert_eq!(data.hash_at(95).unwrap().to_string(), BLOCK_95);
        assert!(data.hash_at(50).is_none());
        assert_eq!(data.total_blocks_estimate(), 95);
    }

    #[test]
    fn test_rejects_unordered_heights() {
        let result = CheckpointData::new(&[(5, GENESIS), (5, BLOCK_1)], 0, 0, 0.0);
        assert!(matches!(result, Err(Error::CheckpointOrder { previous: 5, height: 5 })));

        let result = CheckpointData::new(&[(5, GENESIS), (2, BLOCK_1)], 0, 0, 0.0);
        assert!(matches!(result, Err(Error::CheckpointOrder { previous: 5, height: 2 })));
    }

    #[test]
    fn test_rejects_bad_hash() {
        let result = CheckpointData::new(&[(0, "not-a-hash")], 0, 0, 0.0);
        assert!(matches!(result, Err(Error::InvalidHash(_))));
    }

    #[test]
    fn test_empty_table() {
        let data = CheckpointData::new(&[], 0, 0, 0.0).unwrap();
        assert!(data.is_empty());
        assert_eq!(data.total_blocks_estimate(), 0);
        assert!(data.hash_at(0).is_none());
        assert!(data.check_block(0, &Hash256::ZERO));
        assert_eq!(data.estimate_progress(10, 1_500_000_000, 150), 1.0);
    }

    #[test]
    fn test_check_block() {
        let data = sample();
        let genesis: Hash256 = GENESIS.parse().unwrap();
        assert!(data.check_block(0, &genesis));
        assert!(!data.check_block(1, &genesis));
        assert!(data.check_block(2, &genesis));
    }

    #[test]
    fn test_last_checkpoint() {
        let data = sample();
        let block_1: Hash256 = BLOCK_1.parse().unwrap();
        let (height, hash) = data.last_checkpoint(|h| *h == block_1).unwrap();
        assert_eq!(height, 1);
        assert_eq!(*hash, block_1);
        assert!(data.last_checkpoint(|_| false).is_none());
    }

    #[test]
    fn test_progress_at_checkpoint_time() {
        let data = sample();
        // No time has passed, so the last checkpoint means fully synced.
        let progress = data.estimate_progress(95, data.time_last_checkpoint, 150);
        assert!((progress - 1.0).abs() < 1e-9);

        let halfway = data.estimate_progress(47, data.time_last_checkpoint, 150);
        assert!(halfway > 0.4 && halfway < 0.6);
    }

    #[test]
    fn test_progress_past_checkpoint() {
        let data = sample();
        let now = data.time_last_checkpoint + 10 * 86_400;

        let at_checkpoint = data.estimate_progress(95, now, 150);
        let later = data.estimate_progress(95 + 576 * 5, now, 150);
        let caught_up = data.estimate_progress(95 + 576 * 20, now, 150);

        assert!(at_checkpoint < later);
        assert!(later < caught_up);
        assert!((caught_up - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_progress_with_extreme_clock() {
        let data = sample();
        for now in [i64::MIN, 0, i64::MAX] {
            for height in [0, 47, 95, 96, u32::MAX] {
                let progress = data.estimate_progress(height, now, 150);
                assert!((0.0..=1.0).contains(&progress), "height {height} now {now}");
            }
            let tip = ChainTip { chain_tx: 10, time: i64::MAX };
            let progress = data.guess_verification_progress(tip, now, true);
            assert!((0.0..=1.0).contains(&progress));
        }
        assert_eq!(data.estimate_progress(u32::MAX, 0, u64::MAX), 1.0);
    }

    #[test]
    fn test_sigchecks_weight_remaining_work() {
        let data = sample();
        let now = data.time_last_checkpoint + 86_400;
        let tip = ChainTip { chain_tx: 50, time: data.time_last_checkpoint };

        let cheap = data.guess_verification_progress(tip, now, false);
        let weighted = data.guess_verification_progress(tip, now, true);
        assert!(weighted < cheap);
    }
}
