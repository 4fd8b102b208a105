// src/rewards/volume_tracker.rs
//! Per-token volume accounting and milestone claims
//!
//! Each token accumulates traded volume monotonically. A milestone schedule
//! maps volume thresholds to reward amounts; every milestone pays out once.
//! A single update surfaces at most one claim, always the lowest unclaimed
//! threshold the cumulative volume has reached, so a large jump that crosses
//! several milestones drains them across consecutive calls instead of
//! batching the payouts.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use log::{debug, info};
use solana_program::pubkey::Pubkey;

/// A milestone claim produced by a volume update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MilestoneReward {
    /// The volume threshold that was crossed.
    pub threshold: u64,

    /// Reward amount attached to the threshold, in base units.
    pub reward: u64,
}

#[derive(Debug, Default)]
struct TokenVolume {
    cumulative: u64,
    claimed: BTreeSet<u64>,
}

/// Tracks cumulative traded volume per token and claims milestone rewards.
#[derive(Debug, Default)]
pub struct VolumeMilestoneTracker {
    tokens: HashMap<Pubkey, TokenVolume>,
}

impl VolumeMilestoneTracker {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        VolumeMilestoneTracker {
            tokens: HashMap::new(),
        }
    }

    /// Adds `delta` to the token's cumulative volume and claims the lowest
    /// still-unclaimed milestone the new cumulative satisfies, if any.
    ///
    /// The cumulative volume saturates at `u64::MAX` rather than wrapping. A
    /// zero delta is a legal way to poll for milestones left behind by an
    /// earlier multi-milestone jump.
    pub fn record_volume(
        &mut self,
        mint: &Pubkey,
        delta: u64,
        milestones: &BTreeMap<u64, u64>,
    ) -> Option<MilestoneReward> {
        let entry = self.tokens.entry(*mint).or_default();
        entry.cumulative = entry.cumulative.saturating_add(delta);
        debug!(
            "volume for {}: +{} -> {} cumulative",
            mint, delta, entry.cumulative
        );

        // BTreeMap iterates in ascending threshold order, so the first hit
        // is the lowest unclaimed milestone.
        for (&threshold, &reward) in milestones {
            if entry.cumulative >= threshold && !entry.claimed.contains(&threshold) {
                entry.claimed.insert(threshold);
                info!(
                    "milestone reached for {}: volume {} crossed {}, reward {}",
                    mint, entry.cumulative, threshold, reward
                );
                return Some(MilestoneReward { threshold, reward });
            }
        }
        None
    }

    /// Cumulative recorded volume for a token; zero if never seen.
    pub fn cumulative_volume(&self, mint: &Pubkey) -> u64 {
        self.tokens
            .get(mint)
            .map(|entry| entry.cumulative)
            .unwrap_or(0)
    }

    /// Thresholds already claimed by a token, in ascending order.
    pub fn claimed_milestones(&self, mint: &Pubkey) -> Vec<u64> {
        self.tokens
            .get(mint)
            .map(|entry| entry.claimed.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Number of tokens with recorded volume.
    pub fn tracked_token_count(&self) -> usize {
        self.tokens.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule() -> BTreeMap<u64, u64> {
        let mut milestones = BTreeMap::new();
        milestones.insert(1_000_000, 10_000);
        milestones.insert(10_000_000, 50_000);
        milestones
    }

    #[test]
    fn test_milestones_fire_once_in_order() {
        let mut tracker = VolumeMilestoneTracker::new();
        let mint = Pubkey::new_unique();
        let milestones = schedule();

        // Below the first threshold: nothing fires.
        assert_eq!(tracker.record_volume(&mint, 600_000, &milestones), None);

        // Cumulative 1.1M crosses 1M and fires exactly that reward.
        assert_eq!(
            tracker.record_volume(&mint, 500_000, &milestones),
            Some(MilestoneReward {
                threshold: 1_000_000,
                reward: 10_000
            })
        );

        // Crossing 10M fires the 10M reward.
        assert_eq!(
            tracker.record_volume(&mint, 9_000_000, &milestones),
            Some(MilestoneReward {
                threshold: 10_000_000,
                reward: 50_000
            })
        );

        // Further volume finds no unclaimed milestone.
        assert_eq!(tracker.record_volume(&mint, 5_000_000, &milestones), None);
        assert_eq!(tracker.cumulative_volume(&mint), 15_100_000);
        assert_eq!(tracker.claimed_milestones(&mint), vec![1_000_000, 10_000_000]);
    }

    #[test]
    fn test_multi_milestone_jump_pays_lowest_first() {
        let mut tracker = VolumeMilestoneTracker::new();
        let mint = Pubkey::new_unique();
        let milestones = schedule();

        // One jump past both thresholds surfaces only the lowest.
        assert_eq!(
            tracker.record_volume(&mint, 20_000_000, &milestones),
            Some(MilestoneReward {
                threshold: 1_000_000,
                reward: 10_000
            })
        );

        // A zero-delta poll drains the next one.
        assert_eq!(
            tracker.record_volume(&mint, 0, &milestones),
            Some(MilestoneReward {
                threshold: 10_000_000,
                reward: 50_000
            })
        );
        assert_eq!(tracker.record_volume(&mint, 0, &milestones), None);
    }

    #[test]
    fn test_tokens_are_tracked_independently() {
        let mut tracker = VolumeMilestoneTracker::new();
        let first = Pubkey::new_unique();
        let second = Pubkey::new_unique();
        let milestones = schedule();

        assert!(tracker
            .record_volume(&first, 1_500_000, &milestones)
            .is_some());

        // The second token starts from zero; the first token's claims do
        // not bleed over.
        assert_eq!(tracker.record_volume(&second, 600_000, &milestones), None);
        assert!(tracker
            .record_volume(&second, 600_000, &milestones)
            .is_some());
        assert_eq!(tracker.tracked_token_count(), 2);
    }

    #[test]
    fn test_cumulative_volume_saturates() {
        let mut tracker = VolumeMilestoneTracker::new();
        let mint = Pubkey::new_unique();
        let milestones = schedule();

        tracker.record_volume(&mint, u64::MAX, &milestones);
        tracker.record_volume(&mint, u64::MAX, &milestones);
        assert_eq!(tracker.cumulative_volume(&mint), u64::MAX);
    }

    #[test]
    fn test_empty_schedule_never_fires() {
        let mut tracker = VolumeMilestoneTracker::new();
        let mint = Pubkey::new_unique();

        assert_eq!(
            tracker.record_volume(&mint, u64::MAX, &BTreeMap::new()),
            None
        );
    }
}
