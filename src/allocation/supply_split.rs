// src/allocation/supply_split.rs
//! Initial supply allocation
//!
//! Splits the minted supply across the launch buckets (liquidity, dev,
//! marketing, burn). The liquidity share is never configured directly: it is
//! the residual after the named shares are floored, so the four buckets
//! always sum to the exact total.

use serde::{Deserialize, Serialize};

use super::{floor_share, percent_to_bps, BPS_PER_100_PERCENT};
use crate::error::AllocationError;

/// Splits `total` across labeled percentage shares using integer floors,
/// adding the division remainder to the last share so the whole input is
/// distributed.
///
/// Shares summing to less than 100% are allowed; the slack also lands on the
/// last share. Sums above 100% are rejected.
pub fn split_supply(
    total: u64,
    shares: &[(&str, f64)],
) -> Result<Vec<(String, u64)>, AllocationError> {
    if shares.is_empty() {
        return Err(AllocationError::EmptyShares);
    }

    let mut share_bps = Vec::with_capacity(shares.len());
    for (label, percentage) in shares {
        share_bps.push(percent_to_bps(label, *percentage)?);
    }

    let total_bps = share_bps
        .iter()
        .try_fold(0u64, |acc, bps| acc.checked_add(*bps))
        .unwrap_or(u64::MAX);
    if total_bps > BPS_PER_100_PERCENT {
        return Err(AllocationError::ShareSumExceedsTotal { total_bps });
    }

    let mut amounts: Vec<u64> = share_bps
        .iter()
        .map(|bps| floor_share(total, *bps))
        .collect();

    // Floors never exceed the exact proportional values, so the assigned sum
    // cannot exceed the total.
    let assigned: u128 = amounts.iter().map(|amount| *amount as u128).sum();
    let remainder = total - assigned as u64;
    if let Some(last) = amounts.last_mut() {
        *last += remainder;
    }

    Ok(shares
        .iter()
        .zip(amounts)
        .map(|((label, _), amount)| ((*label).to_string(), amount))
        .collect())
}

/// The integer allocation of a launch's initial supply, in base units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchAllocation {
    /// Total minted supply.
    pub total: u64,

    /// Residual share that seeds the liquidity pool.
    pub liquidity: u64,

    /// Dev wallet share.
    pub dev: u64,

    /// Marketing wallet share.
    pub marketing: u64,

    /// Share burned at launch.
    pub burn: u64,
}

impl LaunchAllocation {
    /// Computes the allocation from the configured percentages.
    ///
    /// Dev, marketing and burn are floored individually; liquidity takes
    /// whatever is left, so the four always sum to `total` exactly.
    pub fn from_percentages(
        total: u64,
        dev_percentage: f64,
        marketing_percentage: f64,
        burn_percentage: f64,
    ) -> Result<Self, AllocationError> {
        let dev_bps = percent_to_bps("dev", dev_percentage)?;
        let marketing_bps = percent_to_bps("marketing", marketing_percentage)?;
        let burn_bps = percent_to_bps("burn", burn_percentage)?;

        let total_bps = dev_bps
            .checked_add(marketing_bps)
            .and_then(|sum| sum.checked_add(burn_bps))
            .unwrap_or(u64::MAX);
        if total_bps > BPS_PER_100_PERCENT {
            return Err(AllocationError::ShareSumExceedsTotal { total_bps });
        }

        let dev = floor_share(total, dev_bps);
        let marketing = floor_share(total, marketing_bps);
        let burn = floor_share(total, burn_bps);
        let liquidity = total - dev - marketing - burn;

        Ok(LaunchAllocation {
            total,
            liquidity,
            dev,
            marketing,
            burn,
        })
    }

    /// Supply still in circulation once the burn share is destroyed. This is
    /// the figure post-launch verification checks against the chain.
    pub fn circulating(&self) -> u64 {
        self.total - self.burn
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_distributes_exact_total() {
        // Percentage sets summing to 100 must conserve every base unit, no
        // matter how awkward the total.
        let cases: &[(u64, &[(&str, f64)])] = &[
            (1_000_000_003, &[("a", 33.33), ("b", 33.33), ("c", 33.34)]),
            (7, &[("a", 50.0), ("b", 50.0)]),
            (u64::MAX, &[("a", 99.99), ("b", 0.01)]),
            (1, &[("only", 100.0)]),
            (0, &[("a", 60.0), ("b", 40.0)]),
        ];

        for (total, shares) in cases {
            let split = split_supply(*total, shares).unwrap();
            let sum: u128 = split.iter().map(|(_, amount)| *amount as u128).sum();
            assert_eq!(
                sum, *total as u128,
                "split of {} across {:?} lost or invented units",
                total, shares
            );
        }
    }

    #[test]
    fn test_remainder_goes_to_last_share() {
        // 10 units at 33.33/33.33/33.34 floors to 3/3/3; the leftover unit
        // lands on the final share.
        let split = split_supply(10, &[("a", 33.33), ("b", 33.33), ("c", 33.34)]).unwrap();
        let amounts: Vec<u64> = split.iter().map(|(_, amount)| *amount).collect();
        assert_eq!(amounts, vec![3, 3, 4]);
    }

    #[test]
    fn test_under_allocated_slack_goes_to_last_share() {
        // Shares summing below 100% are legal; the last share absorbs the
        // undistributed remainder along with the rounding dust.
        let split = split_supply(1_000, &[("a", 40.0), ("b", 40.0)]).unwrap();
        assert_eq!(split[0].1, 400);
        assert_eq!(split[1].1, 600);
    }

    #[test]
    fn test_split_rejects_invalid_shares() {
        assert_eq!(
            split_supply(100, &[]).unwrap_err(),
            AllocationError::EmptyShares
        );
        assert!(matches!(
            split_supply(100, &[("a", -5.0)]).unwrap_err(),
            AllocationError::NegativeShare { .. }
        ));
        assert_eq!(
            split_supply(100, &[("a", 60.0), ("b", 50.0)]).unwrap_err(),
            AllocationError::ShareSumExceedsTotal { total_bps: 11_000 }
        );
        assert!(matches!(
            split_supply(100, &[("a", f64::NAN)]).unwrap_err(),
            AllocationError::NonFiniteShare { .. }
        ));
    }

    #[test]
    fn test_launch_allocation_liquidity_is_residual() {
        // 1e18 base units at 5% dev / 3% marketing / 0% burn.
        let total = 1_000_000_000_000_000_000u64;
        let allocation = LaunchAllocation::from_percentages(total, 5.0, 3.0, 0.0).unwrap();

        assert_eq!(allocation.dev, 50_000_000_000_000_000);
        assert_eq!(allocation.marketing, 30_000_000_000_000_000);
        assert_eq!(allocation.burn, 0);
        assert_eq!(allocation.liquidity, 920_000_000_000_000_000);
        assert_eq!(
            allocation.liquidity + allocation.dev + allocation.marketing + allocation.burn,
            allocation.total
        );
        assert_eq!(allocation.circulating(), total);
    }

    #[test]
    fn test_launch_allocation_dust_stays_in_liquidity() {
        // A total not divisible by the shares: 7 units at 33.33% each floors
        // the named buckets to 2 and leaves the dust in liquidity.
        let allocation = LaunchAllocation::from_percentages(7, 33.33, 33.33, 33.33).unwrap();
        assert_eq!(allocation.dev, 2);
        assert_eq!(allocation.marketing, 2);
        assert_eq!(allocation.burn, 2);
        assert_eq!(allocation.liquidity, 1);
        assert_eq!(allocation.circulating(), 5);
    }

    #[test]
    fn test_launch_allocation_rejects_over_100_percent() {
        assert_eq!(
            LaunchAllocation::from_percentages(100, 50.0, 40.0, 20.0).unwrap_err(),
            AllocationError::ShareSumExceedsTotal { total_bps: 11_000 }
        );
    }
}
