// src/allocation/fee_distribution.rs
//! Creator fee distribution
//!
//! Transfer fees collected by the Token-2022 extension are periodically
//! swept and split between the creator, the liquidity-rewards pool, a burn
//! and the platform treasury. The split uses the same floored basis-point
//! math as the supply allocation; the treasury absorbs both the rounding
//! dust and any share percentage left unassigned, so the distribution always
//! sums to the swept amount exactly.

use serde::{Deserialize, Serialize};

use super::{floor_share, percent_to_bps, BPS_PER_100_PERCENT};
use crate::error::AllocationError;

/// Percentage split of collected fees across the four recipients.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeeShares {
    /// Creator wallet share, in percent.
    pub creator: f64,

    /// Liquidity-rewards share, in percent.
    pub liquidity: f64,

    /// Burned share, in percent.
    pub burn: f64,

    /// Platform treasury share, in percent.
    pub treasury: f64,
}

impl Default for FeeShares {
    /// The standard launchpad split: 40% creator, 30% liquidity rewards,
    /// 20% burn, 10% treasury.
    fn default() -> Self {
        FeeShares {
            creator: 40.0,
            liquidity: 30.0,
            burn: 20.0,
            treasury: 10.0,
        }
    }
}

impl FeeShares {
    /// Validates the shares: no negative or non-finite percentages, and the
    /// sum must not exceed 100%. Sums below 100% are allowed; the slack
    /// routes to the treasury when a distribution is computed.
    pub fn validate(&self) -> Result<(), AllocationError> {
        let total_bps = self
            .to_bps()?
            .into_iter()
            .try_fold(0u64, |acc, bps| acc.checked_add(bps))
            .unwrap_or(u64::MAX);
        if total_bps > BPS_PER_100_PERCENT {
            return Err(AllocationError::ShareSumExceedsTotal { total_bps });
        }
        Ok(())
    }

    fn to_bps(&self) -> Result<[u64; 4], AllocationError> {
        Ok([
            percent_to_bps("creator", self.creator)?,
            percent_to_bps("liquidity", self.liquidity)?,
            percent_to_bps("burn", self.burn)?,
            percent_to_bps("treasury", self.treasury)?,
        ])
    }
}

/// The integer distribution of one fee sweep, in base units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeDistribution {
    /// Amount owed to the creator wallet.
    pub creator: u64,

    /// Amount owed to the liquidity-rewards pool.
    pub liquidity: u64,

    /// Amount to burn.
    pub burn: u64,

    /// Amount owed to the treasury, including rounding dust.
    pub treasury: u64,
}

impl FeeDistribution {
    /// Splits `total_fee` according to `shares`.
    ///
    /// Creator, liquidity and burn are floored; the treasury receives its
    /// floored share plus whatever the floors left over, so
    /// [`total`](FeeDistribution::total) always equals `total_fee`.
    pub fn calculate(total_fee: u64, shares: &FeeShares) -> Result<Self, AllocationError> {
        shares.validate()?;
        let [creator_bps, liquidity_bps, burn_bps, treasury_bps] = shares.to_bps()?;

        let creator = floor_share(total_fee, creator_bps);
        let liquidity = floor_share(total_fee, liquidity_bps);
        let burn = floor_share(total_fee, burn_bps);
        let mut treasury = floor_share(total_fee, treasury_bps);

        let assigned = creator + liquidity + burn + treasury;
        treasury += total_fee - assigned;

        Ok(FeeDistribution {
            creator,
            liquidity,
            burn,
            treasury,
        })
    }

    /// Sum of all four buckets.
    pub fn total(&self) -> u64 {
        self.creator + self.liquidity + self.burn + self.treasury
    }
}

/// Estimates the fee the transfer-fee extension would withhold on `volume`
/// base units of transfers.
///
/// This is the aggregate rate applied to the whole volume; the per-transfer
/// `maximum_fee` cap is not modeled because individual transfer sizes are
/// unknown here.
pub fn estimate_fee_on_volume(volume: u64, transfer_fee_basis_points: u16) -> u64 {
    floor_share(volume, transfer_fee_basis_points as u64)
}
