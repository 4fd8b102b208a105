// src/allocation/mod.rs
//! Supply and fee allocation arithmetic
//!
//! All token amounts are u64 base units and every split is computed with
//! integer math: percentages are converted to basis points once, then each
//! share is an integer floor of `total * bps / 10000`. Float arithmetic
//! never touches an amount that goes on chain, so the splits are exact and
//! reproducible.
//!
//! Two remainder disciplines are used and both conserve the total:
//! - [`split_supply`] floors every share and adds the remainder to the last
//!   one, distributing the entire input
//! - [`LaunchAllocation`] and [`FeeDistribution`] floor the named shares and
//!   give the residual to a designated bucket (liquidity and treasury
//!   respectively)

mod fee_distribution;
mod price_impact;
mod supply_split;

pub use fee_distribution::{estimate_fee_on_volume, FeeDistribution, FeeShares};
pub use price_impact::{calculate_price_impact, min_amounts_after_slippage};
pub use supply_split::{split_supply, LaunchAllocation};

use crate::error::AllocationError;

/// Basis points in 100%.
pub const BPS_PER_100_PERCENT: u64 = 10_000;

/// Converts a percentage to basis points, rejecting negative and non-finite
/// values. Rounding to the nearest basis point absorbs float noise like
/// `29.999999999` before any integer math runs.
pub fn percent_to_bps(label: &str, percentage: f64) -> Result<u64, AllocationError> {
    if !percentage.is_finite() {
        return Err(AllocationError::NonFiniteShare {
            label: label.to_string(),
        });
    }
    if percentage < 0.0 {
        return Err(AllocationError::NegativeShare {
            label: label.to_string(),
            percentage,
        });
    }
    Ok((percentage * 100.0).round() as u64)
}

/// Floor of `total * bps / 10000`, computed in u128 so the product cannot
/// overflow. With `bps <= 10000` the result always fits back into u64.
pub(crate) fn floor_share(total: u64, bps: u64) -> u64 {
    ((total as u128 * bps as u128) / BPS_PER_100_PERCENT as u128) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_to_bps_rounds_float_noise() {
        assert_eq!(percent_to_bps("x", 1.0).unwrap(), 100);
        assert_eq!(percent_to_bps("x", 100.0).unwrap(), 10_000);
        assert_eq!(percent_to_bps("x", 0.0).unwrap(), 0);

        // Accumulated float error lands on the intended basis point.
        assert_eq!(percent_to_bps("x", 29.999999999999).unwrap(), 3_000);
        assert_eq!(percent_to_bps("x", 33.33).unwrap(), 3_333);
    }

    #[test]
    fn test_percent_to_bps_rejects_bad_values() {
        assert!(matches!(
            percent_to_bps("dev", -1.0),
            Err(AllocationError::NegativeShare { .. })
        ));
        assert!(matches!(
            percent_to_bps("dev", f64::NAN),
            Err(AllocationError::NonFiniteShare { .. })
        ));
        assert!(matches!(
            percent_to_bps("dev", f64::INFINITY),
            Err(AllocationError::NonFiniteShare { .. })
        ));
    }

    #[test]
    fn test_floor_share_has_no_overflow_at_u64_max() {
        // The full u64 range times 10000 bps stays exact through u128.
        assert_eq!(floor_share(u64::MAX, BPS_PER_100_PERCENT), u64::MAX);
        assert_eq!(floor_share(u64::MAX, 0), 0);
    }
}
