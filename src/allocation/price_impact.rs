// src/allocation/price_impact.rs
//! Constant-product pool math
//!
//! Price impact for a hypothetical swap against an x*y=k pool, and the
//! slippage floors quoted when liquidity is added. Impact is an estimate for
//! display and guard rails, so it runs in f64; the slippage floors go into
//! transactions, so they use the integer basis-point math shared with the
//! rest of the allocation module.

use super::{floor_share, percent_to_bps, BPS_PER_100_PERCENT};
use crate::error::AllocationError;

/// Estimates the price impact, in percent, of swapping `swap_amount` against
/// a pool holding `base_reserve` and `quote_reserve`.
///
/// `is_buy` means the swap adds quote tokens and removes base tokens; a sell
/// is the reverse. Both reserves must be non-zero, otherwise there is no
/// price to move.
pub fn calculate_price_impact(
    base_reserve: u64,
    quote_reserve: u64,
    swap_amount: u64,
    is_buy: bool,
) -> Result<f64, AllocationError> {
    if base_reserve == 0 || quote_reserve == 0 {
        return Err(AllocationError::EmptyPool);
    }

    let base = base_reserve as f64;
    let quote = quote_reserve as f64;
    let swap = swap_amount as f64;
    let k = base * quote;

    let (new_base, new_quote) = if is_buy {
        let new_quote = quote + swap;
        (k / new_quote, new_quote)
    } else {
        let new_base = base + swap;
        (new_base, k / new_base)
    };

    let price_before = quote / base;
    let price_after = new_quote / new_base;

    Ok(((price_after - price_before) / price_before).abs() * 100.0)
}

/// Applies a slippage tolerance (in percent) to the deposit amounts quoted
/// to a pool, returning the minimum base and quote amounts to accept.
///
/// Tolerances above 100% are rejected; the floors would go negative.
pub fn min_amounts_after_slippage(
    base_amount: u64,
    quote_amount: u64,
    slippage_percent: f64,
) -> Result<(u64, u64), AllocationError> {
    let slippage_bps = percent_to_bps("slippage", slippage_percent)?;
    if slippage_bps > BPS_PER_100_PERCENT {
        return Err(AllocationError::ShareSumExceedsTotal {
            total_bps: slippage_bps,
        });
    }

    let keep_bps = BPS_PER_100_PERCENT - slippage_bps;
    Ok((
        floor_share(base_amount, keep_bps),
        floor_share(quote_amount, keep_bps),
    ))
}
