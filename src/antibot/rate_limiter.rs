// src/antibot/rate_limiter.rs
//! Per-wallet purchase rate limiting
//!
//! Two rules, checked in order:
//! 1. A buy may not exceed a configured percentage of total supply.
//! 2. A wallet must wait out a cooldown after each accepted buy.
//!
//! Only accepted purchases touch the wallet's history: a rejected attempt
//! neither starts nor extends a cooldown, so a bot hammering the limiter
//! gains nothing and an honest wallet is never locked out by its own
//! rejected spam.
//!
//! Timestamps are caller-supplied epoch seconds rather than wall-clock
//! reads, which keeps enforcement deterministic and testable.

use std::collections::HashMap;

use log::debug;
use solana_program::pubkey::Pubkey;
use thiserror::Error;

use crate::allocation::{floor_share, percent_to_bps};

/// Anti-bot limiter configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AntiBotConfig {
    /// Largest single buy as a percentage of total supply.
    pub max_buy_percentage: f64,

    /// Seconds a wallet must wait between accepted buys.
    pub cooldown_seconds: u64,
}

impl Default for AntiBotConfig {
    fn default() -> Self {
        AntiBotConfig {
            max_buy_percentage: 1.0,
            cooldown_seconds: 60,
        }
    }
}

/// Why a purchase was refused.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseRejection {
    /// The buy is larger than the configured share of total supply.
    #[error("purchase of {amount} exceeds the max buy limit of {max_allowed}")]
    ExceedsMaxBuy {
        /// Requested buy amount in base units.
        amount: u64,

        /// Largest amount the limiter allows.
        max_allowed: u64,
    },

    /// The wallet bought too recently.
    #[error("cooldown active, retry in {remaining_seconds} seconds")]
    CooldownActive {
        /// Seconds left until the wallet may buy again.
        remaining_seconds: u64,
    },
}

/// Tracks per-wallet purchase history and enforces the launch limits.
#[derive(Debug, Default)]
pub struct AntiBotRateLimiter {
    config: AntiBotConfig,
    last_purchase: HashMap<Pubkey, u64>,
}

impl AntiBotRateLimiter {
    /// Creates a limiter with the default configuration.
    pub fn new() -> Self {
        Self::with_config(AntiBotConfig::default())
    }

    /// Creates a limiter with a custom configuration.
    pub fn with_config(config: AntiBotConfig) -> Self {
        AntiBotRateLimiter {
            config,
            last_purchase: HashMap::new(),
        }
    }

    /// The largest single buy the limiter allows for the given supply.
    ///
    /// Computed with the same floored basis-point math as the allocations.
    /// Misconfigured negative or non-finite percentages clamp to zero,
    /// which rejects everything rather than allowing everything.
    pub fn max_buy_amount(&self, total_supply: u64) -> u64 {
        let bps = percent_to_bps("max_buy", self.config.max_buy_percentage.max(0.0))
            .unwrap_or(0);
        floor_share(total_supply, bps)
    }

    /// Checks a purchase attempt at `timestamp` (epoch seconds).
    ///
    /// On acceptance the wallet's last-purchase time is updated; on
    /// rejection it is left untouched.
    pub fn check_purchase(
        &mut self,
        buyer: &Pubkey,
        amount: u64,
        total_supply: u64,
        timestamp: u64,
    ) -> Result<(), PurchaseRejection> {
        let max_allowed = self.max_buy_amount(total_supply);
        if amount > max_allowed {
            debug!(
                "rejecting buy of {} from {}: over max {}",
                amount, buyer, max_allowed
            );
            return Err(PurchaseRejection::ExceedsMaxBuy {
                amount,
                max_allowed,
            });
        }

        if let Some(&last) = self.last_purchase.get(buyer) {
            // saturating_sub tolerates feeds that deliver slightly stale
            // timestamps out of order.
            let elapsed = timestamp.saturating_sub(last);
            if elapsed < self.config.cooldown_seconds {
                let remaining_seconds = self.config.cooldown_seconds - elapsed;
                debug!(
                    "rejecting buy from {}: cooldown for another {}s",
                    buyer, remaining_seconds
                );
                return Err(PurchaseRejection::CooldownActive { remaining_seconds });
            }
        }

        self.last_purchase.insert(*buyer, timestamp);
        Ok(())
    }

    /// When the wallet last completed an accepted purchase, if ever.
    pub fn last_purchase(&self, buyer: &Pubkey) -> Option<u64> {
        self.last_purchase.get(buyer).copied()
    }

    /// Drops all purchase history, e.g. between launches.
    pub fn reset(&mut self) {
        self.last_purchase.clear();
    }
}
