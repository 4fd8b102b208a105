// src/antibot/mod.rs
//! Anti-bot launch protection
//!
//! Early-launch purchase limits: a per-wallet cap on buy size relative to
//! total supply, and a per-wallet cooldown between buys. Enforcement is
//! advisory and off chain; the launchpad front end consults it before
//! building swap transactions.

mod rate_limiter;

pub use rate_limiter::{AntiBotConfig, AntiBotRateLimiter, PurchaseRejection};
