// src/lib.rs
//! Memecoin launchpad for Solana - Integration Module
//!
//! This crate drives complete token launches off-chain and integrates all
//! launchpad components:
//!
//! - Instruction encoding (SPL Token, Token-2022, Metaplex metadata,
//!   associated token accounts) and program-derived addresses
//! - Supply allocation, fee distribution, and price impact arithmetic
//! - Volume milestone rewards and anti-bot purchase limits
//! - The launch orchestrator, its chain client abstraction, and the pool
//!   provisioning boundary
//!
//! The entry point for most callers is [`launch::LaunchOrchestrator`],
//! driven by a [`launch::LaunchConfig`] and a [`chain::ChainClient`]
//! implementation.

pub mod allocation;
pub mod antibot;
pub mod chain;
pub mod encoding;
pub mod error;
pub mod launch;
pub mod pool;
pub mod rewards;

pub use allocation::{FeeDistribution, FeeShares, LaunchAllocation};
pub use antibot::{AntiBotConfig, AntiBotRateLimiter, PurchaseRejection};
pub use chain::{ChainClient, Confirmation, RetryPolicy, TxSignature};
pub use error::{ChainError, LaunchError, LaunchStep};
pub use launch::{
    CreatorFeeConfig, LaunchConfig, LaunchKeys, LaunchOrchestrator, LaunchSummary, TokenMetadata,
};
pub use pool::{ManualPoolSetup, PoolParams, PoolProvisioner, PoolReceipt, PoolStatus};
pub use rewards::{MilestoneReward, VolumeMilestoneTracker};
