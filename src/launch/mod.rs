// src/launch/mod.rs
//! Launch configuration and orchestration
//!
//! Ties the lower layers together into a usable launch surface:
//!
//! - [`config`]: token metadata, creator fee schedule, and the launch
//!   parameters with their validation rules
//! - [`orchestrator`]: the step-by-step pipeline that drives a launch
//!   through a [`ChainClient`](crate::chain::ChainClient)
//! - [`summary`]: the JSON artifact written after a successful launch

pub mod config;
pub mod orchestrator;
pub mod summary;

pub use config::{CreatorFeeConfig, LaunchConfig, LaunchKeys, TokenMetadata};
pub use orchestrator::LaunchOrchestrator;
pub use summary::{
    fingerprint_config, ExplorerLinks, LaunchSummary, MetadataSnapshot, PoolSnapshot,
    TransactionRecord,
};
