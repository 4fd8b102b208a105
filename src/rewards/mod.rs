// src/rewards/mod.rs
//! Volume milestone rewards
//!
//! Launched tokens earn one-time rewards as their cumulative traded volume
//! crosses configured thresholds. The tracker lives off chain and is fed by
//! whatever trade feed the operator runs.

mod volume_tracker;

pub use volume_tracker::{MilestoneReward, VolumeMilestoneTracker};
