// src/pool/mod.rs
//! Liquidity pool provisioning boundary
//!
//! The launchpad computes everything a Raydium-style pool needs (amounts,
//! slippage floors, derived AMM accounts, market parameters) but the actual
//! pool creation runs through an external collaborator behind the
//! [`PoolProvisioner`] trait. The bundled [`ManualPoolSetup`] implementation
//! records the parameters and hands them off for out-of-band setup.

mod provisioning;

pub use provisioning::{
    ManualPoolSetup, MarketParams, PoolParams, PoolProvisioner, PoolReceipt, PoolStatus,
};
