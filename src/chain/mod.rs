// src/chain/mod.rs
//! The chain-client boundary
//!
//! Everything that talks to a Solana endpoint sits behind the
//! [`ChainClient`] trait: the launch pipeline builds instructions and
//! decides what to submit, while signing, blockhash handling and transport
//! belong to the trait implementation. That keeps the pipeline deterministic
//! and lets tests drive it with an in-memory client.

mod client;
mod retry;

pub use client::{ChainClient, Confirmation, TxSignature};
pub use retry::{submit_and_confirm, RetryPolicy};
