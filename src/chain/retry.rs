// src/chain/retry.rs
//! Submission retry loop
//!
//! Blockhash expiry, leader congestion and confirmation timeouts make
//! individual submissions flaky even when the transaction itself is fine.
//! [`submit_and_confirm`] retries those transient failures with a fixed
//! backoff and gives up immediately on terminal ones, surfacing the original
//! error unchanged either way.

use std::thread;
use std::time::Duration;

use log::{info, warn};
use solana_program::{instruction::Instruction, pubkey::Pubkey};

use super::client::{ChainClient, Confirmation, TxSignature};
use crate::error::ChainError;

/// How submission failures are retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Zero is treated as one.
    pub max_attempts: u32,

    /// Pause between attempts.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_attempts: 3,
            backoff: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    /// A policy that never sleeps, for tests and dry runs.
    pub fn immediate(max_attempts: u32) -> Self {
        RetryPolicy {
            max_attempts,
            backoff: Duration::ZERO,
        }
    }
}

/// Submits a transaction and waits for confirmation, retrying transient
/// failures up to the policy's `max_attempts`.
///
/// A confirmation timeout counts as a transient failure and triggers a
/// resubmission; connection errors are terminal (see
/// [`ChainError::is_retryable`]). Whatever error ends the loop is returned
/// unchanged.
pub fn submit_and_confirm<C: ChainClient + ?Sized>(
    client: &C,
    policy: &RetryPolicy,
    instructions: &[Instruction],
    signers: &[Pubkey],
) -> Result<TxSignature, ChainError> {
    let mut attempt = 0u32;
    loop {
        attempt += 1;

        let outcome = client
            .submit_transaction(instructions, signers)
            .and_then(|signature| match client.confirm_transaction(&signature)? {
                Confirmation::Confirmed => Ok(signature),
                Confirmation::TimedOut => Err(ChainError::Timeout(signature.to_string())),
            });

        match outcome {
            Ok(signature) => {
                if attempt > 1 {
                    info!(
                        "transaction landed on attempt {}/{}: {}",
                        attempt, policy.max_attempts, signature
                    );
                }
                return Ok(signature);
            }
            Err(err) => {
                if !err.is_retryable() || attempt >= policy.max_attempts {
                    return Err(err);
                }
                warn!(
                    "transaction attempt {}/{} failed, retrying in {:?}: {}",
                    attempt, policy.max_attempts, policy.backoff, err
                );
                if !policy.backoff.is_zero() {
                    thread::sleep(policy.backoff);
                }
            }
        }
    }
}
