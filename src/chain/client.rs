// src/chain/client.rs
//! Chain client trait and its wire types

use std::fmt;

use solana_program::{instruction::Instruction, pubkey::Pubkey};

use crate::error::ChainError;

/// A base-58 transaction signature as reported by the endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TxSignature(String);

impl TxSignature {
    /// The signature as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for TxSignature {
    fn from(value: String) -> Self {
        TxSignature(value)
    }
}

impl From<&str> for TxSignature {
    fn from(value: &str) -> Self {
        TxSignature(value.to_string())
    }
}

/// Outcome of waiting for a transaction to confirm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    /// The transaction reached the requested commitment level.
    Confirmed,

    /// Polling gave up before the transaction confirmed. The transaction may
    /// still land later; callers decide whether to resubmit.
    TimedOut,
}

/// The boundary between the launch pipeline and a Solana endpoint.
///
/// Implementations own key custody: `submit_transaction` receives the public
/// keys that must sign and is responsible for producing those signatures,
/// attaching a recent blockhash and fee payer, and broadcasting. The
/// pipeline never sees secret key material.
pub trait ChainClient {
    /// Signs and submits one transaction built from `instructions`.
    fn submit_transaction(
        &self,
        instructions: &[Instruction],
        signers: &[Pubkey],
    ) -> Result<TxSignature, ChainError>;

    /// Waits for a signature to reach the implementation's commitment level.
    fn confirm_transaction(&self, signature: &TxSignature) -> Result<Confirmation, ChainError>;

    /// Raw account data, or `None` if the account does not exist.
    fn get_account_info(&self, address: &Pubkey) -> Result<Option<Vec<u8>>, ChainError>;

    /// Lamport balance of an account; zero for missing accounts.
    fn get_balance(&self, address: &Pubkey) -> Result<u64, ChainError>;

    /// Current supply of a mint, in base units. A mint that does not exist
    /// is reported as [`ChainError::AccountNotFound`].
    fn get_token_supply(&self, mint: &Pubkey) -> Result<u64, ChainError>;

    /// Lamports required to make an account of `data_len` bytes rent exempt.
    fn minimum_balance_for_rent_exemption(&self, data_len: usize) -> Result<u64, ChainError>;
}
