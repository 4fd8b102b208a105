// src/encoding/address.rs
//! Program-derived address helpers
//!
//! Every account the launch pipeline touches that is not a caller keypair is
//! a program-derived address: the Metaplex metadata account, associated token
//! accounts, and the Raydium AMM authority/open-orders/target-orders
//! accounts. Derivation is deterministic, so these helpers are pure functions
//! of their seeds.

use solana_program::pubkey::Pubkey;

use super::metadata::TOKEN_METADATA_PROGRAM_ID;
use super::token::ASSOCIATED_TOKEN_PROGRAM_ID;
use crate::error::AddressDerivationError;

/// Mainnet address of the Raydium AMM v4 program.
pub const RAYDIUM_AMM_PROGRAM_ID: Pubkey =
    solana_program::pubkey!("675kPX9MHTjS2zt1qfr1NYHuzeLXfQM9H24wFSUt1Mp8");

/// Mainnet address of the OpenBook central-limit-order-book program.
pub const OPENBOOK_PROGRAM_ID: Pubkey =
    solana_program::pubkey!("srmqPvymJeFKQ4zGQed1GFppgkRHL9kaELCbyksJtPX");

/// Mint address of wrapped SOL, the quote side of every launch pool.
pub const WSOL_MINT: Pubkey =
    solana_program::pubkey!("So11111111111111111111111111111111111111112");

/// Seed prefix for Metaplex metadata accounts.
pub const METADATA_SEED: &[u8] = b"metadata";

/// Seed prefix for Raydium AMM open-orders accounts.
pub const OPEN_ORDERS_SEED: &[u8] = b"open_orders";

/// Seed prefix for Raydium AMM target-orders accounts.
pub const TARGET_ORDERS_SEED: &[u8] = b"target_orders";

/// A program-derived address together with the bump seed that produced it.
///
/// The bump is kept because pool programs require it as an instruction
/// argument when they re-derive the address on chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivedAddress {
    /// The derived off-curve address.
    pub address: Pubkey,

    /// Bump seed that pushed the derivation off the ed25519 curve.
    pub bump: u8,
}

/// Derives a program address from the given seeds, searching bump seeds from
/// 255 downward.
pub fn derive_address(
    program_id: &Pubkey,
    seeds: &[&[u8]],
) -> Result<DerivedAddress, AddressDerivationError> {
    Pubkey::try_find_program_address(seeds, program_id)
        .map(|(address, bump)| DerivedAddress { address, bump })
        .ok_or(AddressDerivationError::NoViableBump {
            program_id: *program_id,
        })
}

/// Derives the Metaplex metadata account for a mint.
///
/// Seeds: `["metadata", metadata_program_id, mint]` under the metadata
/// program itself.
pub fn metadata_account(mint: &Pubkey) -> Result<DerivedAddress, AddressDerivationError> {
    derive_address(
        &TOKEN_METADATA_PROGRAM_ID,
        &[
            METADATA_SEED,
            TOKEN_METADATA_PROGRAM_ID.as_ref(),
            mint.as_ref(),
        ],
    )
}

/// Derives the associated token account holding `mint` tokens for `owner`.
///
/// Seeds: `[owner, token_program, mint]` under the associated-token-account
/// program. The token program must match the one that owns the mint, so
/// Token-2022 mints derive different addresses than classic SPL mints.
pub fn associated_token_address(
    owner: &Pubkey,
    mint: &Pubkey,
    token_program: &Pubkey,
) -> Result<DerivedAddress, AddressDerivationError> {
    derive_address(
        &ASSOCIATED_TOKEN_PROGRAM_ID,
        &[owner.as_ref(), token_program.as_ref(), mint.as_ref()],
    )
}

/// Derives the authority that signs for a Raydium AMM pool's vaults.
pub fn amm_authority(amm_id: &Pubkey) -> Result<DerivedAddress, AddressDerivationError> {
    derive_address(&RAYDIUM_AMM_PROGRAM_ID, &[amm_id.as_ref()])
}

/// Derives the OpenBook open-orders account owned by a Raydium AMM pool.
pub fn amm_open_orders(amm_id: &Pubkey) -> Result<DerivedAddress, AddressDerivationError> {
    derive_address(&RAYDIUM_AMM_PROGRAM_ID, &[OPEN_ORDERS_SEED, amm_id.as_ref()])
}

/// Derives the target-orders account owned by a Raydium AMM pool.
pub fn amm_target_orders(amm_id: &Pubkey) -> Result<DerivedAddress, AddressDerivationError> {
    derive_address(
        &RAYDIUM_AMM_PROGRAM_ID,
        &[TARGET_ORDERS_SEED, amm_id.as_ref()],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derivation_is_deterministic() {
        let mint = Pubkey::new_unique();

        // The same seeds must always produce the same address and bump.
        let first = metadata_account(&mint).unwrap();
        let second = metadata_account(&mint).unwrap();
        assert_eq!(first, second, "derivation should be deterministic");

        // And it must agree with the panicking stdlib derivation.
        let (expected, bump) = Pubkey::find_program_address(
            &[
                METADATA_SEED,
                TOKEN_METADATA_PROGRAM_ID.as_ref(),
                mint.as_ref(),
            ],
            &TOKEN_METADATA_PROGRAM_ID,
        );
        assert_eq!(first.address, expected);
        assert_eq!(first.bump, bump);
    }

    #[test]
    fn test_different_mints_derive_different_metadata_accounts() {
        let a = metadata_account(&Pubkey::new_unique()).unwrap();
        let b = metadata_account(&Pubkey::new_unique()).unwrap();
        assert_ne!(a.address, b.address);
    }

    #[test]
    fn test_associated_token_address_depends_on_token_program() {
        use crate::encoding::token::{TOKEN_2022_PROGRAM_ID, TOKEN_PROGRAM_ID};

        let owner = Pubkey::new_unique();
        let mint = Pubkey::new_unique();

        // A Token-2022 mint and a classic mint with the same owner derive
        // different associated accounts.
        let classic = associated_token_address(&owner, &mint, &TOKEN_PROGRAM_ID).unwrap();
        let extended = associated_token_address(&owner, &mint, &TOKEN_2022_PROGRAM_ID).unwrap();
        assert_ne!(classic.address, extended.address);
    }

    #[test]
    fn test_amm_account_derivations_are_distinct() {
        let amm_id = Pubkey::new_unique();

        let authority = amm_authority(&amm_id).unwrap();
        let open_orders = amm_open_orders(&amm_id).unwrap();
        let target_orders = amm_target_orders(&amm_id).unwrap();

        assert_ne!(authority.address, open_orders.address);
        assert_ne!(authority.address, target_orders.address);
        assert_ne!(open_orders.address, target_orders.address);
    }
}
