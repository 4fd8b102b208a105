// src/encoding/token.rs
//! SPL Token and Token-2022 instruction encoding
//!
//! Launches run against one of two token programs: the classic SPL program
//! for plain tokens, or Token-2022 when the creator-fee feature needs the
//! transfer-fee extension baked into the mint. Both share the same
//! single-byte instruction tags and C-style option packing (one tag byte,
//! then 32 key bytes only when present), so the encoders here serve both.
//!
//! The Token-2022 transfer-fee extension nests a second tag: byte 0 selects
//! the extension family (26), byte 1 the operation within it.

use solana_program::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
    system_program, sysvar,
};

use super::address::{associated_token_address, DerivedAddress};
use crate::error::{AddressDerivationError, EncodingError};

/// Mainnet address of the classic SPL Token program.
pub const TOKEN_PROGRAM_ID: Pubkey =
    solana_program::pubkey!("TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA");

/// Mainnet address of the Token-2022 program.
pub const TOKEN_2022_PROGRAM_ID: Pubkey =
    solana_program::pubkey!("TokenzQdBNbLqP5VEhdkAS6EPFLC1PHnBqCXEpPxuEb");

/// Mainnet address of the associated-token-account program.
pub const ASSOCIATED_TOKEN_PROGRAM_ID: Pubkey =
    solana_program::pubkey!("ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL");

/// Packed size of a classic mint account.
pub const MINT_ACCOUNT_LEN: usize = 82;

/// Size of a Token-2022 mint carrying the transfer-fee extension: the base
/// mint padded to 165 bytes, one account-type byte, a 4-byte extension
/// header, and the 108-byte fee config.
pub const MINT_WITH_TRANSFER_FEE_LEN: usize = 278;

/// Ceiling for transfer-fee rates; 10000 basis points is 100%.
pub const MAX_TRANSFER_FEE_BASIS_POINTS: u16 = 10_000;

// Instruction tags shared by both token programs.
const INITIALIZE_MINT: u8 = 0;
const SET_AUTHORITY: u8 = 6;
const MINT_TO: u8 = 7;
const BURN_CHECKED: u8 = 15;

// Token-2022 extension family tag and the operation within it.
const TRANSFER_FEE_EXTENSION: u8 = 26;
const INITIALIZE_TRANSFER_FEE_CONFIG: u8 = 0;

// The associated-token-account program's `Create` tag.
const ATA_CREATE: u8 = 0;

/// Authority classes understood by `SetAuthority`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorityType {
    /// Who may mint new supply.
    MintTokens = 0,

    /// Who may freeze token accounts.
    FreezeAccount = 1,

    /// Who owns a token account.
    AccountOwner = 2,

    /// Who may close a token account.
    CloseAccount = 3,
}

/// Arguments of the Token-2022 `InitializeTransferFeeConfig` instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferFeeConfigInit {
    /// Authority allowed to change the fee later, if any.
    pub transfer_fee_config_authority: Option<Pubkey>,

    /// Authority allowed to withdraw withheld fees, if any.
    pub withdraw_withheld_authority: Option<Pubkey>,

    /// Fee taken from every transfer, in basis points.
    pub transfer_fee_basis_points: u16,

    /// Per-transfer cap on the fee, in base units.
    pub maximum_fee: u64,
}

fn push_pubkey_option(buf: &mut Vec<u8>, key: Option<&Pubkey>) {
    match key {
        Some(key) => {
            buf.push(1);
            buf.extend_from_slice(key.as_ref());
        }
        None => buf.push(0),
    }
}

fn read_pubkey_option(data: &[u8]) -> Result<(Option<Pubkey>, &[u8]), EncodingError> {
    let (tag, rest) = data
        .split_first()
        .ok_or_else(|| EncodingError::InvalidData("truncated option tag".to_string()))?;
    match tag {
        0 => Ok((None, rest)),
        1 => {
            if rest.len() < 32 {
                return Err(EncodingError::InvalidData(
                    "truncated pubkey in option".to_string(),
                ));
            }
            let (key_bytes, rest) = rest.split_at(32);
            let key = Pubkey::try_from(key_bytes)
                .map_err(|_| EncodingError::InvalidData("malformed pubkey".to_string()))?;
            Ok((Some(key), rest))
        }
        other => Err(EncodingError::InvalidData(format!(
            "invalid option tag {}",
            other
        ))),
    }
}

/// Encodes `InitializeMint`: tag, decimals, mint authority, optional freeze
/// authority.
pub fn encode_initialize_mint(
    decimals: u8,
    mint_authority: &Pubkey,
    freeze_authority: Option<&Pubkey>,
) -> Vec<u8> {
    let mut data = Vec::with_capacity(67);
    data.push(INITIALIZE_MINT);
    data.push(decimals);
    data.extend_from_slice(mint_authority.as_ref());
    push_pubkey_option(&mut data, freeze_authority);
    data
}

/// Encodes the Token-2022 `InitializeTransferFeeConfig` instruction.
///
/// Rejects rates above 100%; the program would refuse them anyway, but
/// catching it here keeps the failure local instead of burning a
/// transaction fee on a doomed submission.
pub fn encode_initialize_transfer_fee_config(
    config: &TransferFeeConfigInit,
) -> Result<Vec<u8>, EncodingError> {
    if config.transfer_fee_basis_points > MAX_TRANSFER_FEE_BASIS_POINTS {
        return Err(EncodingError::FeeBasisPointsTooHigh(
            config.transfer_fee_basis_points,
        ));
    }

    let mut data = Vec::with_capacity(78);
    data.push(TRANSFER_FEE_EXTENSION);
    data.push(INITIALIZE_TRANSFER_FEE_CONFIG);
    push_pubkey_option(&mut data, config.transfer_fee_config_authority.as_ref());
    push_pubkey_option(&mut data, config.withdraw_withheld_authority.as_ref());
    data.extend_from_slice(&config.transfer_fee_basis_points.to_le_bytes());
    data.extend_from_slice(&config.maximum_fee.to_le_bytes());
    Ok(data)
}

/// Decodes `InitializeTransferFeeConfig` instruction data.
pub fn decode_initialize_transfer_fee_config(
    data: &[u8],
) -> Result<TransferFeeConfigInit, EncodingError> {
    if data.len() < 2 || data[0] != TRANSFER_FEE_EXTENSION || data[1] != INITIALIZE_TRANSFER_FEE_CONFIG
    {
        return Err(EncodingError::InvalidData(
            "not an InitializeTransferFeeConfig instruction".to_string(),
        ));
    }

    let (transfer_fee_config_authority, rest) = read_pubkey_option(&data[2..])?;
    let (withdraw_withheld_authority, rest) = read_pubkey_option(rest)?;
    if rest.len() != 10 {
        return Err(EncodingError::InvalidData(format!(
            "expected 10 trailing bytes, found {}",
            rest.len()
        )));
    }

    let mut bps = [0u8; 2];
    bps.copy_from_slice(&rest[..2]);
    let mut max_fee = [0u8; 8];
    max_fee.copy_from_slice(&rest[2..]);

    Ok(TransferFeeConfigInit {
        transfer_fee_config_authority,
        withdraw_withheld_authority,
        transfer_fee_basis_points: u16::from_le_bytes(bps),
        maximum_fee: u64::from_le_bytes(max_fee),
    })
}

/// Encodes `MintTo`: tag plus the amount in base units.
pub fn encode_mint_to(amount: u64) -> Vec<u8> {
    let mut data = Vec::with_capacity(9);
    data.push(MINT_TO);
    data.extend_from_slice(&amount.to_le_bytes());
    data
}

/// Encodes `BurnChecked`: tag, amount, and the decimals the caller believes
/// the mint has. The program rejects the burn if the decimals disagree.
pub fn encode_burn_checked(amount: u64, decimals: u8) -> Vec<u8> {
    let mut data = Vec::with_capacity(10);
    data.push(BURN_CHECKED);
    data.extend_from_slice(&amount.to_le_bytes());
    data.push(decimals);
    data
}

/// Encodes `SetAuthority`. Passing `None` renounces the authority forever.
pub fn encode_set_authority(authority_type: AuthorityType, new_authority: Option<&Pubkey>) -> Vec<u8> {
    let mut data = Vec::with_capacity(35);
    data.push(SET_AUTHORITY);
    data.push(authority_type as u8);
    push_pubkey_option(&mut data, new_authority);
    data
}

/// Builds `InitializeMint` for a freshly created mint account.
pub fn initialize_mint(
    token_program: &Pubkey,
    mint: &Pubkey,
    decimals: u8,
    mint_authority: &Pubkey,
    freeze_authority: Option<&Pubkey>,
) -> Instruction {
    Instruction {
        program_id: *token_program,
        accounts: vec![
            AccountMeta::new(*mint, false),
            AccountMeta::new_readonly(sysvar::rent::id(), false),
        ],
        data: encode_initialize_mint(decimals, mint_authority, freeze_authority),
    }
}

/// Builds the Token-2022 `InitializeTransferFeeConfig` instruction. Must be
/// placed before `InitializeMint` in the same transaction; the extension can
/// only be installed on an uninitialized mint.
pub fn initialize_transfer_fee_config(
    mint: &Pubkey,
    config: &TransferFeeConfigInit,
) -> Result<Instruction, EncodingError> {
    Ok(Instruction {
        program_id: TOKEN_2022_PROGRAM_ID,
        accounts: vec![AccountMeta::new(*mint, false)],
        data: encode_initialize_transfer_fee_config(config)?,
    })
}

/// Builds `MintTo`.
pub fn mint_to(
    token_program: &Pubkey,
    mint: &Pubkey,
    destination: &Pubkey,
    authority: &Pubkey,
    amount: u64,
) -> Instruction {
    Instruction {
        program_id: *token_program,
        accounts: vec![
            AccountMeta::new(*mint, false),
            AccountMeta::new(*destination, false),
            AccountMeta::new_readonly(*authority, true),
        ],
        data: encode_mint_to(amount),
    }
}

/// Builds `BurnChecked` against the owner's token account.
pub fn burn_checked(
    token_program: &Pubkey,
    account: &Pubkey,
    mint: &Pubkey,
    owner: &Pubkey,
    amount: u64,
    decimals: u8,
) -> Instruction {
    Instruction {
        program_id: *token_program,
        accounts: vec![
            AccountMeta::new(*account, false),
            AccountMeta::new(*mint, false),
            AccountMeta::new_readonly(*owner, true),
        ],
        data: encode_burn_checked(amount, decimals),
    }
}

/// Builds `SetAuthority` against a mint or token account.
pub fn set_authority(
    token_program: &Pubkey,
    owned_account: &Pubkey,
    current_authority: &Pubkey,
    authority_type: AuthorityType,
    new_authority: Option<&Pubkey>,
) -> Instruction {
    Instruction {
        program_id: *token_program,
        accounts: vec![
            AccountMeta::new(*owned_account, false),
            AccountMeta::new_readonly(*current_authority, true),
        ],
        data: encode_set_authority(authority_type, new_authority),
    }
}

/// Builds the associated-token-account `Create` instruction and returns it
/// together with the derived account address.
pub fn create_associated_token_account(
    payer: &Pubkey,
    owner: &Pubkey,
    mint: &Pubkey,
    token_program: &Pubkey,
) -> Result<(Instruction, DerivedAddress), AddressDerivationError> {
    let derived = associated_token_address(owner, mint, token_program)?;
    let instruction = Instruction {
        program_id: ASSOCIATED_TOKEN_PROGRAM_ID,
        accounts: vec![
            AccountMeta::new(*payer, true),
            AccountMeta::new(derived.address, false),
            AccountMeta::new_readonly(*owner, false),
            AccountMeta::new_readonly(*mint, false),
            AccountMeta::new_readonly(system_program::id(), false),
            AccountMeta::new_readonly(*token_program, false),
        ],
        data: vec![ATA_CREATE],
    };
    Ok((instruction, derived))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialize_mint_golden_bytes() {
        let authority = Pubkey::new_unique();

        // No freeze authority: tag, decimals, 32 key bytes, option tag 0.
        let data = encode_initialize_mint(9, &authority, None);
        assert_eq!(data.len(), 35);
        assert_eq!(data[0], INITIALIZE_MINT);
        assert_eq!(data[1], 9);
        assert_eq!(&data[2..34], authority.as_ref());
        assert_eq!(data[34], 0);

        // With a freeze authority the option expands to 33 bytes.
        let freeze = Pubkey::new_unique();
        let data = encode_initialize_mint(6, &authority, Some(&freeze));
        assert_eq!(data.len(), 67);
        assert_eq!(data[34], 1);
        assert_eq!(&data[35..67], freeze.as_ref());
    }

    #[test]
    fn test_transfer_fee_config_round_trip() {
        let config_authority = Pubkey::new_unique();
        let withdraw_authority = Pubkey::new_unique();

        let cases = [
            TransferFeeConfigInit {
                transfer_fee_config_authority: Some(config_authority),
                withdraw_withheld_authority: Some(withdraw_authority),
                transfer_fee_basis_points: 200,
                maximum_fee: 1_000_000,
            },
            TransferFeeConfigInit {
                transfer_fee_config_authority: None,
                withdraw_withheld_authority: Some(withdraw_authority),
                transfer_fee_basis_points: 0,
                maximum_fee: 0,
            },
            TransferFeeConfigInit {
                transfer_fee_config_authority: None,
                withdraw_withheld_authority: None,
                transfer_fee_basis_points: MAX_TRANSFER_FEE_BASIS_POINTS,
                maximum_fee: u64::MAX,
            },
        ];

        for case in &cases {
            let encoded = encode_initialize_transfer_fee_config(case).unwrap();
            assert_eq!(encoded[0], TRANSFER_FEE_EXTENSION);
            assert_eq!(encoded[1], INITIALIZE_TRANSFER_FEE_CONFIG);

            let decoded = decode_initialize_transfer_fee_config(&encoded).unwrap();
            assert_eq!(&decoded, case, "round trip changed the config");
        }
    }

    #[test]
    fn test_transfer_fee_above_100_percent_rejected() {
        let config = TransferFeeConfigInit {
            transfer_fee_config_authority: None,
            withdraw_withheld_authority: None,
            transfer_fee_basis_points: 10_001,
            maximum_fee: 0,
        };
        assert_eq!(
            encode_initialize_transfer_fee_config(&config).unwrap_err(),
            EncodingError::FeeBasisPointsTooHigh(10_001)
        );
    }

    #[test]
    fn test_mint_to_and_burn_checked_bytes() {
        let data = encode_mint_to(1_000_000_000);
        assert_eq!(data[0], MINT_TO);
        assert_eq!(&data[1..9], &1_000_000_000u64.to_le_bytes());

        let data = encode_burn_checked(42, 9);
        assert_eq!(data.len(), 10);
        assert_eq!(data[0], BURN_CHECKED);
        assert_eq!(&data[1..9], &42u64.to_le_bytes());
        assert_eq!(data[9], 9);
    }

    #[test]
    fn test_set_authority_renounce_bytes() {
        // Renouncing the mint authority is exactly three bytes.
        let data = encode_set_authority(AuthorityType::MintTokens, None);
        assert_eq!(data, vec![SET_AUTHORITY, 0, 0]);

        let new_authority = Pubkey::new_unique();
        let data = encode_set_authority(AuthorityType::FreezeAccount, Some(&new_authority));
        assert_eq!(data.len(), 35);
        assert_eq!(data[1], 1);
        assert_eq!(data[2], 1);
        assert_eq!(&data[3..35], new_authority.as_ref());
    }

    #[test]
    fn test_create_associated_token_account_layout() {
        let payer = Pubkey::new_unique();
        let owner = Pubkey::new_unique();
        let mint = Pubkey::new_unique();

        let (ix, derived) =
            create_associated_token_account(&payer, &owner, &mint, &TOKEN_2022_PROGRAM_ID)
                .unwrap();

        assert_eq!(ix.program_id, ASSOCIATED_TOKEN_PROGRAM_ID);
        assert_eq!(ix.data, vec![ATA_CREATE]);
        assert_eq!(ix.accounts.len(), 6);

        // Payer signs and funds; the derived account is writable.
        assert_eq!(ix.accounts[0].pubkey, payer);
        assert!(ix.accounts[0].is_signer);
        assert!(ix.accounts[0].is_writable);
        assert_eq!(ix.accounts[1].pubkey, derived.address);
        assert!(ix.accounts[1].is_writable);
        assert!(!ix.accounts[1].is_signer);

        // The derived address matches the standalone derivation helper.
        let expected = associated_token_address(&owner, &mint, &TOKEN_2022_PROGRAM_ID).unwrap();
        assert_eq!(derived, expected);
    }

    #[test]
    fn test_decode_rejects_malformed_fee_config() {
        // Wrong family tag.
        assert!(decode_initialize_transfer_fee_config(&[25, 0, 0, 0]).is_err());

        // Truncated after the option tags.
        assert!(decode_initialize_transfer_fee_config(&[26, 0, 0, 0, 1]).is_err());

        // Garbage option tag.
        assert!(decode_initialize_transfer_fee_config(&[26, 0, 7]).is_err());
    }

    #[test]
    fn test_mint_account_sizes() {
        // The rent calculation depends on these being right; they mirror the
        // packed layouts of the two token programs.
        assert_eq!(MINT_ACCOUNT_LEN, 82);
        assert_eq!(MINT_WITH_TRANSFER_FEE_LEN, 165 + 1 + 4 + 108);
    }
}
