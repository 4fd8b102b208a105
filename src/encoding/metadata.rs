// src/encoding/metadata.rs
//! Metaplex token-metadata instruction encoding
//!
//! The crate does not link the Metaplex SDK; it encodes the two instructions
//! the launch pipeline needs by hand:
//! - `CreateMetadataAccountV3` to attach name/symbol/URI to a fresh mint
//! - `UpdateMetadataAccountV2` to clear the mutability flag at renounce time
//!
//! The on-chain program deserializes its arguments with borsh behind a
//! single-byte instruction tag, so the argument structs here mirror the
//! program's published layout exactly. Getting one length prefix or option
//! tag wrong makes the program reject the whole transaction, which is why
//! the layouts are pinned by byte-exact tests below.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
    system_program, sysvar,
};

use crate::error::EncodingError;

/// Mainnet address of the Metaplex token-metadata program.
pub const TOKEN_METADATA_PROGRAM_ID: Pubkey =
    solana_program::pubkey!("metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s");

/// Instruction tag of `CreateMetadataAccountV3` in the token-metadata program.
pub const CREATE_METADATA_ACCOUNT_V3: u8 = 33;

/// Instruction tag of `UpdateMetadataAccountV2`.
pub const UPDATE_METADATA_ACCOUNT_V2: u8 = 15;

/// On-chain ceiling for the token name, in bytes.
pub const MAX_NAME_LENGTH: usize = 32;

/// On-chain ceiling for the token symbol, in bytes.
pub const MAX_SYMBOL_LENGTH: usize = 10;

/// On-chain ceiling for the metadata URI, in bytes.
pub const MAX_URI_LENGTH: usize = 200;

/// A creator entry stored in the metadata account.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct Creator {
    /// Wallet credited as a creator.
    pub address: Pubkey,

    /// Whether the creator has signed to verify the entry. The program only
    /// accepts `true` when this creator signs the transaction.
    pub verified: bool,

    /// Royalty share in percent; all creators must sum to 100.
    pub share: u8,
}

/// A pointer to the collection NFT this token belongs to.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    /// Whether the collection authority has verified membership.
    pub verified: bool,

    /// Mint of the collection NFT.
    pub key: Pubkey,
}

/// How usage charges are consumed. Fungible launches never set this, but the
/// field participates in the borsh layout.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum UseMethod {
    Burn,
    Multiple,
    Single,
}

/// Usage-tracking configuration.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Uses {
    pub use_method: UseMethod,
    pub remaining: u64,
    pub total: u64,
}

/// Collection sizing details carried by `CreateMetadataAccountV3`.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionDetails {
    V1 { size: u64 },
}

/// The `DataV2` argument block exactly as the token-metadata program
/// deserializes it. Strings are u32-length-prefixed, options are a single
/// tag byte.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct DataV2 {
    /// Token name, at most [`MAX_NAME_LENGTH`] bytes.
    pub name: String,

    /// Token symbol, at most [`MAX_SYMBOL_LENGTH`] bytes.
    pub symbol: String,

    /// Off-chain metadata URI, at most [`MAX_URI_LENGTH`] bytes.
    pub uri: String,

    /// Secondary-sale royalty in basis points.
    pub seller_fee_basis_points: u16,

    /// Creator entries, or `None` for an anonymous launch.
    pub creators: Option<Vec<Creator>>,

    /// Collection membership, unused for fungible launches.
    pub collection: Option<Collection>,

    /// Usage tracking, unused for fungible launches.
    pub uses: Option<Uses>,
}

/// Arguments of `CreateMetadataAccountV3`.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct CreateMetadataAccountArgsV3 {
    pub data: DataV2,
    pub is_mutable: bool,
    pub collection_details: Option<CollectionDetails>,
}

/// Arguments of `UpdateMetadataAccountV2`. Every field is optional; `None`
/// leaves the stored value untouched.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct UpdateMetadataAccountArgsV2 {
    pub data: Option<DataV2>,
    pub update_authority: Option<Pubkey>,
    pub primary_sale_happened: Option<bool>,
    pub is_mutable: Option<bool>,
}

/// Checks the metadata string fields against the on-chain account layout.
///
/// Limits are byte lengths, not character counts, so multi-byte UTF-8 names
/// hit the ceiling sooner than their `chars().count()` suggests.
pub fn validate_metadata_fields(
    name: &str,
    symbol: &str,
    uri: &str,
) -> Result<(), EncodingError> {
    check_field_length("name", name, MAX_NAME_LENGTH)?;
    check_field_length("symbol", symbol, MAX_SYMBOL_LENGTH)?;
    check_field_length("uri", uri, MAX_URI_LENGTH)?;
    Ok(())
}

fn check_field_length(field: &'static str, value: &str, limit: usize) -> Result<(), EncodingError> {
    if value.len() > limit {
        return Err(EncodingError::FieldTooLong {
            field,
            actual: value.len(),
            limit,
        });
    }
    Ok(())
}

/// Encodes the instruction data of `CreateMetadataAccountV3`: the one-byte
/// tag followed by the borsh-serialized arguments.
pub fn encode_create_metadata_v3(
    data: &DataV2,
    is_mutable: bool,
) -> Result<Vec<u8>, EncodingError> {
    validate_metadata_fields(&data.name, &data.symbol, &data.uri)?;

    let args = CreateMetadataAccountArgsV3 {
        data: data.clone(),
        is_mutable,
        collection_details: None,
    };

    let mut encoded = vec![CREATE_METADATA_ACCOUNT_V3];
    args.serialize(&mut encoded)
        .map_err(|e| EncodingError::InvalidData(e.to_string()))?;
    Ok(encoded)
}

/// Decodes `CreateMetadataAccountV3` instruction data back into its
/// arguments. Used by tests and by tooling that inspects built transactions.
pub fn decode_create_metadata_v3(data: &[u8]) -> Result<(DataV2, bool), EncodingError> {
    let (tag, rest) = data
        .split_first()
        .ok_or_else(|| EncodingError::InvalidData("empty instruction data".to_string()))?;
    if *tag != CREATE_METADATA_ACCOUNT_V3 {
        return Err(EncodingError::InvalidData(format!(
            "expected tag {}, found {}",
            CREATE_METADATA_ACCOUNT_V3, tag
        )));
    }

    let args = CreateMetadataAccountArgsV3::try_from_slice(rest)
        .map_err(|e| EncodingError::InvalidData(e.to_string()))?;
    Ok((args.data, args.is_mutable))
}

/// Encodes the instruction data of an `UpdateMetadataAccountV2` that only
/// clears the mutability flag, leaving data and authority untouched.
pub fn encode_update_metadata_immutable() -> Result<Vec<u8>, EncodingError> {
    let args = UpdateMetadataAccountArgsV2 {
        data: None,
        update_authority: None,
        primary_sale_happened: None,
        is_mutable: Some(false),
    };

    let mut encoded = vec![UPDATE_METADATA_ACCOUNT_V2];
    args.serialize(&mut encoded)
        .map_err(|e| EncodingError::InvalidData(e.to_string()))?;
    Ok(encoded)
}

/// Builds the complete `CreateMetadataAccountV3` instruction.
///
/// `metadata_account` must be the address derived by
/// [`metadata_account`](super::address::metadata_account) for `mint`; the
/// program re-derives it on chain and rejects anything else.
#[allow(clippy::too_many_arguments)]
pub fn create_metadata_account_v3(
    metadata_account: &Pubkey,
    mint: &Pubkey,
    mint_authority: &Pubkey,
    payer: &Pubkey,
    update_authority: &Pubkey,
    data: &DataV2,
    is_mutable: bool,
) -> Result<Instruction, EncodingError> {
    Ok(Instruction {
        program_id: TOKEN_METADATA_PROGRAM_ID,
        accounts: vec![
            AccountMeta::new(*metadata_account, false),
            AccountMeta::new_readonly(*mint, false),
            AccountMeta::new_readonly(*mint_authority, true),
            AccountMeta::new(*payer, true),
            AccountMeta::new_readonly(*update_authority, false),
            AccountMeta::new_readonly(system_program::id(), false),
            AccountMeta::new_readonly(sysvar::rent::id(), false),
        ],
        data: encode_create_metadata_v3(data, is_mutable)?,
    })
}

/// Builds the `UpdateMetadataAccountV2` instruction that makes the metadata
/// permanently immutable. The flag is one-way on chain: once cleared it can
/// never be set again.
pub fn update_metadata_as_immutable(
    metadata_account: &Pubkey,
    update_authority: &Pubkey,
) -> Result<Instruction, EncodingError> {
    Ok(Instruction {
        program_id: TOKEN_METADATA_PROGRAM_ID,
        accounts: vec![
            AccountMeta::new(*metadata_account, false),
            AccountMeta::new_readonly(*update_authority, true),
        ],
        data: encode_update_metadata_immutable()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_data(name: &str, symbol: &str, uri: &str) -> DataV2 {
        DataV2 {
            name: name.to_string(),
            symbol: symbol.to_string(),
            uri: uri.to_string(),
            seller_fee_basis_points: 0,
            creators: None,
            collection: None,
            uses: None,
        }
    }

    #[test]
    fn test_create_metadata_v3_golden_bytes() {
        // Known-good encoding for ("Moon", "MD", "https://x"), no creators,
        // mutable, no collection details. 35 bytes total.
        let encoded =
            encode_create_metadata_v3(&bare_data("Moon", "MD", "https://x"), true).unwrap();

        let mut expected: Vec<u8> = vec![CREATE_METADATA_ACCOUNT_V3];
        expected.extend_from_slice(&4u32.to_le_bytes());
        expected.extend_from_slice(b"Moon");
        expected.extend_from_slice(&2u32.to_le_bytes());
        expected.extend_from_slice(b"MD");
        expected.extend_from_slice(&9u32.to_le_bytes());
        expected.extend_from_slice(b"https://x");
        expected.extend_from_slice(&0u16.to_le_bytes()); // seller fee
        expected.push(0); // creators: None
        expected.push(0); // collection: None
        expected.push(0); // uses: None
        expected.push(1); // is_mutable: true
        expected.push(0); // collection_details: None

        assert_eq!(encoded.len(), 35, "fixture length drifted");
        assert_eq!(encoded, expected);
    }

    #[test]
    fn test_create_metadata_v3_round_trip_with_creators() {
        let creator = Pubkey::new_unique();
        let mut data = bare_data("Moon Token", "MOON", "https://example.com/moon.json");
        data.seller_fee_basis_points = 200;
        data.creators = Some(vec![Creator {
            address: creator,
            verified: false,
            share: 100,
        }]);

        let encoded = encode_create_metadata_v3(&data, true).unwrap();
        let (decoded, is_mutable) = decode_create_metadata_v3(&encoded).unwrap();

        assert_eq!(decoded, data);
        assert!(is_mutable);
    }

    #[test]
    fn test_field_length_limits_are_bytes_not_chars() {
        // 11 two-byte characters: 11 chars but 22 bytes, over the 10-byte
        // symbol ceiling.
        let wide_symbol = "é".repeat(11);
        let err =
            encode_create_metadata_v3(&bare_data("Moon", &wide_symbol, "https://x"), true)
                .unwrap_err();
        assert_eq!(
            err,
            EncodingError::FieldTooLong {
                field: "symbol",
                actual: 22,
                limit: MAX_SYMBOL_LENGTH,
            }
        );
    }

    #[test]
    fn test_each_field_is_checked() {
        let long_name = "N".repeat(MAX_NAME_LENGTH + 1);
        let long_symbol = "S".repeat(MAX_SYMBOL_LENGTH + 1);
        let long_uri = "u".repeat(MAX_URI_LENGTH + 1);

        assert!(matches!(
            encode_create_metadata_v3(&bare_data(&long_name, "MD", "https://x"), true),
            Err(EncodingError::FieldTooLong { field: "name", .. })
        ));
        assert!(matches!(
            encode_create_metadata_v3(&bare_data("Moon", &long_symbol, "https://x"), true),
            Err(EncodingError::FieldTooLong { field: "symbol", .. })
        ));
        assert!(matches!(
            encode_create_metadata_v3(&bare_data("Moon", "MD", &long_uri), true),
            Err(EncodingError::FieldTooLong { field: "uri", .. })
        ));

        // Values exactly at the limit pass.
        let max_name = "N".repeat(MAX_NAME_LENGTH);
        assert!(encode_create_metadata_v3(&bare_data(&max_name, "MD", "https://x"), true).is_ok());
    }

    #[test]
    fn test_update_metadata_immutable_golden_bytes() {
        // Tag 15, then None/None/None/Some(false): exactly six bytes.
        let encoded = encode_update_metadata_immutable().unwrap();
        assert_eq!(encoded, vec![UPDATE_METADATA_ACCOUNT_V2, 0, 0, 0, 1, 0]);
    }

    #[test]
    fn test_create_instruction_account_order() {
        let metadata = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let payer = Pubkey::new_unique();

        let ix = create_metadata_account_v3(
            &metadata,
            &mint,
            &payer,
            &payer,
            &payer,
            &bare_data("Moon", "MD", "https://x"),
            true,
        )
        .unwrap();

        assert_eq!(ix.program_id, TOKEN_METADATA_PROGRAM_ID);
        assert_eq!(ix.accounts.len(), 7);

        // Metadata account is writable, mint authority and payer sign.
        assert_eq!(ix.accounts[0].pubkey, metadata);
        assert!(ix.accounts[0].is_writable);
        assert!(!ix.accounts[0].is_signer);
        assert!(ix.accounts[2].is_signer, "mint authority must sign");
        assert!(ix.accounts[3].is_signer, "payer must sign");
        assert!(ix.accounts[3].is_writable, "payer funds the account");
        assert_eq!(ix.accounts[5].pubkey, system_program::id());
    }

    #[test]
    fn test_decode_rejects_wrong_tag() {
        let err = decode_create_metadata_v3(&[UPDATE_METADATA_ACCOUNT_V2, 0, 0]).unwrap_err();
        assert!(matches!(err, EncodingError::InvalidData(_)));

        let err = decode_create_metadata_v3(&[]).unwrap_err();
        assert!(matches!(err, EncodingError::InvalidData(_)));
    }
}
